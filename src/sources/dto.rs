use serde::Deserialize;

// ---------------------------------------------------------------------------
// Class roster API (GET search/classes.json)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct RosterSearchResponse {
    #[serde(default)]
    pub data: RosterData,
}

#[derive(Debug, Default, Deserialize)]
pub struct RosterData {
    #[serde(default)]
    pub classes: Vec<RawClass>,
}

/// One class record from the roster search response. Only the fields the
/// extractor consumes are modeled; everything else is ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawClass {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub catalog_nbr: String,
    #[serde(default)]
    pub title_long: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub enroll_groups: Vec<RawEnrollGroup>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEnrollGroup {
    #[serde(default)]
    pub units_minimum: Option<f64>,
    #[serde(default)]
    pub grading_basis_short: Option<String>,
    #[serde(default)]
    pub class_sections: Vec<RawSection>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSection {
    #[serde(default)]
    pub ssr_component: Option<String>,
    #[serde(default)]
    pub meetings: Vec<RawMeeting>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMeeting {
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub time_start: Option<String>,
    #[serde(default)]
    pub time_end: Option<String>,
    #[serde(default)]
    pub location_descr: Option<String>,
    #[serde(default)]
    pub facility_descr: Option<String>,
    #[serde(default)]
    pub instructors: Vec<RawInstructor>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawInstructor {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub netid: Option<String>,
}

// ---------------------------------------------------------------------------
// CUReviews API (POST get-by-info, POST get-reviews)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CourseInfoResponse {
    #[serde(default)]
    pub result: Option<RawCourseInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCourseInfo {
    #[serde(default, rename = "_id")]
    pub id: Option<String>,
    #[serde(default, rename = "classSub")]
    pub class_sub: Option<String>,
    #[serde(default, rename = "classNum")]
    pub class_num: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CourseReviewsResponse {
    #[serde(default)]
    pub result: Option<Vec<RawCourseReview>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCourseReview {
    #[serde(default, rename = "_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub difficulty: Option<f64>,
    #[serde(default)]
    pub workload: Option<f64>,
    #[serde(default)]
    pub professors: Vec<String>,
    #[serde(default)]
    pub major: Vec<String>,
    #[serde(default)]
    pub grade: Option<String>,
}

// ---------------------------------------------------------------------------
// Rate My Professors GraphQL
// ---------------------------------------------------------------------------

pub const TEACHER_SEARCH_QUERY: &str = r#"
query SearchTeacher($query: TeacherSearchQuery!) {
  newSearch {
    teachers(query: $query) {
      edges {
        node { id firstName lastName school { name } }
      }
    }
  }
}"#;

pub const TEACHER_RATINGS_QUERY: &str = r#"
query GetRatings($id: ID!) {
  node(id: $id) {
    ... on Teacher {
      ratings(first: 100) {
        edges {
          node {
            class
            comment
            qualityRating
            difficultyRating
            date
            wouldTakeAgain
          }
        }
      }
    }
  }
}"#;

#[derive(Debug, Deserialize)]
pub struct TeacherSearchResponse {
    #[serde(default)]
    pub data: Option<TeacherSearchData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherSearchData {
    #[serde(default)]
    pub new_search: Option<NewSearch>,
}

#[derive(Debug, Deserialize)]
pub struct NewSearch {
    #[serde(default)]
    pub teachers: Option<TeacherConnection>,
}

#[derive(Debug, Deserialize)]
pub struct TeacherConnection {
    #[serde(default)]
    pub edges: Vec<TeacherEdge>,
}

#[derive(Debug, Deserialize)]
pub struct TeacherEdge {
    pub node: RawTeacher,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTeacher {
    pub id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub school: Option<RawSchool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSchool {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RatingsResponse {
    #[serde(default)]
    pub data: Option<RatingsData>,
}

#[derive(Debug, Deserialize)]
pub struct RatingsData {
    #[serde(default)]
    pub node: Option<RatingsNode>,
}

#[derive(Debug, Deserialize)]
pub struct RatingsNode {
    #[serde(default)]
    pub ratings: Option<RatingConnection>,
}

#[derive(Debug, Deserialize)]
pub struct RatingConnection {
    #[serde(default)]
    pub edges: Vec<RatingEdge>,
}

#[derive(Debug, Deserialize)]
pub struct RatingEdge {
    pub node: RawRating,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRating {
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub quality_rating: Option<f64>,
    #[serde(default)]
    pub difficulty_rating: Option<f64>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub would_take_again: Option<f64>,
}
