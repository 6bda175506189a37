pub mod dto;

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::AppError;

const DEFAULT_ROSTER_URL: &str = "https://classes.cornell.edu/api/2.0/search/classes.json";
const DEFAULT_CUREVIEWS_URL: &str = "https://www.cureviews.org";
const DEFAULT_RMP_URL: &str = "https://www.ratemyprofessors.com/graphql";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Debug)]
pub struct SourceConfig {
    pub roster_url: String,
    pub cureviews_url: String,
    pub rmp_url: String,
}

impl SourceConfig {
    pub fn from_env() -> Self {
        Self {
            roster_url: env::var("ROSTER_API_URL")
                .unwrap_or_else(|_| DEFAULT_ROSTER_URL.to_string()),
            cureviews_url: env::var("CUREVIEWS_API_URL")
                .unwrap_or_else(|_| DEFAULT_CUREVIEWS_URL.to_string()),
            rmp_url: env::var("RMP_GRAPHQL_URL").unwrap_or_else(|_| DEFAULT_RMP_URL.to_string()),
        }
    }
}

/// Network access to the three upstream sources. Every call hits the network;
/// nothing is cached or retried.
#[async_trait]
pub trait SourceClient: Send + Sync {
    /// Look up one class on the roster. `Ok(None)` when no candidate matches
    /// the (subject, number) pair exactly.
    async fn fetch_roster_class(
        &self,
        term: &str,
        subject: &str,
        number: &str,
    ) -> Result<Option<dto::RawClass>, AppError>;

    /// Resolve a course on CUReviews and fetch its reviews, in two sequential
    /// calls.
    async fn fetch_course_reviews(
        &self,
        subject: &str,
        number: &str,
    ) -> Result<Vec<dto::RawCourseReview>, AppError>;

    /// Search Rate My Professors by display name (first hit wins, no
    /// disambiguation) and fetch that teacher's ratings. `Ok(None)` when the
    /// search returns nothing.
    async fn fetch_professor_ratings(
        &self,
        name: &str,
    ) -> Result<Option<Vec<dto::RawRating>>, AppError>;
}

pub struct HttpSourceClient {
    client: Client,
    config: SourceConfig,
}

impl HttpSourceClient {
    pub fn new(config: SourceConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent("Mozilla/5.0")
            .build()
            .map_err(|e| AppError::BadRequest(format!("Failed to build http client: {}", e)))?;
        Ok(Self { client, config })
    }

    async fn get_course_info(
        &self,
        subject: &str,
        number: &str,
    ) -> Result<dto::RawCourseInfo, AppError> {
        let url = format!("{}/api/courses/get-by-info", self.config.cureviews_url);
        let payload = serde_json::json!({ "subject": subject, "number": number });

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|_| AppError::InternalServerError)?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::Lookup(format!(
                "CUReviews get-by-info error {} for {} {}",
                status, subject, number
            )));
        }

        let parsed: dto::CourseInfoResponse = response
            .json()
            .await
            .map_err(|e| AppError::Shape(format!("Failed to parse CUReviews course info: {}", e)))?;

        parsed.result.ok_or_else(|| {
            AppError::Shape(format!("No CUReviews entry for {} {}", subject, number))
        })
    }

    async fn get_reviews(&self, course_id: &str) -> Result<Vec<dto::RawCourseReview>, AppError> {
        let url = format!("{}/api/courses/get-reviews", self.config.cureviews_url);
        let payload = serde_json::json!({ "courseId": course_id });

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|_| AppError::InternalServerError)?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::Lookup(format!(
                "CUReviews get-reviews error {} for course {}",
                status, course_id
            )));
        }

        let parsed: dto::CourseReviewsResponse = response
            .json()
            .await
            .map_err(|e| AppError::Shape(format!("Failed to parse CUReviews reviews: {}", e)))?;

        Ok(parsed.result.unwrap_or_default())
    }

    async fn search_professor(&self, name: &str) -> Result<Option<String>, AppError> {
        let body = serde_json::json!({
            "query": dto::TEACHER_SEARCH_QUERY,
            "variables": { "query": { "text": name } }
        });

        let response = self
            .client
            .post(&self.config.rmp_url)
            .json(&body)
            .send()
            .await
            .map_err(|_| AppError::InternalServerError)?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::Lookup(format!(
                "RMP teacher search error {} for '{}'",
                status, name
            )));
        }

        let parsed: dto::TeacherSearchResponse = response
            .json()
            .await
            .map_err(|e| AppError::Shape(format!("Failed to parse RMP search response: {}", e)))?;

        let edges = parsed
            .data
            .and_then(|d| d.new_search)
            .and_then(|s| s.teachers)
            .map(|t| t.edges)
            .unwrap_or_default();

        // First hit wins; no disambiguation by school or department.
        Ok(edges.into_iter().next().map(|e| e.node.id))
    }

    async fn get_professor_ratings(
        &self,
        teacher_id: &str,
    ) -> Result<Vec<dto::RawRating>, AppError> {
        let body = serde_json::json!({
            "query": dto::TEACHER_RATINGS_QUERY,
            "variables": { "id": teacher_id }
        });

        let response = self
            .client
            .post(&self.config.rmp_url)
            .json(&body)
            .send()
            .await
            .map_err(|_| AppError::InternalServerError)?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::Lookup(format!(
                "RMP ratings error {} for teacher {}",
                status, teacher_id
            )));
        }

        let parsed: dto::RatingsResponse = response
            .json()
            .await
            .map_err(|e| AppError::Shape(format!("Failed to parse RMP ratings response: {}", e)))?;

        let ratings = parsed
            .data
            .and_then(|d| d.node)
            .and_then(|n| n.ratings)
            .map(|r| r.edges.into_iter().map(|e| e.node).collect())
            .unwrap_or_default();

        Ok(ratings)
    }
}

/// Client-side exact-match filter over the roster search results: the search
/// endpoint treats `q` as a free-text query and may return neighbors.
fn exact_match(classes: Vec<dto::RawClass>, subject: &str, number: &str) -> Option<dto::RawClass> {
    classes
        .into_iter()
        .find(|c| c.subject == subject && c.catalog_nbr == number)
}

#[async_trait]
impl SourceClient for HttpSourceClient {
    async fn fetch_roster_class(
        &self,
        term: &str,
        subject: &str,
        number: &str,
    ) -> Result<Option<dto::RawClass>, AppError> {
        let response = self
            .client
            .get(&self.config.roster_url)
            .query(&[("roster", term), ("subject", subject), ("q", number)])
            .send()
            .await
            .map_err(|_| AppError::InternalServerError)?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::Lookup(format!(
                "Roster API error {} for {} {} {}",
                status, term, subject, number
            )));
        }

        let parsed: dto::RosterSearchResponse = response
            .json()
            .await
            .map_err(|e| AppError::Shape(format!("Failed to parse roster response: {}", e)))?;

        Ok(exact_match(parsed.data.classes, subject, number))
    }

    async fn fetch_course_reviews(
        &self,
        subject: &str,
        number: &str,
    ) -> Result<Vec<dto::RawCourseReview>, AppError> {
        let info = self.get_course_info(subject, number).await?;
        let course_id = info.id.ok_or_else(|| {
            AppError::Shape(format!("CUReviews entry for {} {} has no id", subject, number))
        })?;
        self.get_reviews(&course_id).await
    }

    async fn fetch_professor_ratings(
        &self,
        name: &str,
    ) -> Result<Option<Vec<dto::RawRating>>, AppError> {
        let Some(teacher_id) = self.search_professor(name).await? else {
            return Ok(None);
        };
        Ok(Some(self.get_professor_ratings(&teacher_id).await?))
    }
}

/// Stand-in client that finds nothing upstream. Lets the service run without
/// network access.
pub struct NoopSourceClient;

#[async_trait]
impl SourceClient for NoopSourceClient {
    async fn fetch_roster_class(
        &self,
        _term: &str,
        _subject: &str,
        _number: &str,
    ) -> Result<Option<dto::RawClass>, AppError> {
        Ok(None)
    }

    async fn fetch_course_reviews(
        &self,
        _subject: &str,
        _number: &str,
    ) -> Result<Vec<dto::RawCourseReview>, AppError> {
        Ok(Vec::new())
    }

    async fn fetch_professor_ratings(
        &self,
        _name: &str,
    ) -> Result<Option<Vec<dto::RawRating>>, AppError> {
        Ok(None)
    }
}
