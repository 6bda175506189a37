use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::review::{Review, ReviewSummary};

/// A course row as stored. `code` is "SUBJECT NUMBER" (e.g. "CS 3110");
/// review ingestion relies on that shape and skips rows that break it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Course {
    pub id: i64,
    pub title: String,
    pub code: String,
    pub professor: String,
    pub term: String,
    pub credit: i64,
    pub ai_review: Option<String>,
}

/// Full serialized form: the course plus its reviews.
#[derive(Debug, Clone, Serialize)]
pub struct CourseDetail {
    pub id: i64,
    pub title: String,
    pub code: String,
    pub professor: String,
    pub term: String,
    pub credit: i64,
    pub ai_review: Option<String>,
    pub reviews: Vec<ReviewSummary>,
}

impl CourseDetail {
    pub fn new(course: Course, reviews: Vec<Review>) -> Self {
        Self {
            id: course.id,
            title: course.title,
            code: course.code,
            professor: course.professor,
            term: course.term,
            credit: course.credit,
            ai_review: course.ai_review,
            reviews: reviews.into_iter().map(ReviewSummary::from).collect(),
        }
    }
}

/// Minimal form used when a course appears inside another entity's payload.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CourseSummary {
    pub id: i64,
    pub title: String,
    pub code: String,
}
