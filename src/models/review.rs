use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Review {
    pub id: i64,
    pub source: String,
    pub content: String,
    pub course_id: i64,
}

/// Review as nested inside its course payload (no course id).
#[derive(Debug, Clone, Serialize)]
pub struct ReviewSummary {
    pub id: i64,
    pub source: String,
    pub content: String,
}

impl From<Review> for ReviewSummary {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            source: review.source,
            content: review.content,
        }
    }
}

/// Standalone serialized form with the owning course id.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewDetail {
    pub id: i64,
    pub source: String,
    pub content: String,
    pub course: i64,
}

impl From<Review> for ReviewDetail {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            source: review.source,
            content: review.content,
            course: review.course_id,
        }
    }
}
