use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::course::CourseSummary;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub netid: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUserRequest {
    pub name: String,
    pub netid: String,
}

/// User plus the courses they saved, in minimal form.
#[derive(Debug, Clone, Serialize)]
pub struct UserDetail {
    pub id: i64,
    pub name: String,
    pub netid: String,
    pub courses: Vec<CourseSummary>,
}

impl UserDetail {
    pub fn new(user: User, courses: Vec<CourseSummary>) -> Self {
        Self {
            id: user.id,
            name: user.name,
            netid: user.netid,
            courses,
        }
    }
}
