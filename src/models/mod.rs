pub mod course;
pub mod review;
pub mod user;

pub use course::{Course, CourseDetail, CourseSummary};
pub use review::{Review, ReviewDetail, ReviewSummary};
pub use user::{NewUserRequest, User, UserDetail};
