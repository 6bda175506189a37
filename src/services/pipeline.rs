use std::sync::Arc;

use serde::Serialize;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{info, warn};

use crate::db::repository;
use crate::error::AppError;
use crate::extract;
use crate::models::Course;
use crate::sources::SourceClient;

/// Roster targets loaded by the first stage.
pub const ROSTER_TARGETS: &[(&str, &str, &str)] = &[
    ("SP26", "CS", "1110"),
    ("SP26", "CS", "1998"),
    ("SP26", "CS", "2110"),
    ("SP26", "CS", "2800"),
    ("SP26", "CS", "3110"),
    ("SP26", "CS", "3410"),
    ("SP26", "CS", "4410"),
    ("SP26", "ECE", "2300"),
];

pub const CUREVIEWS_SOURCE: &str = "CUReviews";
pub const RMP_SOURCE: &str = "RMP";

#[derive(Debug, Default, Serialize)]
pub struct StageReport {
    pub inserted: usize,
    pub skipped: usize,
    pub failed: usize,
}

#[derive(Debug, Default, Serialize)]
pub struct IngestReport {
    pub roster: StageReport,
    pub course_reviews: StageReport,
    pub professor_ratings: StageReport,
}

/// Why one item was dropped from a stage. Absences are expected and counted
/// as skips; lookup or unexpected errors count as failures. Neither aborts
/// the stage.
#[derive(Debug)]
enum Skip {
    NoMatch(String),
    BadShape(String),
    Lookup(String),
    Other(String),
}

impl Skip {
    fn from_error(err: AppError) -> Self {
        match err {
            AppError::Lookup(msg) => Skip::Lookup(msg),
            AppError::Shape(msg) => Skip::BadShape(msg),
            other => Skip::Other(other.to_string()),
        }
    }
}

impl StageReport {
    fn record_skip(&mut self, context: &str, skip: Skip) {
        match skip {
            Skip::NoMatch(msg) => {
                self.skipped += 1;
                warn!("{}: skipped, {}", context, msg);
            }
            Skip::BadShape(msg) => {
                self.skipped += 1;
                warn!("{}: skipped, {}", context, msg);
            }
            Skip::Lookup(msg) => {
                self.failed += 1;
                warn!("{}: lookup failed, {}", context, msg);
            }
            Skip::Other(msg) => {
                self.failed += 1;
                warn!("{}: failed, {}", context, msg);
            }
        }
    }
}

/// Runs the three ingestion stages in fixed order: roster, then CUReviews,
/// then Rate My Professors. One item is processed at a time; each stage
/// commits once at its end, so a crash mid-stage loses that stage's
/// uncommitted inserts.
pub struct IngestService {
    db: SqlitePool,
    sources: Arc<dyn SourceClient>,
}

impl IngestService {
    pub fn new(db: SqlitePool, sources: Arc<dyn SourceClient>) -> Self {
        Self { db, sources }
    }

    pub async fn run_all(&self) -> Result<IngestReport, AppError> {
        info!("Starting ingestion pipeline");

        info!("Stage 1: loading class roster");
        let roster = self.load_roster().await?;
        info!(
            "Roster stage done: {} inserted, {} skipped, {} failed",
            roster.inserted, roster.skipped, roster.failed
        );

        info!("Stage 2: loading CUReviews");
        let course_reviews = self.load_course_reviews().await?;
        info!(
            "CUReviews stage done: {} inserted, {} skipped, {} failed",
            course_reviews.inserted, course_reviews.skipped, course_reviews.failed
        );

        info!("Stage 3: loading Rate My Professors");
        let professor_ratings = self.load_professor_ratings().await?;
        info!(
            "RMP stage done: {} inserted, {} skipped, {} failed",
            professor_ratings.inserted, professor_ratings.skipped, professor_ratings.failed
        );

        Ok(IngestReport {
            roster,
            course_reviews,
            professor_ratings,
        })
    }

    async fn load_roster(&self) -> Result<StageReport, AppError> {
        let mut report = StageReport::default();
        let mut tx = self.db.begin().await?;

        for (term, subject, number) in ROSTER_TARGETS {
            let context = format!("{} {} {}", term, subject, number);
            match self.load_roster_target(&mut tx, term, subject, number).await {
                Ok(()) => {
                    report.inserted += 1;
                    info!("Inserted {} {} ({})", subject, number, term);
                }
                Err(skip) => report.record_skip(&context, skip),
            }
        }

        tx.commit().await?;
        Ok(report)
    }

    async fn load_roster_target(
        &self,
        conn: &mut SqliteConnection,
        term: &str,
        subject: &str,
        number: &str,
    ) -> Result<(), Skip> {
        let raw = self
            .sources
            .fetch_roster_class(term, subject, number)
            .await
            .map_err(Skip::from_error)?;

        let Some(raw) = raw else {
            return Err(Skip::NoMatch(format!(
                "no class found for {} {} {}",
                term, subject, number
            )));
        };

        let record = extract::course_record(&raw, term, subject, number);
        repository::insert_course(conn, &record)
            .await
            .map_err(|e| Skip::Other(e.to_string()))?;

        Ok(())
    }

    async fn load_course_reviews(&self) -> Result<StageReport, AppError> {
        let courses = repository::fetch_courses(&self.db).await?;
        info!("Scraping CUReviews for {} stored courses", courses.len());

        let mut report = StageReport::default();
        let mut tx = self.db.begin().await?;

        for course in &courses {
            match self.load_reviews_for_course(&mut tx, course).await {
                Ok(count) => {
                    report.inserted += count;
                    info!("{}: {} reviews found", course.code, count);
                }
                Err(skip) => report.record_skip(&course.code, skip),
            }
        }

        tx.commit().await?;
        Ok(report)
    }

    async fn load_reviews_for_course(
        &self,
        conn: &mut SqliteConnection,
        course: &Course,
    ) -> Result<usize, Skip> {
        let (subject, number) = extract::split_course_code(&course.code).ok_or_else(|| {
            Skip::BadShape(format!("invalid course code '{}'", course.code))
        })?;

        let raw_reviews = self
            .sources
            .fetch_course_reviews(&subject, &number)
            .await
            .map_err(Skip::from_error)?;

        let mut inserted = 0;
        for raw in &raw_reviews {
            let record = extract::review_record(raw);
            repository::insert_review(conn, course.id, CUREVIEWS_SOURCE, &record.content)
                .await
                .map_err(|e| Skip::Other(e.to_string()))?;
            inserted += 1;
        }

        Ok(inserted)
    }

    async fn load_professor_ratings(&self) -> Result<StageReport, AppError> {
        let courses = repository::fetch_courses(&self.db).await?;
        info!("Scraping RMP for {} stored courses", courses.len());

        let mut report = StageReport::default();
        let mut tx = self.db.begin().await?;

        for course in &courses {
            let context = format!("{} ({})", course.code, course.professor);
            match self.load_ratings_for_course(&mut tx, course).await {
                Ok(count) => {
                    report.inserted += count;
                    info!("{}: {} matching ratings", context, count);
                }
                Err(skip) => report.record_skip(&context, skip),
            }
        }

        tx.commit().await?;
        Ok(report)
    }

    async fn load_ratings_for_course(
        &self,
        conn: &mut SqliteConnection,
        course: &Course,
    ) -> Result<usize, Skip> {
        if extract::split_course_code(&course.code).is_none() {
            return Err(Skip::BadShape(format!(
                "invalid course code '{}'",
                course.code
            )));
        }

        let ratings = self
            .sources
            .fetch_professor_ratings(&course.professor)
            .await
            .map_err(Skip::from_error)?;

        let Some(ratings) = ratings else {
            return Err(Skip::NoMatch(format!(
                "professor '{}' not found",
                course.professor
            )));
        };

        let matching = extract::ratings_for_course(ratings, &course.code);

        let mut inserted = 0;
        for rating in &matching {
            let content = rating.comment.as_deref().unwrap_or("");
            repository::insert_review(conn, course.id, RMP_SOURCE, content)
                .await
                .map_err(|e| Skip::Other(e.to_string()))?;
            inserted += 1;
        }

        Ok(inserted)
    }
}
