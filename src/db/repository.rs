use sqlx::{SqliteConnection, SqlitePool};

use crate::extract::CourseRecord;
use crate::models::{Course, CourseSummary, Review, User};

pub async fn fetch_courses(db: &SqlitePool) -> Result<Vec<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(
        "SELECT id, title, code, professor, term, credit, ai_review FROM courses ORDER BY id",
    )
    .fetch_all(db)
    .await
}

pub async fn find_course_by_id(db: &SqlitePool, id: i64) -> Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(
        "SELECT id, title, code, professor, term, credit, ai_review FROM courses WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

/// Insert one normalized roster record. The stored code is rebuilt from the
/// record's subject and number; `ai_review` starts empty, not NULL.
pub async fn insert_course(
    conn: &mut SqliteConnection,
    record: &CourseRecord,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO courses (title, code, professor, term, credit, ai_review) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&record.title)
    .bind(record.code())
    .bind(&record.instructors)
    .bind(&record.term)
    .bind(record.credit)
    .bind("")
    .execute(conn)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Delete a course together with its reviews and saved-course rows.
pub async fn delete_course(db: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let mut tx = db.begin().await?;

    sqlx::query("DELETE FROM reviews WHERE course_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM saved_courses WHERE course_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    let affected = sqlx::query("DELETE FROM courses WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    tx.commit().await?;
    Ok(affected > 0)
}

pub async fn fetch_reviews_for_course(
    db: &SqlitePool,
    course_id: i64,
) -> Result<Vec<Review>, sqlx::Error> {
    sqlx::query_as::<_, Review>(
        "SELECT id, source, content, course_id FROM reviews WHERE course_id = ? ORDER BY id",
    )
    .bind(course_id)
    .fetch_all(db)
    .await
}

pub async fn insert_review(
    conn: &mut SqliteConnection,
    course_id: i64,
    source: &str,
    content: &str,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query("INSERT INTO reviews (source, content, course_id) VALUES (?, ?, ?)")
        .bind(source)
        .bind(content)
        .bind(course_id)
        .execute(conn)
        .await?;

    Ok(result.last_insert_rowid())
}

pub async fn insert_user(db: &SqlitePool, name: &str, netid: &str) -> Result<User, sqlx::Error> {
    let result = sqlx::query("INSERT INTO users (name, netid) VALUES (?, ?)")
        .bind(name)
        .bind(netid)
        .execute(db)
        .await?;

    Ok(User {
        id: result.last_insert_rowid(),
        name: name.to_string(),
        netid: netid.to_string(),
    })
}

pub async fn find_user_by_id(db: &SqlitePool, id: i64) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT id, name, netid FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn fetch_saved_courses(
    db: &SqlitePool,
    user_id: i64,
) -> Result<Vec<CourseSummary>, sqlx::Error> {
    sqlx::query_as::<_, CourseSummary>(
        r#"
        SELECT c.id, c.title, c.code
        FROM courses c
        JOIN saved_courses sc ON sc.course_id = c.id
        WHERE sc.user_id = ?
        ORDER BY c.id
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
}

pub async fn is_course_saved(
    db: &SqlitePool,
    user_id: i64,
    course_id: i64,
) -> Result<bool, sqlx::Error> {
    let row: Option<(i64,)> = sqlx::query_as(
        "SELECT 1 FROM saved_courses WHERE user_id = ? AND course_id = ?",
    )
    .bind(user_id)
    .bind(course_id)
    .fetch_optional(db)
    .await?;

    Ok(row.is_some())
}

pub async fn save_course(db: &SqlitePool, user_id: i64, course_id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO saved_courses (course_id, user_id) VALUES (?, ?)")
        .bind(course_id)
        .bind(user_id)
        .execute(db)
        .await?;

    Ok(())
}

pub async fn unsave_course(
    db: &SqlitePool,
    user_id: i64,
    course_id: i64,
) -> Result<bool, sqlx::Error> {
    let affected = sqlx::query("DELETE FROM saved_courses WHERE course_id = ? AND user_id = ?")
        .bind(course_id)
        .bind(user_id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup_test_db() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create test db");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        pool
    }

    fn sample_record(subject: &str, number: &str) -> CourseRecord {
        CourseRecord {
            term: "SP26".to_string(),
            subject: subject.to_string(),
            number: number.to_string(),
            title: "Test Course".to_string(),
            description: "A course.".to_string(),
            credit: 4,
            grading_basis: "GRD".to_string(),
            meeting_days: Some("MWF".to_string()),
            meeting_time: Some("10:10AM-11:00AM".to_string()),
            meeting_location: None,
            instructors: "Test Instructor (ti1)".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_fetch_course() {
        let pool = setup_test_db().await;

        let mut conn = pool.acquire().await.expect("Failed to acquire connection");
        let id = insert_course(&mut conn, &sample_record("CS", "3110"))
            .await
            .expect("Failed to insert course");
        drop(conn);

        let courses = fetch_courses(&pool).await.expect("Failed to fetch courses");
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].id, id);
        assert_eq!(courses[0].code, "CS 3110");
        assert_eq!(courses[0].professor, "Test Instructor (ti1)");
        assert_eq!(courses[0].ai_review.as_deref(), Some(""));
    }

    #[tokio::test]
    async fn test_delete_course_cascades_to_reviews() {
        let pool = setup_test_db().await;

        let mut conn = pool.acquire().await.expect("Failed to acquire connection");
        let course_id = insert_course(&mut conn, &sample_record("CS", "2110"))
            .await
            .expect("Failed to insert course");
        insert_review(&mut conn, course_id, "CUReviews", "Solid intro.")
            .await
            .expect("Failed to insert review");
        insert_review(&mut conn, course_id, "RMP", "Tough but fair.")
            .await
            .expect("Failed to insert review");
        drop(conn);

        let reviews = fetch_reviews_for_course(&pool, course_id)
            .await
            .expect("Failed to fetch reviews");
        assert_eq!(reviews.len(), 2);

        let deleted = delete_course(&pool, course_id)
            .await
            .expect("Failed to delete course");
        assert!(deleted);

        let reviews = fetch_reviews_for_course(&pool, course_id)
            .await
            .expect("Failed to fetch reviews");
        assert!(reviews.is_empty());

        let deleted_again = delete_course(&pool, course_id)
            .await
            .expect("Failed to delete course");
        assert!(!deleted_again);
    }

    #[tokio::test]
    async fn test_save_and_unsave_course() {
        let pool = setup_test_db().await;

        let mut conn = pool.acquire().await.expect("Failed to acquire connection");
        let course_id = insert_course(&mut conn, &sample_record("CS", "2800"))
            .await
            .expect("Failed to insert course");
        drop(conn);

        let user = insert_user(&pool, "Ada", "al123")
            .await
            .expect("Failed to insert user");

        assert!(!is_course_saved(&pool, user.id, course_id).await.unwrap());

        save_course(&pool, user.id, course_id)
            .await
            .expect("Failed to save course");
        assert!(is_course_saved(&pool, user.id, course_id).await.unwrap());

        let saved = fetch_saved_courses(&pool, user.id)
            .await
            .expect("Failed to fetch saved courses");
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].code, "CS 2800");

        let removed = unsave_course(&pool, user.id, course_id)
            .await
            .expect("Failed to unsave course");
        assert!(removed);

        let saved = fetch_saved_courses(&pool, user.id)
            .await
            .expect("Failed to fetch saved courses");
        assert!(saved.is_empty());

        let removed_again = unsave_course(&pool, user.id, course_id)
            .await
            .expect("Failed to unsave course");
        assert!(!removed_again);
    }

    #[tokio::test]
    async fn test_duplicate_save_is_rejected_by_primary_key() {
        let pool = setup_test_db().await;

        let mut conn = pool.acquire().await.expect("Failed to acquire connection");
        let course_id = insert_course(&mut conn, &sample_record("ECE", "2300"))
            .await
            .expect("Failed to insert course");
        drop(conn);

        let user = insert_user(&pool, "Grace", "gh456")
            .await
            .expect("Failed to insert user");

        save_course(&pool, user.id, course_id)
            .await
            .expect("Failed to save course");
        assert!(save_course(&pool, user.id, course_id).await.is_err());
    }
}
