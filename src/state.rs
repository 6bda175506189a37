use std::sync::Arc;

use sqlx::SqlitePool;

use crate::sources::SourceClient;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub sources: Arc<dyn SourceClient>,
}
