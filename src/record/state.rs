//! The state shared by the record endpoints.

use std::sync::Arc;

use crate::{AppState, family::Family, pagination::PaginationConfig, record::SQLiteRecordStore};

use super::RecordStore;

/// The state needed by the endpoints of one family's records.
#[derive(Debug, Clone)]
pub struct RecordState {
    /// Where the family's records are kept.
    pub store: Arc<dyn RecordStore>,
    /// The page defaults for listing records.
    pub pagination_config: PaginationConfig,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl RecordState {
    /// Build the state for `family`'s records, backed by the app's SQLite database.
    pub fn for_family(state: &AppState, family: Family) -> Self {
        Self {
            store: Arc::new(SQLiteRecordStore::new(state.db_connection.clone(), family)),
            pagination_config: state.pagination_config.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}
