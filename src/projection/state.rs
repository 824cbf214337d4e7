//! The state shared by the projection endpoints.

use std::sync::Arc;

use crate::{AppState, family::Family, pagination::PaginationConfig, projection::SQLiteProjectionStore};

use super::ProjectionStore;

/// The state needed by the endpoints of one family's projections.
#[derive(Debug, Clone)]
pub struct ProjectionState {
    /// Where the family's projections are kept.
    pub store: Arc<dyn ProjectionStore>,
    /// The page defaults for listing projections.
    pub pagination_config: PaginationConfig,
}

impl ProjectionState {
    /// Build the state for `family`'s projections, backed by the app's SQLite database.
    pub fn for_family(state: &AppState, family: Family) -> Self {
        Self {
            store: Arc::new(SQLiteProjectionStore::new(
                state.db_connection.clone(),
                family,
            )),
            pagination_config: state.pagination_config.clone(),
        }
    }
}
