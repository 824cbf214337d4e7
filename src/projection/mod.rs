//! Projections: expected income and expenses, optionally repeated monthly,
//! that can each be turned into a record once.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod get_endpoint;
mod materialize;
mod materialize_endpoint;
mod models;
mod recurrence;
mod sqlite;
mod state;
mod storage;
mod store;

pub use self::core::{Projection, create_projection_table};
pub use create_endpoint::create_projection_endpoint;
pub use delete_endpoint::delete_projection_endpoint;
pub use edit_endpoint::edit_projection_endpoint;
pub use get_endpoint::{get_projection_endpoint, list_projections_endpoint};
pub use materialize::{MaterializeOverride, Materialization, build_record, materialize};
pub use materialize_endpoint::materialize_projection_endpoint;
pub use models::{CreateProjectionRequest, ProjectionResponse, UpdateProjectionRequest};
pub use recurrence::{Expansion, expand_recurrence};
pub use sqlite::SQLiteProjectionStore;
pub use state::ProjectionState;
pub use storage::{
    create_projection, delete_projection, get_projection, get_projection_page, update_projection,
};
pub use store::ProjectionStore;
