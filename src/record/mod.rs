//! Materialized records: income and expenses that actually happened.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod get_endpoint;
mod models;
mod sqlite;
mod state;
mod storage;
mod store;

pub(crate) use self::core::insert_record;
pub use self::core::{MaterializedRecord, create_record_table};
pub use create_endpoint::create_record_endpoint;
pub use delete_endpoint::delete_record_endpoint;
pub use edit_endpoint::edit_record_endpoint;
pub use get_endpoint::{get_record_endpoint, list_records_endpoint};
pub use models::{CreateRecordRequest, RecordResponse, UpdateRecordRequest};
pub use sqlite::SQLiteRecordStore;
pub use state::RecordState;
pub use storage::{create_record, delete_record, get_record, get_record_page, update_record};
pub use store::RecordStore;
