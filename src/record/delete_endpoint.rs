//! Record deletion endpoint.

use axum::{
    Extension,
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};

use crate::{
    Error,
    database_id::RecordId,
    owner::OwnerId,
    record::{RecordState, delete_record},
    render_message,
};

/// Handle a request to delete a record.
pub async fn delete_record_endpoint(
    Path(record_id): Path<RecordId>,
    State(state): State<RecordState>,
    Extension(owner): Extension<OwnerId>,
) -> Result<Response, Error> {
    let family = state.store.family();

    delete_record(&record_id, &owner, state.store.as_ref())
        .inspect_err(|error| tracing::warn!("Could not delete {family} record {record_id}: {error}"))?;

    Ok(render_message(
        StatusCode::OK,
        &format!("The {family} record was removed"),
    ))
}
