//! Record editing endpoint.

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    Error,
    database_id::RecordId,
    owner::OwnerId,
    record::{RecordState, UpdateRecordRequest, update_record},
};

/// Handle a request to change a record, responding with the updated record.
pub async fn edit_record_endpoint(
    Path(record_id): Path<RecordId>,
    State(state): State<RecordState>,
    Extension(owner): Extension<OwnerId>,
    Json(request): Json<UpdateRecordRequest>,
) -> Result<Response, Error> {
    let updated = update_record(&record_id, request, &owner, state.store.as_ref()).inspect_err(
        |error| {
            tracing::warn!(
                "Could not update {} record {record_id}: {error}",
                state.store.family()
            )
        },
    )?;

    match updated {
        Some(record) => Ok(Json(record).into_response()),
        None => Err(Error::NotFound),
    }
}
