//! Projection deletion endpoint.

use axum::{
    Extension,
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};

use crate::{
    Error,
    database_id::ProjectionId,
    owner::OwnerId,
    projection::{ProjectionState, delete_projection},
    render_message,
};

/// Handle a request to delete a projection.
pub async fn delete_projection_endpoint(
    Path(projection_id): Path<ProjectionId>,
    State(state): State<ProjectionState>,
    Extension(owner): Extension<OwnerId>,
) -> Result<Response, Error> {
    let family = state.store.family();

    delete_projection(&projection_id, &owner, state.store.as_ref()).inspect_err(|error| {
        tracing::warn!("Could not delete {family} projection {projection_id}: {error}")
    })?;

    Ok(render_message(
        StatusCode::OK,
        &format!("The {family} projection was removed"),
    ))
}
