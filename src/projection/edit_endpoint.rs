//! Projection editing endpoint.

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    Error,
    database_id::ProjectionId,
    owner::OwnerId,
    projection::{ProjectionState, UpdateProjectionRequest, update_projection},
};

/// Handle a request to change a projection, responding with the updated projection.
pub async fn edit_projection_endpoint(
    Path(projection_id): Path<ProjectionId>,
    State(state): State<ProjectionState>,
    Extension(owner): Extension<OwnerId>,
    Json(request): Json<UpdateProjectionRequest>,
) -> Result<Response, Error> {
    let updated = update_projection(&projection_id, request, &owner, state.store.as_ref())
        .inspect_err(|error| {
            tracing::warn!(
                "Could not update {} projection {projection_id}: {error}",
                state.store.family()
            )
        })?;

    match updated {
        Some(projection) => Ok(Json(projection).into_response()),
        None => Err(Error::NotFound),
    }
}
