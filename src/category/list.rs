//! Category and payment method listing endpoints.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    category::{get_all_categories, get_all_payment_methods},
    family::Family,
};

/// The state needed for listing the categories of one family.
#[derive(Debug, Clone)]
pub struct CategoryListState {
    /// The database connection to read categories from.
    pub db_connection: Arc<Mutex<Connection>>,
    /// Which family's categories to list.
    pub family: Family,
}

impl CategoryListState {
    /// Build the state for listing `family`'s categories from the app state.
    pub fn for_family(state: &AppState, family: Family) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            family,
        }
    }
}

/// The state needed for listing payment methods.
#[derive(Debug, Clone)]
pub struct PaymentMethodListState {
    /// The database connection to read payment methods from.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for PaymentMethodListState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// List every category of the family in `state`.
pub async fn list_categories_endpoint(
    State(state): State<CategoryListState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let categories = get_all_categories(state.family, &connection).inspect_err(|error| {
        tracing::error!("Failed to retrieve {} categories: {error}", state.family)
    })?;

    Ok(Json(categories).into_response())
}

/// List every payment method.
pub async fn list_payment_methods_endpoint(
    State(state): State<PaymentMethodListState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let methods = get_all_payment_methods(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve payment methods: {error}"))?;

    Ok(Json(methods).into_response())
}
