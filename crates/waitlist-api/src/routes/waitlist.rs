//! # Waitlist Routes
//!
//! - `POST /api/waitlist`: create an entry from a draft.
//! - `GET  /api/waitlist?uniqueId=<id>`: look up an entry.
//!
//! Both answer `{ "data": WaitlistEntry }` on success and
//! `{ "error": string }` otherwise.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use waitlist_core::{Draft, WaitlistEntry};

use crate::error::AppError;
use crate::extractors::{extract_json, extract_query};
use crate::gateway::GatewayError;
use crate::middleware::metrics::lookup_outcome;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/waitlist", get(lookup_entry).post(create_entry))
}

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// The form's answers, keyed by camelCase field name.
///
/// Yes/no questions take `"yes"` or `"no"`; numeric answers may be strings.
/// Any `uniqueId` in the body is ignored.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct CreateEntryRequest(#[schema(value_type = Object)] pub Draft);

/// Success envelope.
#[derive(Debug, Serialize, ToSchema)]
pub struct EntryResponse {
    /// The stored waitlist row, with snake_case column names.
    #[schema(value_type = Object)]
    pub data: WaitlistEntry,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LookupParams {
    /// Identifier returned at signup.
    #[serde(rename = "uniqueId")]
    pub unique_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/waitlist: Register a new waitlist entry.
#[utoipa::path(
    post,
    path = "/api/waitlist",
    request_body = CreateEntryRequest,
    responses(
        (status = 200, description = "Entry created", body = EntryResponse),
        (status = 400, description = "Malformed body or invalid record", body = crate::error::ErrorBody),
        (status = 500, description = "Persistence failure", body = crate::error::ErrorBody),
    ),
    tag = "waitlist"
)]
pub(crate) async fn create_entry(
    State(state): State<AppState>,
    body: Result<Json<CreateEntryRequest>, JsonRejection>,
) -> Result<Json<EntryResponse>, AppError> {
    let CreateEntryRequest(draft) = extract_json(body)?;
    let entry = state.gateway.create(&draft).await?;
    state.metrics.record_entry_created();
    Ok(Json(EntryResponse { data: entry }))
}

/// GET /api/waitlist: Look up an entry by its identifier.
#[utoipa::path(
    get,
    path = "/api/waitlist",
    params(LookupParams),
    responses(
        (status = 200, description = "Entry found", body = EntryResponse),
        (status = 400, description = "Missing uniqueId parameter", body = crate::error::ErrorBody),
        (status = 404, description = "User not found", body = crate::error::ErrorBody),
        (status = 500, description = "Persistence failure", body = crate::error::ErrorBody),
    ),
    tag = "waitlist"
)]
pub(crate) async fn lookup_entry(
    State(state): State<AppState>,
    params: Result<Query<LookupParams>, QueryRejection>,
) -> Result<Json<EntryResponse>, AppError> {
    let params = match extract_query(params) {
        Ok(params) => params,
        Err(err) => {
            state.metrics.record_lookup(lookup_outcome::INVALID);
            return Err(err);
        }
    };
    let result = state.gateway.lookup(params.unique_id.as_deref()).await;
    let outcome = match &result {
        Ok(_) => lookup_outcome::FOUND,
        Err(GatewayError::NotFound) => lookup_outcome::NOT_FOUND,
        Err(GatewayError::Validation(_)) => lookup_outcome::INVALID,
        Err(GatewayError::Persistence(_)) => lookup_outcome::ERROR,
    };
    state.metrics.record_lookup(outcome);
    Ok(Json(EntryResponse { data: result? }))
}
