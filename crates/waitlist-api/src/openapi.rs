//! # OpenAPI Document Assembly
//!
//! Serves the generated document at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "OPTI-AVIS Waitlist API",
        version = "0.1.0",
        description = "Signup and status lookup for the OPTI-AVIS waitlist.\n\nA signup returns a short identifier; present it as `uniqueId` to look the registration up again."
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server"),
    ),
    paths(
        crate::routes::waitlist::create_entry,
        crate::routes::waitlist::lookup_entry,
    ),
    components(
        schemas(
            crate::routes::waitlist::CreateEntryRequest,
            crate::routes::waitlist::EntryResponse,
            crate::error::ErrorBody,
        ),
    ),
    tags(
        (name = "waitlist", description = "Waitlist signup and status lookup"),
    )
)]
pub struct ApiDoc;

pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json: Return the generated OpenAPI document.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_lists_waitlist_operations() {
        let doc = ApiDoc::openapi();
        let item = doc
            .paths
            .paths
            .get("/api/waitlist")
            .expect("waitlist path documented");
        assert!(item.operations.contains_key(&utoipa::openapi::PathItemType::Get));
        assert!(item.operations.contains_key(&utoipa::openapi::PathItemType::Post));
    }

    #[test]
    fn spec_documents_lookup_parameter() {
        let json = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let params = &json["paths"]["/api/waitlist"]["get"]["parameters"];
        assert_eq!(params[0]["name"], "uniqueId");
        assert_eq!(params[0]["in"], "query");
    }

    #[test]
    fn error_schema_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components present");
        assert!(components.schemas.contains_key("ErrorBody"));
        assert!(components.schemas.contains_key("EntryResponse"));
    }
}
