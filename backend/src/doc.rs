//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint from the inbound layer together
//! with the schema wrappers from [`crate::inbound::http::schemas`], so domain
//! types stay free of utoipa derives. Swagger UI serves it in debug builds.

use crate::inbound::http::auth::{LoginRequest, ProfileResponse, RegisterRequest};
use crate::inbound::http::health::ProbeResponse;
use crate::inbound::http::notes::{
    DeleteAllResponse, MutationActivity, NoteMutationResponse, NoteRequest, NoteResponse,
    NoticeResponse,
};
use crate::inbound::http::schemas::{
    ErrorCodeSchema, ErrorSchema, MutationKindSchema, MutationStateSchema, MutationStatusSchema,
};
use crate::inbound::http::session_config::SESSION_COOKIE_NAME;
use crate::inbound::http::summarize::{SummarizeRequest, SummarizeResponse};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                SESSION_COOKIE_NAME,
                "Session cookie issued by POST /api/v1/auth/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Notes backend API",
        description = "Session-authenticated note storage with AI summaries.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::notes::list_notes,
        crate::inbound::http::notes::create_note,
        crate::inbound::http::notes::delete_all_notes,
        crate::inbound::http::notes::note_activity,
        crate::inbound::http::notes::get_note,
        crate::inbound::http::notes::update_note,
        crate::inbound::http::notes::delete_note,
        crate::inbound::http::notes::generate_summary,
        crate::inbound::http::summarize::summarize_preflight,
        crate::inbound::http::summarize::summarize,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::refresh,
        crate::inbound::http::auth::current_user,
        crate::inbound::http::auth::oauth_callback,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        MutationKindSchema,
        MutationStatusSchema,
        MutationStateSchema,
        NoteRequest,
        NoteResponse,
        NoteMutationResponse,
        NoticeResponse,
        DeleteAllResponse,
        MutationActivity,
        SummarizeRequest,
        SummarizeResponse,
        LoginRequest,
        RegisterRequest,
        ProfileResponse,
        ProbeResponse,
    )),
    tags(
        (name = "notes", description = "Note storage and summaries"),
        (name = "summarize", description = "Stateless text summarization"),
        (name = "auth", description = "Sign-in flows and the current profile"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying OpenAPI schema and path registration.

    use super::*;
    use rstest::rstest;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    fn error_schema_uses_wire_field_names() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get(ERROR_SCHEMA_NAME).expect("Error schema");

        assert_object_schema_has_field(error_schema, "code");
        assert_object_schema_has_field(error_schema, "message");
        assert_object_schema_has_field(error_schema, "traceId");
    }

    #[rstest]
    fn note_response_is_camel_case() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let note = schemas.get("NoteResponse").expect("NoteResponse schema");

        assert_object_schema_has_field(note, "userId");
        assert_object_schema_has_field(note, "createdAt");
    }

    #[rstest]
    #[case("/api/v1/notes")]
    #[case("/api/v1/notes/{id}")]
    #[case("/api/v1/notes/{id}/summary")]
    #[case("/api/summarize")]
    #[case("/api/v1/auth/login")]
    #[case("/api/auth/callback")]
    #[case("/health/ready")]
    fn paths_are_registered(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing path {path}");
    }
}
