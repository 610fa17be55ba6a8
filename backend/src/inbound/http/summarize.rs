//! Stateless summarization endpoint.
//!
//! ```text
//! OPTIONS /api/summarize
//! POST    /api/summarize {"content":"..."}
//! ```
//!
//! Both methods answer with permissive CORS headers, including on errors, so
//! browser callers on other origins can read failures too.

use actix_web::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
};
use actix_web::{HttpResponse, HttpResponseBuilder, ResponseError, options, post, web};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

const ALLOW_ORIGIN: &str = "*";
const ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
const ALLOW_HEADERS: &str = "Content-Type, Authorization";

/// Request payload for `POST /api/summarize`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct SummarizeRequest {
    #[schema(example = "Long meeting notes...")]
    pub content: Option<String>,
}

/// Response payload for `POST /api/summarize`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SummarizeResponse {
    pub summary: String,
}

fn with_cors(mut builder: HttpResponseBuilder) -> HttpResponseBuilder {
    builder
        .insert_header((ACCESS_CONTROL_ALLOW_ORIGIN, ALLOW_ORIGIN))
        .insert_header((ACCESS_CONTROL_ALLOW_METHODS, ALLOW_METHODS))
        .insert_header((ACCESS_CONTROL_ALLOW_HEADERS, ALLOW_HEADERS));
    builder
}

/// CORS preflight.
#[utoipa::path(
    options,
    path = "/api/summarize",
    responses((status = 200, description = "Preflight accepted")),
    tags = ["summarize"],
    operation_id = "summarizePreflight",
    security([])
)]
#[options("/api/summarize")]
pub async fn summarize_preflight() -> HttpResponse {
    with_cors(HttpResponse::Ok()).finish()
}

/// Summarize arbitrary text.
///
/// A body that is not a JSON object with a string `content` is treated as
/// carrying no content.
#[utoipa::path(
    post,
    path = "/api/summarize",
    request_body = SummarizeRequest,
    responses(
        (status = 200, description = "Generated summary", body = SummarizeResponse),
        (status = 400, description = "Content is required", body = ErrorSchema),
        (status = 401, description = "Provider rejected the API key", body = ErrorSchema),
        (status = 500, description = "Summarization not configured", body = ErrorSchema),
        (status = 502, description = "Provider failed", body = ErrorSchema),
        (status = 504, description = "Provider timed out", body = ErrorSchema)
    ),
    tags = ["summarize"],
    operation_id = "summarize",
    security([])
)]
#[post("/api/summarize")]
pub async fn summarize(state: web::Data<HttpState>, body: web::Bytes) -> HttpResponse {
    let request = serde_json::from_slice::<SummarizeRequest>(&body).unwrap_or_else(|err| {
        debug!(error = %err, "summarize body is not a valid request");
        SummarizeRequest::default()
    });

    match state.summarize.summarize(request.content).await {
        Ok(summary) => with_cors(HttpResponse::Ok()).json(SummarizeResponse { summary }),
        Err(error) => {
            let mut response = error.error_response();
            let headers = response.headers_mut();
            for (name, value) in [
                (ACCESS_CONTROL_ALLOW_ORIGIN, ALLOW_ORIGIN),
                (ACCESS_CONTROL_ALLOW_METHODS, ALLOW_METHODS),
                (ACCESS_CONTROL_ALLOW_HEADERS, ALLOW_HEADERS),
            ] {
                headers.insert(name, actix_web::http::header::HeaderValue::from_static(value));
            }
            response
        }
    }
}
