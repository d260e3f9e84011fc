//! # API REST
//!
//! HTTP surface of the clinical notes extractor.
//!
//! Handles:
//! - the HTML note form (`GET /`) and its submission (`POST /submit`)
//! - a JSON extraction endpoint (`POST /api/extract`) and `GET /health`
//! - OpenAPI/Swagger documentation for the JSON endpoints
//!
//! Uses `notes-core` for the extraction pipeline and `api-shared` for the JSON types.

#![warn(rust_2018_idioms)]

pub mod pages;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, Json},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_shared::{ExtractReq, ExtractRes, HealthRes, HealthService, MedicationRes, ServiceItemRes};
use notes_core::{ExtractionService, NotesError, ResultView};

/// Application state shared across request handlers.
#[derive(Clone)]
pub struct AppState {
    extraction: ExtractionService,
}

impl AppState {
    pub fn new(extraction: ExtractionService) -> Self {
        Self { extraction }
    }
}

/// Urlencoded body of the note form.
#[derive(Debug, Deserialize)]
pub struct SubmitForm {
    pub patient_prompt: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(health, extract_json),
    components(schemas(HealthRes, ExtractReq, ExtractRes, MedicationRes, ServiceItemRes))
)]
pub struct ApiDoc;

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/submit", post(submit))
        .route("/health", get(health))
        .route("/api/extract", post(extract_json))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Render the empty note form.
#[axum::debug_handler]
async fn index() -> Html<String> {
    Html(pages::index_page())
}

/// Extract the submitted note and render the result tables.
///
/// # Errors
/// A form without `patient_prompt` is rejected by the `Form` extractor with a client error.
/// Returns `500 Internal Server Error` if the model call or the extraction fails; the cause is
/// logged, not shown.
#[axum::debug_handler]
async fn submit(
    State(state): State<AppState>,
    Form(form): Form<SubmitForm>,
) -> Result<Html<String>, (StatusCode, &'static str)> {
    match state.extraction.extract_note(&form.patient_prompt).await {
        Ok(result) => {
            let view = ResultView::from(&result);
            Ok(Html(pages::result_page(&view)))
        }
        Err(e) => {
            tracing::error!("Submit error: {:?}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, "Internal error"))
        }
    }
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint used for monitoring.
#[axum::debug_handler]
async fn health() -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    post,
    path = "/api/extract",
    request_body = ExtractReq,
    responses(
        (status = 200, description = "Structured record", body = ExtractRes),
        (status = 422, description = "Model reply could not be parsed"),
        (status = 502, description = "Model API failed")
    )
)]
/// Extract a clinical note and return the structured record as JSON.
///
/// # Errors
/// Returns `502 Bad Gateway` if the model call fails after retries, and
/// `422 Unprocessable Entity` if the model reply has no usable ```json block.
#[axum::debug_handler]
async fn extract_json(
    State(state): State<AppState>,
    Json(req): Json<ExtractReq>,
) -> Result<Json<ExtractRes>, (StatusCode, &'static str)> {
    match state.extraction.extract_note(&req.patient_prompt).await {
        Ok(result) => Ok(Json(result.into())),
        Err(NotesError::Extraction(e)) => {
            tracing::error!("Extract reply error: {:?}", e);
            Err((
                StatusCode::UNPROCESSABLE_ENTITY,
                "Model reply could not be parsed",
            ))
        }
        Err(e) => {
            tracing::error!("Extract model error: {:?}", e);
            Err((StatusCode::BAD_GATEWAY, "Model API error"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request};
    use http_body_util::BodyExt;
    use notes_core::error::LlmResult;
    use notes_core::{ChatMessage, ChatModel, LlmError};
    use std::sync::Arc;
    use tower::ServiceExt;

    const METFORMIN_REPLY: &str = "Sure.\n```json\n{\"status\":\"stable\",\"pharmacy\":{\"medications\":[{\"name\":\"Metformin\",\"dosage\":\"500\",\"unit\":\"mg\",\"ICD_code\":\"E11\",\"frequency\":\"twice daily\"}]},\"services\":{\"tests\":[]},\"unknown_words\":[]}\n```\n";

    struct FixedModel(Option<&'static str>);

    #[async_trait]
    impl ChatModel for FixedModel {
        async fn complete(&self, _messages: &[ChatMessage]) -> LlmResult<String> {
            self.0.map(String::from).ok_or(LlmError::NoChoices)
        }
    }

    fn app(reply: Option<&'static str>) -> Router {
        let service = ExtractionService::new(Arc::new(FixedModel(reply)));
        router(AppState::new(service))
    }

    fn form_request(body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/submit")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    fn json_request(body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/extract")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn index_renders_form() {
        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = app(None).oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("name=\"patient_prompt\""));
    }

    #[tokio::test]
    async fn submit_renders_metformin_row() {
        let req = form_request(
            "patient_prompt=Patient+stable%2C+prescribed+Metformin+500mg+twice+daily",
        );
        let response = app(Some(METFORMIN_REPLY)).oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("<p id=\"status\">stable</p>"));
        assert!(html.contains(
            "<td>Metformin</td>\n      <td>500</td>\n      <td>mg</td>\n      <td>E11</td>\n      <td>twice daily</td>"
        ));

        let pharmacy = html.split("<div id=\"pharmacy\">").nth(1).unwrap();
        let pharmacy = pharmacy.split("</div>").next().unwrap();
        assert_eq!(pharmacy.matches("<tr>").count(), 1);

        let unknown = html.split("<div id=\"unknown-words\">").nth(1).unwrap();
        let unknown = unknown.split("</div>").next().unwrap();
        assert!(unknown.contains("<th>Unknown Words</th>"));
        assert!(!unknown.contains("<td>"));
    }

    #[tokio::test]
    async fn submit_without_unknown_words_renders_empty_table() {
        let req = form_request("patient_prompt=note");
        let response = app(Some("```json\n{\"status\":\"stable\"}\n```"))
            .oneshot(req)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        let unknown = html.split("<div id=\"unknown-words\">").nth(1).unwrap();
        assert!(!unknown.split("</div>").next().unwrap().contains("<td>"));
    }

    #[tokio::test]
    async fn submit_renders_every_services_category() {
        let reply = "```json\n{\"services\":{\"tests\":[\"CBC\"],\"imaging\":[\"MRI\"]}}\n```";
        let response = app(Some(reply))
            .oneshot(form_request("patient_prompt=note"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        let services = html.split("<div id=\"services\">").nth(1).unwrap();
        let services = services.split("</div>").next().unwrap();
        assert!(services.contains("<td>imaging</td>\n      <td>MRI</td>"));
        assert!(services.contains("<td>tests</td>\n      <td>CBC</td>"));
    }

    #[tokio::test]
    async fn submit_without_patient_prompt_is_rejected() {
        let req = form_request("other_field=x");
        let response = app(Some(METFORMIN_REPLY)).oneshot(req).await.unwrap();

        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn submit_reply_without_fence_is_server_error() {
        let req = form_request("patient_prompt=note");
        let response = app(Some("{\"status\":\"stable\"}")).oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_text(response).await, "Internal error");
    }

    #[tokio::test]
    async fn submit_model_failure_is_server_error() {
        let req = form_request("patient_prompt=note");
        let response = app(None).oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn extract_json_returns_record() {
        let req = json_request(r#"{"patient_prompt":"Patient stable"}"#);
        let response = app(Some(METFORMIN_REPLY)).oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(json["status"], "stable");
        assert_eq!(json["medications"][0]["name"], "Metformin");
        assert_eq!(json["medications"][0]["frequency"], "twice daily");
        assert!(json["services"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn extract_json_maps_error_kinds() {
        let response = app(Some("no fence here"))
            .oneshot(json_request(r#"{"patient_prompt":"x"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let response = app(None)
            .oneshot(json_request(r#"{"patient_prompt":"x"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn health_is_ok() {
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = app(None).oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(json["ok"], true);
    }

    #[test]
    fn openapi_documents_json_endpoints() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        assert!(doc["paths"]["/api/extract"]["post"].is_object());
        assert!(doc["paths"]["/health"]["get"].is_object());
    }
}
