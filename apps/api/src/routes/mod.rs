pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::export::handlers::handle_export;
use crate::extraction::handlers::{handle_upload_jd, handle_upload_resume};
use crate::state::AppState;
use crate::tailoring::handlers::handle_improve;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        // Upload API
        .route("/api/upload/resume", post(handle_upload_resume))
        .route("/api/upload/resume/", post(handle_upload_resume))
        .route("/api/upload/jd", post(handle_upload_jd))
        .route("/api/upload/jd/", post(handle_upload_jd))
        // Improve API
        .route("/api/improve", post(handle_improve))
        .route("/api/improve/", post(handle_improve))
        // Export API
        .route("/api/export", post(handle_export))
        .route("/api/export/", post(handle_export))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::export::tests::sample_payload;
    use crate::tailoring::orchestrator::tests::ScriptedModel;

    const BOUNDARY: &str = "XTAILORBOUNDARY";

    fn app_with(model: Arc<ScriptedModel>, api_key: Option<&str>) -> Router {
        build_router(AppState::new(Config::for_tests(api_key), model))
    }

    fn app() -> Router {
        app_with(Arc::new(ScriptedModel::happy_path()), Some("test-key"))
    }

    fn json_request(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    /// `parts` are `(field name, optional file name, content)`.
    fn multipart_request(uri: &str, parts: &[(&str, Option<&str>, &[u8])]) -> Request<Body> {
        let mut body = Vec::new();
        for (name, filename, content) in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match filename {
                Some(filename) => body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                ),
                None => body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                ),
            }
            body.extend_from_slice(content);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_and_root() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "tailor-api");

        let response = app()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"Resume Tailor API is running!");
    }

    #[tokio::test]
    async fn test_improve_happy_path() {
        let model = Arc::new(ScriptedModel::happy_path());
        let response = app_with(model.clone(), Some("test-key"))
            .oneshot(json_request(
                "/api/improve/",
                json!({"resume_text": "Ada Lovelace, engineer", "jd_text": "Rust engineer"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Resume improvement generated successfully!");
        assert_eq!(
            body["improved_summary"],
            "Seasoned backend engineer focused on Rust services."
        );
        assert_eq!(body["improved_bullets"].as_array().unwrap().len(), 2);
        assert_eq!(body["suggested_skills"], json!(["Python", "Leadership", "SQL"]));
        assert_eq!(body["extracted_resume_data"]["education"][0]["year"], "2019");
        assert_eq!(model.call_count(), 5);
    }

    #[tokio::test]
    async fn test_improve_without_api_key_makes_no_llm_call() {
        let model = Arc::new(ScriptedModel::happy_path());
        let response = app_with(model.clone(), None)
            .oneshot(json_request(
                "/api/improve",
                json!({"resume_text": "Ada", "jd_text": "Rust engineer"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["code"], "CONFIGURATION_ERROR");
        assert_eq!(body["error"], "Gemini API Key not configured.");
        assert_eq!(model.call_count(), 0);
    }

    #[tokio::test]
    async fn test_improve_blank_input_is_bad_request() {
        let model = Arc::new(ScriptedModel::happy_path());
        let response = app_with(model.clone(), Some("test-key"))
            .oneshot(json_request(
                "/api/improve",
                json!({"resume_text": "   ", "jd_text": "Rust engineer"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Resume and Job Description text are required");
        assert_eq!(model.call_count(), 0);
    }

    #[tokio::test]
    async fn test_upload_jd_file() {
        let response = app()
            .oneshot(multipart_request(
                "/api/upload/jd",
                &[("file", Some("role.txt"), &b"Senior Rust Engineer"[..])],
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["content"], "Senior Rust Engineer");
        assert_eq!(body["filename"], "role.txt");
    }

    #[tokio::test]
    async fn test_upload_jd_pasted_text() {
        let response = app()
            .oneshot(multipart_request(
                "/api/upload/jd",
                &[("text", None, &b"We need a Rust engineer"[..])],
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["content"], "We need a Rust engineer");
        assert_eq!(body["filename"], "pasted_text");
    }

    #[tokio::test]
    async fn test_upload_jd_requires_content() {
        let response = app()
            .oneshot(multipart_request("/api/upload/jd", &[("text", None, &b"   "[..])]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app()
            .oneshot(multipart_request("/api/upload/jd", &[("other", None, &b"x"[..])]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "No file or text provided");
    }

    #[tokio::test]
    async fn test_upload_resume_missing_file_part() {
        let response = app()
            .oneshot(multipart_request("/api/upload/resume", &[("text", None, &b"hi"[..])]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "No file part");
    }

    #[tokio::test]
    async fn test_upload_resume_rejects_unsupported_type() {
        let response = app()
            .oneshot(multipart_request(
                "/api/upload/resume",
                &[("file", Some("cv.txt"), &b"plain text"[..])],
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["code"], "UNSUPPORTED_FORMAT");
        assert_eq!(body["error"], "Unsupported file type. Please upload PDF or DOCX.");
    }

    #[tokio::test]
    async fn test_upload_resume_docx() {
        let docx = crate::extraction::tests::sample_docx();
        let response = app()
            .oneshot(multipart_request(
                "/api/upload/resume",
                &[("file", Some("cv.docx"), &docx[..])],
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["filename"], "cv.docx");
        assert!(body["extracted_text"]
            .as_str()
            .unwrap()
            .starts_with("Ada Lovelace\n"));
    }

    #[tokio::test]
    async fn test_export_unsupported_format() {
        let response = app()
            .oneshot(json_request("/api/export", sample_payload("rtf")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "UNSUPPORTED_EXPORT_FORMAT");
    }

    #[tokio::test]
    async fn test_export_pdf_download() {
        let response = app()
            .oneshot(json_request("/api/export", sample_payload("PDF")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"tailored_resume.pdf\""
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_export_defaults_to_docx() {
        let mut payload = sample_payload("docx");
        payload.as_object_mut().unwrap().remove("format");
        let response = app()
            .oneshot(json_request("/api/export/", payload))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"tailored_resume.docx\""
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    async fn assert_json_bad_request(response: Response) {
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        let body = body_json(response).await;
        assert_eq!(body["code"], "BAD_REQUEST");
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid request body:"));
    }

    #[tokio::test]
    async fn test_export_null_format_is_json_bad_request() {
        let mut payload = sample_payload("pdf");
        payload["format"] = Value::Null;
        let response = app()
            .oneshot(json_request("/api/export", payload))
            .await
            .unwrap();
        assert_json_bad_request(response).await;
    }

    #[tokio::test]
    async fn test_export_non_string_bullet_is_json_bad_request() {
        let mut payload = sample_payload("docx");
        payload["improved_bullets"] = json!(["ok", 5]);
        let response = app()
            .oneshot(json_request("/api/export", payload))
            .await
            .unwrap();
        assert_json_bad_request(response).await;
    }

    #[tokio::test]
    async fn test_improve_malformed_body_is_json_bad_request() {
        let model = Arc::new(ScriptedModel::happy_path());
        let request = Request::builder()
            .method("POST")
            .uri("/api/improve")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"resume_text\": "))
            .unwrap();
        let response = app_with(model.clone(), Some("test-key"))
            .oneshot(request)
            .await
            .unwrap();

        assert_json_bad_request(response).await;
        assert_eq!(model.call_count(), 0);
    }

    #[tokio::test]
    async fn test_export_without_content_type_is_json_bad_request() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/export")
            .body(Body::from(sample_payload("pdf").to_string()))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_json_bad_request(response).await;
    }
}
