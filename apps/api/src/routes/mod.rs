pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::pipeline::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let max_upload = state.config.max_cv_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/health", get(health::health_handler))
        // Session
        .route("/api/v1/session", get(handlers::handle_get_session))
        .route("/api/v1/session/reset", post(handlers::handle_reset_session))
        .route("/api/v1/session/phase", post(handlers::handle_set_phase))
        .route(
            "/api/v1/session/selection",
            put(handlers::handle_select_candidate),
        )
        // Job description
        .route(
            "/api/v1/job-description/analyze",
            post(handlers::handle_analyze_jd),
        )
        .route(
            "/api/v1/job-description/confirm",
            post(handlers::handle_confirm_jd),
        )
        // Candidates
        .route(
            "/api/v1/candidates/cvs",
            post(handlers::handle_upload_cvs).layer(DefaultBodyLimit::max(max_upload)),
        )
        .route(
            "/api/v1/candidates/partition",
            get(handlers::handle_partition),
        )
        // Phase batches
        .route("/api/v1/screening", post(handlers::handle_screening))
        .route("/api/v1/questions", post(handlers::handle_generate_questions))
        .route("/api/v1/interviews", post(handlers::handle_submit_interviews))
        .route("/api/v1/reports", post(handlers::handle_generate_reports))
        // Reporting views
        .route("/api/v1/reports/chart", get(handlers::handle_chart))
        .route("/api/v1/reports/ranking", get(handlers::handle_ranking))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::evaluation::mock::ScriptedEvaluator;
    use crate::models::ScreeningStatus;
    use crate::pipeline::session::SessionStore;

    const BOUNDARY: &str = "shortlist-test-boundary";

    fn app(evaluator: ScriptedEvaluator) -> (Router, SessionStore) {
        let session = SessionStore::new();
        let state = AppState {
            session: session.clone(),
            evaluator: Arc::new(evaluator),
            config: Config::default(),
        };
        (build_router(state), session)
    }

    fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn multipart_request(files: &[(&str, &str, &str)]) -> Request<Body> {
        let mut body = String::new();
        for (file_name, media_type, content) in files {
            body.push_str(&format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"files\"; filename=\"{file_name}\"\r\nContent-Type: {media_type}\r\n\r\n{content}\r\n"
            ));
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));
        Request::builder()
            .method(Method::POST)
            .uri("/api/v1/candidates/cvs")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    async fn get_json(router: &Router, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        send(router, request).await
    }

    #[tokio::test]
    async fn test_health() {
        let (router, _) = app(ScriptedEvaluator::new());
        let (status, body) = get_json(&router, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_initial_session() {
        let (router, _) = app(ScriptedEvaluator::new());
        let (status, body) = get_json(&router, "/api/v1/session").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["current_phase"], "job_description");
        assert_eq!(body["candidates"], json!([]));
        assert_eq!(body["job_description"], Value::Null);
    }

    #[tokio::test]
    async fn test_batch_in_wrong_phase_is_conflict() {
        let (router, _) = app(ScriptedEvaluator::new());
        let (status, body) = send(
            &router,
            json_request(Method::POST, "/api/v1/screening", json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn test_skipping_ahead_is_conflict() {
        let (router, session) = app(ScriptedEvaluator::new());
        let (status, _) = send(
            &router,
            json_request(
                Method::POST,
                "/api/v1/session/phase",
                json!({"phase": "report"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(
            session.snapshot().await.current_phase,
            crate::pipeline::phase::Phase::JobDescription
        );
    }

    #[tokio::test]
    async fn test_job_description_to_screening_over_http() {
        let evaluator = ScriptedEvaluator::new()
            .with_cv("ada.pdf", "Ada Lovelace")
            .with_cv("bob.txt", "Bob Stone")
            .with_screening("Ada Lovelace", 80.0, ScreeningStatus::Qualified)
            .with_screening("Bob Stone", 40.0, ScreeningStatus::Disqualified);
        let (router, _) = app(evaluator);

        let (status, draft) = send(
            &router,
            json_request(
                Method::POST,
                "/api/v1/job-description/analyze",
                json!({"text": "Senior data engineer"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(draft["rubric"].as_array().unwrap().len(), 4);

        let (status, session) = send(
            &router,
            json_request(Method::POST, "/api/v1/job-description/confirm", draft.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(session["current_phase"], "cv_scanning");

        let (status, _) = send(
            &router,
            json_request(Method::POST, "/api/v1/job-description/confirm", draft),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, scan) = send(
            &router,
            multipart_request(&[
                ("ada.pdf", "application/pdf", "%PDF-1.4"),
                ("bob.txt", "text/plain", "Bob Stone, analyst"),
            ]),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(scan["parsed"], 2);

        let (status, outcome) = send(
            &router,
            json_request(Method::POST, "/api/v1/screening", json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(outcome["attempted"], 2);
        assert_eq!(outcome["updated"], 2);
        assert_eq!(outcome["failures"], json!([]));

        let (status, partition) = get_json(&router, "/api/v1/candidates/partition").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(partition["qualified"][0]["profile"]["name"], "Ada Lovelace");
        assert_eq!(partition["disqualified"][0]["profile"]["name"], "Bob Stone");
    }

    #[tokio::test]
    async fn test_upload_with_no_parsable_cv_is_bad_gateway() {
        let (router, session) = app(ScriptedEvaluator::new());
        session
            .set_job_description(crate::models::JobDescription {
                text: "Analyst".to_string(),
                rubric: crate::evaluation::mock::standard_rubric(),
            })
            .await;
        session
            .set_phase(crate::pipeline::phase::Phase::CvScanning)
            .await;

        let (status, body) = send(
            &router,
            multipart_request(&[("unknown.pdf", "application/pdf", "%PDF-1.4")]),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "BATCH_FAILED");
        assert_eq!(body["error"]["failures"][0]["name"], "unknown.pdf");
        assert_eq!(body["error"]["failures"][0]["kind"], "declined");
        assert!(session.snapshot().await.candidates.is_empty());
    }
}
