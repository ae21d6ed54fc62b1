use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{error, instrument};

use crate::state::AppState;

use super::dto::Estimate;
use super::services::{estimate_photo, EstimateError};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/estimate", post(estimate))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024)) // 10MB photo
}

pub async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}

/// POST /estimate (multipart)
/// One field `photo` carrying the JPEG bytes.
#[instrument(skip(state, mp))]
pub async fn estimate(
    State(state): State<AppState>,
    mut mp: Multipart,
) -> Result<Json<Estimate>, (StatusCode, Json<Value>)> {
    let mut photo = None;
    loop {
        match mp.next_field().await {
            Ok(Some(field)) => {
                if field.name() != Some("photo") {
                    continue;
                }
                match field.bytes().await {
                    Ok(bytes) => photo = Some(bytes),
                    Err(e) => {
                        error!(error = %e, "photo upload read failed");
                        return Err(server_error(e));
                    }
                }
                break;
            }
            Ok(None) => break,
            // a broken multipart stream is not a missing photo
            Err(e) => {
                error!(error = %e, "multipart parse failed");
                return Err(server_error(e));
            }
        }
    }
    let Some(photo) = photo else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Missing photo" })),
        ));
    };

    match estimate_photo(&state, photo).await {
        Ok(est) => Ok(Json(est)),
        Err(EstimateError::Malformed { raw }) => {
            error!(raw = %raw, "vision model reply was not JSON");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Model did not return JSON", "raw": raw })),
            ))
        }
        Err(EstimateError::Failed(e)) => {
            error!(error = %e, "estimation failed");
            Err(server_error(e))
        }
    }
}

fn server_error(e: impl std::fmt::Display) -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Server error", "details": e.to_string() })),
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use anyhow::anyhow;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request};
    use tower::ServiceExt;

    use crate::estimate::services::VisionModel;

    use super::*;

    const BOUNDARY: &str = "foodlog-test-boundary";

    struct CannedVision(String);

    #[async_trait]
    impl VisionModel for CannedVision {
        async fn describe_photo(&self, _prompt: &str, _photo: &[u8]) -> anyhow::Result<String> {
            Ok(self.0.clone())
        }
    }

    struct DownVision;

    #[async_trait]
    impl VisionModel for DownVision {
        async fn describe_photo(&self, _prompt: &str, _photo: &[u8]) -> anyhow::Result<String> {
            Err(anyhow!("connection refused"))
        }
    }

    fn app(vision: Arc<dyn VisionModel>) -> Router {
        routes().with_state(AppState::fake(vision))
    }

    fn multipart_request(field: &str) -> Request<Body> {
        let body = format!(
            "--{BOUNDARY}\r\n\
             content-disposition: form-data; name=\"{field}\"; filename=\"photo.jpg\"\r\n\
             content-type: image/jpeg\r\n\r\n\
             jpegbytes\r\n\
             --{BOUNDARY}--\r\n"
        );
        Request::builder()
            .method("POST")
            .uri("/estimate")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_json(res: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let res = app(Arc::new(DownVision))
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_json(res).await, json!({ "ok": true }));
    }

    #[tokio::test]
    async fn estimate_returns_normalized_json() {
        let vision = CannedVision(r#"{"description":"Ramen","calories":520,"protein_g":24}"#.into());
        let res = app(Arc::new(vision))
            .oneshot(multipart_request("photo"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            body_json(res).await,
            json!({ "description": "Ramen", "calories": 520, "protein_g": 24 })
        );
    }

    #[tokio::test]
    async fn form_without_photo_field_is_400() {
        let res = app(Arc::new(DownVision))
            .oneshot(multipart_request("selfie"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(res).await, json!({ "error": "Missing photo" }));
    }

    #[tokio::test]
    async fn non_json_model_reply_is_500_with_raw() {
        let raw = "I think this is about 500 kcal";
        let res = app(Arc::new(CannedVision(raw.into())))
            .oneshot(multipart_request("photo"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(res).await,
            json!({ "error": "Model did not return JSON", "raw": raw })
        );
    }

    #[tokio::test]
    async fn upstream_failure_is_500_server_error() {
        let res = app(Arc::new(DownVision))
            .oneshot(multipart_request("photo"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(res).await;
        assert_eq!(body["error"], "Server error");
        assert!(body["details"].is_string());
    }

    #[tokio::test]
    async fn truncated_photo_upload_is_500_not_missing_photo() {
        // field header arrives, body read then fails mid-stream
        let body = format!(
            "--{BOUNDARY}\r\n\
             content-disposition: form-data; name=\"photo\"; filename=\"photo.jpg\"\r\n\
             content-type: image/jpeg\r\n\r\n\
             jpeg"
        );
        let req = Request::builder()
            .method("POST")
            .uri("/estimate")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();
        let res = app(Arc::new(DownVision)).oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(res).await["error"], "Server error");
    }
}
