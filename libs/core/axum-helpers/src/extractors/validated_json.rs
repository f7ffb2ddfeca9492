//! JSON body extractor that also runs `validator` rules.

use crate::errors::AppError;
use axum::extract::{FromRequest, Json, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

/// `Json<T>` followed by `T::validate()`.
///
/// Malformed bodies become `AppError::JsonExtractorRejection`, rule
/// violations become `AppError::Validation`, both answered with 400.
///
/// ```ignore
/// async fn create(ValidatedJson(payload): ValidatedJson<CreateEvent>) -> impl IntoResponse { .. }
/// ```
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state).await?;
        data.validate()?;
        Ok(ValidatedJson(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::{Request as HttpRequest, StatusCode}, routing::post};
    use http_body_util::BodyExt;
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Deserialize, Validate)]
    struct Payload {
        #[validate(length(min = 1, message = "Name cannot be empty"))]
        name: String,
    }

    fn app() -> Router {
        Router::new().route(
            "/",
            post(|ValidatedJson(p): ValidatedJson<Payload>| async move { p.name }),
        )
    }

    async fn send(body: &'static str) -> (StatusCode, serde_json::Value, String) {
        let response = app()
            .oneshot(
                HttpRequest::post("/")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let text = String::from_utf8_lossy(&bytes).to_string();
        (status, serde_json::from_str(&text).unwrap_or_default(), text)
    }

    #[tokio::test]
    async fn test_valid_payload_passes_through() {
        let (status, _, text) = send(r#"{"name":"robotics"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(text, "robotics");
    }

    #[tokio::test]
    async fn test_rule_violation_is_400_with_errors() {
        let (status, body, _) = send(r#"{"name":""}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Validation failed");
        assert_eq!(body["errors"][0]["field"], "name");
        assert_eq!(body["errors"][0]["message"], "Name cannot be empty");
    }

    #[tokio::test]
    async fn test_malformed_json_is_400() {
        let (status, body, _) = send("{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["message"].as_str().unwrap().starts_with("Invalid JSON body:"));
    }

    #[tokio::test]
    async fn test_wrong_shape_is_400() {
        let (status, _, _) = send(r#"{"name":true}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
