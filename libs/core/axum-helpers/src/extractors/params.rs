//! Query string and path extractors that answer with the failure envelope.

use crate::errors::AppError;
use axum::extract::{FromRequestParts, Path, Query};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

/// `Query<T>` whose rejection is `AppError::QueryExtractorRejection`.
///
/// ```ignore
/// async fn list(QueryParams(query): QueryParams<ListQuery>) -> impl IntoResponse { .. }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryParams<T>(pub T);

impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(QueryParams(value))
    }
}

/// `Path<T>` whose rejection is `AppError::PathExtractorRejection`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathParam<T>(pub T);

impl<T, S> FromRequestParts<S> for PathParam<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(PathParam(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        routing::get,
    };
    use http_body_util::BodyExt;
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Deserialize)]
    struct Paging {
        page: Option<u32>,
    }

    fn app() -> Router {
        Router::new()
            .route(
                "/items",
                get(|QueryParams(q): QueryParams<Paging>| async move {
                    q.page.unwrap_or(1).to_string()
                }),
            )
            .route(
                "/items/{id}",
                get(|PathParam(id): PathParam<u32>| async move { id.to_string() }),
            )
    }

    async fn get_text(uri: &str) -> (StatusCode, String, Option<String>) {
        let response = app()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8_lossy(&bytes).to_string(), content_type)
    }

    #[tokio::test]
    async fn test_query_passes_through() {
        let (status, text, _) = get_text("/items?page=3").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(text, "3");
    }

    #[tokio::test]
    async fn test_duplicate_query_key_is_json_envelope() {
        let (status, text, content_type) = get_text("/items?page=1&page=2").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(content_type.as_deref(), Some("application/json"));

        let body: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(body["success"], false);
        assert!(
            body["message"]
                .as_str()
                .unwrap()
                .starts_with("Invalid query parameters:")
        );
    }

    #[tokio::test]
    async fn test_unparseable_path_is_json_envelope() {
        let (status, text, content_type) = get_text("/items/abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(content_type.as_deref(), Some("application/json"));

        let body: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(body["success"], false);
        assert!(
            body["message"]
                .as_str()
                .unwrap()
                .starts_with("Invalid path parameter:")
        );
    }
}
