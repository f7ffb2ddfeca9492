//! # Axum Helpers
//!
//! Shared building blocks for the workspace's Axum services.
//!
//! - **[`errors`]**: response envelope, [`AppError`] to HTTP mapping, validation flattening
//! - **[`extractors`]**: [`ValidatedJson`], [`QueryParams`], [`PathParam`]
//! - **[`http`]**: CORS and security headers
//! - **[`server`]**: router assembly with OpenAPI UIs, liveness route, graceful shutdown
//!
//! ```ignore
//! use axum_helpers::server::{create_production_app, create_router, health_router};
//!
//! let router = create_router::<ApiDoc>(api_routes).await?;
//! let app = router.merge(health_router(core_config::app_info!()));
//! create_production_app(app, &config.server, Duration::from_secs(30), async {}).await?;
//! ```

pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use errors::{ApiResponse, AppError, ErrorCode, FieldError, flatten_validation_errors};
pub use extractors::{PathParam, QueryParams, ValidatedJson};
pub use http::{cors_layer_from_env, security_headers};
pub use server::{
    HealthResponse, ShutdownCoordinator, create_production_app, create_router, health_router,
    shutdown_signal,
};
