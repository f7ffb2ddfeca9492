//! OpenAPI documentation configuration

use utoipa::OpenApi;

use crate::api::health::ApiHealth;

/// Combined OpenAPI documentation for all APIs
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Events API",
        version = "0.1.0",
        description = "REST API for competition events, stored in MongoDB or in memory",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    paths(crate::api::health::api_health),
    components(schemas(ApiHealth, domain_events::StorageHealth)),
    nest(
        (path = "/api/events", api = domain_events::ApiDoc)
    ),
    tags(
        (name = "events", description = "Competition event management"),
        (name = "health", description = "Server and storage status")
    )
)]
pub struct ApiDoc;
