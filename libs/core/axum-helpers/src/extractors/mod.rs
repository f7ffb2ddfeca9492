//! Request extractors that answer with the failure envelope on rejection.

pub mod params;
pub mod validated_json;

pub use params::{PathParam, QueryParams};
pub use validated_json::ValidatedJson;
