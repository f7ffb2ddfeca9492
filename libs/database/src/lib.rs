//! Database connectors shared by the services in this workspace.
//!
//! # Features
//!
//! - `mongodb` (default): MongoDB client bootstrap, health checks
//! - `config`: `core_config::FromEnv` for the connection settings
//!
//! ```ignore
//! use database::mongodb::{self, MongoConfig};
//!
//! let config = MongoConfig::with_database("mongodb://localhost:27017", "events");
//! let client = mongodb::connect_from_config_with_retry(&config, None).await?;
//! let db = client.database(config.database());
//! ```

pub mod common;

#[cfg(feature = "mongodb")]
pub mod mongodb;

pub use common::{DatabaseError, DatabaseResult};
