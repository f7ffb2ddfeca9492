use core_config::{AppInfo, FromEnv, app_info, env_parse_or, server::ServerConfig};
use database::mongodb::MongoConfig;
use strum::{Display, EnumString};

pub use core_config::Environment;

/// Where events are kept (`STORAGE_BACKEND`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum StorageBackend {
    #[default]
    #[strum(serialize = "memory")]
    Memory,
    #[strum(serialize = "mongodb", serialize = "mongo")]
    MongoDb,
}

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub environment: Environment,
    pub storage: StorageBackend,
    /// Present exactly when `storage` is [`StorageBackend::MongoDb`]
    pub mongodb: Option<MongoConfig>,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?;
        let storage = env_parse_or("STORAGE_BACKEND", StorageBackend::default())?;

        let mongodb = match storage {
            StorageBackend::MongoDb => Some(MongoConfig::from_env()?),
            StorageBackend::Memory => None,
        };

        Ok(Self {
            app: app_info!(),
            server,
            environment,
            storage,
            mongodb,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLEARED: [(&str, Option<&str>); 9] = [
        ("APP_ENV", None),
        ("HOST", None),
        ("PORT", None),
        ("STORAGE_BACKEND", None),
        ("MONGODB_URL", None),
        ("MONGO_URL", None),
        ("MONGODB_DATABASE", None),
        ("MONGO_DATABASE", None),
        ("MONGODB_MAX_POOL_SIZE", None),
    ];

    fn with_env<F: FnOnce()>(vars: &[(&str, Option<&str>)], f: F) {
        let mut all: Vec<(&str, Option<&str>)> = CLEARED
            .into_iter()
            .filter(|(key, _)| !vars.iter().any(|(k, _)| k == key))
            .collect();
        all.extend_from_slice(vars);
        temp_env::with_vars(all, f);
    }

    #[test]
    fn test_defaults_to_memory_backend() {
        with_env(&[], || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.storage, StorageBackend::Memory);
            assert!(config.mongodb.is_none());
            assert_eq!(config.server.port, 8080);
            assert_eq!(config.environment, Environment::Development);
            assert_eq!(config.app.name, "events_api");
        });
    }

    #[test]
    fn test_storage_backend_aliases() {
        assert_eq!("memory".parse::<StorageBackend>().unwrap(), StorageBackend::Memory);
        assert_eq!("MongoDB".parse::<StorageBackend>().unwrap(), StorageBackend::MongoDb);
        assert_eq!("mongo".parse::<StorageBackend>().unwrap(), StorageBackend::MongoDb);
        assert!("postgres".parse::<StorageBackend>().is_err());
        assert_eq!(StorageBackend::MongoDb.to_string(), "mongodb");
    }

    #[test]
    fn test_mongodb_backend_requires_connection_settings() {
        with_env(&[("STORAGE_BACKEND", Some("mongodb"))], || {
            let err = Config::from_env().unwrap_err();
            assert!(err.to_string().contains("MONGODB_URL"));
        });
    }

    #[test]
    fn test_mongodb_backend_loads_mongo_config() {
        with_env(
            &[
                ("STORAGE_BACKEND", Some("mongo")),
                ("MONGO_URL", Some("mongodb://db:27017")),
                ("MONGODB_DATABASE", Some("events")),
                ("APP_ENV", Some("production")),
            ],
            || {
                let config = Config::from_env().unwrap();
                let mongo = config.mongodb.unwrap();
                assert_eq!(mongo.url(), "mongodb://db:27017");
                assert_eq!(mongo.database(), "events");
                assert!(config.environment.is_production());
            },
        );
    }

    #[test]
    fn test_invalid_values_name_the_variable() {
        with_env(&[("STORAGE_BACKEND", Some("cassandra"))], || {
            let err = Config::from_env().unwrap_err();
            assert!(err.to_string().contains("STORAGE_BACKEND"));
        });

        with_env(&[("PORT", Some("eighty"))], || {
            let err = Config::from_env().unwrap_err();
            assert!(err.to_string().contains("PORT"));
        });
    }
}
