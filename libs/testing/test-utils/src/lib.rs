//! Shared test utilities for domain testing
//!
//! - `TestMongo`: MongoDB container with automatic cleanup (feature: "mongo")
//! - `TestDataBuilder`: deterministic event payloads (always available)
//! - `assertions`: envelope assertion helpers (always available)
//!
//! # Features
//!
//! - `mongo`: Enables MongoDB test infrastructure
//! - `all`: Enables all database test infrastructure
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { workspace = true, features = ["mongo"] }
//! ```
//!
//! ```rust,ignore
//! use test_utils::{TestDataBuilder, TestMongo};
//!
//! #[tokio::test]
//! #[ignore = "requires Docker"]
//! async fn my_mongo_test() {
//!     let mongo = TestMongo::new().await;
//!     let db = mongo.database("events_test");
//!     let payload = TestDataBuilder::from_test_name("my_mongo_test").event_payload("main");
//! }
//! ```

use chrono::{Duration, SecondsFormat, Utc};
use serde_json::{Value, json};

#[cfg(feature = "mongo")]
mod mongo;

#[cfg(feature = "mongo")]
pub use mongo::TestMongo;

const EVENT_TYPES: [&str; 8] = [
    "Technical",
    "Cultural",
    "Sports",
    "Academic",
    "Literary",
    "Art",
    "Music",
    "Dance",
];

/// Builder for test data with deterministic variation
///
/// The same seed always yields the same payloads, so failures reproduce.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed from the test name (the recommended constructor).
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_create_event");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let name = TestDataBuilder::new(7).name("event", "main");
    /// assert_eq!(name, "test-event-7-main");
    /// ```
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }

    /// Event type picked from the seed
    pub fn event_type(&self) -> &'static str {
        EVENT_TYPES[(self.seed % EVENT_TYPES.len() as u64) as usize]
    }

    /// RFC 3339 timestamp `days` from now, at millisecond precision
    pub fn future_date(&self, days: i64) -> String {
        (Utc::now() + Duration::days(days)).to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// A complete, valid create/replace payload.
    ///
    /// The title is lower case so callers can check title-casing.
    pub fn event_payload(&self, suffix: &str) -> Value {
        let base = (self.seed % 1000) as f64;
        json!({
            "title": format!("event {} {}", self.seed % 10_000, suffix),
            "description": format!("Generated for {}", self.name("event", suffix)),
            "prizeMoney": {
                "first": base + 300.0,
                "second": base + 200.0,
                "third": base + 100.0
            },
            "dateTime": self.future_date(30),
            "venue": "Main Hall",
            "eventType": self.event_type(),
            "maxTeamSize": (self.seed % 50) + 1
        })
    }
}

/// Test assertion helpers
pub mod assertions {
    use serde_json::Value;

    /// Assert that an optional value is Some
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }

    /// Assert a success envelope with the given message; returns `data`.
    pub fn assert_success<'a>(body: &'a Value, message: &str) -> &'a Value {
        assert_eq!(body["success"], true, "expected success envelope: {body}");
        assert_eq!(body["message"], message, "unexpected message: {body}");
        &body["data"]
    }

    /// Assert a failure envelope with the given message.
    pub fn assert_failure(body: &Value, message: &str) {
        assert_eq!(body["success"], false, "expected failure envelope: {body}");
        assert_eq!(body["message"], message, "unexpected message: {body}");
        assert!(body.get("data").is_none(), "failure carries data: {body}");
    }
}
