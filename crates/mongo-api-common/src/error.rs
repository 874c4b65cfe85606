//! Error types for mongo-api

use thiserror::Error;

/// Result type alias for mongo-api operations
pub type Result<T> = std::result::Result<T, MongoApiError>;

/// Unified error type for all mongo-api operations
///
/// The facades define exactly one failure of their own,
/// [`MongoApiError::InvalidConfiguration`]. Everything the driver reports
/// (connection and authentication failures, timeouts, write conflicts,
/// server-side rejections of malformed filters or pipelines) is carried in
/// [`MongoApiError::MongoDB`] without translation.
#[derive(Error, Debug)]
pub enum MongoApiError {
    /// Rejected before any network activity, e.g. an unknown connection scheme
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("MongoDB error: {0}")]
    MongoDB(#[from] mongodb::error::Error),

    /// Malformed hex string handed to the deprecated ObjectId helper
    #[error("Invalid ObjectId: {0}")]
    ObjectId(#[from] bson::oid::Error),
}

impl MongoApiError {
    /// Shorthand for building an `InvalidConfiguration` error
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        MongoApiError::InvalidConfiguration(msg.into())
    }

    /// Returns true if the facade rejected its configuration
    pub fn is_invalid_configuration(&self) -> bool {
        matches!(self, MongoApiError::InvalidConfiguration(_))
    }

    /// The underlying driver error, untouched, if this error came from the driver
    pub fn driver_error(&self) -> Option<&mongodb::error::Error> {
        match self {
            MongoApiError::MongoDB(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use std::future::IntoFuture;

    fn driver_error() -> mongodb::error::Error {
        let parse = mongodb::options::ClientOptions::parse("not-a-connection-string");
        tokio_test::block_on(parse.into_future()).unwrap_err()
    }

    #[test]
    fn test_error_display_invalid_configuration() {
        let err = MongoApiError::InvalidConfiguration("bad scheme".to_string());
        assert_eq!(err.to_string(), "Invalid configuration: bad scheme");
    }

    #[test]
    fn test_invalid_configuration_helper() {
        let err = MongoApiError::invalid_configuration("missing MONGO_API_DB");
        assert!(err.is_invalid_configuration());
        assert!(err.driver_error().is_none());
    }

    #[test]
    fn test_driver_error_is_carried_unmodified() {
        let original = driver_error();
        let expected = original.to_string();

        let err: MongoApiError = original.into();
        assert!(!err.is_invalid_configuration());
        assert_eq!(err.to_string(), format!("MongoDB error: {}", expected));
        assert_eq!(err.driver_error().map(|e| e.to_string()), Some(expected.clone()));
        assert_eq!(err.source().map(|e| e.to_string()), Some(expected));
    }

    #[test]
    fn test_from_object_id_error() {
        let oid_err = bson::oid::ObjectId::parse_str("not-an-objectid").unwrap_err();
        let err: MongoApiError = oid_err.into();
        assert!(matches!(err, MongoApiError::ObjectId(_)));
        assert!(err.to_string().starts_with("Invalid ObjectId: "));
    }

    #[test]
    fn test_result_type_err() {
        let result: Result<i32> = Err(MongoApiError::invalid_configuration("failed"));
        assert!(result.is_err());
    }
}
