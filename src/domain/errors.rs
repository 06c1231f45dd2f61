//! Domain error types
//!
//! This module defines the error hierarchy for Tombola. All errors are
//! domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main Tombola error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum TombolaError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Store-related errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Export job errors surfaced through the job control surface
    #[error("Job error: {0}")]
    Job(#[from] JobError),

    /// Sheet population errors
    #[error("Population error: {0}")]
    Populate(String),

    /// Generation code space exhausted after bounded retries
    ///
    /// This is a capacity/configuration error and is not recoverable.
    #[error("Could not allocate an unused generation code after {attempts} attempts")]
    CapacityExhausted { attempts: u32 },

    /// Document rendering errors
    #[error("Render error: {0}")]
    Render(String),

    /// Archive building errors
    #[error("Archive error: {0}")]
    Archive(String),

    /// Export process errors
    #[error("Export error: {0}")]
    Export(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl TombolaError {
    /// Returns `true` when the error is a store uniqueness conflict
    ///
    /// Conflicts are the expected signal during sheet population: a
    /// fingerprint or numbering collision that the caller retries silently.
    pub fn is_conflict(&self) -> bool {
        matches!(self, TombolaError::Store(StoreError::Conflict(_)))
    }
}

/// Store-specific errors
///
/// Errors that occur when interacting with the persistent store.
/// These errors don't expose backend driver types.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to connect to the store
    #[error("Failed to connect to store: {0}")]
    ConnectionFailed(String),

    /// A unique constraint was violated
    ///
    /// Raised for both fingerprint collisions and (generation, sheet number)
    /// races. Callers running an insert-retry loop match on this variant.
    #[error("Uniqueness conflict: {0}")]
    Conflict(String),

    /// Failed to create the schema
    #[error("Schema creation failed: {0}")]
    SchemaCreationFailed(String),

    /// Failed to insert a row
    #[error("Insert failed: {0}")]
    InsertFailed(String),

    /// Failed to update rows
    #[error("Update failed: {0}")]
    UpdateFailed(String),

    /// Failed to query rows
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Generation not found
    #[error("Generation not found: {0}")]
    GenerationNotFound(String),

    /// Transient failure that survived the store's own retry policy
    #[error("Transient store failure: {0}")]
    Transient(String),
}

/// Export job control errors
///
/// Returned from the job control surface (start/status/fetch), never from
/// inside a worker: a worker failure is recorded on the job itself.
#[derive(Debug, Error)]
pub enum JobError {
    /// Unknown job identifier
    #[error("Job not found: {0}")]
    NotFound(String),

    /// The archive was requested before the job reached `Done`
    #[error("Archive not ready: job {id} is {status}")]
    NotReady { id: String, status: String },

    /// The job is `Done` but its archive was removed from disk
    #[error("Archive file missing from disk: {0}")]
    ArchiveMissing(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for TombolaError {
    fn from(err: std::io::Error) -> Self {
        TombolaError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for TombolaError {
    fn from(err: serde_json::Error) -> Self {
        TombolaError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for TombolaError {
    fn from(err: toml::de::Error) -> Self {
        TombolaError::Configuration(format!("TOML parse error: {err}"))
    }
}

// Conversion from zip archive errors
impl From<zip::result::ZipError> for TombolaError {
    fn from(err: zip::result::ZipError) -> Self {
        TombolaError::Archive(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tombola_error_display() {
        let err = TombolaError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_store_error_conversion() {
        let store_err = StoreError::Conflict("fingerprint".to_string());
        let err: TombolaError = store_err.into();
        assert!(matches!(err, TombolaError::Store(_)));
        assert!(err.is_conflict());
    }

    #[test]
    fn test_non_conflict_store_error() {
        let err: TombolaError = StoreError::QueryFailed("boom".to_string()).into();
        assert!(!err.is_conflict());
    }

    #[test]
    fn test_job_error_conversion() {
        let job_err = JobError::NotFound("abc123".to_string());
        let err: TombolaError = job_err.into();
        assert!(matches!(err, TombolaError::Job(_)));
    }

    #[test]
    fn test_capacity_exhausted_display() {
        let err = TombolaError::CapacityExhausted { attempts: 30 };
        assert!(err.to_string().contains("30 attempts"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: TombolaError = io_err.into();
        assert!(matches!(err, TombolaError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: TombolaError = json_err.into();
        assert!(matches!(err, TombolaError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: TombolaError = toml_err.into();
        assert!(matches!(err, TombolaError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_tombola_error_implements_std_error() {
        let err = TombolaError::Validation("Test error".to_string());
        let _: &dyn std::error::Error = &err;
    }

    #[test]
    fn test_store_error_implements_std_error() {
        let err = StoreError::Transient("connection reset".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
