//! Domain identifier types with validation
//!
//! This module provides newtype wrappers for Tombola identifiers.
//! Each type ensures type safety and provides validation for format compliance.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Length of a generation code
pub const CODE_LENGTH: usize = 10;

/// Alphabet used for generation codes
///
/// Excludes 0/1/I/O, which are easily confused when codes are read aloud or
/// typed from a printed sheet. 32 characters, so reducing a random byte
/// modulo the alphabet length introduces no bias.
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Generation code newtype wrapper
///
/// Represents the 10-character human-typable identifier of a generation,
/// drawn from the confusable-free [`CODE_ALPHABET`].
///
/// # Examples
///
/// ```
/// use tombola::domain::ids::GenerationCode;
/// use std::str::FromStr;
///
/// let code = GenerationCode::from_str("AB23CD45EF").unwrap();
/// assert_eq!(code.as_str(), "AB23CD45EF");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenerationCode(String);

impl GenerationCode {
    /// Creates a new GenerationCode from a string
    ///
    /// # Arguments
    ///
    /// * `code` - The generation code string
    ///
    /// # Returns
    ///
    /// Returns `Ok(GenerationCode)` if the code is valid, `Err` otherwise
    pub fn new(code: impl Into<String>) -> Result<Self, String> {
        let code = code.into();
        if code.len() != CODE_LENGTH {
            return Err(format!(
                "Generation code must be exactly {} characters, got {}",
                CODE_LENGTH,
                code.len()
            ));
        }
        if let Some(c) = code.bytes().find(|b| !CODE_ALPHABET.contains(b)) {
            return Err(format!(
                "Generation code contains invalid character '{}'",
                c as char
            ));
        }
        Ok(Self(code))
    }

    /// Returns the generation code as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for GenerationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for GenerationCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for GenerationCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Export job identifier newtype wrapper
///
/// Job ids are opaque 32-character lowercase hex strings minted when a job
/// is registered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(String);

impl JobId {
    /// Creates a new JobId from a string
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Job ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Mints a fresh random job id
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    /// Returns the job id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for JobId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for JobId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
