//! Signing Error Types
//!
//! This module defines the error types for the signing core.
//! All core operations return `Result<T, SignError>`. A signature that does
//! not match is *not* an error: it is reported as
//! [`VerificationOutcome::Failed`](crate::docsign::VerificationOutcome).

use thiserror::Error;

/// Result alias used across the signing core
pub type Result<T> = std::result::Result<T, SignError>;

/// Signing core error types
///
/// Every workflow reports the first error it hits and never retries.
#[derive(Debug, Error)]
pub enum SignError {
    /// Malformed or missing document, identifier or configuration value
    #[error("Invalid input: {0}")]
    Input(String),

    /// Document content could not be read while hashing
    #[error("Hash computation failed: {0}")]
    HashComputation(#[source] std::io::Error),

    /// The random source or the key arithmetic failed
    #[error("Key generation failed: {0}")]
    KeyGeneration(String),

    /// Stored public key is not valid armor / DER
    #[error("Public key decode failed: {0}")]
    KeyDecode(String),

    /// Stored public key decoded, but is not an RSA key
    #[error("Unsupported key type: {0}")]
    UnsupportedKeyType(String),

    /// The private key rejected the digest
    #[error("Signing failed: {0}")]
    Signing(String),

    /// Signature or key has the wrong shape to be evaluated at all
    #[error("Verification input invalid: {0}")]
    VerificationInput(String),

    /// No artifact has been stored for the document
    #[error("No signature artifact found for document: {0}")]
    ArtifactNotFound(String),

    /// An artifact already exists and re-signing is rejected
    #[error("Signature artifact already exists for document: {0}")]
    ArtifactExists(String),

    /// The underlying artifact storage failed
    #[error("Artifact store error: {0}")]
    ArtifactStore(String),
}

impl SignError {
    /// Create an Input error
    pub fn input(reason: impl Into<String>) -> Self {
        Self::Input(reason.into())
    }

    /// Create a KeyGeneration error
    pub fn key_generation(reason: impl Into<String>) -> Self {
        Self::KeyGeneration(reason.into())
    }

    /// Create a KeyDecode error
    pub fn key_decode(reason: impl Into<String>) -> Self {
        Self::KeyDecode(reason.into())
    }

    /// Create a Signing error
    pub fn signing(reason: impl Into<String>) -> Self {
        Self::Signing(reason.into())
    }

    /// Create a VerificationInput error
    pub fn verification_input(reason: impl Into<String>) -> Self {
        Self::VerificationInput(reason.into())
    }

    /// Create an ArtifactStore error
    pub fn store(reason: impl Into<String>) -> Self {
        Self::ArtifactStore(reason.into())
    }

    /// Short machine-readable label, stable across releases
    pub fn label(&self) -> &'static str {
        match self {
            Self::Input(_) => "input_error",
            Self::HashComputation(_) => "hash_computation_error",
            Self::KeyGeneration(_) => "key_generation_error",
            Self::KeyDecode(_) => "key_decode_error",
            Self::UnsupportedKeyType(_) => "unsupported_key_type",
            Self::Signing(_) => "signing_error",
            Self::VerificationInput(_) => "verification_input_error",
            Self::ArtifactNotFound(_) => "artifact_not_found",
            Self::ArtifactExists(_) => "artifact_exists",
            Self::ArtifactStore(_) => "artifact_store_error",
        }
    }

    /// Check if this error means the artifact is absent
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ArtifactNotFound(_))
    }

    /// Check if this error is caused by corrupt or foreign key material
    pub fn is_key_error(&self) -> bool {
        matches!(self, Self::KeyDecode(_) | Self::UnsupportedKeyType(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_input_error() {
        let err = SignError::input("document identifier is empty");
        assert!(matches!(err, SignError::Input(_)));
        assert_eq!(
            err.to_string(),
            "Invalid input: document identifier is empty"
        );
    }

    #[test]
    fn test_hash_computation_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "truncated");
        let err = SignError::HashComputation(io);
        assert_eq!(err.to_string(), "Hash computation failed: truncated");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_not_found_error() {
        let err = SignError::ArtifactNotFound("report.pdf".to_string());
        assert!(err.is_not_found());
        assert!(!err.is_key_error());
        assert_eq!(
            err.to_string(),
            "No signature artifact found for document: report.pdf"
        );
    }

    #[test_case(SignError::input("x"), "input_error")]
    #[test_case(SignError::key_generation("x"), "key_generation_error")]
    #[test_case(SignError::key_decode("x"), "key_decode_error")]
    #[test_case(SignError::UnsupportedKeyType("x".into()), "unsupported_key_type")]
    #[test_case(SignError::signing("x"), "signing_error")]
    #[test_case(SignError::verification_input("x"), "verification_input_error")]
    #[test_case(SignError::ArtifactExists("x".into()), "artifact_exists")]
    #[test_case(SignError::store("x"), "artifact_store_error")]
    fn test_labels(err: SignError, label: &str) {
        assert_eq!(err.label(), label);
    }

    #[test]
    fn test_key_errors() {
        assert!(SignError::key_decode("bad armor").is_key_error());
        assert!(SignError::UnsupportedKeyType("ec".into()).is_key_error());
        assert!(!SignError::signing("bad").is_key_error());
    }
}
