//! DocSeal - document signing and verification
//!
//! This crate provides the signing core: hashing, per-document key pairs,
//! signature creation and verification, and the artifact store that ties a
//! document identifier to its public key and signature.

pub mod config;
pub mod docsign;
pub mod error;

pub use config::{ResignPolicy, SigningConfig};
pub use docsign::{
    ArtifactRecord, ArtifactStore, Digest, Document, DocumentId, FileArtifactStore,
    MemoryArtifactStore, Signature, SigningReceipt, SigningWorkflow, VerificationOutcome,
    VerificationWorkflow,
};
pub use error::{Result, SignError};
