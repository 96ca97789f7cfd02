//! DocSeal HTTP server
//!
//! Exposes document signing and verification over HTTP, with optional IPFS
//! pinning through Pinata and a Gemini-backed help assistant.

pub mod config;
pub mod error;
pub mod gemini;
pub mod logging;
pub mod pinata;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use routes::create_router;
pub use state::AppState;
