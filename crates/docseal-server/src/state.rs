use std::sync::Arc;

use docseal::{ArtifactStore, FileArtifactStore, SigningWorkflow, VerificationWorkflow};

use crate::config::ServerConfig;
use crate::gemini::{Assistant, GeminiClient};
use crate::pinata::{PinataClient, Pinner};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub signer: Arc<SigningWorkflow>,
    pub verifier: Arc<VerificationWorkflow>,
    pub pinner: Option<Arc<dyn Pinner>>,
    pub assistant: Option<Arc<dyn Assistant>>,
}

impl AppState {
    pub fn new(signer: SigningWorkflow, verifier: VerificationWorkflow) -> Self {
        Self {
            signer: Arc::new(signer),
            verifier: Arc::new(verifier),
            pinner: None,
            assistant: None,
        }
    }

    /// Build the state described by `config`, opening the artifact directory
    pub fn from_config(config: &ServerConfig) -> anyhow::Result<Self> {
        let store: Arc<dyn ArtifactStore> =
            Arc::new(FileArtifactStore::open(config.storage_dir.clone())?);
        let signer = SigningWorkflow::new(config.signing.clone(), store.clone())?;
        let verifier = VerificationWorkflow::new(store);

        let mut state = Self::new(signer, verifier);
        if let Some(pinata) = &config.pinata {
            state = state.with_pinner(Arc::new(PinataClient::new(pinata.clone())));
        }
        if let Some(gemini) = &config.gemini {
            state = state.with_assistant(Arc::new(GeminiClient::new(gemini.clone())));
        }
        Ok(state)
    }

    pub fn with_pinner(mut self, pinner: Arc<dyn Pinner>) -> Self {
        self.pinner = Some(pinner);
        self
    }

    pub fn with_assistant(mut self, assistant: Arc<dyn Assistant>) -> Self {
        self.assistant = Some(assistant);
        self
    }
}
