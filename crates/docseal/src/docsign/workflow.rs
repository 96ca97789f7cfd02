//! 签名 / 验证工作流
//!
//! 签名：RECEIVED → HASHED → KEYED → SIGNED → PERSISTED → DONE
//! 验证：RECEIVED → HASHED → ARTIFACT_LOOKED_UP → VERIFIED → DONE
//!
//! 任一步失败即转入 FAILED，并原样返回该步骤的错误，不重试、不回滚。

use std::sync::Arc;

use super::hasher::hash_bytes;
use super::keys::{export_public_key, import_public_key, KeyPairProvider, RsaKeyPairProvider};
use super::signing::sign_digest;
use super::storage::ArtifactStore;
use super::types::*;
use super::verify::verify_digest;
use crate::config::{ResignPolicy, SigningConfig};
use crate::error::{Result, SignError};

/// 签名工作流
pub struct SigningWorkflow {
    config: SigningConfig,
    keys: Arc<dyn KeyPairProvider>,
    store: Arc<dyn ArtifactStore>,
}

impl SigningWorkflow {
    /// 创建工作流，配置不合法时报错
    pub fn new(config: SigningConfig, store: Arc<dyn ArtifactStore>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            keys: Arc::new(RsaKeyPairProvider),
            store,
        })
    }

    /// 替换密钥生成器
    pub fn with_key_provider(mut self, keys: Arc<dyn KeyPairProvider>) -> Self {
        self.keys = keys;
        self
    }

    pub fn config(&self) -> &SigningConfig {
        &self.config
    }

    /// 签名文档并持久化公钥与签名
    pub fn sign(&self, document: &Document) -> Result<SigningReceipt> {
        self.sign_tracked(document).0
    }

    /// 同 [`sign`](Self::sign)，并返回终止状态（`Done` 或 `Failed`）
    pub(crate) fn sign_tracked(
        &self,
        document: &Document,
    ) -> (Result<SigningReceipt>, SigningState) {
        let span = tracing::info_span!("sign_document", document_id = %document.id);
        let _guard = span.enter();

        let mut state = SigningState::Received;
        let result = self.run(document, &mut state);
        match &result {
            Ok(receipt) => {
                advance_signing(&mut state, SigningState::Done);
                tracing::info!(digest = %receipt.digest, "document signed");
            }
            Err(e) => {
                tracing::warn!(failed_in = ?state, error = %e, "signing failed");
                advance_signing(&mut state, SigningState::Failed);
            }
        }
        (result, state)
    }

    fn run(&self, document: &Document, state: &mut SigningState) -> Result<SigningReceipt> {
        let strength = self.config.key_strength()?;

        if self.config.resign_policy == ResignPolicy::Reject && self.store.contains(&document.id)? {
            return Err(SignError::ArtifactExists(document.id.to_string()));
        }

        let digest = hash_bytes(&document.content);
        advance_signing(state, SigningState::Hashed);

        // 私钥只存活在这个块内，任何返回路径都会 drop 并清零
        let (signature, public_key) = {
            let key_pair = self.keys.generate(strength)?;
            advance_signing(state, SigningState::Keyed);

            let signature = sign_digest(key_pair.private_key(), &digest)?;
            let public_key = export_public_key(key_pair.public_key())?;
            advance_signing(state, SigningState::Signed);
            (signature, public_key)
        };

        let record = ArtifactRecord::new(
            document.id.clone(),
            public_key.clone(),
            signature.as_bytes().to_vec(),
        )
        .with_digest(&digest);
        self.store.put(&record)?;
        advance_signing(state, SigningState::Persisted);

        Ok(SigningReceipt {
            document_id: document.id.clone(),
            digest,
            signature,
            public_key,
        })
    }
}

/// 验证工作流
pub struct VerificationWorkflow {
    store: Arc<dyn ArtifactStore>,
}

impl VerificationWorkflow {
    pub fn new(store: Arc<dyn ArtifactStore>) -> Self {
        Self { store }
    }

    /// 用存储的公钥与签名验证文档
    ///
    /// `SUCCESS` 与 `FAILED` 都是正常完成；只有无法评估时才返回错误
    pub fn verify(&self, document: &Document) -> Result<VerificationOutcome> {
        self.verify_tracked(document).0
    }

    pub(crate) fn verify_tracked(
        &self,
        document: &Document,
    ) -> (Result<VerificationOutcome>, VerificationState) {
        let span = tracing::info_span!("verify_document", document_id = %document.id);
        let _guard = span.enter();

        let mut state = VerificationState::Received;
        let result = self.run(document, &mut state);
        match &result {
            Ok(outcome) => {
                advance_verification(&mut state, VerificationState::Done);
                tracing::info!(outcome = outcome.as_str(), "verification finished");
            }
            Err(e) => {
                tracing::warn!(failed_in = ?state, error = %e, "verification aborted");
                advance_verification(&mut state, VerificationState::Failed);
            }
        }
        (result, state)
    }

    fn run(&self, document: &Document, state: &mut VerificationState) -> Result<VerificationOutcome> {
        let digest = hash_bytes(&document.content);
        advance_verification(state, VerificationState::Hashed);

        let record = self.store.get(&document.id).map_err(|e| match e {
            SignError::ArtifactNotFound(_) => SignError::ArtifactNotFound(document.id.to_string()),
            other => other,
        })?;
        advance_verification(state, VerificationState::ArtifactLookedUp);

        let public_key = import_public_key(&record.public_key)?;
        let signature = Signature::from_bytes(record.signature);
        let outcome = verify_digest(&public_key, &digest, &signature)?;
        advance_verification(state, VerificationState::Verified);

        Ok(outcome)
    }
}

fn advance_signing(state: &mut SigningState, next: SigningState) {
    tracing::debug!(from = ?state, to = ?next, "signing state");
    *state = next;
}

fn advance_verification(state: &mut VerificationState, next: VerificationState) {
    tracing::debug!(from = ?state, to = ?next, "verification state");
    *state = next;
}
