//! 签名验证
//!
//! 不匹配返回 [`VerificationOutcome::Failed`]；只有形状不合法的输入才返回错误

use rsa::traits::PublicKeyParts;
use rsa::RsaPublicKey;

use super::signing::scheme;
use super::types::{Digest, Signature, VerificationOutcome};
use crate::error::{Result, SignError};

/// 验证摘要上的签名
pub fn verify_digest(
    public_key: &RsaPublicKey,
    digest: &Digest,
    signature: &Signature,
) -> Result<VerificationOutcome> {
    let expected = public_key.size();
    if signature.len() != expected {
        return Err(SignError::verification_input(format!(
            "signature is {} bytes, expected {} for this key",
            signature.len(),
            expected
        )));
    }

    match public_key.verify(scheme(), digest.as_ref(), signature.as_bytes()) {
        Ok(()) => Ok(VerificationOutcome::Success),
        Err(rsa::Error::Verification) => {
            Ok(VerificationOutcome::failed("crypto/rsa: verification error"))
        }
        Err(e) => Err(SignError::verification_input(e.to_string())),
    }
}
