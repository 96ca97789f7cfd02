//! 签名功能
//!
//! RSASSA-PKCS1-v1_5，DigestInfo 使用与哈希器相同的 SHA-256

use rsa::{Pkcs1v15Sign, RsaPrivateKey};
use sha2::Sha256;

use super::types::{Digest, Signature};
use crate::error::{Result, SignError};

/// 签名方案（与 [`hash_bytes`](super::hasher::hash_bytes) 必须使用同一哈希算法）
pub(crate) fn scheme() -> Pkcs1v15Sign {
    Pkcs1v15Sign::new::<Sha256>()
}

/// 使用私钥对摘要签名
pub fn sign_digest(private_key: &RsaPrivateKey, digest: &Digest) -> Result<Signature> {
    private_key
        .sign(scheme(), digest.as_ref())
        .map(Signature::from_bytes)
        .map_err(|e| SignError::signing(e.to_string()))
}

/// 对任意长度的摘要切片签名，长度必须为 32 字节
pub fn sign_digest_slice(private_key: &RsaPrivateKey, digest: &[u8]) -> Result<Signature> {
    let digest = Digest::from_slice(digest)?;
    sign_digest(private_key, &digest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docsign::hasher::hash_bytes;
    use crate::docsign::keys::{EphemeralKeyPair, KeyPairProvider, KeyStrength, RsaKeyPairProvider};
    use once_cell::sync::Lazy;
    use rsa::traits::PublicKeyParts;

    static KEY_PAIR: Lazy<EphemeralKeyPair> =
        Lazy::new(|| RsaKeyPairProvider.generate(KeyStrength::default()).unwrap());

    #[test]
    fn test_signature_length_matches_modulus() {
        let sig = sign_digest(KEY_PAIR.private_key(), &hash_bytes(b"hello")).unwrap();
        assert_eq!(sig.len(), KEY_PAIR.public_key().size());
    }

    #[test]
    fn test_pkcs1v15_is_deterministic() {
        let digest = hash_bytes(b"same content");
        let a = sign_digest(KEY_PAIR.private_key(), &digest).unwrap();
        let b = sign_digest(KEY_PAIR.private_key(), &digest).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_digests_different_signatures() {
        let a = sign_digest(KEY_PAIR.private_key(), &hash_bytes(b"a")).unwrap();
        let b = sign_digest(KEY_PAIR.private_key(), &hash_bytes(b"b")).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_wrong_digest_length() {
        let err = sign_digest_slice(KEY_PAIR.private_key(), &[7u8; 48]).unwrap_err();
        assert!(matches!(err, SignError::Signing(_)));
    }
}
