//! 签名密钥管理
//!
//! 每次签名生成一对新的 RSA 密钥。私钥只在一次签名调用内存在，
//! 离开作用域即被清零释放；只有 PEM 编码的公钥会被持久化。

use std::fmt;

use rsa::pkcs1::DecodeRsaPublicKey;
use rsa::pkcs8::der::pem;
use rsa::pkcs8::{spki, DecodePublicKey, EncodePublicKey, LineEnding};
use rsa::{RsaPrivateKey, RsaPublicKey};

use crate::error::{Result, SignError};

/// 最小密钥长度（位）
pub const MIN_KEY_BITS: u32 = 2048;

/// 默认密钥长度（位）
pub const DEFAULT_KEY_BITS: u32 = 2048;

const SPKI_LABEL: &str = "PUBLIC KEY";
const PKCS1_LABEL: &str = "RSA PUBLIC KEY";

/// 密钥强度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyStrength(u32);

impl KeyStrength {
    pub fn new(bits: u32) -> Result<Self> {
        if bits < MIN_KEY_BITS {
            return Err(SignError::input(format!(
                "key size {} bits is below the {}-bit minimum",
                bits, MIN_KEY_BITS
            )));
        }
        Ok(Self(bits))
    }

    pub fn bits(&self) -> u32 {
        self.0
    }
}

impl Default for KeyStrength {
    fn default() -> Self {
        Self(DEFAULT_KEY_BITS)
    }
}

/// 一次性密钥对
///
/// 不可克隆；`Debug` 不输出私钥；drop 时私钥被清零
pub struct EphemeralKeyPair {
    private_key: RsaPrivateKey,
    public_key: RsaPublicKey,
}

impl EphemeralKeyPair {
    pub fn from_private_key(private_key: RsaPrivateKey) -> Self {
        let public_key = private_key.to_public_key();
        Self {
            private_key,
            public_key,
        }
    }

    pub fn private_key(&self) -> &RsaPrivateKey {
        &self.private_key
    }

    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public_key
    }
}

impl fmt::Debug for EphemeralKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EphemeralKeyPair")
            .field("bits", &(rsa::traits::PublicKeyParts::size(&self.public_key) * 8))
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// 密钥对生成器
pub trait KeyPairProvider: Send + Sync {
    fn generate(&self, strength: KeyStrength) -> Result<EphemeralKeyPair>;
}

/// 基于操作系统随机源的 RSA 密钥生成器
#[derive(Debug, Default, Clone, Copy)]
pub struct RsaKeyPairProvider;

impl KeyPairProvider for RsaKeyPairProvider {
    fn generate(&self, strength: KeyStrength) -> Result<EphemeralKeyPair> {
        let mut rng = rand::rngs::OsRng;
        let private_key = RsaPrivateKey::new(&mut rng, strength.bits() as usize)
            .map_err(|e| SignError::key_generation(e.to_string()))?;
        Ok(EphemeralKeyPair::from_private_key(private_key))
    }
}

/// 导出公钥为 PEM（SPKI / DER，`PUBLIC KEY` 标签）
pub fn export_public_key(public_key: &RsaPublicKey) -> Result<Vec<u8>> {
    public_key
        .to_public_key_pem(LineEnding::LF)
        .map(String::into_bytes)
        .map_err(|e| SignError::key_generation(format!("Failed to encode public key: {}", e)))
}

/// 从 PEM 导入公钥
///
/// 接受 `PUBLIC KEY`（SPKI）与 `RSA PUBLIC KEY`（PKCS#1）两种标签
pub fn import_public_key(bytes: &[u8]) -> Result<RsaPublicKey> {
    let text = std::str::from_utf8(bytes)
        .map_err(|_| SignError::key_decode("public key is not valid UTF-8 text"))?;

    let label = pem::decode_label(bytes)
        .map_err(|e| SignError::key_decode(format!("Public key failed to decode: {}", e)))?;

    match label {
        SPKI_LABEL => RsaPublicKey::from_public_key_pem(text).map_err(map_spki_error),
        PKCS1_LABEL => RsaPublicKey::from_pkcs1_pem(text)
            .map_err(|e| SignError::key_decode(format!("Invalid public key: {}", e))),
        other => Err(SignError::key_decode(format!(
            "unexpected PEM label: {}",
            other
        ))),
    }
}

fn map_spki_error(err: spki::Error) -> SignError {
    match err {
        spki::Error::OidUnknown { oid } => {
            SignError::UnsupportedKeyType(format!("Not an RSA public key (algorithm {})", oid))
        }
        other => SignError::key_decode(format!("Invalid public key: {}", other)),
    }
}
