//! 文档签名类型定义

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SignError};

/// 摘要长度（SHA-256）
pub const DIGEST_LEN: usize = 32;

/// 文档标识
///
/// 不透明、非空，按原样作为存储键使用；存储路径的映射由存储层负责
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(SignError::input("document identifier must not be empty"));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for DocumentId {
    type Error = SignError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<DocumentId> for String {
    fn from(id: DocumentId) -> Self {
        id.0
    }
}

/// 待签名 / 待验证的文档
#[derive(Clone)]
pub struct Document {
    /// 文档标识
    pub id: DocumentId,
    /// 原始内容
    pub content: Vec<u8>,
}

impl Document {
    pub fn new(id: DocumentId, content: impl Into<Vec<u8>>) -> Self {
        Self {
            id,
            content: content.into(),
        }
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("id", &self.id)
            .field("len", &self.content.len())
            .finish()
    }
}

/// 内容摘要（32 字节）
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest([u8; DIGEST_LEN]);

impl Digest {
    pub fn new(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    /// 从任意长度切片构造，长度不符时报错
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let arr: [u8; DIGEST_LEN] = bytes.try_into().map_err(|_| {
            SignError::signing(format!(
                "digest must be {} bytes, got {}",
                DIGEST_LEN,
                bytes.len()
            ))
        })?;
        Ok(Self(arr))
    }

    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// 签名（原始字节）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature(Vec<u8>);

impl Signature {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// 持久化的签名产物
///
/// 公钥为 PEM 编码字节，签名为原始字节；一次 `put` 整体写入
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRecord {
    /// 文档标识
    pub document_id: DocumentId,
    /// 公钥 (PEM 格式)
    #[serde(with = "pem_text")]
    pub public_key: Vec<u8>,
    /// 签名
    #[serde(with = "base64_bytes")]
    pub signature: Vec<u8>,
    /// 签名时的内容摘要 (hex)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
    /// 创建时间
    pub created_at: i64,
}

impl ArtifactRecord {
    pub fn new(document_id: DocumentId, public_key: Vec<u8>, signature: Vec<u8>) -> Self {
        Self {
            document_id,
            public_key,
            signature,
            digest: None,
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn with_digest(mut self, digest: &Digest) -> Self {
        self.digest = Some(digest.to_hex());
        self
    }
}

/// 签名工作流的输出
#[derive(Debug, Clone)]
pub struct SigningReceipt {
    pub document_id: DocumentId,
    pub digest: Digest,
    pub signature: Signature,
    /// 导出的公钥 (PEM)
    pub public_key: Vec<u8>,
}

impl SigningReceipt {
    pub fn public_key_pem(&self) -> &str {
        std::str::from_utf8(&self.public_key).unwrap_or_default()
    }
}

/// 验证结果
///
/// 签名不匹配是正常结果，不是错误
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verification", rename_all = "UPPERCASE")]
pub enum VerificationOutcome {
    Success,
    Failed {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        details: Option<String>,
    },
}

impl VerificationOutcome {
    pub fn failed(details: impl Into<String>) -> Self {
        Self::Failed {
            details: Some(details.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Failed { .. } => "FAILED",
        }
    }
}

/// 签名工作流状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningState {
    Received,
    Hashed,
    Keyed,
    Signed,
    Persisted,
    Done,
    Failed,
}

/// 验证工作流状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationState {
    Received,
    Hashed,
    ArtifactLookedUp,
    Verified,
    Done,
    Failed,
}

mod pem_text {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
        match std::str::from_utf8(bytes) {
            Ok(text) => s.serialize_str(text),
            Err(_) => Err(serde::ser::Error::custom("public key is not valid UTF-8")),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        String::deserialize(d).map(String::into_bytes)
    }
}

mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&BASE64.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(d)?;
        BASE64.decode(text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_id_rejects_empty() {
        let err = DocumentId::new("").unwrap_err();
        assert!(matches!(err, SignError::Input(_)));
    }

    #[test]
    fn test_document_id_is_verbatim() {
        let id = DocumentId::new("../reports/Q3 final.pdf").unwrap();
        assert_eq!(id.as_str(), "../reports/Q3 final.pdf");
        assert_eq!(id.to_string(), "../reports/Q3 final.pdf");
    }

    #[test]
    fn test_digest_from_slice_length() {
        assert!(Digest::from_slice(&[0u8; 32]).is_ok());
        let err = Digest::from_slice(&[0u8; 20]).unwrap_err();
        assert!(matches!(err, SignError::Signing(_)));
    }

    #[test]
    fn test_outcome_serialization() {
        let ok = serde_json::to_value(VerificationOutcome::Success).unwrap();
        assert_eq!(ok, serde_json::json!({"verification": "SUCCESS"}));

        let failed = serde_json::to_value(VerificationOutcome::failed("mismatch")).unwrap();
        assert_eq!(
            failed,
            serde_json::json!({"verification": "FAILED", "details": "mismatch"})
        );
    }

    #[test]
    fn test_record_json_keeps_bytes() {
        let id = DocumentId::new("a.txt").unwrap();
        let record = ArtifactRecord::new(
            id,
            b"-----BEGIN PUBLIC KEY-----\n".to_vec(),
            vec![0, 1, 2, 255],
        );
        let json = serde_json::to_string(&record).unwrap();
        let back: ArtifactRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_record_rejects_empty_id() {
        let json = r#"{"document_id":"","public_key":"","signature":"","created_at":0}"#;
        assert!(serde_json::from_str::<ArtifactRecord>(json).is_err());
    }

    #[test]
    fn test_document_debug_hides_content() {
        let doc = Document::new(DocumentId::new("secret.txt").unwrap(), b"classified".to_vec());
        let debug = format!("{:?}", doc);
        assert!(!debug.contains("classified"));
        assert!(debug.contains("len: 10"));
    }
}
