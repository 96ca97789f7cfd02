//! 签名配置
//!
//! 由调用方显式构造并传入工作流，核心不读取环境变量

use serde::{Deserialize, Serialize};

use crate::docsign::{KeyStrength, DEFAULT_KEY_BITS};
use crate::error::Result;

/// 同一文档再次签名时的策略
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResignPolicy {
    /// 覆盖旧记录（后写者胜）
    #[default]
    Overwrite,
    /// 已存在记录时拒绝
    ///
    /// 存在性检查与写入是两个独立步骤，不加锁：同一文档的并发签名可能
    /// 都通过检查，最终仍是后写者胜。
    Reject,
}

impl ResignPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Overwrite => "overwrite",
            Self::Reject => "reject",
        }
    }
}

/// 签名配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningConfig {
    /// RSA 模数长度（位），最小 2048
    #[serde(default = "default_key_bits")]
    pub key_bits: u32,
    /// 再次签名策略
    #[serde(default)]
    pub resign_policy: ResignPolicy,
}

fn default_key_bits() -> u32 {
    DEFAULT_KEY_BITS
}

impl Default for SigningConfig {
    fn default() -> Self {
        Self {
            key_bits: DEFAULT_KEY_BITS,
            resign_policy: ResignPolicy::default(),
        }
    }
}

impl SigningConfig {
    pub fn with_key_bits(mut self, bits: u32) -> Self {
        self.key_bits = bits;
        self
    }

    pub fn with_resign_policy(mut self, policy: ResignPolicy) -> Self {
        self.resign_policy = policy;
        self
    }

    /// 校验配置并返回密钥强度
    pub fn key_strength(&self) -> Result<KeyStrength> {
        KeyStrength::new(self.key_bits)
    }

    pub fn validate(&self) -> Result<()> {
        self.key_strength().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SigningConfig::default();
        assert_eq!(config.key_bits, 2048);
        assert_eq!(config.resign_policy, ResignPolicy::Overwrite);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_weak_key_rejected() {
        let config = SigningConfig::default().with_key_bits(1024);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_partial() {
        let config: SigningConfig = serde_json::from_str(r#"{"resign_policy":"reject"}"#).unwrap();
        assert_eq!(config.key_bits, 2048);
        assert_eq!(config.resign_policy, ResignPolicy::Reject);
    }
}
