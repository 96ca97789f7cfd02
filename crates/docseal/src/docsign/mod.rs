//! 文档签名系统
//!
//! 管理员对文档签名，任何持有文档的人之后都可以验证签名
//!
//! # 功能
//! - 对文档内容计算 SHA-256 摘要
//! - 为每次签名生成一次性 RSA 密钥对
//! - RSASSA-PKCS1-v1_5 签名与验证
//! - 按文档标识持久化公钥与签名

mod hasher;
mod keys;
mod signing;
mod storage;
mod types;
mod verify;
mod workflow;


pub use hasher::*;
pub use keys::*;
pub use signing::*;
pub use storage::*;
pub use types::*;
pub use verify::*;
pub use workflow::*;
