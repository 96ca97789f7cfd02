//! 内容哈希

use std::io::Read;
use std::path::Path;

use sha2::{Digest as _, Sha256};

use super::types::Digest;
use crate::error::{Result, SignError};

const READ_CHUNK: usize = 64 * 1024;

/// 计算内容哈希（SHA-256）
pub fn hash_bytes(content: &[u8]) -> Digest {
    Digest::new(Sha256::digest(content).into())
}

/// 流式计算哈希，读取失败时不产生任何摘要
pub fn hash_reader<R: Read>(mut reader: R) -> Result<Digest> {
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; READ_CHUNK];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => hasher.update(&buf[..n]),
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(SignError::HashComputation(e)),
        }
    }
    Ok(Digest::new(hasher.finalize().into()))
}

/// 计算文件哈希
pub fn hash_file(path: impl AsRef<Path>) -> Result<Digest> {
    let file = std::fs::File::open(path.as_ref()).map_err(SignError::HashComputation)?;
    hash_reader(std::io::BufReader::new(file))
}
