//! 签名产物存储管理
//!
//! 每个文档对应一条 [`ArtifactRecord`]，公钥与签名一次性整体写入，
//! 读取方要么看到旧记录，要么看到新记录，不会看到混合状态。

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use sha2::{Digest as _, Sha256};

use super::types::{ArtifactRecord, DocumentId};
use crate::error::{Result, SignError};

const RECORD_EXTENSION: &str = "artifact.json";

/// 签名产物存储
pub trait ArtifactStore: Send + Sync {
    /// 原子写入（覆盖同名记录）
    fn put(&self, record: &ArtifactRecord) -> Result<()>;

    /// 读取记录，不存在时返回 `ArtifactNotFound`
    fn get(&self, id: &DocumentId) -> Result<ArtifactRecord>;

    /// 是否已有记录
    fn contains(&self, id: &DocumentId) -> Result<bool> {
        match self.get(id) {
            Ok(_) => Ok(true),
            Err(SignError::ArtifactNotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// 基于目录的存储
///
/// 文件名为文档标识的 SHA-256（hex），标识本身只保存在记录内容里
#[derive(Debug, Clone)]
pub struct FileArtifactStore {
    root: PathBuf,
}

impl FileArtifactStore {
    /// 创建存储并确保目录存在
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.exists() {
            std::fs::create_dir_all(&root).map_err(|e| {
                SignError::store(format!("Could not create storage directory: {}", e))
            })?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                std::fs::set_permissions(&root, std::fs::Permissions::from_mode(0o700)).map_err(
                    |e| SignError::store(format!("Could not restrict storage directory: {}", e)),
                )?;
            }
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 记录文件路径
    pub fn record_path(&self, id: &DocumentId) -> PathBuf {
        let name = hex::encode(Sha256::digest(id.as_str().as_bytes()));
        self.root.join(format!("{}.{}", name, RECORD_EXTENSION))
    }

    /// 列出所有已签名文档
    ///
    /// 任何无法读取或解析的记录都会使整个调用失败
    pub fn list(&self) -> Result<Vec<DocumentId>> {
        let entries = std::fs::read_dir(&self.root)
            .map_err(|e| SignError::store(format!("Failed to read storage directory: {}", e)))?;

        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry
                .map_err(|e| SignError::store(format!("Failed to read storage directory: {}", e)))?;
            let path = entry.path();
            let is_record = path
                .file_name()
                .and_then(|n| n.to_str())
                .map_or(false, |n| n.ends_with(RECORD_EXTENSION));
            if !is_record {
                continue;
            }
            match read_record(&path) {
                Ok(record) => ids.push(record.document_id),
                // 并发覆盖时旧文件可能已被 rename 掉
                Err(SignError::ArtifactNotFound(_)) => continue,
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "unreadable artifact record"
                    );
                    return Err(e);
                }
            }
        }
        ids.sort();
        Ok(ids)
    }
}

impl ArtifactStore for FileArtifactStore {
    fn put(&self, record: &ArtifactRecord) -> Result<()> {
        let data = serde_json::to_vec_pretty(record)
            .map_err(|e| SignError::store(format!("Failed to serialize artifact: {}", e)))?;

        // 先写同目录临时文件，再 rename 覆盖
        let mut tmp = tempfile::NamedTempFile::new_in(&self.root)
            .map_err(|e| SignError::store(format!("Failed to create temp file: {}", e)))?;
        tmp.write_all(&data)
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| SignError::store(format!("Failed to write artifact: {}", e)))?;
        tmp.persist(self.record_path(&record.document_id))
            .map_err(|e| SignError::store(format!("Failed to persist artifact: {}", e.error)))?;

        tracing::debug!(document_id = %record.document_id, "artifact persisted");
        Ok(())
    }

    fn get(&self, id: &DocumentId) -> Result<ArtifactRecord> {
        let path = self.record_path(id);
        let record = match read_record(&path) {
            Ok(record) => record,
            Err(SignError::ArtifactNotFound(_)) => {
                return Err(SignError::ArtifactNotFound(id.to_string()))
            }
            Err(e) => return Err(e),
        };
        if &record.document_id != id {
            return Err(SignError::store(format!(
                "record at {} belongs to a different document",
                path.display()
            )));
        }
        Ok(record)
    }
}

fn read_record(path: &Path) -> Result<ArtifactRecord> {
    let data = match std::fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(SignError::ArtifactNotFound(path.display().to_string()))
        }
        Err(e) => return Err(SignError::store(format!("Failed to read artifact: {}", e))),
    };
    serde_json::from_slice(&data)
        .map_err(|e| SignError::store(format!("Failed to parse artifact: {}", e)))
}

/// 内存存储
#[derive(Debug, Default)]
pub struct MemoryArtifactStore {
    records: RwLock<HashMap<DocumentId, ArtifactRecord>>,
}

impl MemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// 直接改写记录，仅用于模拟存储损坏
    pub fn tamper<F: FnOnce(&mut ArtifactRecord)>(&self, id: &DocumentId, f: F) -> bool {
        match self.records.write().get_mut(id) {
            Some(record) => {
                f(record);
                true
            }
            None => false,
        }
    }
}

impl ArtifactStore for MemoryArtifactStore {
    fn put(&self, record: &ArtifactRecord) -> Result<()> {
        self.records
            .write()
            .insert(record.document_id.clone(), record.clone());
        Ok(())
    }

    fn get(&self, id: &DocumentId) -> Result<ArtifactRecord> {
        self.records
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| SignError::ArtifactNotFound(id.to_string()))
    }
}
