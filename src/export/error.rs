//! 导出错误处理

use std::path::PathBuf;
use thiserror::Error;

/// 导出错误类型
#[derive(Error, Debug)]
pub enum ExportError {
    /// 序列化错误
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 文件读写错误
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ExportError::Io {
            path: path.into(),
            source,
        }
    }
}

/// 导出结果类型
pub type ExportResult<T> = Result<T, ExportError>;
