//! 报告存储服务 - 业务能力层
//!
//! 只负责"保存 / 读取上一次运行的报告"，新的运行整体替换旧报告

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::error::StoreError;
use crate::models::report::Report;

const REPORT_FILE: &str = "last_report.json";

/// 报告存储服务
pub struct ReportStore {
    dir: PathBuf,
}

impl ReportStore {
    /// 使用指定目录创建
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(REPORT_FILE)
    }

    /// 保存报告：先写临时文件再重命名，读取方不会看到写了一半的报告
    pub async fn save(&self, report: &Report) -> Result<PathBuf, StoreError> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StoreError::io(self.dir.display().to_string(), e))?;

        let path = self.path();
        let tmp = self.dir.join(format!("{}.tmp", REPORT_FILE));
        let json = serde_json::to_string_pretty(report)?;

        fs::write(&tmp, json)
            .await
            .map_err(|e| StoreError::io(tmp.display().to_string(), e))?;
        fs::rename(&tmp, &path)
            .await
            .map_err(|e| StoreError::io(path.display().to_string(), e))?;

        debug!("报告已保存: {} ({} 个问题)", path.display(), report.entries.len());
        Ok(path)
    }

    /// 读取上一次的报告，不存在时返回 None
    pub async fn load(&self) -> Result<Option<Report>, StoreError> {
        let path = self.path();
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io(path.display().to_string(), e)),
        };

        Ok(Some(serde_json::from_str(&content)?))
    }
}

/// 把 HTML 报告写到输出目录，返回文件路径
pub async fn write_html(dir: &Path, file_name: &str, html: &str) -> Result<PathBuf, StoreError> {
    fs::create_dir_all(dir)
        .await
        .map_err(|e| StoreError::io(dir.display().to_string(), e))?;

    let path = dir.join(file_name);
    fs::write(&path, html)
        .await
        .map_err(|e| StoreError::io(path.display().to_string(), e))?;
    Ok(path)
}
