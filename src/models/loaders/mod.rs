pub mod config_loader;
pub mod template_loader;

use std::path::Path;

pub use config_loader::{load_report_config, load_report_config_or_empty, ReportConfig};
pub use template_loader::{
    apply_import, export_template, import_template, parse_template, write_template,
    ImportedTemplate,
};

/// 支持的声明式文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Yaml,
    Toml,
}

impl FileFormat {
    /// 根据扩展名判断格式
    pub fn from_path(path: &Path) -> Option<Self> {
        match path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_ascii_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => Some(FileFormat::Yaml),
            Some("toml") => Some(FileFormat::Toml),
            _ => None,
        }
    }
}
