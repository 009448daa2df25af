use crate::error::ConfigLoadError;
use crate::models::loaders::FileFormat;
use crate::models::question::QuestionDef;
use serde::Deserialize;
use std::path::Path;
use tokio::fs;

/// 报告配置：问题列表 + 系统提示词
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ReportConfig {
    pub questions: Vec<QuestionDef>,
    #[serde(default)]
    system_prompt: Option<String>,
}

impl ReportConfig {
    pub fn new(questions: Vec<QuestionDef>, system_prompt: impl Into<String>) -> Self {
        Self {
            questions,
            system_prompt: Some(system_prompt.into()),
        }
    }

    pub fn system_prompt(&self) -> &str {
        self.system_prompt.as_deref().unwrap_or_default()
    }
}

/// 解析配置文件内容
pub fn parse_report_config(
    content: &str,
    format: FileFormat,
    path: &str,
) -> Result<ReportConfig, ConfigLoadError> {
    match format {
        FileFormat::Yaml => {
            serde_yaml::from_str(content).map_err(|e| ConfigLoadError::parse(path, e))
        }
        FileFormat::Toml => toml::from_str(content).map_err(|e| ConfigLoadError::parse(path, e)),
    }
}

/// 从文件加载报告配置
pub async fn load_report_config(path: &Path) -> Result<ReportConfig, ConfigLoadError> {
    let path_str = path.display().to_string();
    let format = FileFormat::from_path(path).ok_or_else(|| ConfigLoadError::UnsupportedFormat {
        path: path_str.clone(),
    })?;

    let content = fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConfigLoadError::NotFound {
                path: path_str.clone(),
            }
        } else {
            ConfigLoadError::Read {
                path: path_str.clone(),
                source: e,
            }
        }
    })?;

    let config = parse_report_config(&content, format, &path_str)?;
    tracing::info!("成功加载 {} 个问题: {}", config.questions.len(), path_str);

    Ok(config)
}

/// 加载报告配置，失败时记录错误并返回空配置
pub async fn load_report_config_or_empty(path: &Path) -> ReportConfig {
    match load_report_config(path).await {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Error loading config: {}", e);
            ReportConfig::default()
        }
    }
}
