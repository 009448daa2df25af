//! 问题模板的导入与导出
//!
//! 模板与配置文件同形：`{questions: [{id, text}]}`

use crate::error::{AppResult, ImportValidationError};
use crate::models::loaders::FileFormat;
use crate::models::question::{QuestionDef, QuestionId, RunConfig, RunQuestion};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tokio::fs;

#[derive(Debug, Serialize)]
struct TemplateFile {
    questions: Vec<QuestionDef>,
}

#[derive(Debug, Deserialize)]
struct RawTemplate {
    questions: Option<Vec<RawEntry>>,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    id: Option<QuestionId>,
    text: Option<String>,
}

/// 导入的模板（重复 id 以最后一次出现为准）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportedTemplate {
    texts: HashMap<QuestionId, String>,
}

impl ImportedTemplate {
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    pub fn text_for(&self, id: &QuestionId) -> Option<&str> {
        self.texts.get(id).map(String::as_str)
    }
}

/// 导出已启用的问题
pub fn export_template(run: &RunConfig, format: FileFormat) -> AppResult<String> {
    let file = TemplateFile {
        questions: run.enabled_questions(),
    };
    let content = match format {
        FileFormat::Yaml => serde_yaml::to_string(&file)?,
        FileFormat::Toml => toml::to_string(&file)?,
    };
    Ok(content)
}

/// 导出到文件，格式由扩展名决定（默认 YAML）
pub async fn write_template(path: &Path, run: &RunConfig) -> AppResult<usize> {
    let format = FileFormat::from_path(path).unwrap_or(FileFormat::Yaml);
    let content = export_template(run, format)?;
    fs::write(path, content).await?;

    let count = run.enabled_questions().len();
    tracing::info!("已导出 {} 个问题到 {}", count, path.display());
    Ok(count)
}

/// 解析模板内容
///
/// 缺少 `id` 或 `text` 的条目会被跳过
pub fn parse_template(
    content: &str,
    format: FileFormat,
) -> Result<ImportedTemplate, ImportValidationError> {
    let raw: RawTemplate = match format {
        FileFormat::Yaml => serde_yaml::from_str(content)
            .map_err(|e| ImportValidationError::Parse(e.to_string()))?,
        FileFormat::Toml => {
            toml::from_str(content).map_err(|e| ImportValidationError::Parse(e.to_string()))?
        }
    };

    let entries = raw.questions.ok_or(ImportValidationError::MissingQuestions)?;

    let mut texts = HashMap::new();
    for entry in entries {
        if let (Some(id), Some(text)) = (entry.id, entry.text) {
            texts.insert(id, text);
        }
    }

    Ok(ImportedTemplate { texts })
}

/// 从文件导入模板
pub async fn import_template(path: &Path) -> Result<ImportedTemplate, ImportValidationError> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| ImportValidationError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
    let format = FileFormat::from_path(path).unwrap_or(FileFormat::Yaml);

    let imported = parse_template(&content, format)?;
    tracing::info!("Imported {} questions successfully!", imported.len());
    Ok(imported)
}

/// 把导入结果应用到模板问题上，生成新的运行配置
///
/// - 导入中存在的 id：覆盖文本并启用
/// - 导入中不存在的 id：恢复默认文本并禁用
/// - 模板中没有的 id：忽略
pub fn apply_import(template: &[QuestionDef], imported: &ImportedTemplate) -> RunConfig {
    let questions = template
        .iter()
        .map(|q| match imported.text_for(&q.id) {
            Some(text) => RunQuestion {
                id: q.id.clone(),
                text: text.to_string(),
                enabled: true,
            },
            None => RunQuestion {
                id: q.id.clone(),
                text: q.text.clone(),
                enabled: false,
            },
        })
        .collect();

    RunConfig::from_questions(questions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template() -> Vec<QuestionDef> {
        vec![
            QuestionDef::new(1, "Overview"),
            QuestionDef::new(2, "Financials"),
            QuestionDef::new(3, "Leadership"),
        ]
    }

    #[test]
    fn test_import_overrides_enables_and_disables() {
        let yaml = r#"
questions:
  - id: 2
    text: Latest quarterly revenue
  - id: 99
    text: Unknown question
  - id: 3
"#;
        let imported = parse_template(yaml, FileFormat::Yaml).unwrap();
        assert_eq!(imported.len(), 2);

        let run = apply_import(&template(), &imported);
        let qs = run.questions();

        assert_eq!(qs.len(), 3);
        assert!(!qs[0].enabled);
        assert_eq!(qs[0].text, "Overview");
        assert!(qs[1].enabled);
        assert_eq!(qs[1].text, "Latest quarterly revenue");
        assert!(!qs[2].enabled);
        assert_eq!(qs[2].text, "Leadership");
    }

    #[test]
    fn test_import_without_questions_key_is_rejected() {
        let err = parse_template("title: nothing here\n", FileFormat::Yaml).unwrap_err();
        assert!(matches!(err, ImportValidationError::MissingQuestions));

        let err = parse_template("just a sentence\n", FileFormat::Yaml).unwrap_err();
        assert!(matches!(err, ImportValidationError::Parse(_)));
    }

    #[test]
    fn test_export_only_enabled_in_order() {
        let run = RunConfig::from_template(&template()).with_disabled(&["2"]);
        let yaml = export_template(&run, FileFormat::Yaml).unwrap();

        let imported = parse_template(&yaml, FileFormat::Yaml).unwrap();
        assert_eq!(imported.len(), 2);
        assert_eq!(imported.text_for(&QuestionId::Int(1)), Some("Overview"));
        assert_eq!(imported.text_for(&QuestionId::Int(2)), None);

        let first = yaml.find("Overview").unwrap();
        let second = yaml.find("Leadership").unwrap();
        assert!(first < second);
    }

    #[tokio::test]
    async fn test_write_then_import_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom_questions.yaml");
        let run = RunConfig::from_template(&template()).with_disabled(&["1", "3"]);

        let count = write_template(&path, &run).await.unwrap();
        assert_eq!(count, 1);

        let imported = import_template(&path).await.unwrap();
        let run = apply_import(&template(), &imported);
        let active = run.active_questions();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].text, "Financials");
    }
}
