use serde::{Deserialize, Serialize};
use std::fmt;

/// 问题标识
///
/// 配置文件中既可以写整数也可以写字符串，两者互不相等（`1` 与 `"1"` 是不同的 id）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuestionId {
    Int(i64),
    Text(String),
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionId::Int(n) => write!(f, "{}", n),
            QuestionId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for QuestionId {
    fn from(n: i64) -> Self {
        QuestionId::Int(n)
    }
}

impl From<&str> for QuestionId {
    fn from(s: &str) -> Self {
        QuestionId::Text(s.to_string())
    }
}

impl From<String> for QuestionId {
    fn from(s: String) -> Self {
        QuestionId::Text(s)
    }
}

/// 配置文件中定义的问题
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDef {
    pub id: QuestionId,
    pub text: String,
}

impl QuestionDef {
    pub fn new(id: impl Into<QuestionId>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// 一次运行中的问题状态（文本可被修改，可被禁用）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunQuestion {
    pub id: QuestionId,
    pub text: String,
    pub enabled: bool,
}

impl RunQuestion {
    /// 启用且文本非空的问题才会参与运行
    pub fn is_active(&self) -> bool {
        self.enabled && !self.text.trim().is_empty()
    }
}

/// 运行配置
///
/// 每次运行构造一次，按值传入流程，流程内部不读取任何外部状态
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    questions: Vec<RunQuestion>,
}

impl RunConfig {
    /// 从模板问题构造，所有问题默认启用
    pub fn from_template(template: &[QuestionDef]) -> Self {
        Self {
            questions: template
                .iter()
                .map(|q| RunQuestion {
                    id: q.id.clone(),
                    text: q.text.clone(),
                    enabled: true,
                })
                .collect(),
        }
    }

    pub fn from_questions(questions: Vec<RunQuestion>) -> Self {
        Self { questions }
    }

    /// 按 id 的显示形式禁用问题，未知 id 会被忽略
    pub fn with_disabled<S: AsRef<str>>(mut self, ids: &[S]) -> Self {
        for q in &mut self.questions {
            let id = q.id.to_string();
            if ids.iter().any(|d| d.as_ref() == id) {
                q.enabled = false;
            }
        }
        self
    }

    pub fn questions(&self) -> &[RunQuestion] {
        &self.questions
    }

    /// 已启用的问题（导出模板使用，保留原文本）
    pub fn enabled_questions(&self) -> Vec<QuestionDef> {
        self.questions
            .iter()
            .filter(|q| q.enabled)
            .map(|q| QuestionDef::new(q.id.clone(), q.text.clone()))
            .collect()
    }

    /// 参与本次运行的问题，文本已去除首尾空白
    pub fn active_questions(&self) -> Vec<QuestionDef> {
        self.questions
            .iter()
            .filter(|q| q.is_active())
            .map(|q| QuestionDef::new(q.id.clone(), q.text.trim()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template() -> Vec<QuestionDef> {
        vec![
            QuestionDef::new(1, "What does the company do?"),
            QuestionDef::new("Q2", "   "),
            QuestionDef::new(3, "  Who are the competitors?  "),
        ]
    }

    #[test]
    fn test_active_questions_skip_blank_and_disabled() {
        let run = RunConfig::from_template(&template()).with_disabled(&["1"]);
        let active = run.active_questions();

        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, QuestionId::Int(3));
        assert_eq!(active[0].text, "Who are the competitors?");
    }

    #[test]
    fn test_enabled_questions_keep_blank_text() {
        let run = RunConfig::from_template(&template()).with_disabled(&["3"]);
        let enabled = run.enabled_questions();

        assert_eq!(enabled.len(), 2);
        assert_eq!(enabled[1].id, QuestionId::Text("Q2".to_string()));
    }

    #[test]
    fn test_question_id_from_yaml_int_or_string() {
        let defs: Vec<QuestionDef> =
            serde_yaml::from_str("- id: 7\n  text: a\n- id: Q7\n  text: b\n").unwrap();

        assert_eq!(defs[0].id, QuestionId::Int(7));
        assert_eq!(defs[1].id, QuestionId::Text("Q7".to_string()));
        assert_ne!(QuestionId::Int(1), QuestionId::Text("1".to_string()));
        assert_eq!(defs[0].id.to_string(), "7");
    }
}
