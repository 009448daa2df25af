use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::RequestError;
use crate::models::question::QuestionId;

/// LLM 的原始返回：答案文本 + 按顺序排列的引用
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAnswer {
    pub text: String,
    #[serde(default)]
    pub citations: Vec<String>,
}

/// 一次请求的结果，失败时只影响当前问题
pub type AnswerResult = Result<RawAnswer, RequestError>;

/// 全局唯一的引用编号：`{question_id}-{local_index}`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CitationKey {
    pub question_id: QuestionId,
    /// 从 1 开始
    pub local_index: usize,
}

impl CitationKey {
    pub fn new(question_id: QuestionId, local_index: usize) -> Self {
        Self {
            question_id,
            local_index,
        }
    }

    /// 文中使用的标记形式 `[Q1-2]`
    pub fn marker(&self) -> String {
        format!("[{}]", self)
    }
}

impl fmt::Display for CitationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.question_id, self.local_index)
    }
}

/// 重新编号后的答案
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenumberedAnswer {
    pub text: String,
    pub citations: Vec<(CitationKey, String)>,
}

/// 报告中的一节
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    /// 本次运行中的序号（从 1 开始）
    pub ordinal: usize,
    pub question_id: QuestionId,
    pub question: String,
    pub markdown: String,
    pub html: String,
}

impl ReportEntry {
    /// 屏幕上显示的标题 `1. 问题`
    pub fn heading(&self) -> String {
        format!("{}. {}", self.ordinal, self.question)
    }
}

/// 某个问题返回的引用列表（只记录至少有一条引用的问题）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationRecord {
    pub question_id: QuestionId,
    pub ordinal: usize,
    pub citations: Vec<String>,
}

impl CitationRecord {
    /// 从重新编号后的答案生成，没有引用时为 None
    pub fn from_answer(
        answer: &RenumberedAnswer,
        question_id: &QuestionId,
        ordinal: usize,
    ) -> Option<Self> {
        if answer.citations.is_empty() {
            return None;
        }
        Some(Self {
            question_id: question_id.clone(),
            ordinal,
            citations: answer.citations.iter().map(|(_, c)| c.clone()).collect(),
        })
    }

    pub fn keyed(&self) -> impl Iterator<Item = (CitationKey, &str)> + '_ {
        self.citations
            .iter()
            .enumerate()
            .map(move |(i, c)| (CitationKey::new(self.question_id.clone(), i + 1), c.as_str()))
    }
}

/// 一次运行生成的完整报告
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub company: String,
    pub generated_at: DateTime<Local>,
    pub entries: Vec<ReportEntry>,
    pub citations: Vec<CitationRecord>,
    /// 所有问答拼接而成的上下文，作为后续请求的记忆
    pub context: String,
    /// 所有问题的 HTML 片段
    pub html_body: String,
}

impl Report {
    pub fn new(company: impl Into<String>, generated_at: DateTime<Local>) -> Self {
        Self {
            company: company.into(),
            generated_at,
            entries: Vec::new(),
            citations: Vec::new(),
            context: String::new(),
            html_body: String::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
