//! 问题处理流程 - 流程层
//!
//! 核心职责：定义"一个问题"的完整处理流程
//!
//! 流程顺序：
//! 1. 组装问题 → 请求 LLM
//! 2. 清理答案（金额符号、标题级别）→ 引用重新编号
//! 3. 生成 Markdown / HTML、引用记录和新增上下文
//!
//! 请求失败时答案变成 `Error: ...` 文本，流程照常完成

use tracing::{error, info};

use crate::models::question::QuestionDef;
use crate::models::report::{CitationRecord, RawAnswer, ReportEntry};
use crate::services::citation_service::renumber_answer;
use crate::services::llm_service::AnswerRequester;
use crate::services::report_formatter::{clean_answer, markdown_to_html};
use crate::utils::logging::truncate_text;
use crate::workflow::question_ctx::QuestionCtx;

/// 发给 LLM 的问题，包含公司名称并要求使用最新数据
pub fn format_question(company: &str, question: &str) -> String {
    format!(
        "Regarding {}: {}. Please provide detailed information based on the latest available data.",
        company, question
    )
}

/// 单个问题的处理结果
#[derive(Debug, Clone)]
pub struct QuestionOutcome {
    pub entry: ReportEntry,
    /// 没有引用时为 None
    pub citations: Option<CitationRecord>,
    /// 追加到运行上下文的问答文本
    pub context_delta: String,
    /// 请求是否失败
    pub failed: bool,
}

/// 问题处理流程
///
/// - 编排单个问题的处理
/// - 不持有运行状态（上下文由编排层传入）
/// - 只依赖业务能力（services）
pub struct QuestionFlow<R> {
    requester: R,
    company: String,
    verbose_logging: bool,
}

impl<R: AnswerRequester> QuestionFlow<R> {
    /// 创建新的问题处理流程
    pub fn new(requester: R, company: impl Into<String>, verbose_logging: bool) -> Self {
        Self {
            requester,
            company: company.into(),
            verbose_logging,
        }
    }

    pub fn company(&self) -> &str {
        &self.company
    }

    pub async fn run(&self, ctx: &QuestionCtx, question: &QuestionDef, context: &str) -> QuestionOutcome {
        info!("{} 问题: {}", ctx, truncate_text(&question.text, 80));

        let prompt = format_question(&self.company, &question.text);
        let result = self
            .requester
            .request(&prompt, context, &ctx.question_id)
            .await;

        let (markdown, citations, failed) = match result {
            Ok(raw) => {
                let cleaned = RawAnswer {
                    text: clean_answer(&raw.text),
                    citations: raw.citations,
                };
                let answer = renumber_answer(&cleaned, &ctx.question_id);

                let record = CitationRecord::from_answer(&answer, &ctx.question_id, ctx.ordinal);
                (answer.text, record, false)
            }
            Err(e) => {
                error!("{} ⚠️ 请求失败: {}", ctx, e);
                (format!("Error: {}", e), None, true)
            }
        };

        if self.verbose_logging {
            info!("{} 答案: {}", ctx, truncate_text(&markdown, 200));
        }

        let entry = ReportEntry {
            ordinal: ctx.ordinal,
            question_id: ctx.question_id.clone(),
            question: question.text.clone(),
            html: markdown_to_html(&markdown),
            markdown,
        };

        let context_delta = format!("\nQ: {}\nA: {}\n", question.text, entry.markdown);

        QuestionOutcome {
            entry,
            citations,
            context_delta,
            failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RequestError;
    use crate::models::question::QuestionId;
    use crate::models::report::{AnswerResult, RawAnswer};
    use std::sync::Mutex;

    /// 按顺序返回预设结果，并记录收到的请求
    struct ScriptedRequester {
        answers: Mutex<Vec<AnswerResult>>,
        seen: Mutex<Vec<(String, String)>>,
    }

    impl ScriptedRequester {
        fn new(answers: Vec<AnswerResult>) -> Self {
            Self {
                answers: Mutex::new(answers.into_iter().rev().collect()),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl AnswerRequester for ScriptedRequester {
        async fn request(&self, question: &str, context: &str, _id: &QuestionId) -> AnswerResult {
            self.seen
                .lock()
                .unwrap()
                .push((question.to_string(), context.to_string()));
            self.answers
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(RequestError::Decode("no scripted answer".to_string())))
        }
    }

    #[tokio::test]
    async fn test_flow_cleans_and_renumbers() {
        let requester = ScriptedRequester::new(vec![Ok(RawAnswer {
            text: "# Revenue\nRevenue is $5M [1][2], growing [2].".to_string(),
            citations: vec!["https://a.test".to_string(), "https://b.test".to_string()],
        })]);
        let flow = QuestionFlow::new(&requester, "Acme Co", false);
        let ctx = QuestionCtx::new(1, 1, QuestionId::from("Q1"));
        let question = QuestionDef::new("Q1", "What is their revenue?");

        let outcome = flow.run(&ctx, &question, "").await;

        assert!(!outcome.failed);
        assert_eq!(
            outcome.entry.markdown,
            "##### Revenue\nRevenue is 5M [Q1-1][Q1-2], growing [Q1-2]."
        );
        assert!(outcome.entry.html.contains("<h5>Revenue</h5>"));
        let record = outcome.citations.unwrap();
        assert_eq!(record.ordinal, 1);
        assert_eq!(record.citations.len(), 2);
        assert_eq!(
            outcome.context_delta,
            format!("\nQ: What is their revenue?\nA: {}\n", outcome.entry.markdown)
        );

        let seen = requester.seen.lock().unwrap();
        assert_eq!(
            seen[0].0,
            "Regarding Acme Co: What is their revenue?. Please provide detailed information based on the latest available data."
        );
    }

    #[tokio::test]
    async fn test_flow_turns_error_into_answer() {
        let requester = ScriptedRequester::new(vec![Err(RequestError::Status {
            endpoint: "https://api.test/chat/completions".to_string(),
            status: 401,
            body: "unauthorized".to_string(),
        })]);
        let flow = QuestionFlow::new(&requester, "Acme Co", false);
        let ctx = QuestionCtx::new(2, 3, QuestionId::Int(5));
        let question = QuestionDef::new(5, "Who leads the company?");

        let outcome = flow.run(&ctx, &question, "\nQ: x\nA: y\n").await;

        assert!(outcome.failed);
        assert!(outcome.entry.markdown.starts_with("Error: "));
        assert!(outcome.citations.is_none());
        assert_eq!(requester.seen.lock().unwrap()[0].1, "\nQ: x\nA: y\n");
    }

    #[tokio::test]
    async fn test_flow_without_citations_keeps_markers() {
        let requester = ScriptedRequester::new(vec![Ok(RawAnswer {
            text: "Unsourced claim [1].".to_string(),
            citations: vec![],
        })]);
        let flow = QuestionFlow::new(&requester, "Acme Co", false);
        let ctx = QuestionCtx::new(1, 1, QuestionId::from("Q1"));

        let outcome = flow
            .run(&ctx, &QuestionDef::new("Q1", "Anything?"), "")
            .await;

        assert_eq!(outcome.entry.markdown, "Unsourced claim [1].");
        assert!(outcome.citations.is_none());
    }
}
