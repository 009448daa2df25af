//! 报告运行器 - 编排层
//!
//! ## 职责
//!
//! 本模块负责一次运行中的所有问题，是报告级别的编排器。
//!
//! ## 核心功能
//!
//! 1. **开关检查**：运行开关启用时直接拒绝，不发出任何请求
//! 2. **遍历问题**：按顺序逐个处理活跃问题，每个问题等待请求完成
//! 3. **上下文累积**：每个问答追加到上下文，供后续问题参考
//! 4. **报告累积**：条目、引用记录、HTML 片段只追加不修改
//! 5. **节奏控制**：每个问题处理后固定等待一段时间

use chrono::Local;
use std::time::Duration;
use tokio::time::sleep;

use crate::error::{GatePayload, OperationalGateError};
use crate::models::question::RunConfig;
use crate::models::report::{Report, ReportEntry};
use crate::services::llm_service::AnswerRequester;
use crate::services::report_formatter::question_block;
use crate::utils::logging::{log_question_start, log_run_start, print_final_stats, RunStats};
use crate::workflow::{QuestionCtx, QuestionFlow};

/// 运行开关检查，启用时返回结构化错误
pub fn check_gate(kill_switch: bool) -> Result<(), OperationalGateError> {
    if kill_switch {
        return Err(OperationalGateError::new(GatePayload::insufficient_quota()));
    }
    Ok(())
}

/// 报告运行器
pub struct ReportRunner<R> {
    flow: QuestionFlow<R>,
    pace: Duration,
    kill_switch: bool,
}

impl<R: AnswerRequester> ReportRunner<R> {
    pub fn new(flow: QuestionFlow<R>, pace: Duration, kill_switch: bool) -> Self {
        Self {
            flow,
            pace,
            kill_switch,
        }
    }

    /// 生成报告
    pub async fn run(&self, run: RunConfig) -> Result<Report, OperationalGateError> {
        self.run_with_progress(run, |_| {}).await
    }

    /// 生成报告，每完成一个问题回调一次（用于即时显示）
    pub async fn run_with_progress<F>(
        &self,
        run: RunConfig,
        mut on_entry: F,
    ) -> Result<Report, OperationalGateError>
    where
        F: FnMut(&ReportEntry),
    {
        check_gate(self.kill_switch)?;

        let active = run.active_questions();
        let total = active.len();
        log_run_start(self.flow.company(), total);

        let mut report = Report::new(self.flow.company(), Local::now());
        let mut stats = RunStats::default();

        for (index, question) in active.iter().enumerate() {
            let ordinal = index + 1;
            log_question_start(ordinal, total);

            let ctx = QuestionCtx::new(ordinal, total, question.id.clone());
            let outcome = self.flow.run(&ctx, question, &report.context).await;

            if outcome.failed {
                stats.failed += 1;
            } else {
                stats.answered += 1;
            }

            report.context.push_str(&outcome.context_delta);
            report.html_body.push_str(&question_block(&outcome.entry));
            if let Some(record) = outcome.citations {
                stats.citations += record.citations.len();
                report.citations.push(record);
            }

            on_entry(&outcome.entry);
            report.entries.push(outcome.entry);

            sleep(self.pace).await;
        }

        report.generated_at = Local::now();
        print_final_stats(&stats, total);

        Ok(report)
    }
}
