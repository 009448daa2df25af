//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责资源和文件的管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：加载报告配置（问题模板 + 系统提示词）
//! 2. **运行配置**：模板 + 导入文件 + 禁用列表 → `RunConfig`
//! 3. **生成报告**：检查开关、创建 LLM 服务、委托 `ReportRunner`
//! 4. **输出**：屏幕显示、写 HTML 文件、保存报告（整体替换上一次）
//! 5. **模板导出与历史报告查看**

use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::loaders::{
    apply_import, import_template, load_report_config_or_empty, write_template, ReportConfig,
};
use crate::models::question::{QuestionDef, RunConfig};
use crate::models::report::Report;
use crate::orchestrator::report_runner::{check_gate, ReportRunner};
use crate::services::llm_service::{AnswerRequester, LlmService};
use crate::services::report_formatter::{
    entry_markdown, references_markdown, render_report_html, render_report_markdown,
    report_file_name,
};
use crate::services::report_store::{write_html, ReportStore};
use crate::workflow::QuestionFlow;

/// 应用主结构
pub struct App {
    config: Config,
    report_config: ReportConfig,
    store: ReportStore,
}

impl App {
    /// 初始化应用，配置文件有问题时问题列表为空
    pub async fn initialize(config: Config) -> Self {
        let report_config =
            load_report_config_or_empty(Path::new(&config.report_config_path)).await;
        Self::with_report_config(config, report_config)
    }

    pub fn with_report_config(config: Config, report_config: ReportConfig) -> Self {
        let store = ReportStore::new(&config.state_dir);
        Self {
            config,
            report_config,
            store,
        }
    }

    /// 配置文件中的模板问题
    pub fn template(&self) -> &[QuestionDef] {
        &self.report_config.questions
    }

    pub fn store(&self) -> &ReportStore {
        &self.store
    }

    /// 构建本次运行配置
    ///
    /// 导入失败时显示错误并忽略导入，运行配置保持模板默认值
    pub async fn build_run_config(&self, template: Option<&Path>, disabled: &[String]) -> RunConfig {
        let mut run = RunConfig::from_template(self.template());

        if let Some(path) = template {
            match import_template(path).await {
                Ok(imported) => run = apply_import(self.template(), &imported),
                Err(e) => error!("Error importing questions: {}", e),
            }
        }

        run.with_disabled(disabled)
    }

    /// 生成报告并完成输出
    ///
    /// # 返回
    /// 返回写出的 HTML 文件路径
    pub async fn run_report(
        &self,
        company: &str,
        run: RunConfig,
        out_dir: Option<&Path>,
        save: bool,
    ) -> AppResult<PathBuf> {
        check_gate(self.config.kill_switch)?;

        let requester = LlmService::new(&self.config, self.report_config.system_prompt())?;
        let report = self.generate(requester, company, run).await?;

        self.finish(&report, out_dir, save).await
    }

    /// 使用给定的提问能力生成报告，每个问题完成后立即显示
    pub async fn generate<R: AnswerRequester>(
        &self,
        requester: R,
        company: &str,
        run: RunConfig,
    ) -> AppResult<Report> {
        let company = company.trim();
        if company.is_empty() {
            return Err(AppError::Other("请输入公司名称".to_string()));
        }

        if run.active_questions().is_empty() {
            warn!("⚠️ 没有启用的问题");
        }

        let flow = QuestionFlow::new(requester, company, self.config.verbose_logging);
        let runner = ReportRunner::new(
            flow,
            Duration::from_millis(self.config.pace_millis),
            self.config.kill_switch,
        );

        let report = runner
            .run_with_progress(run, |entry| print!("{}", entry_markdown(entry)))
            .await?;

        print!("{}", references_markdown(&report.citations));
        Ok(report)
    }

    /// 写 HTML 文件并保存报告
    pub async fn finish(
        &self,
        report: &Report,
        out_dir: Option<&Path>,
        save: bool,
    ) -> AppResult<PathBuf> {
        if save {
            let path = self.store.save(report).await?;
            info!("💾 报告已保存: {}", path.display());
        }

        let dir = out_dir.unwrap_or_else(|| Path::new(&self.config.output_dir));
        let html = render_report_html(report);
        let path = write_html(dir, &report_file_name(&report.company), &html).await?;
        info!("📄 HTML 报告: {}", path.display());

        Ok(path)
    }

    /// 显示上一次的报告，可选重新写出 HTML 文件
    pub async fn show(&self, out_dir: Option<&Path>) -> AppResult<Option<Report>> {
        let Some(report) = self.store.load().await? else {
            warn!("⚠️ 还没有生成过报告");
            return Ok(None);
        };

        print!("{}", render_report_markdown(&report));

        if let Some(dir) = out_dir {
            let html = render_report_html(&report);
            let path = write_html(dir, &report_file_name(&report.company), &html).await?;
            info!("📄 HTML 报告: {}", path.display());
        }

        Ok(Some(report))
    }

    /// 导出已启用的问题为模板
    pub async fn export(&self, run: &RunConfig, path: &Path) -> AppResult<usize> {
        write_template(path, run).await
    }
}

/// 问题列表的文本形式：`[x]` 启用，`[ ]` 禁用，`*` 表示参与运行
pub fn describe_questions(run: &RunConfig) -> String {
    let mut out = String::new();
    for q in run.questions() {
        out.push_str(&format!(
            "[{}]{} Question {}: {}\n",
            if q.enabled { "x" } else { " " },
            if q.is_active() { "*" } else { " " },
            q.id,
            q.text
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::{QuestionId, RunQuestion};

    #[test]
    fn test_describe_questions() {
        let run = RunConfig::from_questions(vec![
            RunQuestion {
                id: QuestionId::Int(1),
                text: "Overview".to_string(),
                enabled: true,
            },
            RunQuestion {
                id: QuestionId::Int(2),
                text: "Financials".to_string(),
                enabled: false,
            },
            RunQuestion {
                id: QuestionId::Int(3),
                text: " ".to_string(),
                enabled: true,
            },
        ]);

        assert_eq!(
            describe_questions(&run),
            "[x]* Question 1: Overview\n[ ]  Question 2: Financials\n[x]  Question 3:  \n"
        );
    }
}
