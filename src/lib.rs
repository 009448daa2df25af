//! # Prospect Report
//!
//! 通过 LLM 搜索 API 为指定公司生成销售调研报告
//!
//! ## 架构设计
//!
//! 本系统采用严格的三层架构：
//!
//! ### ① 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个答案
//! - `LlmService` - 向 LLM 提问，拿回答案和引用
//! - `citation_service` - 把 `[n]` 引用改写成全局唯一的 `[{id}-{n}]`
//! - `report_formatter` - 屏幕文本、HTML 片段、完整 HTML 文档
//! - `ReportStore` - 保存上一次的报告
//!
//! ### ② 流程层（Workflow）
//! - `workflow/` - 定义"一个问题"的完整处理流程
//! - `QuestionCtx` - 上下文封装（ordinal + question_id）
//! - `QuestionFlow` - 流程编排（request → clean → renumber → render）
//!
//! ### ③ 编排层（Orchestration）
//! - `orchestrator/app` - 应用入口，管理配置、输出和存储
//! - `orchestrator/report_runner` - 遍历问题列表，累积上下文和报告
//!
//! ## 模块结构

pub mod cli;
pub mod config;
pub mod error;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult, GatePayload, OperationalGateError};
pub use models::{QuestionDef, QuestionId, Report, ReportEntry, RunConfig};
pub use orchestrator::{check_gate, App, ReportRunner};
pub use services::{AnswerRequester, LlmService, ReportStore};
pub use workflow::{QuestionCtx, QuestionFlow};
