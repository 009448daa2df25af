//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责一次运行的调度和输出，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `app` - 应用入口
//! - 加载报告配置（问题模板、系统提示词）
//! - 构建运行配置（模板导入、禁用列表）
//! - 创建 LLM 服务
//! - 屏幕显示、HTML 文件、报告存储
//!
//! ### `report_runner` - 报告运行器
//! - 运行开关检查
//! - 遍历活跃问题（Vec<QuestionDef>）
//! - 累积上下文、引用记录和 HTML 片段
//! - 输出运行统计信息
//!
//! ## 层次关系
//!
//! ```text
//! app (处理一次运行)
//!     ↓
//! report_runner (处理 Vec<QuestionDef>)
//!     ↓
//! workflow::QuestionFlow (处理单个问题)
//!     ↓
//! services (能力层：llm / citation / formatter / store)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单一职责**：app 管输入输出，report_runner 管问题序列
//! 2. **向下依赖**：编排层 → workflow → services
//! 3. **无业务逻辑**：只做调度和统计，不做答案处理

pub mod app;
pub mod report_runner;

// 重新导出主要类型
pub use app::{describe_questions, App};
pub use report_runner::{check_gate, ReportRunner};
