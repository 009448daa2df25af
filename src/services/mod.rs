pub mod citation_service;
pub mod llm_service;
pub mod report_formatter;
pub mod report_store;

pub use llm_service::{AnswerRequester, LlmService};
pub use report_store::ReportStore;
