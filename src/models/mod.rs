pub mod loaders;
pub mod question;
pub mod report;

pub use loaders::{load_report_config, load_report_config_or_empty, ReportConfig};
pub use question::{QuestionDef, QuestionId, RunConfig, RunQuestion};
pub use report::{
    AnswerResult, CitationKey, CitationRecord, RawAnswer, RenumberedAnswer, Report, ReportEntry,
};
