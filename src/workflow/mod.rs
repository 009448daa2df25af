pub mod question_ctx;
pub mod question_flow;

pub use question_ctx::QuestionCtx;
pub use question_flow::{format_question, QuestionFlow, QuestionOutcome};
