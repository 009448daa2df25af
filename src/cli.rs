use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub const DEFAULT_EXPORT_FILE: &str = "custom_questions.yaml";

#[derive(Parser, Debug)]
#[command(
    name = "prospect_report",
    version,
    about = "Sales prospect research reports from LLM answers with citations"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Show debug logs and answer previews")]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

/// 问题选择：导入模板 + 按 id 禁用
#[derive(Args, Debug, Clone, Default)]
pub struct QuestionArgs {
    #[arg(long, help = "Question template to import (YAML or TOML)")]
    pub template: Option<PathBuf>,
    #[arg(long = "disable", value_name = "ID", help = "Disable a question by id")]
    pub disabled: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a report for a company
    Run {
        #[arg(long)]
        company: String,
        #[command(flatten)]
        questions: QuestionArgs,
        #[arg(long, help = "Directory for the HTML report")]
        out: Option<PathBuf>,
        #[arg(long, default_value_t = false, help = "Do not replace the stored report")]
        no_save: bool,
    },
    /// Show the last generated report
    Show {
        #[arg(long, help = "Also write the HTML report to this directory")]
        out: Option<PathBuf>,
    },
    /// Export enabled questions as a template
    Export {
        #[command(flatten)]
        questions: QuestionArgs,
        #[arg(long, default_value = DEFAULT_EXPORT_FILE)]
        file: PathBuf,
    },
    /// List the questions of a run
    Questions {
        #[command(flatten)]
        questions: QuestionArgs,
    },
}
