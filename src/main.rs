use anyhow::Result;
use clap::Parser;
use prospect_report::cli::{Cli, Commands};
use prospect_report::orchestrator::describe_questions;
use prospect_report::utils::logging;
use prospect_report::{App, AppError, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let mut config = Config::from_env();
    config.verbose_logging |= cli.verbose;

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并运行应用
    let app = App::initialize(config).await;

    match cli.command {
        Commands::Run {
            company,
            questions,
            out,
            no_save,
        } => {
            let run = app
                .build_run_config(questions.template.as_deref(), &questions.disabled)
                .await;
            match app.run_report(&company, run, out.as_deref(), !no_save).await {
                Ok(_) => {}
                Err(AppError::Gate(gate)) => {
                    eprintln!("{}", gate.payload.to_json());
                    std::process::exit(1);
                }
                Err(e) => return Err(e.into()),
            }
        }
        Commands::Show { out } => {
            app.show(out.as_deref()).await?;
        }
        Commands::Export { questions, file } => {
            let run = app
                .build_run_config(questions.template.as_deref(), &questions.disabled)
                .await;
            let count = app.export(&run, &file).await?;
            println!("Exported {} questions to {}", count, file.display());
        }
        Commands::Questions { questions } => {
            let run = app
                .build_run_config(questions.template.as_deref(), &questions.disabled)
                .await;
            print!("{}", describe_questions(&run));
        }
    }

    Ok(())
}
