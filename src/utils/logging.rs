/// 日志工具模块
///
/// 提供日志初始化和输出的辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化日志
///
/// 优先使用 `RUST_LOG`，否则按 `verbose` 选择 debug / info
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// 记录运行开始信息
///
/// # 参数
/// - `company`: 公司名称
/// - `total`: 本次运行的问题数量
pub fn log_run_start(company: &str, total: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 开始生成报告: {}", company);
    info!("📋 共 {} 个问题", total);
    info!("{}", "=".repeat(60));
}

/// 记录单个问题开始
pub fn log_question_start(ordinal: usize, total: usize) {
    info!(
        "generating response for question {} of {}...",
        ordinal, total
    );
}

/// 运行统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub answered: usize,
    pub failed: usize,
    pub citations: usize,
}

/// 打印最终统计信息
///
/// # 参数
/// - `stats`: 运行统计
/// - `total`: 问题总数
pub fn print_final_stats(stats: &RunStats, total: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📊 报告生成完成");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", stats.answered, total);
    info!("❌ 失败: {}", stats.failed);
    info!("🔗 引用: {}", stats.citations);
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
