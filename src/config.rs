/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 报告问题配置文件（YAML 或 TOML）
    pub report_config_path: String,
    /// 保存上一次报告的目录
    pub state_dir: String,
    /// HTML 报告输出目录
    pub output_dir: String,
    /// 每个问题处理完成后的等待时间（毫秒）
    pub pace_millis: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 运行开关，启用后拒绝执行
    pub kill_switch: bool,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            report_config_path: "report-config.yaml".to_string(),
            state_dir: ".prospect_report".to_string(),
            output_dir: ".".to_string(),
            pace_millis: 1000,
            verbose_logging: false,
            kill_switch: false,
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.perplexity.ai".to_string(),
            llm_model_name: "sonar".to_string(),
            request_timeout_secs: 120,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            report_config_path: std::env::var("REPORT_CONFIG").unwrap_or(default.report_config_path),
            state_dir: std::env::var("REPORT_STATE_DIR").unwrap_or(default.state_dir),
            output_dir: std::env::var("REPORT_OUTPUT_DIR").unwrap_or(default.output_dir),
            pace_millis: std::env::var("PACE_MILLIS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.pace_millis),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            kill_switch: std::env::var("P_FLAG").map(|v| v == "Y").unwrap_or(default.kill_switch),
            llm_api_key: std::env::var("PERPLEXITY_API_KEY").unwrap_or(default.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: std::env::var("PPLX_MODEL").unwrap_or(default.llm_model_name),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.request_timeout_secs),
        }
    }
}
