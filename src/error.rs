use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 配置文件加载错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigLoadError),
    /// LLM 请求错误
    #[error("LLM错误: {0}")]
    Request(#[from] RequestError),
    /// 模板导入错误
    #[error("模板错误: {0}")]
    Import(#[from] ImportValidationError),
    /// 运行被开关拦截
    #[error("运行被拒绝: {0}")]
    Gate(#[from] OperationalGateError),
    /// 报告存储错误
    #[error("存储错误: {0}")]
    Store(#[from] StoreError),
    /// 其他错误（用于包装第三方库错误）
    #[error("错误: {0}")]
    Other(String),
}

/// 配置文件加载错误
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    /// 文件不存在
    #[error("配置文件不存在: {path}")]
    NotFound { path: String },
    /// 读取文件失败
    #[error("读取配置文件失败 ({path}): {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 解析失败
    #[error("解析配置文件失败 ({path}): {message}")]
    Parse { path: String, message: String },
    /// 不支持的文件格式
    #[error("不支持的配置文件格式: {path}")]
    UnsupportedFormat { path: String },
}

/// LLM 请求错误
///
/// 不会中断整个报告，只会把当前问题的答案变成错误文本
#[derive(Debug, Error)]
pub enum RequestError {
    /// 构建请求失败
    #[error("构建请求失败: {0}")]
    Build(String),
    /// 网络请求失败
    #[error("请求失败 ({endpoint}): {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// 服务返回错误状态码
    #[error("服务返回错误状态 {status} ({endpoint}): {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// 响应解析失败
    #[error("响应解析失败: {0}")]
    Decode(String),
    /// 返回内容为空
    #[error("LLM 返回内容为空 (模型: {model})")]
    EmptyContent { model: String },
}

/// 模板导入错误
///
/// 导入失败时不修改任何状态
#[derive(Debug, Error)]
pub enum ImportValidationError {
    /// 读取文件失败
    #[error("读取模板文件失败 ({path}): {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 解析失败
    #[error("模板文件解析失败: {0}")]
    Parse(String),
    /// 缺少 questions 列表
    #[error("Invalid template structure. File must contain a 'questions' list.")]
    MissingQuestions,
}

/// 开关拦截时展示给调用方的结构化错误
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatePayload {
    pub error: GateErrorBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateErrorBody {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl GatePayload {
    /// 额度不足时的固定错误内容
    pub fn insufficient_quota() -> Self {
        Self {
            error: GateErrorBody {
                message: "insufficient quota, please refer to platform documentations"
                    .to_string(),
                kind: "403".to_string(),
            },
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(
                r#"{{"error":{{"message":"{}","type":"{}"}}}}"#,
                self.error.message, self.error.kind
            )
        })
    }
}

/// 运行开关已启用
#[derive(Debug, Clone, Error)]
#[error("{}", .payload.to_json())]
pub struct OperationalGateError {
    pub payload: GatePayload,
}

impl OperationalGateError {
    pub fn new(payload: GatePayload) -> Self {
        Self { payload }
    }
}

/// 报告存储错误
#[derive(Debug, Error)]
pub enum StoreError {
    /// 读写文件失败
    #[error("报告文件读写失败 ({path}): {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// JSON 序列化失败
    #[error("报告 JSON 处理失败: {0}")]
    Json(#[from] serde_json::Error),
}

// ========== 从常见错误类型转换 ==========

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Other(format!("YAML 序列化失败: {}", err))
    }
}

impl From<toml::ser::Error> for AppError {
    fn from(err: toml::ser::Error) -> Self {
        AppError::Other(format!("TOML 序列化失败: {}", err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Other(format!("文件操作失败: {}", err))
    }
}

// ========== 便捷构造函数 ==========

impl ConfigLoadError {
    pub fn parse(path: impl Into<String>, err: impl std::fmt::Display) -> Self {
        ConfigLoadError::Parse {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

impl RequestError {
    pub fn transport(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        RequestError::Transport {
            endpoint: endpoint.into(),
            source,
        }
    }
}

impl From<async_openai::error::OpenAIError> for RequestError {
    fn from(err: async_openai::error::OpenAIError) -> Self {
        RequestError::Build(err.to_string())
    }
}

impl StoreError {
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
