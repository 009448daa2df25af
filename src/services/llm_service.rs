//! LLM 服务 - 业务能力层
//!
//! 只负责"向 LLM 提问并拿回答案和引用"，不关心流程
//!
//! ## 技术栈
//! - 使用 `async-openai` 的类型构建 chat completion 请求
//! - 使用 `reqwest` 发送请求，以便读取 Perplexity 响应中附带的 `citations` 字段
//! - 兼容 OpenAI API 的服务

use async_openai::types::chat::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequest,
    CreateChatCompletionRequestArgs,
};
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::RequestError;
use crate::models::question::QuestionId;
use crate::models::report::{AnswerResult, RawAnswer};

/// 提问能力
///
/// 失败不会抛给调用方，而是作为 `Err(RequestError)` 返回，由流程把它渲染成错误答案
pub trait AnswerRequester {
    fn request(
        &self,
        question: &str,
        context: &str,
        question_id: &QuestionId,
    ) -> impl Future<Output = AnswerResult> + Send;
}

impl<T: AnswerRequester + Sync> AnswerRequester for &T {
    fn request(
        &self,
        question: &str,
        context: &str,
        question_id: &QuestionId,
    ) -> impl Future<Output = AnswerResult> + Send {
        (**self).request(question, context, question_id)
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    citations: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

/// LLM 服务
///
/// 职责：
/// - 组装系统消息（基础提示词 + 之前的问答上下文）
/// - 发送一次请求，返回答案文本和引用列表
/// - 不做任何重试
pub struct LlmService {
    http: reqwest::Client,
    api_key: String,
    api_base_url: String,
    model_name: String,
    system_prompt: String,
}

impl LlmService {
    /// 创建新的 LLM 服务
    pub fn new(config: &Config, system_prompt: impl Into<String>) -> Result<Self, RequestError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| RequestError::Build(e.to_string()))?;

        Ok(Self {
            http,
            api_key: config.llm_api_key.clone(),
            api_base_url: config.llm_api_base_url.clone(),
            model_name: config.llm_model_name.clone(),
            system_prompt: system_prompt.into(),
        })
    }

    /// chat completions 的完整地址
    fn endpoint(&self) -> String {
        let base = self.api_base_url.trim_end_matches('/');
        if base.ends_with("/chat/completions") {
            base.to_string()
        } else {
            format!("{}/chat/completions", base)
        }
    }

    /// 系统消息：有上下文时追加在提示词后面
    pub fn system_message(&self, context: &str) -> String {
        if context.is_empty() {
            self.system_prompt.clone()
        } else {
            format!("{}\nPrevious context: {}", self.system_prompt, context)
        }
    }

    /// 构建请求：一条系统消息 + 一条用户消息
    pub fn build_request(
        &self,
        question: &str,
        context: &str,
    ) -> Result<CreateChatCompletionRequest, RequestError> {
        let system_msg = ChatCompletionRequestSystemMessageArgs::default()
            .content(self.system_message(context))
            .build()?;
        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(question)
            .build()?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(vec![
                ChatCompletionRequestMessage::System(system_msg),
                ChatCompletionRequestMessage::User(user_msg),
            ])
            .build()?;

        Ok(request)
    }

    /// 发送请求并解析答案和引用
    pub async fn send_to_llm(&self, request: &CreateChatCompletionRequest) -> AnswerResult {
        let endpoint = self.endpoint();
        debug!("调用 LLM API，模型: {}", self.model_name);

        let response = self
            .http
            .post(&endpoint)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| RequestError::transport(&endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RequestError::Status {
                endpoint,
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| RequestError::transport(&endpoint, e))?;

        debug!("LLM API 调用成功");
        parse_response(&body, &self.model_name)
    }
}

/// 解析 chat completion 响应体
fn parse_response(body: &str, model: &str) -> AnswerResult {
    let parsed: ChatResponse =
        serde_json::from_str(body).map_err(|e| RequestError::Decode(e.to_string()))?;

    let text = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| RequestError::EmptyContent {
            model: model.to_string(),
        })?;

    Ok(RawAnswer {
        text,
        citations: parsed.citations,
    })
}

impl AnswerRequester for LlmService {
    async fn request(&self, question: &str, context: &str, question_id: &QuestionId) -> AnswerResult {
        let request = self.build_request(question, context)?;

        let result = self.send_to_llm(&request).await;
        match &result {
            Ok(answer) => debug!(
                "问题 {} 返回 {} 字符, {} 条引用",
                question_id,
                answer.text.len(),
                answer.citations.len()
            ),
            Err(e) => warn!("问题 {} 的 LLM 调用失败: {}", question_id, e),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_service() -> LlmService {
        let config = Config {
            llm_api_key: "test-key".to_string(),
            llm_api_base_url: "https://api.perplexity.ai/".to_string(),
            llm_model_name: "sonar".to_string(),
            ..Config::default()
        };
        LlmService::new(&config, "You are a research analyst.").unwrap()
    }

    #[test]
    fn test_endpoint_from_base_url() {
        let service = create_test_service();
        assert_eq!(service.endpoint(), "https://api.perplexity.ai/chat/completions");
    }

    #[test]
    fn test_system_message_with_and_without_context() {
        let service = create_test_service();
        assert_eq!(service.system_message(""), "You are a research analyst.");
        assert_eq!(
            service.system_message("\nQ: a\nA: b\n"),
            "You are a research analyst.\nPrevious context: \nQ: a\nA: b\n"
        );
    }

    #[test]
    fn test_build_request_has_system_then_user() {
        let service = create_test_service();
        let request = service.build_request("Regarding Acme: growth?", "").unwrap();
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "sonar");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][0]["content"], "You are a research analyst.");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "Regarding Acme: growth?");
        assert!(json["messages"].get(2).is_none());
    }

    #[test]
    fn test_parse_response_with_citations() {
        let body = r#"{
            "id": "abc",
            "model": "sonar",
            "citations": ["https://example.com/a", "https://example.com/b"],
            "choices": [{"index": 0, "message": {"role": "assistant", "content": " Revenue is [1][2]. "}}]
        }"#;
        let answer = parse_response(body, "sonar").unwrap();

        assert_eq!(answer.text, " Revenue is [1][2]. ");
        assert_eq!(answer.citations.len(), 2);
    }

    #[test]
    fn test_parse_response_without_citations() {
        let body = r#"{"choices": [{"message": {"content": "Plain."}}]}"#;
        let answer = parse_response(body, "sonar").unwrap();
        assert!(answer.citations.is_empty());
    }

    #[test]
    fn test_parse_response_errors() {
        let err = parse_response(r#"{"choices": []}"#, "sonar").unwrap_err();
        assert!(matches!(err, RequestError::EmptyContent { .. }));

        let err = parse_response("not json", "sonar").unwrap_err();
        assert!(matches!(err, RequestError::Decode(_)));
    }

    /// 需要 PERPLEXITY_API_KEY，手动运行：cargo test -- --ignored
    #[tokio::test]
    #[ignore]
    async fn test_request_live() {
        let _ = tracing_subscriber::fmt::try_init();

        let service = LlmService::new(&Config::from_env(), "Be concise.").unwrap();
        let result = service
            .request("What is the capital of France?", "", &QuestionId::Int(1))
            .await;

        match result {
            Ok(answer) => {
                println!("{}", answer.text);
                assert!(!answer.text.is_empty());
            }
            Err(e) => panic!("LLM 调用失败: {}", e),
        }
    }
}
