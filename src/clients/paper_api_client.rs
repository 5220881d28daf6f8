/// 试卷服务 API 客户端
///
/// 封装生成服务、蓝图存储和试卷分区存储的 HTTP 调用
use crate::config::Config;
use crate::error::{ApiError, AppError, AppResult};
use crate::models::saved::{SaveBlueprintPayload, SavedBlueprint};
use crate::models::section::{DeleteQuestionPayload, SectionsPayload};
use crate::services::backend::{BlueprintBackend, GenerationBackend, SectionBackend};
use crate::services::generation_request::GenerationRequest;
use crate::utils::truncate_text;
use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const GENERATE_ENDPOINT: &str = "question-paper/generate";
const BLUEPRINT_ENDPOINT: &str = "blueprint";
const SECTIONS_ENDPOINT: &str = "question-paper/sections";
const DELETE_QUESTION_ENDPOINT: &str = "question-paper/question/delete";

/// 试卷服务 API 客户端
pub struct PaperApiClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl PaperApiClient {
    /// 创建新的客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| AppError::api_request_failed("client", e))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: config.api_token.clone(),
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    /// 发送 JSON 请求，返回已解包的响应数据
    async fn send<B>(&self, method: Method, endpoint: &str, body: Option<&B>) -> AppResult<Value>
    where
        B: Serialize + ?Sized,
    {
        let mut request = self
            .http
            .request(method.clone(), self.url(endpoint))
            .header("Accept", "application/json, text/plain, */*");
        if !self.token.is_empty() {
            request = request.bearer_auth(&self.token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        debug!("{} {}", method, endpoint);

        let response = request
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(endpoint, e))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AppError::api_request_failed(endpoint, e))?;

        debug!("{} {} 响应 ({}): {}", method, endpoint, status, truncate_text(&text, 200));

        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .as_ref()
                .and_then(Self::extract_message)
                .or_else(|| (!text.trim().is_empty()).then(|| truncate_text(&text, 200)));
            return Err(AppError::bad_response(endpoint, status.as_u16(), message));
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        let result: Value = serde_json::from_str(&text)?;
        Ok(Self::extract_data(result))
    }

    /// 解析为已保存蓝图；空响应视为错误
    fn parse_blueprint(endpoint: &str, data: Value) -> AppResult<SavedBlueprint> {
        if !Self::is_success_response(&data) {
            return Err(ApiError::EmptyResponse {
                endpoint: endpoint.to_string(),
            }
            .into());
        }
        Ok(serde_json::from_value(data)?)
    }

    /// 检查 API 响应是否有内容
    pub fn is_success_response(result: &Value) -> bool {
        !result.is_null()
    }

    /// 解包 `{ "data": ... }`；没有包裹时原样返回
    pub fn extract_data(result: Value) -> Value {
        match result {
            Value::Object(mut map) if map.contains_key("data") => {
                map.remove("data").unwrap_or(Value::Null)
            }
            other => other,
        }
    }

    /// 提取错误响应中的提示信息
    pub fn extract_message(result: &Value) -> Option<String> {
        ["message", "error", "msg"]
            .iter()
            .find_map(|key| result.get(*key).and_then(|v| v.as_str()))
            .map(str::to_string)
    }
}

impl GenerationBackend for PaperApiClient {
    fn generate<'a>(&'a self, request: &'a GenerationRequest) -> BoxFuture<'a, AppResult<Value>> {
        async move {
            let data = self.send(Method::POST, GENERATE_ENDPOINT, Some(request)).await?;
            if !Self::is_success_response(&data) {
                return Err(ApiError::EmptyResponse {
                    endpoint: GENERATE_ENDPOINT.to_string(),
                }
                .into());
            }
            Ok(data)
        }
        .boxed()
    }
}

impl BlueprintBackend for PaperApiClient {
    fn save_blueprint<'a>(
        &'a self,
        payload: &'a SaveBlueprintPayload,
    ) -> BoxFuture<'a, AppResult<SavedBlueprint>> {
        async move {
            let data = self.send(Method::POST, BLUEPRINT_ENDPOINT, Some(payload)).await?;
            Self::parse_blueprint(BLUEPRINT_ENDPOINT, data)
        }
        .boxed()
    }

    fn update_blueprint<'a>(
        &'a self,
        id: &'a str,
        payload: &'a SaveBlueprintPayload,
    ) -> BoxFuture<'a, AppResult<SavedBlueprint>> {
        async move {
            let endpoint = format!("{}/{}", BLUEPRINT_ENDPOINT, id);
            let data = self.send(Method::PUT, &endpoint, Some(payload)).await?;
            Self::parse_blueprint(&endpoint, data)
        }
        .boxed()
    }

    fn load_blueprint<'a>(&'a self, id: &'a str) -> BoxFuture<'a, AppResult<SavedBlueprint>> {
        async move {
            let endpoint = format!("{}/{}", BLUEPRINT_ENDPOINT, id);
            let data = self.send::<Value>(Method::GET, &endpoint, None).await?;
            Self::parse_blueprint(&endpoint, data)
        }
        .boxed()
    }
}

impl SectionBackend for PaperApiClient {
    fn save_sections<'a>(&'a self, payload: &'a SectionsPayload) -> BoxFuture<'a, AppResult<()>> {
        async move {
            self.send(Method::PUT, SECTIONS_ENDPOINT, Some(payload)).await?;
            Ok(())
        }
        .boxed()
    }

    fn delete_question<'a>(
        &'a self,
        payload: &'a DeleteQuestionPayload,
    ) -> BoxFuture<'a, AppResult<()>> {
        async move {
            self.send(Method::POST, DELETE_QUESTION_ENDPOINT, Some(payload))
                .await?;
            Ok(())
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_data_unwraps_envelope() {
        let wrapped = json!({"data": {"id": "bp-1"}, "code": 200});
        assert_eq!(PaperApiClient::extract_data(wrapped), json!({"id": "bp-1"}));

        let bare = json!({"id": "bp-1"});
        assert_eq!(PaperApiClient::extract_data(bare.clone()), bare);
    }

    #[test]
    fn test_extract_message() {
        assert_eq!(
            PaperApiClient::extract_message(&json!({"message": "unauthorized"})),
            Some("unauthorized".to_string())
        );
        assert_eq!(PaperApiClient::extract_message(&json!({"code": 1})), None);
    }

    #[test]
    fn test_parse_blueprint_rejects_empty() {
        let err = PaperApiClient::parse_blueprint("blueprint", Value::Null).unwrap_err();
        assert!(matches!(err, AppError::Api(ApiError::EmptyResponse { .. })));

        let saved = PaperApiClient::parse_blueprint(
            "blueprint",
            json!({"id": 42, "name": "Mid-term", "grade": "10", "subject": "Math", "totalMarks": 50}),
        )
        .unwrap();
        assert_eq!(saved.id, "42");
        assert_eq!(saved.grade, 10);
    }

    #[test]
    fn test_url_joins_base() {
        let config = Config {
            api_base_url: "http://localhost:9000/api/".to_string(),
            ..Default::default()
        };
        let client = PaperApiClient::new(&config).unwrap();
        assert_eq!(
            client.url("blueprint/7"),
            "http://localhost:9000/api/blueprint/7"
        );
    }

    #[tokio::test]
    #[ignore] // 需要可访问的后端服务
    async fn test_load_blueprint_live() {
        let config = Config::from_env();
        let client = PaperApiClient::new(&config).unwrap();
        let id = std::env::var("TEST_BLUEPRINT_ID").unwrap_or_else(|_| "1".to_string());
        let saved = client.load_blueprint(&id).await.unwrap();
        assert_eq!(saved.id, id);
    }
}
