use crate::domain::model::RawPayload;
use crate::domain::ports::{ConfigProvider, QueryService};
use crate::utils::error::{QueryError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

#[derive(Serialize)]
struct QueryBody<'a> {
    query: &'a str,
}

/// 以 HTTP POST 對分析服務提交查詢的協作者實作。
/// 線路形狀：送出 {"query": ...}，回應本體為 {"response": ...}，
/// 內層值（字串或物件）即為交給正規化的原始酬載。
pub struct HttpQueryService {
    client: Client,
    endpoint: String,
}

impl HttpQueryService {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: Client::new(),
            endpoint,
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds()))
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint().to_string(),
        })
    }
}

#[async_trait]
impl QueryService for HttpQueryService {
    async fn submit(&self, query: &str) -> Result<RawPayload> {
        tracing::debug!("POST {} query: {}", self.endpoint, query);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&QueryBody { query })
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Query response status: {}", status);

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(QueryError::ServerError {
                status: status.as_u16(),
                message,
            });
        }

        let body: Value = response.json().await?;

        // 解開外層 response 欄位；缺少時整個本體就是酬載
        let payload = match body {
            Value::Object(mut obj) => obj.remove("response").unwrap_or(Value::Object(obj)),
            other => other,
        };

        Ok(payload)
    }
}
