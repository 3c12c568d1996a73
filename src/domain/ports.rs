use crate::domain::model::RawPayload;
use crate::utils::error::Result;
use async_trait::async_trait;

/// 查詢提交協作者：送出自由文字查詢，非同步取回原始酬載。
/// 核心不處理重試或逾時，失敗直接以 TransportError 浮出。
#[async_trait]
pub trait QueryService: Send + Sync {
    async fn submit(&self, query: &str) -> Result<RawPayload>;
}

pub trait ConfigProvider: Send + Sync {
    fn endpoint(&self) -> &str;
    fn timeout_seconds(&self) -> u64;
}
