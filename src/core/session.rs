use crate::core::parser::ResponseParser;
use crate::core::sorter::DisplayState;
use crate::domain::model::{NormalizedResult, RawPayload, Record};
use crate::domain::ports::QueryService;
use crate::utils::error::Result;

/// 套用回應後的結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// 回應已正規化並取代展示狀態
    Applied,
    /// 較舊查詢的遲到回應，已捨棄，展示狀態不變
    Stale,
}

/// 查詢會話：驅動提交協作者、正規化回應、持有唯一的展示狀態。
///
/// 每次提交配發一個遞增序號票；套用回應時比對票號，
/// 舊查詢的遲到回應不得覆蓋新查詢的結果。
pub struct QuerySession<S: QueryService> {
    service: S,
    parser: ResponseParser,
    next_ticket: u64,
    applied_ticket: u64,
    result: Option<NormalizedResult>,
    display: Option<DisplayState>,
}

impl<S: QueryService> QuerySession<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            parser: ResponseParser::new(),
            next_ticket: 0,
            applied_ticket: 0,
            result: None,
            display: None,
        }
    }

    /// 配發一張提交序號票
    pub fn begin(&mut self) -> u64 {
        self.next_ticket += 1;
        self.next_ticket
    }

    /// 正規化酬載並安裝新的展示狀態；票號比已套用者舊則捨棄。
    pub fn apply(&mut self, ticket: u64, payload: &RawPayload) -> Outcome {
        if ticket <= self.applied_ticket {
            tracing::warn!(
                "Discarding stale response: ticket {} <= applied {}",
                ticket,
                self.applied_ticket
            );
            return Outcome::Stale;
        }

        let result = self.parser.normalize(payload);
        tracing::info!(
            "Applied response for ticket {}: {} rows, {} columns",
            ticket,
            result.rows.len(),
            result.columns.len()
        );

        self.applied_ticket = ticket;
        self.display = Some(DisplayState::new(result.rows.clone()));
        self.result = Some(result);
        Outcome::Applied
    }

    /// 提交查詢並在解析完成時套用回應。
    /// 傳輸失敗時展示狀態保持不變，錯誤原樣浮出。
    pub async fn submit(&mut self, query: &str) -> Result<Outcome> {
        let ticket = self.begin();
        tracing::debug!("Submitting query (ticket {}): {}", ticket, query);
        let payload = self.service.submit(query).await?;
        Ok(self.apply(ticket, &payload))
    }

    pub fn result(&self) -> Option<&NormalizedResult> {
        self.result.as_ref()
    }

    /// 目前顯示順序的列；尚無結果時為空
    pub fn current_rows(&self) -> &[Record] {
        self.display
            .as_ref()
            .map(DisplayState::current_rows)
            .unwrap_or_default()
    }

    pub fn display(&self) -> Option<&DisplayState> {
        self.display.as_ref()
    }

    /// 委派給展示狀態的三態排序；尚無結果時不動作
    pub fn sort_by(&mut self, column: &str) -> &[Record] {
        match self.display.as_mut() {
            Some(display) => display.sort_by(column),
            None => &[],
        }
    }

    pub fn reset_sort(&mut self) -> &[Record] {
        match self.display.as_mut() {
            Some(display) => display.reset_sort(),
            None => &[],
        }
    }
}
