use crate::prompts::MARKET_TASK;
use crate::{recover, Collaborators};
use async_trait::async_trait;
use finrep_core::{
    analyze, FinrepError, MarketAnalysis, MarketSnapshot, Stage, StageKind, StagePayload,
    StageResult, WorkflowContext,
};
use finrep_tools::service::GET_MARKET_CONTEXT;
use finrep_tools::{MarketResponse, ServiceName};
use serde_json::json;

const DEFAULT_SYMBOL: &str = "TECH";
const DEFAULT_SECTOR: &str = "Technology";
const TIMEFRAME: &str = "last_30_days";

/// Stage 4: market data and sentiment for the company's tickers
pub struct MarketContextStage {
    collaborators: Collaborators,
}

impl MarketContextStage {
    pub fn new(collaborators: Collaborators) -> Self {
        Self { collaborators }
    }
}

#[async_trait]
impl Stage for MarketContextStage {
    fn kind(&self) -> StageKind {
        StageKind::MarketContext
    }

    async fn run(&self, ctx: &WorkflowContext) -> Result<StageResult, FinrepError> {
        let symbols = if ctx.company.tickers.is_empty() {
            vec![DEFAULT_SYMBOL.to_string()]
        } else {
            ctx.company.tickers.clone()
        };
        let sector = if ctx.company.sector.is_empty() {
            DEFAULT_SECTOR
        } else {
            ctx.company.sector.as_str()
        };

        let params = json!({
            "symbols": symbols,
            "sector": sector,
            "timeframe": TIMEFRAME,
        });

        let snapshot: MarketSnapshot = match self
            .collaborators
            .tools
            .invoke_as::<MarketResponse>(ServiceName::Market, GET_MARKET_CONTEXT, params)
            .await
        {
            Ok(response) => response.into(),
            Err(e) => return Ok(recover(self.kind(), e)),
        };

        let data = format!(
            "Sector: {}\nSector average P/E: {}\nSector growth: {}\nSentiment: {}\nCompetitors: {}",
            snapshot.sector.sector,
            snapshot.sector.avg_pe,
            snapshot.sector.sector_growth,
            snapshot.sentiment,
            snapshot.competitors.len(),
        );
        let narrative = analyze(self.collaborators.reasoning.as_ref(), MARKET_TASK, &data).await;

        Ok(StageResult::success(StagePayload::MarketContext(
            MarketAnalysis { snapshot, narrative },
        )))
    }
}
