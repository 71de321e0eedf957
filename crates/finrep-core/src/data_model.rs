//! Data Model: statements, ratios, compliance, market, risk, quality, report
//!
//! Every payload a stage can produce is defined here so that the scoring
//! crates, the renderer and the runner all agree on one canonical shape.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// COMPANY & DOCUMENTS
// ============================================================================

/// The company a workflow run analyses
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyProfile {
    pub name: String,
    pub tickers: Vec<String>,
    pub sector: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fiscal_year_end: Option<String>,
}

impl CompanyProfile {
    pub fn new(name: impl Into<String>, sector: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sector: sector.into(),
            ..Default::default()
        }
    }

    pub fn with_tickers<I, S>(mut self, tickers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tickers = tickers.into_iter().map(Into::into).collect();
        self
    }
}

// ============================================================================
// FINANCIAL STATEMENTS
// ============================================================================

/// Income statement figures. Missing fields deserialize as 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IncomeStatement {
    pub revenue: f64,
    pub cost_of_goods: f64,
    pub gross_profit: f64,
    pub operating_expenses: f64,
    pub operating_income: f64,
    pub net_income: f64,
}

/// Balance sheet figures. Missing fields deserialize as 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceSheet {
    pub assets: f64,
    pub liabilities: f64,
    pub equity: f64,
    pub cash: f64,
    pub receivables: f64,
    pub inventory: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CashFlow {
    pub operating: f64,
    pub investing: f64,
    pub financing: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancialStatements {
    pub income: IncomeStatement,
    pub balance: BalanceSheet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cash_flow: Option<CashFlow>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentMetadata {
    pub pages: u32,
    pub language: String,
    pub document_count: usize,
}

/// Output of the extraction stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionOutput {
    pub financial_statements: FinancialStatements,
    pub disclosures: Vec<String>,
    pub metadata: DocumentMetadata,
    /// Extractor confidence (0.0 to 1.0)
    pub extraction_confidence: f64,
    /// Narrative annotations from the reasoning service
    pub insights: String,
}

// ============================================================================
// RATIOS
// ============================================================================

/// Net margin assumed when revenue is zero; sits inside the neutral risk band.
pub const NEUTRAL_NET_MARGIN: f64 = 0.20;

/// Debt-to-equity assumed when equity is zero; sits inside the neutral risk band.
pub const NEUTRAL_DEBT_TO_EQUITY: f64 = 1.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfitabilityRatios {
    pub net_margin: Option<f64>,
    pub return_on_assets: Option<f64>,
    pub return_on_equity: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LiquidityRatios {
    pub current_ratio: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeverageRatios {
    pub debt_to_equity: Option<f64>,
}

/// Derived ratios. A ratio is `None` when its denominator was not positive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatioSet {
    pub profitability: ProfitabilityRatios,
    pub liquidity: LiquidityRatios,
    pub leverage: LeverageRatios,
    /// Names of ratios that were undefined and left to their neutral default
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub defaults_applied: Vec<String>,
}

impl RatioSet {
    /// Net margin, or [`NEUTRAL_NET_MARGIN`] when undefined
    pub fn net_margin_or_neutral(&self) -> f64 {
        self.profitability.net_margin.unwrap_or(NEUTRAL_NET_MARGIN)
    }

    /// Debt-to-equity, or [`NEUTRAL_DEBT_TO_EQUITY`] when undefined
    pub fn debt_to_equity_or_neutral(&self) -> f64 {
        self.leverage.debt_to_equity.unwrap_or(NEUTRAL_DEBT_TO_EQUITY)
    }
}

/// Output of the financial analysis stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialAnalysis {
    pub ratios: RatioSet,
    pub narrative: String,
}

// ============================================================================
// COMPLIANCE
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceStatus {
    Compliant,
    NonCompliant,
    #[default]
    Pending,
}

impl ComplianceStatus {
    /// Parse a service label. Unrecognised labels map to `Pending`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "compliant" => ComplianceStatus::Compliant,
            "non_compliant" | "non-compliant" | "noncompliant" => ComplianceStatus::NonCompliant,
            _ => ComplianceStatus::Pending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ComplianceStatus::Compliant => "compliant",
            ComplianceStatus::NonCompliant => "non_compliant",
            ComplianceStatus::Pending => "pending",
        }
    }
}

impl std::fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Regulatory compliance outcome
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplianceResult {
    pub status: ComplianceStatus,
    pub violations: Vec<String>,
    pub warnings: Vec<String>,
    pub recommendations: Vec<String>,
    pub regulations_checked: Vec<String>,
    /// Score in [0, 1]
    pub compliance_score: f64,
}

impl ComplianceResult {
    pub fn is_compliant(&self) -> bool {
        self.status == ComplianceStatus::Compliant
    }
}

// ============================================================================
// MARKET
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketSentiment {
    Bullish,
    #[default]
    Neutral,
    Bearish,
}

impl MarketSentiment {
    /// Parse a service label. Unrecognised labels map to `Neutral`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "bullish" => MarketSentiment::Bullish,
            "bearish" => MarketSentiment::Bearish,
            _ => MarketSentiment::Neutral,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MarketSentiment::Bullish => "bullish",
            MarketSentiment::Neutral => "neutral",
            MarketSentiment::Bearish => "bearish",
        }
    }
}

impl std::fmt::Display for MarketSentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceQuote {
    pub current_price: f64,
    pub daily_change: f64,
    pub volume: u64,
    pub pe_ratio: f64,
    pub market_cap: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectorData {
    pub sector: String,
    pub avg_pe: f64,
    pub sector_growth: f64,
    pub ytd_performance: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Competitor {
    pub name: String,
    pub market_share: f64,
    pub stock_change: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacroIndicators {
    pub interest_rate: f64,
    pub inflation: f64,
    pub gdp_growth: f64,
    pub unemployment: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub sentiment: MarketSentiment,
    pub price_data: BTreeMap<String, PriceQuote>,
    pub sector: SectorData,
    pub competitors: Vec<Competitor>,
    pub macro_indicators: MacroIndicators,
}

/// Output of the market context stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketAnalysis {
    pub snapshot: MarketSnapshot,
    pub narrative: String,
}

// ============================================================================
// RISK
// ============================================================================

/// Discrete risk level derived from a 1-10 score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    /// score < 4
    #[default]
    Low,
    /// 4 <= score < 7
    Medium,
    /// score >= 7
    High,
}

impl RiskLevel {
    /// Get risk level from a score on the 1-10 scale
    pub fn from_score(score: f64) -> Self {
        if score >= 7.0 {
            RiskLevel::High
        } else if score >= 4.0 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "LOW"),
            RiskLevel::Medium => write!(f, "MEDIUM"),
            RiskLevel::High => write!(f, "HIGH"),
        }
    }
}

/// Snapshot of the signals the risk score was computed from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskFactors {
    pub compliance_issues: usize,
    pub warnings_count: usize,
    pub financial_leverage: f64,
    pub profitability: f64,
    pub market_sentiment: MarketSentiment,
}

/// One rule that moved the score away from the base
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAdjustment {
    pub name: String,
    pub delta: f64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Score clamped to [1, 10]
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub risk_factors: RiskFactors,
    #[serde(default)]
    pub adjustments: Vec<RiskAdjustment>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

/// Output of the risk assessment stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAnalysis {
    pub assessment: RiskAssessment,
    pub narrative: String,
}

// ============================================================================
// QUALITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    /// True iff `issues` is empty
    pub passed: bool,
    pub issues: Vec<String>,
    /// Confidence in [0.5, 0.95]
    pub confidence_score: f64,
}

/// Output of the quality control stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReview {
    pub report: QualityReport,
    pub narrative: String,
}

// ============================================================================
// REPORT
// ============================================================================

/// Where the rendered report ended up. `url` is never empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportReference {
    pub report_id: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub txt_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_path: Option<String>,
    /// Report URL returned by the reporting service, when it accepted the report
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_url: Option<String>,
    /// Set when the artifacts could not be written as requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degraded: Option<String>,
}

/// Output of the report generation stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportOutput {
    pub reference: ReportReference,
    pub executive_summary: String,
    pub generated_at: DateTime<Utc>,
}
