//! Typed service responses
//!
//! Every field carries a default so a sparse payload still decodes; a field of
//! the wrong JSON type does not, and surfaces as `ToolError::Malformed`.

use finrep_core::{
    Competitor, ComplianceResult, ComplianceStatus, DocumentMetadata, ExtractionOutput,
    FinancialStatements, MacroIndicators, MarketSentiment, MarketSnapshot, PriceQuote, SectorData,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `extract_financial_data` response
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExtractionResponse {
    pub statements: FinancialStatements,
    pub disclosures: Vec<String>,
    pub metadata: DocumentMetadata,
    pub confidence: f64,
}

impl ExtractionResponse {
    pub fn into_output(self, insights: String) -> ExtractionOutput {
        ExtractionOutput {
            financial_statements: self.statements,
            disclosures: self.disclosures,
            metadata: self.metadata,
            extraction_confidence: clamp_unit(self.confidence),
            insights,
        }
    }
}

/// `check_regulatory_compliance` response. `status` is the compliance label.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ComplianceResponse {
    pub status: String,
    pub violations: Vec<String>,
    pub warnings: Vec<String>,
    pub recommendations: Vec<String>,
    pub regulations_checked: Vec<String>,
    pub compliance_score: f64,
}

impl From<ComplianceResponse> for ComplianceResult {
    fn from(resp: ComplianceResponse) -> Self {
        ComplianceResult {
            status: ComplianceStatus::from_label(&resp.status),
            violations: resp.violations,
            warnings: resp.warnings,
            recommendations: resp.recommendations,
            regulations_checked: resp.regulations_checked,
            compliance_score: clamp_unit(resp.compliance_score),
        }
    }
}

/// `get_market_context` response
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MarketResponse {
    pub sentiment: String,
    pub price_data: BTreeMap<String, PriceQuote>,
    pub sector_data: SectorData,
    pub competitors: Vec<Competitor>,
    pub macro_indicators: MacroIndicators,
}

impl From<MarketResponse> for MarketSnapshot {
    fn from(resp: MarketResponse) -> Self {
        MarketSnapshot {
            sentiment: MarketSentiment::from_label(&resp.sentiment),
            price_data: resp.price_data,
            sector: resp.sector_data,
            competitors: resp.competitors,
            macro_indicators: resp.macro_indicators,
        }
    }
}

/// `generate_financial_report` response
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PublishedReport {
    pub report_url: Option<String>,
    pub report_id: Option<String>,
    pub html_path: Option<String>,
    pub txt_path: Option<String>,
    pub json_path: Option<String>,
}

/// One entry of the `list_reports` response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportEntry {
    pub filename: String,
    pub size: String,
    pub modified: String,
    pub path: String,
}

/// `list_reports` response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportListing {
    pub reports: Vec<ReportEntry>,
    pub count: usize,
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_compliance_response_is_normalised() {
        let resp: ComplianceResponse = serde_json::from_value(json!({
            "status": "non_compliant",
            "violations": ["Missing auditor signature"],
            "compliance_score": 1.4,
            "timestamp": "2024-01-01T00:00:00"
        }))
        .unwrap();

        let result = ComplianceResult::from(resp);
        assert_eq!(result.status, ComplianceStatus::NonCompliant);
        assert_eq!(result.compliance_score, 1.0);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_unknown_labels_fall_back() {
        let resp: MarketResponse = serde_json::from_value(json!({
            "status": "success",
            "sentiment": "euphoric",
        }))
        .unwrap();
        let snapshot = MarketSnapshot::from(resp);
        assert_eq!(snapshot.sentiment, MarketSentiment::Neutral);
        assert!(snapshot.competitors.is_empty());
    }

    #[test]
    fn test_extraction_response_ignores_extra_fields() {
        let resp: ExtractionResponse = serde_json::from_value(json!({
            "status": "success",
            "statements": {
                "income": {"revenue": 100.0, "net_income": 10.0},
                "balance": {"assets": 50.0}
            },
            "metadata": {"pages": 3, "language": "en", "processed_date": "today"},
            "confidence": 0.96,
            "processing_time_ms": 1234
        }))
        .unwrap();

        let output = resp.into_output("insight".to_string());
        assert_eq!(output.financial_statements.income.revenue, 100.0);
        assert_eq!(output.financial_statements.balance.equity, 0.0);
        assert_eq!(output.metadata.pages, 3);
        assert_eq!(output.extraction_confidence, 0.96);
    }

    #[test]
    fn test_wrong_field_type_is_rejected() {
        let result = serde_json::from_value::<ExtractionResponse>(json!({
            "statements": "not an object"
        }));
        assert!(result.is_err());
    }
}
