//! FINREP Risk: ratio calculation and risk scoring
//!
//! ```text
//! Statements → compute_ratios → RatioSet ─┐
//! Compliance ─────────────────────────────┼→ assess → RiskAssessment (1-10, LOW/MEDIUM/HIGH)
//! Market sentiment ───────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use finrep_core::{BalanceSheet, ComplianceResult, ComplianceStatus, IncomeStatement, MarketSentiment, RiskLevel};
//! use finrep_risk::{assess, compute_ratios};
//!
//! let income = IncomeStatement { revenue: 1_000.0, net_income: 250.0, ..Default::default() };
//! let balance = BalanceSheet { assets: 2_000.0, liabilities: 800.0, equity: 1_200.0, ..Default::default() };
//! let ratios = compute_ratios(&income, &balance);
//!
//! let compliance = ComplianceResult { status: ComplianceStatus::Compliant, ..Default::default() };
//! let assessment = assess(&ratios, &compliance, MarketSentiment::Neutral);
//! assert_eq!(assessment.risk_level, RiskLevel::Medium);
//! ```

pub mod ratios;
pub mod risk;

pub use ratios::{compute_ratios, round_to, BALANCE_PRECISION, PROFITABILITY_PRECISION};
pub use risk::{assess, RiskCalculator, RiskWeights};
