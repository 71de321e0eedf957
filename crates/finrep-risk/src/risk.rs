//! Risk scoring for an analysed company
//!
//! Aggregates compliance, profitability, leverage and market sentiment into
//! a score on the 1-10 scale. The rule set is additive and order-independent.

use finrep_core::{
    ComplianceResult, MarketSentiment, RatioSet, RiskAdjustment, RiskAssessment, RiskFactors,
    RiskLevel,
};

/// Rule weights and thresholds
#[derive(Debug, Clone, PartialEq)]
pub struct RiskWeights {
    pub base: f64,
    /// Added when status is anything other than compliant
    pub non_compliant_penalty: f64,
    pub per_violation: f64,
    pub per_warning: f64,
    pub low_margin_threshold: f64,
    pub low_margin_penalty: f64,
    pub high_margin_threshold: f64,
    pub high_margin_credit: f64,
    pub high_leverage_threshold: f64,
    pub high_leverage_penalty: f64,
    pub low_leverage_threshold: f64,
    pub low_leverage_credit: f64,
    pub bearish_penalty: f64,
    pub bullish_credit: f64,
    pub min_score: f64,
    pub max_score: f64,
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            base: 5.0,
            non_compliant_penalty: 2.0,
            per_violation: 1.5,
            per_warning: 0.5,
            low_margin_threshold: 0.10,
            low_margin_penalty: 1.0,
            high_margin_threshold: 0.30,
            high_margin_credit: 1.0,
            high_leverage_threshold: 2.0,
            high_leverage_penalty: 2.0,
            low_leverage_threshold: 0.5,
            low_leverage_credit: 1.0,
            bearish_penalty: 1.0,
            bullish_credit: 1.0,
            min_score: 1.0,
            max_score: 10.0,
        }
    }
}

/// Risk calculator with configurable weights
#[derive(Debug, Clone, Default)]
pub struct RiskCalculator {
    pub weights: RiskWeights,
}

impl RiskCalculator {
    pub fn new(weights: RiskWeights) -> Self {
        Self { weights }
    }

    /// Score a company. Undefined ratios fall back to their neutral defaults.
    pub fn calculate(
        &self,
        ratios: &RatioSet,
        compliance: &ComplianceResult,
        sentiment: MarketSentiment,
    ) -> RiskAssessment {
        let w = &self.weights;
        let mut adjustments = Vec::new();

        if !compliance.is_compliant() {
            adjustments.push(RiskAdjustment {
                name: "compliance_status".to_string(),
                delta: w.non_compliant_penalty,
                description: format!("Compliance status is {}", compliance.status),
            });
        }

        let violations = compliance.violations.len();
        if violations > 0 {
            adjustments.push(RiskAdjustment {
                name: "violations".to_string(),
                delta: w.per_violation * violations as f64,
                description: format!("{} regulatory violation(s)", violations),
            });
        }

        let warnings = compliance.warnings.len();
        if warnings > 0 {
            adjustments.push(RiskAdjustment {
                name: "warnings".to_string(),
                delta: w.per_warning * warnings as f64,
                description: format!("{} compliance warning(s)", warnings),
            });
        }

        let net_margin = ratios.net_margin_or_neutral();
        if net_margin < w.low_margin_threshold {
            adjustments.push(RiskAdjustment {
                name: "low_margin".to_string(),
                delta: w.low_margin_penalty,
                description: format!("Net margin {:.1}% is thin", net_margin * 100.0),
            });
        } else if net_margin > w.high_margin_threshold {
            adjustments.push(RiskAdjustment {
                name: "high_margin".to_string(),
                delta: -w.high_margin_credit,
                description: format!("Net margin {:.1}% is strong", net_margin * 100.0),
            });
        }

        let leverage = ratios.debt_to_equity_or_neutral();
        if leverage > w.high_leverage_threshold {
            adjustments.push(RiskAdjustment {
                name: "high_leverage".to_string(),
                delta: w.high_leverage_penalty,
                description: format!("Debt-to-equity {:.2} is elevated", leverage),
            });
        } else if leverage < w.low_leverage_threshold {
            adjustments.push(RiskAdjustment {
                name: "low_leverage".to_string(),
                delta: -w.low_leverage_credit,
                description: format!("Debt-to-equity {:.2} is conservative", leverage),
            });
        }

        match sentiment {
            MarketSentiment::Bearish => adjustments.push(RiskAdjustment {
                name: "market_sentiment".to_string(),
                delta: w.bearish_penalty,
                description: "Market sentiment is bearish".to_string(),
            }),
            MarketSentiment::Bullish => adjustments.push(RiskAdjustment {
                name: "market_sentiment".to_string(),
                delta: -w.bullish_credit,
                description: "Market sentiment is bullish".to_string(),
            }),
            MarketSentiment::Neutral => {}
        }

        let raw = w.base + adjustments.iter().map(|a| a.delta).sum::<f64>();
        let risk_score = raw.clamp(w.min_score, w.max_score);
        let risk_level = RiskLevel::from_score(risk_score);
        let recommendations = recommendations(&adjustments, risk_level);

        RiskAssessment {
            risk_score,
            risk_level,
            risk_factors: RiskFactors {
                compliance_issues: violations,
                warnings_count: warnings,
                financial_leverage: leverage,
                profitability: net_margin,
                market_sentiment: sentiment,
            },
            adjustments,
            recommendations,
        }
    }
}

fn recommendations(adjustments: &[RiskAdjustment], level: RiskLevel) -> Vec<String> {
    let mut recs = Vec::new();

    match level {
        RiskLevel::Low => {}
        RiskLevel::Medium => {
            recs.push("Review flagged items before publishing the report".to_string());
        }
        RiskLevel::High => {
            recs.push("Escalate to a senior analyst before publishing the report".to_string());
            recs.push("Document mitigation plans for each risk factor".to_string());
        }
    }

    for adjustment in adjustments {
        let rec = match adjustment.name.as_str() {
            "compliance_status" | "violations" => Some("Remediate outstanding regulatory findings"),
            "high_leverage" => Some("Review debt structure and covenant headroom"),
            "low_margin" => Some("Investigate drivers of margin compression"),
            _ => None,
        };
        if let Some(rec) = rec {
            if !recs.iter().any(|r| r == rec) {
                recs.push(rec.to_string());
            }
        }
    }

    recs
}

/// Convenience function to score with the default weights
pub fn assess(
    ratios: &RatioSet,
    compliance: &ComplianceResult,
    sentiment: MarketSentiment,
) -> RiskAssessment {
    RiskCalculator::default().calculate(ratios, compliance, sentiment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use finrep_core::{ComplianceStatus, LeverageRatios, ProfitabilityRatios};

    fn ratios(net_margin: f64, debt_to_equity: f64) -> RatioSet {
        RatioSet {
            profitability: ProfitabilityRatios {
                net_margin: Some(net_margin),
                ..Default::default()
            },
            leverage: LeverageRatios {
                debt_to_equity: Some(debt_to_equity),
            },
            ..Default::default()
        }
    }

    fn compliance(status: ComplianceStatus, violations: usize, warnings: usize) -> ComplianceResult {
        ComplianceResult {
            status,
            violations: (0..violations).map(|i| format!("violation {}", i)).collect(),
            warnings: (0..warnings).map(|i| format!("warning {}", i)).collect(),
            compliance_score: 0.9,
            ..Default::default()
        }
    }

    #[test]
    fn test_worst_case_clamps_to_ten() {
        let assessment = assess(
            &ratios(0.05, 2.5),
            &compliance(ComplianceStatus::NonCompliant, 1, 2),
            MarketSentiment::Bearish,
        );
        assert_eq!(assessment.risk_score, 10.0);
        assert_eq!(assessment.risk_level, RiskLevel::High);
        assert_eq!(assessment.risk_factors.compliance_issues, 1);
        assert_eq!(assessment.risk_factors.warnings_count, 2);
        assert_eq!(assessment.adjustments.len(), 6);
    }

    #[test]
    fn test_neutral_inputs_stay_at_base() {
        let assessment = assess(
            &ratios(0.2, 1.0),
            &compliance(ComplianceStatus::Compliant, 0, 0),
            MarketSentiment::Neutral,
        );
        assert_eq!(assessment.risk_score, 5.0);
        assert_eq!(assessment.risk_level, RiskLevel::Medium);
        assert!(assessment.adjustments.is_empty());
    }

    #[test]
    fn test_undefined_ratios_use_neutral_defaults() {
        let assessment = assess(
            &RatioSet::default(),
            &compliance(ComplianceStatus::Compliant, 0, 0),
            MarketSentiment::Neutral,
        );
        assert_eq!(assessment.risk_score, 5.0);
        assert_eq!(assessment.risk_factors.profitability, finrep_core::NEUTRAL_NET_MARGIN);
        assert_eq!(
            assessment.risk_factors.financial_leverage,
            finrep_core::NEUTRAL_DEBT_TO_EQUITY
        );
    }

    #[test]
    fn test_best_case() {
        let assessment = assess(
            &ratios(0.4, 0.2),
            &compliance(ComplianceStatus::Compliant, 0, 0),
            MarketSentiment::Bullish,
        );
        assert_eq!(assessment.risk_score, 2.0);
        assert_eq!(assessment.risk_level, RiskLevel::Low);
        assert!(assessment.recommendations.is_empty());
    }

    #[test]
    fn test_level_boundaries_are_exact() {
        // 5.0 + 4 warnings * 0.5 = 7.0
        let seven = assess(
            &ratios(0.2, 1.0),
            &compliance(ComplianceStatus::Compliant, 0, 4),
            MarketSentiment::Neutral,
        );
        assert_eq!(seven.risk_score, 7.0);
        assert_eq!(seven.risk_level, RiskLevel::High);

        // 5.0 - 1.0 (bullish) = 4.0
        let four = assess(
            &ratios(0.2, 1.0),
            &compliance(ComplianceStatus::Compliant, 0, 0),
            MarketSentiment::Bullish,
        );
        assert_eq!(four.risk_score, 4.0);
        assert_eq!(four.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn test_pending_counts_as_non_compliant() {
        let assessment = assess(
            &ratios(0.2, 1.0),
            &compliance(ComplianceStatus::Pending, 0, 0),
            MarketSentiment::Neutral,
        );
        assert_eq!(assessment.risk_score, 7.0);
    }

    #[test]
    fn test_monotonic_in_violations_and_warnings() {
        let mut previous = 0.0;
        for violations in 0..8 {
            let score = assess(
                &ratios(0.2, 1.0),
                &compliance(ComplianceStatus::NonCompliant, violations, 1),
                MarketSentiment::Bullish,
            )
            .risk_score;
            assert!(score >= previous);
            previous = score;
        }

        let mut previous = 0.0;
        for warnings in 0..15 {
            let score = assess(
                &ratios(0.4, 0.3),
                &compliance(ComplianceStatus::Compliant, 0, warnings),
                MarketSentiment::Bullish,
            )
            .risk_score;
            assert!(score >= previous);
            assert!((1.0..=10.0).contains(&score));
            previous = score;
        }
    }

    #[test]
    fn test_custom_weights_clamp_at_floor() {
        let calculator = RiskCalculator::new(RiskWeights {
            base: 1.0,
            ..Default::default()
        });
        let assessment = calculator.calculate(
            &ratios(0.4, 0.2),
            &compliance(ComplianceStatus::Compliant, 0, 0),
            MarketSentiment::Bullish,
        );
        assert_eq!(assessment.risk_score, 1.0);
        assert_eq!(assessment.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_high_risk_recommendations() {
        let assessment = assess(
            &ratios(0.05, 3.0),
            &compliance(ComplianceStatus::NonCompliant, 2, 0),
            MarketSentiment::Neutral,
        );
        assert_eq!(assessment.risk_level, RiskLevel::High);
        assert!(assessment
            .recommendations
            .iter()
            .any(|r| r.contains("regulatory findings")));
        let unique: std::collections::HashSet<_> = assessment.recommendations.iter().collect();
        assert_eq!(unique.len(), assessment.recommendations.len());
    }
}
