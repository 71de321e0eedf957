//! FINREP Quality: confidence scoring for a completed set of stage results
//!
//! # Example
//!
//! ```
//! use finrep_core::{CompanyProfile, StageKind, StageResult, WorkflowContext};
//! use finrep_quality::review;
//!
//! let mut ctx = WorkflowContext::new("FINWF-1", CompanyProfile::new("Acme", "Technology"), vec![]);
//! ctx.record(StageKind::MarketContext, StageResult::error("timeout", None));
//!
//! let report = review(&ctx);
//! assert!(!report.passed);
//! assert_eq!(report.confidence_score, 0.85);
//! ```

pub mod policy;
pub mod review;

pub use policy::{ConfidencePolicy, PolicyError};
pub use review::{review, Finding, QualityEngine};
