//! FINREP-OUT: report rendering and persistence
//!
//! A `ReportModel` is built once from the workflow context and projected into
//! three artifacts: an HTML dashboard, a plain-text report and a JSON export.
//!
//! # Example
//!
//! ```ignore
//! use finrep_out::{persist, render, ReportModel};
//!
//! let model = ReportModel::from_context(&ctx, "report_20240101_120000", summary, now);
//! let rendered = render(&model)?;
//! let reference = persist(&rendered, std::path::Path::new("./generated_reports"));
//! println!("{}", reference.url);
//! ```

pub mod error;
pub mod model;
pub mod persist;
pub mod renderer;
pub mod templates;

pub use error::RenderError;
pub use model::{ArtifactNames, ReportModel, StageOutcome};
pub use persist::{minimal_document, persist};
pub use renderer::{RenderedReport, ReportRenderer};
pub use templates::{TemplatesFile, HTML_TEMPLATE, TEXT_TEMPLATE};

use once_cell::sync::Lazy;

static BUILTIN: Lazy<Result<ReportRenderer, String>> =
    Lazy::new(|| ReportRenderer::builtin().map_err(|e| e.to_string()));

/// Render with the built-in templates
pub fn render(model: &ReportModel) -> Result<RenderedReport, RenderError> {
    match BUILTIN.as_ref() {
        Ok(renderer) => renderer.render(model),
        Err(e) => Err(RenderError::Template(e.clone())),
    }
}
