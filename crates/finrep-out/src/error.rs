use thiserror::Error;

/// Errors that can occur while rendering a report
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("TEMPLATE/LOAD: {0}")]
    Template(String),

    #[error("TEMPLATE/MISSING: no template named '{0}'")]
    MissingTemplate(String),

    #[error("RENDER: {0}")]
    Render(#[from] handlebars::RenderError),

    #[error("EXPORT: {0}")]
    Export(#[from] serde_json::Error),
}
