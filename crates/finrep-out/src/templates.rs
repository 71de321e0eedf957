//! Report template loading
//!
//! Templates live in a YAML file of named handlebars templates. The stock
//! file is compiled into the crate; a file on disk can replace it.

use crate::error::RenderError;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Template producing the HTML document
pub const HTML_TEMPLATE: &str = "report_html";

/// Template producing the plain-text report
pub const TEXT_TEMPLATE: &str = "report_txt";

const BUILTIN_TEMPLATES: &str = include_str!("../../../templates/report-templates.yaml");

/// Top-level templates file structure
#[derive(Debug, Clone, Deserialize)]
pub struct TemplatesFile {
    pub version: String,
    pub templates: BTreeMap<String, Template>,
}

/// A single template definition
#[derive(Debug, Clone, Deserialize)]
pub struct Template {
    pub description: String,
    pub template: String,
}

impl TemplatesFile {
    /// The templates shipped with the crate
    pub fn builtin() -> Result<Self, RenderError> {
        Self::from_yaml(BUILTIN_TEMPLATES)
    }

    /// Load templates from a YAML file
    pub fn load(path: &str) -> Result<Self, RenderError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| RenderError::Template(format!("failed to read {}: {}", path, e)))?;
        Self::from_yaml(&content)
    }

    /// Parse templates from YAML content. Both report templates must be present.
    pub fn from_yaml(yaml: &str) -> Result<Self, RenderError> {
        let file: TemplatesFile =
            serde_yaml::from_str(yaml).map_err(|e| RenderError::Template(e.to_string()))?;

        for required in [HTML_TEMPLATE, TEXT_TEMPLATE] {
            if !file.templates.contains_key(required) {
                return Err(RenderError::MissingTemplate(required.to_string()));
            }
        }
        Ok(file)
    }

    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    pub fn list_templates(&self) -> Vec<&str> {
        self.templates.keys().map(|s| s.as_str()).collect()
    }
}
