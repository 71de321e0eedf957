//! Template rendering for reports.
//!
//! Uses Handlebars with custom helpers. Every helper prints "N/A" for a
//! missing value so absent stages never break a template:
//! - percent: 0.248 -> "24.8%" (optional decimals, default 0)
//! - fixed: fixed-point number (optional decimals, default 2)
//! - signed: fixed-point number with an explicit sign
//! - money: "$10,500,000"
//! - upper: upper-case a string
//! - count: length of an array
//! - join: join an array with a separator
//! - default: value, or the fallback text when missing
//!
//! Templates are compiled twice: once with HTML escaping for the document and
//! once without for the plain-text report. Helpers that print caller or
//! service text pass it through the registry's escape function.

use handlebars::{
    no_escape, Context, Handlebars, Helper, HelperDef, HelperResult, Output, RenderContext,
};
use serde_json::Value;

use crate::error::RenderError;
use crate::model::ReportModel;
use crate::templates::{TemplatesFile, HTML_TEMPLATE, TEXT_TEMPLATE};

const NOT_AVAILABLE: &str = "N/A";

/// The three projections of one `ReportModel`
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedReport {
    pub report_id: String,
    pub document: String,
    pub text: String,
    /// Pretty-printed JSON of the model
    pub data: String,
}

/// Compiled renderer with registered helpers
pub struct ReportRenderer {
    html: Handlebars<'static>,
    text: Handlebars<'static>,
}

impl ReportRenderer {
    pub fn new(templates: &TemplatesFile) -> Result<Self, RenderError> {
        let html = registry(templates)?;
        let mut text = registry(templates)?;
        text.register_escape_fn(no_escape);
        Ok(Self { html, text })
    }

    /// Renderer over the templates shipped with the crate
    pub fn builtin() -> Result<Self, RenderError> {
        Self::new(&TemplatesFile::builtin()?)
    }

    /// Load from a templates file path
    pub fn load(path: &str) -> Result<Self, RenderError> {
        Self::new(&TemplatesFile::load(path)?)
    }

    /// Render a named template with HTML escaping
    pub fn render_template(&self, name: &str, data: &Value) -> Result<String, RenderError> {
        render_with(&self.html, name, data)
    }

    /// Render a named template as plain text, without escaping
    pub fn render_text(&self, name: &str, data: &Value) -> Result<String, RenderError> {
        render_with(&self.text, name, data)
    }

    /// Produce the HTML document, the text report and the data export
    pub fn render(&self, model: &ReportModel) -> Result<RenderedReport, RenderError> {
        let value = serde_json::to_value(model)?;
        Ok(RenderedReport {
            report_id: model.report_id.clone(),
            document: self.render_template(HTML_TEMPLATE, &value)?,
            text: self.render_text(TEXT_TEMPLATE, &value)?,
            data: serde_json::to_string_pretty(model)?,
        })
    }
}

fn registry(templates: &TemplatesFile) -> Result<Handlebars<'static>, RenderError> {
    let mut handlebars = Handlebars::new();
    handlebars.set_strict_mode(false);

    handlebars.register_helper("percent", Box::new(PercentHelper));
    handlebars.register_helper("fixed", Box::new(FixedHelper));
    handlebars.register_helper("signed", Box::new(SignedHelper));
    handlebars.register_helper("money", Box::new(MoneyHelper));
    handlebars.register_helper("upper", Box::new(UpperHelper));
    handlebars.register_helper("count", Box::new(CountHelper));
    handlebars.register_helper("join", Box::new(JoinHelper));
    handlebars.register_helper("default", Box::new(DefaultHelper));

    for (name, template) in &templates.templates {
        handlebars
            .register_template_string(name, &template.template)
            .map_err(|e| RenderError::Template(format!("{}: {}", name, e)))?;
    }

    Ok(handlebars)
}

fn render_with(
    handlebars: &Handlebars<'static>,
    name: &str,
    data: &Value,
) -> Result<String, RenderError> {
    if !handlebars.has_template(name) {
        return Err(RenderError::MissingTemplate(name.to_string()));
    }
    Ok(handlebars.render(name, data)?)
}

// ============================================================================
// Custom Helpers
// ============================================================================

fn number_param(h: &Helper, idx: usize) -> Option<f64> {
    h.param(idx).and_then(|v| v.value().as_f64())
}

/// Write free text through the registry's escape function
fn write_text(r: &Handlebars, out: &mut dyn Output, text: &str) -> HelperResult {
    out.write(&r.get_escape_fn()(text))?;
    Ok(())
}

fn decimals_param(h: &Helper, idx: usize, default: usize) -> usize {
    h.param(idx)
        .and_then(|v| v.value().as_u64())
        .map(|d| d as usize)
        .unwrap_or(default)
}

/// Format a ratio as a percentage
struct PercentHelper;

impl HelperDef for PercentHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _r: &'reg Handlebars<'reg>,
        _ctx: &'rc Context,
        _rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        match number_param(h, 0) {
            Some(value) => {
                let decimals = decimals_param(h, 1, 0);
                out.write(&format!("{:.*}%", decimals, value * 100.0))?;
            }
            None => out.write(NOT_AVAILABLE)?,
        }
        Ok(())
    }
}

struct FixedHelper;

impl HelperDef for FixedHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _r: &'reg Handlebars<'reg>,
        _ctx: &'rc Context,
        _rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        match number_param(h, 0) {
            Some(value) => {
                let decimals = decimals_param(h, 1, 2);
                out.write(&format!("{:.*}", decimals, value))?;
            }
            None => out.write(NOT_AVAILABLE)?,
        }
        Ok(())
    }
}

struct SignedHelper;

impl HelperDef for SignedHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _r: &'reg Handlebars<'reg>,
        _ctx: &'rc Context,
        _rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        match number_param(h, 0) {
            Some(value) => out.write(&format!("{:+.1}", value))?,
            None => out.write(NOT_AVAILABLE)?,
        }
        Ok(())
    }
}

/// Whole-dollar amount with thousands separators
struct MoneyHelper;

impl HelperDef for MoneyHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _r: &'reg Handlebars<'reg>,
        _ctx: &'rc Context,
        _rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        match number_param(h, 0) {
            Some(value) => out.write(&format_money(value))?,
            None => out.write(NOT_AVAILABLE)?,
        }
        Ok(())
    }
}

pub(crate) fn format_money(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0.0 {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

struct UpperHelper;

impl HelperDef for UpperHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        r: &'reg Handlebars<'reg>,
        _ctx: &'rc Context,
        _rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        match h.param(0).and_then(|v| v.value().as_str()) {
            Some(text) => write_text(r, out, &text.to_uppercase()),
            None => write_text(r, out, NOT_AVAILABLE),
        }
    }
}

struct CountHelper;

impl HelperDef for CountHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _r: &'reg Handlebars<'reg>,
        _ctx: &'rc Context,
        _rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let count = h
            .param(0)
            .and_then(|v| v.value().as_array())
            .map(Vec::len)
            .unwrap_or(0);
        out.write(&count.to_string())?;
        Ok(())
    }
}

/// Join an array with a separator
struct JoinHelper;

impl HelperDef for JoinHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        r: &'reg Handlebars<'reg>,
        _ctx: &'rc Context,
        _rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let separator = h
            .param(1)
            .and_then(|v| v.value().as_str())
            .unwrap_or(", ");

        if let Some(arr) = h.param(0).and_then(|v| v.value().as_array()) {
            let strings: Vec<String> = arr
                .iter()
                .map(|v| v.as_str().map(String::from).unwrap_or_else(|| v.to_string()))
                .collect();
            write_text(r, out, &strings.join(separator))?;
        }
        Ok(())
    }
}

/// Default value helper
struct DefaultHelper;

impl HelperDef for DefaultHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        r: &'reg Handlebars<'reg>,
        _ctx: &'rc Context,
        _rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let value = h.param(0).map(|v| v.value());
        let default = h.param(1).and_then(|v| v.value().as_str()).unwrap_or("");

        match value {
            Some(Value::String(s)) if !s.is_empty() => write_text(r, out, s),
            Some(v) if !v.is_null() && !v.is_string() => write_text(r, out, &v.to_string()),
            _ => write_text(r, out, default),
        }
    }
}
