//! Artifact persistence
//!
//! Writes `{report_id}.html|txt|json` into the reports directory. When any of
//! those writes fails a minimal HTML document carrying the data export is
//! written instead; when that fails too the reference points at the in-memory
//! report. The returned reference always has a non-empty `url`.

use crate::renderer::RenderedReport;
use finrep_core::ReportReference;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Write the three artifacts, degrading as far as needed
pub fn persist(rendered: &RenderedReport, dir: &Path) -> ReportReference {
    let report_id = rendered.report_id.clone();

    let full_error = match write_artifacts(rendered, dir) {
        Ok((html, txt, json)) => {
            tracing::info!(%report_id, dir = %dir.display(), "report artifacts written");
            return ReportReference {
                url: file_url(&html),
                html_path: Some(display(&html)),
                txt_path: Some(display(&txt)),
                json_path: Some(display(&json)),
                report_id,
                ..Default::default()
            };
        }
        Err(e) => e,
    };

    tracing::warn!(%report_id, error = %full_error, "writing report artifacts failed, trying minimal document");

    let minimal_error = match write_minimal(rendered, dir) {
        Ok(html) => {
            return ReportReference {
                url: file_url(&html),
                html_path: Some(display(&html)),
                degraded: Some(format!("minimal report only: {}", full_error)),
                report_id,
                ..Default::default()
            };
        }
        Err(e) => e,
    };

    tracing::error!(%report_id, error = %minimal_error, "minimal report could not be written");
    ReportReference {
        url: format!("memory://{}", report_id),
        degraded: Some(format!(
            "report kept in memory: {}; minimal document: {}",
            full_error, minimal_error
        )),
        report_id,
        ..Default::default()
    }
}

fn write_artifacts(
    rendered: &RenderedReport,
    dir: &Path,
) -> io::Result<(PathBuf, PathBuf, PathBuf)> {
    fs::create_dir_all(dir)?;

    let html = dir.join(format!("{}.html", rendered.report_id));
    let txt = dir.join(format!("{}.txt", rendered.report_id));
    let json = dir.join(format!("{}.json", rendered.report_id));

    fs::write(&html, &rendered.document)?;
    fs::write(&txt, &rendered.text)?;
    fs::write(&json, &rendered.data)?;

    Ok((html, txt, json))
}

fn write_minimal(rendered: &RenderedReport, dir: &Path) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.html", rendered.report_id));
    fs::write(&path, minimal_document(&rendered.report_id, &rendered.data))?;
    Ok(path)
}

/// Bare HTML page with the data export in a `<pre>` block
pub fn minimal_document(report_id: &str, data: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>Financial Report {id}</title></head>\n\
         <body>\n<h1>Financial Report {id}</h1>\n<pre>{data}</pre>\n</body>\n</html>\n",
        id = handlebars::html_escape(report_id),
        data = handlebars::html_escape(data),
    )
}

fn absolute(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

fn display(path: &Path) -> String {
    absolute(path).display().to_string()
}

fn file_url(path: &Path) -> String {
    format!("file://{}", display(path))
}
