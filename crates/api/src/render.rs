//! Document rendering for punch list and home owner manual exports.
//!
//! [`ReportRenderer`] turns a grouped report or a manual instance into a
//! downloadable document. [`HtmlRenderer`] produces self-contained HTML.

use std::fmt::Write as _;

use bluetape_core::manual::{default_sections, SECTION_IDS};
use bluetape_core::report::{GroupBy, ReportBucket, StatusCounts};
use bluetape_db::models::issue::IssueDetail;
use bluetape_db::models::manual::ManualInstance;
use bluetape_db::models::project::Project;
use serde::Serialize;
use serde_json::Value;

/// A grouped punch list, as previewed in JSON and rendered for export.
#[derive(Debug, Clone, Serialize)]
pub struct PunchListReport {
    pub project: Project,
    pub group_by: GroupBy,
    pub buckets: Vec<ReportBucket<IssueDetail>>,
    pub counts: StatusCounts,
}

/// Rendered bytes plus how to serve them.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub content_type: &'static str,
    /// File extension without the dot.
    pub extension: &'static str,
    pub bytes: Vec<u8>,
}

#[derive(Debug, thiserror::Error)]
#[error("Render failed: {0}")]
pub struct RenderError(String);

impl From<std::fmt::Error> for RenderError {
    fn from(e: std::fmt::Error) -> Self {
        Self(e.to_string())
    }
}

pub trait ReportRenderer: Send + Sync {
    fn render_punch_list(&self, report: &PunchListReport) -> Result<RenderedDocument, RenderError>;

    fn render_manual(
        &self,
        project: &Project,
        manual: &ManualInstance,
    ) -> Result<RenderedDocument, RenderError>;
}

// ---------------------------------------------------------------------------
// HTML
// ---------------------------------------------------------------------------

const STYLE: &str = "body{font-family:sans-serif;margin:2rem;color:#222}\
table{border-collapse:collapse;width:100%;margin-bottom:1.5rem}\
th,td{border:1px solid #ccc;padding:4px 8px;text-align:left;vertical-align:top}\
th{background:#1d4ed8;color:#fff}.high{color:#b91c1c;font-weight:bold}\
dl{margin:0}dt{font-weight:bold}dd{margin:0 0 .5rem 1rem}";

/// Renders exports as a single HTML page with inline styles.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlRenderer;

impl HtmlRenderer {
    fn finish(html: String) -> RenderedDocument {
        RenderedDocument {
            content_type: "text/html; charset=utf-8",
            extension: "html",
            bytes: html.into_bytes(),
        }
    }
}

impl ReportRenderer for HtmlRenderer {
    fn render_punch_list(&self, report: &PunchListReport) -> Result<RenderedDocument, RenderError> {
        let project = &report.project;
        let mut out = String::new();
        open_document(&mut out, &format!("Punch List - {}", project.name))?;

        write!(out, "<h1>Punch List: {}</h1>", escape(&project.name))?;
        write!(out, "<p>{}", escape(&project.address))?;
        if let Some(unit) = &project.unit {
            write!(out, ", Unit {}", escape(unit))?;
        }
        write!(out, "</p><p>Grouped by {}</p>", report.group_by)?;

        let c = &report.counts;
        write!(
            out,
            "<table><tr><th>Total</th><th>Open</th><th>Assigned</th><th>In progress</th>\
             <th>Ready for reinspect</th><th>Closed</th><th>High priority open</th></tr>\
             <tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr></table>",
            c.total_issues,
            c.open_issues,
            c.assigned_issues,
            c.in_progress_issues,
            c.ready_for_reinspect,
            c.closed_issues,
            c.high_priority_open,
        )?;

        for bucket in &report.buckets {
            write!(
                out,
                "<h2>{} ({})</h2><table><tr><th>#</th><th>Category</th><th>Description</th>\
                 <th>Priority</th><th>Status</th><th>Area</th><th>Trade</th><th>Contractor</th>\
                 <th>Due</th><th>Photos</th></tr>",
                escape(&bucket.name),
                bucket.issues.len()
            )?;
            for detail in &bucket.issues {
                let labeled = &detail.issue;
                let issue = &labeled.issue;
                let category = match &issue.subcategory {
                    Some(sub) => format!("{} / {}", issue.category, sub),
                    None => issue.category.clone(),
                };
                write!(
                    out,
                    "<tr><td>{}</td><td>{}</td><td>{}</td><td class=\"{}\">{}</td><td>{}</td>\
                     <td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                    issue.id,
                    escape(&category),
                    escape(issue.description.as_deref().unwrap_or("")),
                    issue.priority,
                    issue.priority.bucket_label(),
                    issue.status,
                    escape(labeled.area_name.as_deref().unwrap_or("")),
                    escape(issue.trade_label.as_deref().unwrap_or("")),
                    escape(labeled.contractor_name.as_deref().unwrap_or("")),
                    issue.due_date.map(|d| d.to_string()).unwrap_or_default(),
                    detail.photos.len(),
                )?;
            }
            out.push_str("</table>");
        }

        out.push_str("</body></html>");
        Ok(Self::finish(out))
    }

    fn render_manual(
        &self,
        project: &Project,
        manual: &ManualInstance,
    ) -> Result<RenderedDocument, RenderError> {
        let mut out = String::new();
        open_document(&mut out, &format!("Home Owner Manual - {}", project.name))?;
        write!(
            out,
            "<h1>Home Owner Manual</h1><p>{}<br>{}</p>",
            escape(&project.name),
            escape(&project.address)
        )?;

        let sections = default_sections();
        for id in SECTION_IDS {
            let title = sections
                .as_array()
                .and_then(|all| all.iter().find(|s| s["id"] == *id))
                .and_then(|s| s["title"].as_str())
                .unwrap_or(*id);
            let value = manual.fields.get(*id);
            let attachments: Vec<_> = manual
                .attachments
                .0
                .iter()
                .filter(|a| a.section == *id)
                .collect();
            if value.is_none() && attachments.is_empty() {
                continue;
            }

            write!(out, "<h2>{}</h2>", escape(title))?;
            if let Some(value) = value {
                render_value(&mut out, value)?;
            }
            if !attachments.is_empty() {
                out.push_str("<ul>");
                for a in attachments {
                    write!(
                        out,
                        "<li><a href=\"{}\">{}</a></li>",
                        escape(&a.url),
                        escape(&a.name)
                    )?;
                }
                out.push_str("</ul>");
            }
        }

        out.push_str("</body></html>");
        Ok(Self::finish(out))
    }
}

fn open_document(out: &mut String, title: &str) -> std::fmt::Result {
    write!(
        out,
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{}</title>\
         <style>{STYLE}</style></head><body>",
        escape(title)
    )
}

fn render_value(out: &mut String, value: &Value) -> std::fmt::Result {
    match value {
        Value::Null => Ok(()),
        Value::String(s) => write!(out, "{}", escape(s)),
        Value::Bool(_) | Value::Number(_) => write!(out, "{value}"),
        Value::Array(items) => {
            out.push_str("<ul>");
            for item in items {
                out.push_str("<li>");
                render_value(out, item)?;
                out.push_str("</li>");
            }
            out.push_str("</ul>");
            Ok(())
        }
        Value::Object(map) => {
            out.push_str("<dl>");
            for (key, item) in map {
                write!(out, "<dt>{}</dt><dd>", escape(key))?;
                render_value(out, item)?;
                out.push_str("</dd>");
            }
            out.push_str("</dl>");
            Ok(())
        }
    }
}

/// Escape text for HTML element and attribute content.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
