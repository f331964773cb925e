//! Server-rendered HTML dashboard
//!
//! One page, rebuilt from scratch on every request: upload form, then (when a
//! run succeeded) previews, cluster plot, anomaly table and anomaly plot.

use std::fmt::Write;

use honeypot_analyzer_core::report::{escape, TableView, TITLE};
use honeypot_analyzer_core::Dashboard;

const STYLE: &str = "\
body{font-family:sans-serif;margin:2rem;color:#222}\
table{border-collapse:collapse;font-size:13px;margin:.5rem 0 1.5rem}\
th,td{border:1px solid #ccc;padding:3px 8px;text-align:right}\
th{background:#f3f3f3}\
.notice{padding:.75rem 1rem;border-radius:4px;margin:1rem 0}\
.info{background:#e8f0fe}.error{background:#fde8e8}\
.summary span{margin-right:1.5rem}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// Banner shown above the dashboard
#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn info(message: &str) -> Self {
        Self { kind: NoticeKind::Info, message: message.to_string() }
    }

    pub fn error(message: &str) -> Self {
        Self { kind: NoticeKind::Error, message: message.to_string() }
    }
}

/// Full HTML page
pub fn page(dashboard: Option<&Dashboard>, notice: Option<Notice>) -> String {
    let mut html = String::new();

    let _ = write!(
        html,
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{title}</title>\
         <style>{style}</style></head><body><h1>🛡️ {title}</h1>\
         <form method=\"post\" action=\"/\" enctype=\"multipart/form-data\">\
         <input type=\"file\" name=\"file\" accept=\".csv,text/csv\"> \
         <button type=\"submit\">Analyze</button></form>",
        title = escape(TITLE),
        style = STYLE,
    );

    if let Some(notice) = notice {
        let class = match notice.kind {
            NoticeKind::Info => "info",
            NoticeKind::Error => "error",
        };
        let _ = write!(
            html,
            "<div class=\"notice {}\">{}</div>",
            class,
            escape(&notice.message)
        );
    }

    if let Some(dashboard) = dashboard {
        render_dashboard(&mut html, dashboard);
    }

    html.push_str("</body></html>");
    html
}

fn render_dashboard(html: &mut String, dashboard: &Dashboard) {
    let summary = &dashboard.summary;
    let _ = write!(
        html,
        "<div class=\"summary\"><span>Run: {}</span><span>Rows: {}</span>\
         <span>Features: {}</span><span>Cluster sizes: {:?}</span>\
         <span>Anomalies: {}</span></div>",
        dashboard.run_id, summary.rows, summary.features, summary.cluster_sizes, summary.anomalies
    );

    html.push_str("<h2>📄 Data Preview</h2>");
    render_table(html, &dashboard.raw_preview, "Uploaded file has no rows.");

    html.push_str("<h2>✅ Processed Data</h2>");
    render_table(html, &dashboard.processed_preview, "No processed rows.");

    let (cluster_svg, anomaly_svg) = dashboard.render_plots();

    html.push_str("<h2>📊 KMeans Clustering</h2>");
    html.push_str(&cluster_svg);

    html.push_str("<h2>🚨 Anomaly Detection</h2>");
    render_table(html, &dashboard.anomaly_table, "No anomalies detected.");
    html.push_str(&anomaly_svg);
}

fn render_table(html: &mut String, table: &TableView, empty_message: &str) {
    if table.is_empty() {
        let _ = write!(html, "<p><em>{}</em></p>", escape(empty_message));
        return;
    }

    html.push_str("<table><thead><tr>");
    for column in &table.columns {
        let _ = write!(html, "<th>{}</th>", escape(column));
    }
    html.push_str("</tr></thead><tbody>");

    for row in &table.rows {
        html.push_str("<tr>");
        for cell in row {
            let _ = write!(html, "<td>{}</td>", escape(&cell.to_string()));
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table>");

    if table.total_rows > table.rows.len() {
        let _ = write!(
            html,
            "<p><small>Showing {} of {} rows</small></p>",
            table.rows.len(),
            table.total_rows
        );
    }
}
