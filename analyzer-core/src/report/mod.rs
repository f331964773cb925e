//! Report Module - Presenter
//!
//! Turns an [`Analysis`] into what the dashboard shows: previews, the
//! anomaly list and two scatter plots. No business logic lives here.

pub mod plot;
pub mod svg;
pub mod table;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::features::{HOUR_COLUMN, IP_INT_COLUMN};
use crate::model::AnomalyFlag;
use crate::pipeline::{Analysis, ANOMALY_COLUMN};

pub use plot::{Palette, Point, ScatterPlot, ScatterSeries};
pub use svg::{escape, render_scatter};
pub use table::{Cell, TableView};

/// Dashboard title
pub const TITLE: &str = "Honeypot Attack Analyzer with Machine Learning";

/// Prompt shown while no file has been uploaded
pub const UPLOAD_PROMPT: &str = "Upload a honeypot log CSV file to start analysis.";

/// Extra anomaly-table column with the isolation score
pub const ANOMALY_SCORE_COLUMN: &str = "anomaly_score";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub rows: usize,
    pub features: usize,
    pub clusters: usize,
    pub cluster_sizes: Vec<usize>,
    pub anomalies: usize,
    pub contamination: f64,
    pub anomaly_threshold: f64,
}

/// Everything one rendered page needs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub title: String,
    pub summary: Summary,
    pub raw_preview: TableView,
    pub processed_preview: TableView,
    pub cluster_plot: ScatterPlot,
    pub anomaly_table: TableView,
    pub anomaly_plot: ScatterPlot,
}

impl Dashboard {
    pub fn from_analysis(analysis: &Analysis) -> Self {
        let preview_rows = analysis.config.preview_rows;
        let head: Vec<usize> = (0..preview_rows.min(analysis.n_rows())).collect();

        Self {
            run_id: analysis.run_id,
            generated_at: analysis.analyzed_at,
            title: TITLE.to_string(),
            summary: summarize(analysis),
            raw_preview: TableView::from_raw(&analysis.raw, preview_rows),
            processed_preview: TableView::from_features(&analysis.features, &head),
            cluster_plot: cluster_plot(analysis),
            anomaly_table: anomaly_table(analysis),
            anomaly_plot: anomaly_plot(analysis),
        }
    }

    /// Both plots rendered as inline SVG (cluster, anomaly)
    pub fn render_plots(&self) -> (String, String) {
        (render_scatter(&self.cluster_plot), render_scatter(&self.anomaly_plot))
    }
}

fn summarize(analysis: &Analysis) -> Summary {
    Summary {
        rows: analysis.n_rows(),
        features: analysis.features.n_columns(),
        clusters: analysis.clusters.k(),
        cluster_sizes: analysis.clusters.sizes.clone(),
        anomalies: analysis.anomalies.anomaly_count(),
        contamination: analysis.config.contamination,
        anomaly_threshold: analysis.anomalies.threshold,
    }
}

/// Hour and ip_int columns, the axes of both plots
fn plot_axes(analysis: &Analysis) -> (Vec<f64>, Vec<f64>) {
    let column = |name: &str| {
        analysis
            .features
            .column(name)
            .map(|c| c.values.clone())
            .unwrap_or_default()
    };
    (column(HOUR_COLUMN), column(IP_INT_COLUMN))
}

fn cluster_plot(analysis: &Analysis) -> ScatterPlot {
    let (xs, ys) = plot_axes(analysis);
    let order: Vec<(usize, String)> = (0..analysis.clusters.k())
        .map(|k| (k, k.to_string()))
        .collect();

    ScatterPlot::new("Cluster of Attacks", "Hour of Attack", "IP Address (int)", Palette::Viridis)
        .with_categories(&order, &xs, &ys, &analysis.clusters.labels)
}

fn anomaly_plot(analysis: &Analysis) -> ScatterPlot {
    let (xs, ys) = plot_axes(analysis);
    // Anomaly (-1) sits at the low end of the colour map, normal (+1) at the high end
    let order = [
        (AnomalyFlag::Anomaly, AnomalyFlag::Anomaly.to_string()),
        (AnomalyFlag::Normal, AnomalyFlag::Normal.to_string()),
    ];

    ScatterPlot::new("Anomalous vs Normal Attacks", "Hour", "IP Address (int)", Palette::Coolwarm)
        .with_categories(&order, &xs, &ys, &analysis.anomalies.flags)
}

/// Every flagged row: features, cluster, anomaly flag, score
fn anomaly_table(analysis: &Analysis) -> TableView {
    let rows = analysis.anomalies.anomalous_rows();
    let mut view = TableView::from_features(&analysis.clustered_features(), &rows);
    view.total_rows = rows.len();

    view.push_column(
        ANOMALY_COLUMN,
        rows.iter().map(|&r| Cell::Text(analysis.anomalies.flags[r].to_string())),
    );
    view.push_column(
        ANOMALY_SCORE_COLUMN,
        rows.iter().map(|&r| Cell::Float(analysis.anomalies.scores[r])),
    );
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::CLUSTER_COLUMN;
    use crate::{analyze, AnalyzerConfig};

    fn sample_csv(rows: usize) -> String {
        let protocols = ["SSH", "Telnet", "HTTP"];
        let countries = ["US", "CN", "RU", "BR"];
        let mut csv = String::from("timestamp,src_ip,protocol,country,command,malware_url\n");
        for i in 0..rows {
            csv.push_str(&format!(
                "2024-02-{:02} {:02}:{:02}:00,{}.{}.{}.{},{},{},cmd{},http://m/{}\n",
                1 + i % 28,
                (i * 7) % 24,
                i % 60,
                10 + (i * 37) % 200,
                (i * 11) % 256,
                (i * 3) % 256,
                1 + i % 250,
                protocols[i % 3],
                countries[i % 4],
                i,
                i
            ));
        }
        csv
    }

    #[test]
    fn test_dashboard_sections() {
        let analysis = analyze(sample_csv(40).as_bytes(), &AnalyzerConfig::default()).unwrap();
        let dashboard = Dashboard::from_analysis(&analysis);

        assert_eq!(dashboard.title, TITLE);
        assert_eq!(dashboard.raw_preview.rows.len(), 5);
        assert_eq!(dashboard.raw_preview.total_rows, 40);
        assert_eq!(dashboard.processed_preview.rows.len(), 5);
        assert!(!dashboard.processed_preview.columns.contains(&CLUSTER_COLUMN.to_string()));

        assert_eq!(dashboard.cluster_plot.n_points(), 40);
        assert_eq!(dashboard.anomaly_plot.n_points(), 40);
        assert_eq!(dashboard.summary.cluster_sizes.iter().sum::<usize>(), 40);
        assert_eq!(dashboard.anomaly_table.rows.len(), dashboard.summary.anomalies);
    }

    #[test]
    fn test_anomaly_table_columns() {
        let analysis = analyze(sample_csv(40).as_bytes(), &AnalyzerConfig::default()).unwrap();
        let table = Dashboard::from_analysis(&analysis).anomaly_table;

        let n = table.columns.len();
        assert_eq!(table.columns[n - 3], CLUSTER_COLUMN);
        assert_eq!(table.columns[n - 2], ANOMALY_COLUMN);
        assert_eq!(table.columns[n - 1], ANOMALY_SCORE_COLUMN);
        for row in &table.rows {
            assert_eq!(row.len(), n);
            assert_eq!(row[n - 2], Cell::Text("anomaly".into()));
        }
    }

    #[test]
    fn test_dashboard_serializes() {
        let analysis = analyze(sample_csv(12).as_bytes(), &AnalyzerConfig::default()).unwrap();
        let json = serde_json::to_value(Dashboard::from_analysis(&analysis)).unwrap();

        assert_eq!(json["summary"]["rows"], 12);
        assert_eq!(json["cluster_plot"]["palette"], "viridis");
        assert_eq!(json["anomaly_plot"]["title"], "Anomalous vs Normal Attacks");
    }
}
