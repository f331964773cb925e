//! Minimal SVG renderer for scatter plots

use std::fmt::Write;

use super::plot::ScatterPlot;

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 420.0;
const MARGIN_LEFT: f64 = 110.0;
const MARGIN_RIGHT: f64 = 120.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 55.0;
const TICKS: usize = 5;

/// Escape text for HTML/SVG content and attributes
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render a scatter plot as a standalone `<svg>` element
pub fn render_scatter(plot: &ScatterPlot) -> String {
    let mut svg = String::new();
    let plot_w = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;

    // Writing into a String cannot fail
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif" font-size="12">"#,
        w = WIDTH,
        h = HEIGHT
    );
    let _ = write!(
        svg,
        r#"<text x="{}" y="24" text-anchor="middle" font-size="15">{}</text>"#,
        MARGIN_LEFT + plot_w / 2.0,
        escape(&plot.title)
    );
    let _ = write!(
        svg,
        r##"<rect x="{}" y="{}" width="{}" height="{}" fill="none" stroke="#333"/>"##,
        MARGIN_LEFT, MARGIN_TOP, plot_w, plot_h
    );

    let Some((x0, x1, y0, y1)) = plot.bounds() else {
        let _ = write!(
            svg,
            r#"<text x="{}" y="{}" text-anchor="middle">No data to plot</text></svg>"#,
            MARGIN_LEFT + plot_w / 2.0,
            MARGIN_TOP + plot_h / 2.0
        );
        return svg;
    };

    let (x0, x1) = pad_range(x0, x1);
    let (y0, y1) = pad_range(y0, y1);
    let sx = |x: f64| MARGIN_LEFT + (x - x0) / (x1 - x0) * plot_w;
    let sy = |y: f64| MARGIN_TOP + plot_h - (y - y0) / (y1 - y0) * plot_h;

    // Axis ticks
    for i in 0..=TICKS {
        let t = i as f64 / TICKS as f64;
        let xv = x0 + (x1 - x0) * t;
        let yv = y0 + (y1 - y0) * t;
        let _ = write!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="middle">{}</text>"#,
            sx(xv),
            MARGIN_TOP + plot_h + 16.0,
            format_tick(xv)
        );
        let _ = write!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="end">{}</text>"#,
            MARGIN_LEFT - 6.0,
            sy(yv) + 4.0,
            format_tick(yv)
        );
    }

    // Axis labels
    let _ = write!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" text-anchor="middle">{}</text>"#,
        MARGIN_LEFT + plot_w / 2.0,
        HEIGHT - 12.0,
        escape(&plot.x_label)
    );
    let _ = write!(
        svg,
        r#"<text x="16" y="{:.1}" text-anchor="middle" transform="rotate(-90 16 {:.1})">{}</text>"#,
        MARGIN_TOP + plot_h / 2.0,
        MARGIN_TOP + plot_h / 2.0,
        escape(&plot.y_label)
    );

    // Points + legend
    for (i, series) in plot.series.iter().enumerate() {
        let color = escape(&series.color);
        for p in &series.points {
            let _ = write!(
                svg,
                r#"<circle cx="{:.1}" cy="{:.1}" r="4" fill="{}" fill-opacity="0.8"/>"#,
                sx(p.x),
                sy(p.y),
                color
            );
        }

        let ly = MARGIN_TOP + 10.0 + i as f64 * 18.0;
        let lx = WIDTH - MARGIN_RIGHT + 14.0;
        let _ = write!(
            svg,
            r#"<circle cx="{:.1}" cy="{:.1}" r="5" fill="{}"/><text x="{:.1}" y="{:.1}">{} ({})</text>"#,
            lx,
            ly,
            color,
            lx + 10.0,
            ly + 4.0,
            escape(&series.label),
            series.points.len()
        );
    }

    svg.push_str("</svg>");
    svg
}

/// Widen a range by 5% per side; a zero-width range becomes ±1
fn pad_range(lo: f64, hi: f64) -> (f64, f64) {
    if (hi - lo).abs() < f64::EPSILON {
        return (lo - 1.0, hi + 1.0);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad, hi + pad)
}

fn format_tick(value: f64) -> String {
    if value.abs() >= 1e6 {
        format!("{:.3e}", value)
    } else {
        format!("{:.1}", value)
    }
}
