//! Scatter plots (hour × ip_int) and their colour maps

use serde::Serialize;

// ============================================================================
// PALETTES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Palette {
    Viridis,
    Coolwarm,
}

const VIRIDIS: [(u8, u8, u8); 5] = [
    (0x44, 0x01, 0x54),
    (0x3b, 0x52, 0x8b),
    (0x21, 0x91, 0x8c),
    (0x5e, 0xc9, 0x62),
    (0xfd, 0xe7, 0x25),
];

const COOLWARM: [(u8, u8, u8); 3] = [(0x3b, 0x4c, 0xc0), (0xdd, 0xdd, 0xdd), (0xb4, 0x04, 0x26)];

impl Palette {
    /// Colour at position `t` in [0, 1] as `#rrggbb`
    pub fn color(&self, t: f64) -> String {
        let stops: &[(u8, u8, u8)] = match self {
            Palette::Viridis => &VIRIDIS,
            Palette::Coolwarm => &COOLWARM,
        };

        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let position = t * (stops.len() - 1) as f64;
        let lower = position.floor() as usize;
        let upper = (lower + 1).min(stops.len() - 1);
        let fraction = position - lower as f64;

        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * fraction).round() as u8;
        let (r1, g1, b1) = stops[lower];
        let (r2, g2, b2) = stops[upper];
        format!("#{:02x}{:02x}{:02x}", mix(r1, r2), mix(g1, g2), mix(b1, b2))
    }

    /// Colour of category `index` out of `count`, spread over the whole map
    pub fn categorical(&self, index: usize, count: usize) -> String {
        if count <= 1 {
            return self.color(0.0);
        }
        self.color(index as f64 / (count - 1) as f64)
    }
}

// ============================================================================
// SCATTER
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// All points sharing one colour
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterSeries {
    pub label: String,
    pub color: String,
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPlot {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub palette: Palette,
    pub series: Vec<ScatterSeries>,
}

impl ScatterPlot {
    pub fn new(title: &str, x_label: &str, y_label: &str, palette: Palette) -> Self {
        Self {
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            palette,
            series: Vec::new(),
        }
    }

    /// Group `(x, y)` points by category; categories are coloured in
    /// `order` and categories with no points are skipped
    pub fn with_categories<K: PartialEq>(
        mut self,
        order: &[(K, String)],
        xs: &[f64],
        ys: &[f64],
        keys: &[K],
    ) -> Self {
        for (index, (key, label)) in order.iter().enumerate() {
            let points: Vec<Point> = keys
                .iter()
                .zip(xs.iter().zip(ys))
                .filter(|(k, _)| *k == key)
                .map(|(_, (&x, &y))| Point { x, y })
                .collect();

            if points.is_empty() {
                continue;
            }

            self.series.push(ScatterSeries {
                label: label.clone(),
                color: self.palette.categorical(index, order.len()),
                points,
            });
        }
        self
    }

    pub fn n_points(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.n_points() == 0
    }

    /// (min_x, max_x, min_y, max_y) over all points
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        let mut points = self.series.iter().flat_map(|s| s.points.iter());
        let first = points.next()?;
        Some(points.fold(
            (first.x, first.x, first.y, first.y),
            |(x0, x1, y0, y1), p| (x0.min(p.x), x1.max(p.x), y0.min(p.y), y1.max(p.y)),
        ))
    }
}
