//! SVG overlay of bias density curves

use std::fmt::{self, Write as _};
use std::fs;
use std::path::Path;

use crate::error::{Result, SimulationError};
use crate::report::kde::{DEFAULT_GRID_POINTS, GaussianKde};
use crate::report::summary::SimulationReport;
use crate::utils::{log_operation_complete, log_operation_start};

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 480.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 20.0;
const MARGIN_BOTTOM: f64 = 55.0;
const FILL_OPACITY: f64 = 0.2;
const X_TICKS: usize = 5;

/// Labels and colours of the three estimators, in bias-column order
pub const ESTIMATOR_STYLES: [(&str, &str); 3] =
    [("G-comp", "blue"), ("IPW", "red"), ("AIPW", "purple")];

/// A density curve ready for drawing
#[derive(Debug, Clone)]
pub struct DensityCurve {
    /// Legend label
    pub label: String,
    /// SVG colour name or hex value
    pub color: String,
    /// Grid points
    pub x: Vec<f64>,
    /// Density at each grid point
    pub density: Vec<f64>,
}

impl DensityCurve {
    /// KDE of `sample` over its own range
    pub fn from_sample(label: &str, color: &str, sample: &[f64]) -> Result<Self> {
        let (x, density) = GaussianKde::new(sample)?.curve(DEFAULT_GRID_POINTS);
        Ok(Self {
            label: label.to_string(),
            color: color.to_string(),
            x,
            density,
        })
    }
}

/// One density curve per estimator for a finished scenario
pub fn bias_curves(report: &SimulationReport) -> Result<Vec<DensityCurve>> {
    report
        .bias_columns()
        .iter()
        .zip(ESTIMATOR_STYLES)
        .map(|(biases, (label, color))| DensityCurve::from_sample(label, color, biases))
        .collect()
}

struct Frame {
    x_min: f64,
    x_max: f64,
    y_max: f64,
}

impl Frame {
    fn px(&self, x: f64) -> f64 {
        let span = (self.x_max - self.x_min).max(f64::EPSILON);
        MARGIN_LEFT + (x - self.x_min) / span * (WIDTH - MARGIN_LEFT - MARGIN_RIGHT)
    }

    fn py(&self, y: f64) -> f64 {
        let span = self.y_max.max(f64::EPSILON);
        HEIGHT - MARGIN_BOTTOM - y / span * (HEIGHT - MARGIN_TOP - MARGIN_BOTTOM)
    }
}

/// Render the curves on one shared axis labelled "Bias"
pub fn render_density_svg(curves: &[DensityCurve]) -> Result<String> {
    if curves.is_empty() {
        return Err(SimulationError::validation("No density curves to plot"));
    }
    let points = curves.iter().flat_map(|c| c.x.iter().zip(&c.density));
    let (x_min, x_max, y_max) = points.fold(
        (f64::INFINITY, f64::NEG_INFINITY, 0.0f64),
        |(lo, hi, top), (&x, &d)| (lo.min(x), hi.max(x), top.max(d)),
    );
    let frame = Frame {
        x_min,
        x_max,
        y_max: y_max * 1.05,
    };

    let mut out = String::with_capacity(16 * 1024);
    draw(&mut out, &frame, curves).map_err(|e| SimulationError::serialization("SVG", e))?;
    Ok(out)
}

fn draw(out: &mut String, frame: &Frame, curves: &[DensityCurve]) -> fmt::Result {
    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}">"#
    )?;
    writeln!(out, r#"<rect width="{WIDTH}" height="{HEIGHT}" fill="white" />"#)?;

    let baseline = frame.py(0.0);
    for curve in curves.iter().filter(|c| !c.x.is_empty()) {
        // Filled area under the curve, closed along the baseline
        write!(out, r#"<polygon points=""#)?;
        write!(out, "{:.2},{baseline:.2}", frame.px(curve.x[0]))?;
        for (&x, &d) in curve.x.iter().zip(&curve.density) {
            write!(out, " {:.2},{:.2}", frame.px(x), frame.py(d))?;
        }
        if let Some(&last) = curve.x.last() {
            write!(out, " {:.2},{baseline:.2}", frame.px(last))?;
        }
        writeln!(
            out,
            r#"" fill="{}" fill-opacity="{FILL_OPACITY}" stroke="none" />"#,
            curve.color
        )?;

        write!(out, r#"<polyline points=""#)?;
        for (i, (&x, &d)) in curve.x.iter().zip(&curve.density).enumerate() {
            if i > 0 {
                out.push(' ');
            }
            write!(out, "{:.2},{:.2}", frame.px(x), frame.py(d))?;
        }
        writeln!(
            out,
            r#"" fill="none" stroke="{}" stroke-width="1.50" />"#,
            curve.color
        )?;
    }

    // Axes
    let left = MARGIN_LEFT;
    let right = WIDTH - MARGIN_RIGHT;
    writeln!(
        out,
        r#"<line x1="{left:.2}" y1="{baseline:.2}" x2="{right:.2}" y2="{baseline:.2}" stroke="black" stroke-width="1.00" />"#
    )?;
    writeln!(
        out,
        r#"<line x1="{left:.2}" y1="{MARGIN_TOP:.2}" x2="{left:.2}" y2="{baseline:.2}" stroke="black" stroke-width="1.00" />"#
    )?;
    for i in 0..X_TICKS {
        let value = frame.x_min + (frame.x_max - frame.x_min) * i as f64 / (X_TICKS - 1) as f64;
        let x = frame.px(value);
        writeln!(
            out,
            r#"<line x1="{x:.2}" y1="{baseline:.2}" x2="{x:.2}" y2="{:.2}" stroke="black" stroke-width="1.00" />"#,
            baseline + 5.0
        )?;
        writeln!(
            out,
            r#"<text x="{x:.2}" y="{:.2}" font-family="sans-serif" font-size="11.0" text-anchor="middle">{value:.3}</text>"#,
            baseline + 18.0
        )?;
    }
    writeln!(
        out,
        r#"<text x="{:.2}" y="{:.2}" font-family="sans-serif" font-size="13.0" text-anchor="middle">Bias</text>"#,
        (left + right) / 2.0,
        HEIGHT - 12.0
    )?;
    let mid_y = (MARGIN_TOP + baseline) / 2.0;
    writeln!(
        out,
        r#"<text x="20.00" y="{mid_y:.2}" font-family="sans-serif" font-size="13.0" text-anchor="middle" transform="rotate(-90,20.00,{mid_y:.2})">Density</text>"#
    )?;

    // Legend, top right
    for (i, curve) in curves.iter().enumerate() {
        let y = MARGIN_TOP + 15.0 + 18.0 * i as f64;
        let x = right - 90.0;
        writeln!(
            out,
            r#"<line x1="{x:.2}" y1="{y:.2}" x2="{:.2}" y2="{y:.2}" stroke="{}" stroke-width="2.00" />"#,
            x + 20.0,
            curve.color
        )?;
        write!(
            out,
            r#"<text x="{:.2}" y="{:.2}" font-family="sans-serif" font-size="12.0">"#,
            x + 26.0,
            y + 4.0
        )?;
        for ch in curve.label.chars() {
            match ch {
                '<' => out.push_str("&lt;"),
                '>' => out.push_str("&gt;"),
                '&' => out.push_str("&amp;"),
                _ => out.push(ch),
            }
        }
        writeln!(out, "</text>")?;
    }

    writeln!(out, "</svg>")
}

/// Render the bias densities of `report` and write them to `path`
pub fn write_bias_plot(report: &SimulationReport, path: &Path) -> Result<()> {
    log_operation_start("Writing bias density plot to", path);
    let svg = render_density_svg(&bias_curves(report)?)?;
    fs::write(path, svg)?;
    log_operation_complete("plotted", path, report.replicates(), None);
    Ok(())
}
