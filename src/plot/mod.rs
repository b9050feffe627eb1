//! Posterior density plot.
//!
//! Renders the empirical posterior of the rate difference as a histogram
//! density curve with the positive region (treatment ahead of control)
//! filled, a dashed reference line at zero, and a caption stating the
//! comparison direction.
//!
//! The figure is an explicit value: [`PosteriorPlot`] owns all histogram
//! geometry and labels, so successive plots share no hidden drawing state.
//! Rendering produces a standalone SVG document; writing it anywhere is the
//! caller's concern.

use std::fmt::Write as _;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::{CertezaError, Result};

/// Number of histogram bins (101 evenly spaced edges).
pub const N_BINS: usize = 100;

const FILL_COLOR: &str = "#2b4888";

const WIDTH: f64 = 960.0;
const HEIGHT: f64 = 560.0;
const MARGIN_LEFT: f64 = 60.0;
const MARGIN_RIGHT: f64 = 24.0;
const MARGIN_TOP: f64 = 24.0;
const MARGIN_BOTTOM: f64 = 130.0;

/// Histogram figure of a posterior rate-difference distribution.
///
/// # Examples
///
/// ```
/// use certeza::plot::PosteriorPlot;
///
/// let posterior: Vec<f64> = (0..1000).map(|i| -0.2 + 0.0006 * i as f64).collect();
/// let plot = PosteriorPlot::from_posterior(&posterior, 3, "newly enrolling", "control", "email")
///     .expect("non-empty posterior");
///
/// assert_eq!(plot.bin_edges().len(), 101);
/// let svg = plot.to_svg();
/// assert!(svg.starts_with("<?xml"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PosteriorPlot {
    bin_edges: Vec<f64>,
    counts: Vec<u64>,
    shaded: Range<usize>,
    baseline_successes: u64,
    action: String,
    control_label: String,
    treatment_label: String,
}

impl PosteriorPlot {
    /// Builds the figure from posterior samples.
    ///
    /// Bins the samples into [`N_BINS`] evenly spaced bins spanning the
    /// sample range and marks the bins whose lower edge is at or above zero
    /// for shading. When every sample is identical the histogram degenerates
    /// to a single bin and still renders.
    ///
    /// `baseline_successes` is the control-group success count, annotated on
    /// the figure for context.
    ///
    /// # Errors
    ///
    /// Returns an error if `posterior` is empty.
    pub fn from_posterior(
        posterior: &[f64],
        baseline_successes: u64,
        action: &str,
        control_label: &str,
        treatment_label: &str,
    ) -> Result<Self> {
        if posterior.is_empty() {
            return Err(CertezaError::empty_input("posterior samples"));
        }

        let (min, max) = posterior.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });

        let (bin_edges, counts) = if min == max {
            (vec![min, max], vec![posterior.len() as u64])
        } else {
            let mut edges = Vec::with_capacity(N_BINS + 1);
            let width = (max - min) / N_BINS as f64;
            for i in 0..=N_BINS {
                edges.push(min + i as f64 * width);
            }
            let mut counts = vec![0u64; N_BINS];
            for &v in posterior {
                let mut idx = ((v - min) / width) as usize;
                // The maximum sample lands in the last bin.
                if idx >= N_BINS {
                    idx = N_BINS - 1;
                }
                counts[idx] += 1;
            }
            (edges, counts)
        };

        let n_bins = counts.len();
        let first_shaded = bin_edges[..n_bins]
            .iter()
            .position(|&e| e >= 0.0)
            .unwrap_or(n_bins);

        Ok(Self {
            bin_edges,
            counts,
            shaded: first_shaded..n_bins,
            baseline_successes,
            action: action.to_string(),
            control_label: control_label.to_string(),
            treatment_label: treatment_label.to_string(),
        })
    }

    /// Bin edges (one more than the number of bins).
    #[must_use]
    pub fn bin_edges(&self) -> &[f64] {
        &self.bin_edges
    }

    /// Per-bin sample counts.
    #[must_use]
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Index range of bins shaded as the positive region.
    #[must_use]
    pub fn shaded_bins(&self) -> Range<usize> {
        self.shaded.clone()
    }

    /// Control-group success count annotated on the figure.
    #[must_use]
    pub fn baseline_successes(&self) -> u64 {
        self.baseline_successes
    }

    /// Caption lines describing the comparison direction.
    #[must_use]
    pub fn caption_lines(&self) -> [String; 4] {
        [
            format!(
                "Posterior difference in the rate of {}: {} minus {}.",
                self.action, self.treatment_label, self.control_label
            ),
            format!("neg: {} group had a lower rate", self.treatment_label),
            format!("pos: {} group had a higher rate", self.treatment_label),
            "zero: same rate".to_string(),
        ]
    }

    /// Renders the figure as a standalone SVG document.
    #[must_use]
    pub fn to_svg(&self) -> String {
        let x_min = self.bin_edges[0];
        let x_max = self.bin_edges[self.bin_edges.len() - 1];
        let x_span = if x_max > x_min { x_max - x_min } else { 1.0 };
        let y_max = self.counts.iter().copied().max().unwrap_or(1).max(1) as f64;

        let plot_w = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
        let plot_h = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
        let to_x = |v: f64| MARGIN_LEFT + (v - x_min) / x_span * plot_w;
        let to_y = |c: f64| MARGIN_TOP + (1.0 - c / y_max) * plot_h;
        let base_y = MARGIN_TOP + plot_h;

        let mut svg = String::new();
        svg.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        let _ = writeln!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{WIDTH}\" height=\"{HEIGHT}\" \
             viewBox=\"0 0 {WIDTH} {HEIGHT}\">"
        );
        svg.push_str("  <style>\n");
        svg.push_str("    .caption { font-family: sans-serif; font-size: 14px; }\n");
        svg.push_str("    .axis-label { font-family: sans-serif; font-size: 13px; }\n");
        svg.push_str("  </style>\n");
        svg.push_str("  <rect width=\"100%\" height=\"100%\" fill=\"#ffffff\"/>\n");

        // Filled positive region first so the density line draws on top.
        if !self.shaded.is_empty() {
            let mut points = String::new();
            let start = self.shaded.start;
            let _ = write!(
                points,
                "{:.1},{:.1}",
                to_x(self.bin_edges[start]),
                base_y
            );
            for i in self.shaded.clone() {
                let _ = write!(
                    points,
                    " {:.1},{:.1}",
                    to_x(self.bin_edges[i]),
                    to_y(self.counts[i] as f64)
                );
            }
            let last = self.shaded.end - 1;
            let _ = write!(
                points,
                " {:.1},{:.1} {:.1},{:.1}",
                to_x(self.bin_edges[last + 1]),
                to_y(self.counts[last] as f64),
                to_x(self.bin_edges[last + 1]),
                base_y
            );
            let _ = writeln!(
                svg,
                "  <polygon points=\"{points}\" fill=\"{FILL_COLOR}\" fill-opacity=\"1.0\"/>"
            );
        }

        // Density curve through the lower edge of each bin.
        let mut line = String::new();
        for (i, &count) in self.counts.iter().enumerate() {
            if i > 0 {
                line.push(' ');
            }
            let _ = write!(
                line,
                "{:.1},{:.1}",
                to_x(self.bin_edges[i]),
                to_y(count as f64)
            );
        }
        let _ = writeln!(
            svg,
            "  <polyline points=\"{line}\" fill=\"none\" stroke=\"{FILL_COLOR}\" stroke-width=\"1.5\"/>"
        );

        // Dashed reference line at zero, when zero is in view.
        if x_min <= 0.0 && 0.0 <= x_max {
            let zero_x = to_x(0.0);
            let _ = writeln!(
                svg,
                "  <line x1=\"{zero_x:.1}\" y1=\"{MARGIN_TOP}\" x2=\"{zero_x:.1}\" y2=\"{base_y:.1}\" \
                 stroke=\"#000000\" stroke-dasharray=\"6,4\"/>"
            );
        }

        // Axis baseline and labels.
        let _ = writeln!(
            svg,
            "  <line x1=\"{MARGIN_LEFT}\" y1=\"{base_y:.1}\" x2=\"{:.1}\" y2=\"{base_y:.1}\" \
             stroke=\"#333333\"/>",
            MARGIN_LEFT + plot_w
        );
        let _ = writeln!(
            svg,
            "  <text class=\"axis-label\" x=\"18\" y=\"{:.1}\" \
             transform=\"rotate(-90 18 {:.1})\" text-anchor=\"middle\">Density of draws</text>",
            MARGIN_TOP + plot_h / 2.0,
            MARGIN_TOP + plot_h / 2.0
        );
        let _ = writeln!(
            svg,
            "  <text class=\"axis-label\" x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\">\
             control successes: {}</text>",
            MARGIN_LEFT + plot_w,
            MARGIN_TOP + 16.0,
            self.baseline_successes
        );

        for (i, caption) in self.caption_lines().iter().enumerate() {
            let _ = writeln!(
                svg,
                "  <text class=\"caption\" x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\">{}</text>",
                MARGIN_LEFT + plot_w / 2.0,
                base_y + 30.0 + 20.0 * i as f64,
                escape_xml(caption)
            );
        }

        svg.push_str("</svg>\n");
        svg
    }
}

/// Escapes text content for embedding in SVG.
fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
