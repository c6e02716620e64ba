//! Production envelope computation and rendering
//!
//! The envelope traces the feasible trade-off region between two reaction
//! fluxes, typically growth against secretion of a target product.
use std::fmt::Write as _;

use log::debug;

use crate::configuration::CONFIGURATION;
use crate::flux_analysis::fba::flux_range;
use crate::flux_analysis::FluxError;
use crate::metabolic_model::constraint_map::ConstraintMap;
use crate::metabolic_model::model::{Model, ModelError};

/// One sample of the envelope: the fixed x flux and the achievable y band
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnvelopePoint {
    pub x: f64,
    pub y_min: f64,
    pub y_max: f64,
}

/// The feasible region boundary between two reaction fluxes
#[derive(Clone, Debug)]
pub struct ProductionEnvelope {
    pub x_reaction: String,
    pub y_reaction: String,
    pub points: Vec<EnvelopePoint>,
}

/// Trace the production envelope between two reactions
///
/// The feasible range of `x_reaction` is bracketed with two LP solves, then
/// at each of `points` evenly spaced samples the flux of `x_reaction` is
/// pinned and the minimum and maximum of `y_reaction` are solved for (two
/// more LPs per sample). Pass `points = 0` to use the configured default.
pub fn production_envelope(
    model: &Model,
    x_reaction: &str,
    y_reaction: &str,
    overlay: Option<&ConstraintMap>,
    points: usize,
) -> Result<ProductionEnvelope, FluxError> {
    for id in [x_reaction, y_reaction] {
        if !model.reactions.contains_key(id) {
            return Err(ModelError::UnknownReaction(id.to_string()).into());
        }
    }
    let points = if points == 0 {
        CONFIGURATION.read().unwrap().envelope_points
    } else {
        points
    };

    let (x_min, x_max) = flux_range(model, x_reaction, overlay)?;
    debug!(
        "envelope: {} in [{:.4}, {:.4}], sampling {} points of {}",
        x_reaction, x_min, x_max, points, y_reaction
    );

    let base = overlay.cloned().unwrap_or_default();
    let mut samples = Vec::with_capacity(points);
    let span = x_max - x_min;
    for i in 0..points {
        let t = if points > 1 {
            i as f64 / (points - 1) as f64
        } else {
            0.0
        };
        let x = x_min + t * span;
        // Pin within a small band; an exact pin at the bracket edge can be
        // reported infeasible by the interior point solver
        let slack = 1e-6 * x.abs().max(1.0);
        let mut pinned = base.clone();
        pinned.set(x_reaction, x - slack, x + slack);
        let (y_min, y_max) = flux_range(model, y_reaction, Some(&pinned))?;
        samples.push(EnvelopePoint { x, y_min, y_max });
    }

    Ok(ProductionEnvelope {
        x_reaction: x_reaction.to_string(),
        y_reaction: y_reaction.to_string(),
        points: samples,
    })
}

impl ProductionEnvelope {
    /// Largest y_max over the whole envelope
    pub fn peak(&self) -> f64 {
        self.points
            .iter()
            .map(|p| p.y_max)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Render the envelope as a standalone SVG region plot
    pub fn to_svg(&self, width: u32, height: u32) -> String {
        let (w, h) = (width as f64, height as f64);
        let margin = 40.0;
        let xs: Vec<f64> = self.points.iter().map(|p| p.x).collect();
        let ys: Vec<f64> = self
            .points
            .iter()
            .flat_map(|p| [p.y_min, p.y_max])
            .collect();
        let (x_lo, x_hi) = bounds_of(&xs);
        let (y_lo, y_hi) = bounds_of(&ys);
        let sx = |v: f64| margin + (v - x_lo) / (x_hi - x_lo).max(1e-12) * (w - 2.0 * margin);
        let sy = |v: f64| h - margin - (v - y_lo) / (y_hi - y_lo).max(1e-12) * (h - 2.0 * margin);

        // Upper boundary left to right, then lower boundary right to left
        let mut path = String::new();
        for (i, p) in self.points.iter().enumerate() {
            let cmd = if i == 0 { 'M' } else { 'L' };
            let _ = write!(path, "{}{:.2},{:.2} ", cmd, sx(p.x), sy(p.y_max));
        }
        for p in self.points.iter().rev() {
            let _ = write!(path, "L{:.2},{:.2} ", sx(p.x), sy(p.y_min));
        }
        path.push('Z');

        let mut svg = String::new();
        let _ = write!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
        );
        let _ = write!(
            svg,
            r##"<path d="{path}" fill="#4c72b0" fill-opacity="0.4" stroke="#4c72b0"/>"##
        );
        let _ = write!(
            svg,
            r#"<line x1="{m}" y1="{y0}" x2="{x1}" y2="{y0}" stroke="black"/>"#,
            m = margin,
            y0 = h - margin,
            x1 = w - margin
        );
        let _ = write!(
            svg,
            r#"<line x1="{m}" y1="{m}" x2="{m}" y2="{y0}" stroke="black"/>"#,
            m = margin,
            y0 = h - margin
        );
        let _ = write!(
            svg,
            r#"<text x="{x}" y="{y}" text-anchor="middle" font-size="12">{label}</text>"#,
            x = w / 2.0,
            y = h - 8.0,
            label = self.x_reaction
        );
        let _ = write!(
            svg,
            r#"<text x="12" y="{y}" transform="rotate(-90 12 {y})" text-anchor="middle" font-size="12">{label}</text>"#,
            y = h / 2.0,
            label = self.y_reaction
        );
        svg.push_str("</svg>");
        svg
    }
}

fn bounds_of(values: &[f64]) -> (f64, f64) {
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if (hi - lo).abs() < 1e-12 {
        (lo - 1.0, hi + 1.0)
    } else {
        (lo, hi)
    }
}
