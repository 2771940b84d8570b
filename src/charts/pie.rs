//! Polarity distribution pie chart.

use super::polarity_counts;
use crate::analysis::{Polarity, ScoredReview};
use anyhow::{Context, Result};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;

/// Slices start here, measured counter-clockwise from the positive x axis.
const START_ANGLE: f64 = 140.0;

/// Every slice is pushed out by this fraction of the radius.
const EXPLODE: f64 = 0.05;

/// Percentage labels sit at this fraction of the radius.
const PCT_DISTANCE: f64 = 0.6;

/// Category labels sit at this fraction of the radius.
const LABEL_DISTANCE: f64 = 1.1;

const SIZE: (u32, u32) = (700, 700);

/// One wedge of the pie, in degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub polarity: Polarity,
    pub count: usize,
    pub start: f64,
    pub sweep: f64,
}

impl Slice {
    /// Share of the whole, in percent.
    pub fn percent(&self) -> f64 {
        self.sweep / 360.0 * 100.0
    }

    /// Percentage label in `%1.1f%%` style.
    pub fn percent_label(&self) -> String {
        format!("{:.1}%", self.percent())
    }

    fn mid_angle(&self) -> f64 {
        self.start + self.sweep / 2.0
    }
}

/// Lays out non-empty polarity counts as consecutive counter-clockwise wedges.
pub fn slices(counts: &[(Polarity, usize)]) -> Vec<Slice> {
    let total: usize = counts.iter().map(|(_, c)| c).sum();
    if total == 0 {
        return Vec::new();
    }

    let mut start = START_ANGLE;
    counts
        .iter()
        .filter(|(_, count)| *count > 0)
        .map(|&(polarity, count)| {
            let sweep = count as f64 / total as f64 * 360.0;
            let slice = Slice { polarity, count, start, sweep };
            start += sweep;
            slice
        })
        .collect()
}

fn slice_color(polarity: Polarity) -> RGBColor {
    match polarity {
        Polarity::Positive => RGBColor(0, 128, 0),
        Polarity::Neutral => RGBColor(128, 128, 128),
        Polarity::Negative => RGBColor(255, 0, 0),
    }
}

/// Screen point at `angle` degrees and distance `r` from `center` (y grows downwards).
fn polar(center: (f64, f64), r: f64, angle: f64) -> (i32, i32) {
    let rad = angle.to_radians();
    ((center.0 + r * rad.cos()).round() as i32, (center.1 - r * rad.sin()).round() as i32)
}

/// Renders the pie chart to a PNG file.
pub fn render(records: &[ScoredReview], path: &Path) -> Result<()> {
    let root = BitMapBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled("Sentiment Distribution of Reviews", ("sans-serif", 26))?;

    let (width, height) = root.dim_in_pixel();
    let center = (width as f64 / 2.0, height as f64 / 2.0);
    let radius = width.min(height) as f64 * 0.36;

    let label_style = TextStyle::from(("sans-serif", 20).into_font())
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));

    for slice in slices(&polarity_counts(records)) {
        let mid = slice.mid_angle();
        let offset = polar((0.0, 0.0), EXPLODE * radius, mid);
        let origin = (center.0 + offset.0 as f64, center.1 + offset.1 as f64);

        let steps = (slice.sweep.ceil() as usize).max(2);
        let mut points = vec![(origin.0.round() as i32, origin.1.round() as i32)];
        points.extend(
            (0..=steps)
                .map(|i| polar(origin, radius, slice.start + slice.sweep * i as f64 / steps as f64)),
        );

        root.draw(&Polygon::new(points, slice_color(slice.polarity).filled()))?;

        root.draw(&Text::new(
            slice.percent_label(),
            polar(origin, radius * PCT_DISTANCE, mid),
            label_style.clone(),
        ))?;
        root.draw(&Text::new(
            slice.polarity.to_string(),
            polar(origin, radius * LABEL_DISTANCE, mid),
            label_style.clone(),
        ))?;
    }

    root.present().with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slices_cover_full_circle() {
        let counts =
            [(Polarity::Positive, 30), (Polarity::Neutral, 12), (Polarity::Negative, 8)];
        let slices = slices(&counts);

        assert_eq!(slices.len(), 3);
        let total: f64 = slices.iter().map(|s| s.sweep).sum();
        assert!((total - 360.0).abs() < 1e-9);

        assert_eq!(slices[0].start, START_ANGLE);
        assert!((slices[1].start - (START_ANGLE + slices[0].sweep)).abs() < 1e-9);
    }

    #[test]
    fn test_percent_labels() {
        let counts = [(Polarity::Positive, 2), (Polarity::Neutral, 1), (Polarity::Negative, 0)];
        let slices = slices(&counts);

        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].percent_label(), "66.7%");
        assert_eq!(slices[1].percent_label(), "33.3%");
    }

    #[test]
    fn test_empty_counts() {
        assert!(slices(&[(Polarity::Positive, 0)]).is_empty());
        assert!(slices(&[]).is_empty());
    }

    #[test]
    fn test_polar_orientation() {
        assert_eq!(polar((100.0, 100.0), 10.0, 0.0), (110, 100));
        assert_eq!(polar((100.0, 100.0), 10.0, 90.0), (100, 90));
        assert_eq!(polar((100.0, 100.0), 10.0, 180.0), (90, 100));
    }
}
