//! Star-rating distribution bar chart.

use super::star_counts;
use crate::analysis::ScoredReview;
use anyhow::{Context, Result};
use plotters::prelude::*;
use std::path::Path;

const SIZE: (u32, u32) = (800, 500);

/// Five evenly spaced stops of the viridis colormap, one per star.
const VIRIDIS: [RGBColor; 5] = [
    RGBColor(68, 1, 84),
    RGBColor(59, 82, 139),
    RGBColor(33, 145, 140),
    RGBColor(94, 201, 98),
    RGBColor(253, 231, 37),
];

fn bar_color(value: &SegmentValue<u32>) -> RGBColor {
    let stars = match value {
        SegmentValue::Exact(v) | SegmentValue::CenterOf(v) => *v,
        SegmentValue::Last => 5,
    };
    VIRIDIS[(stars.clamp(1, 5) - 1) as usize]
}

/// Renders the star-rating bar chart to a PNG file.
pub fn render(records: &[ScoredReview], path: &Path) -> Result<()> {
    let counts = star_counts(records);
    let y_max = counts.iter().map(|(_, c)| *c as u32).max().unwrap_or(0) + 1;

    let root = BitMapBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Star Rating Distribution", ("sans-serif", 26))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(55)
        .build_cartesian_2d((1u32..5u32).into_segmented(), 0u32..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .bold_line_style(BLACK.mix(0.1))
        .x_desc("Star Rating")
        .y_desc("Number of Reviews")
        .axis_desc_style(("sans-serif", 16))
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style_func(|x, _| bar_color(x).filled())
            .margin(12)
            .data(counts.iter().map(|(rating, count)| (rating.value() as u32, *count as u32))),
    )?;

    root.present().with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
