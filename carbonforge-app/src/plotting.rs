//! Charts for a run: emissions per category and ESG section scores.

use anyhow::Result;
use carbonforge_core::{aggregate::EmissionsSummary, units::convert_from_kg};
use carbonforge_schemas::{
    esg::{EsgTotals, Section},
    units::OutputUnit,
};
use plotters::prelude::*;
use std::path::Path;

/// Bar chart of each category's emissions in `unit`.
pub fn plot_category_emissions(
    output_dir: &Path,
    summary: &EmissionsSummary,
    unit: OutputUnit,
) -> Result<()> {
    let bars: Vec<(String, f64)> = summary
        .categories
        .iter()
        .map(|c| (c.label.clone(), convert_from_kg(c.kg, unit)))
        .collect();
    if bars.is_empty() {
        println!("[Plotting] Warning: No emissions to plot.");
        return Ok(());
    }

    let path = output_dir.join("1_category_emissions.png");
    draw_bars(
        &path,
        "Emissions by Category",
        &format!("Emissions ({})", unit),
        &bars,
        BLUE,
    )?;
    println!("[Plotting] Category chart saved to '{}'.", path.display());
    Ok(())
}

/// Bar chart of the three section scores and the overall score, on a 0-100 axis.
pub fn plot_esg_scores(output_dir: &Path, totals: &EsgTotals) -> Result<()> {
    let mut bars: Vec<(String, f64)> = Section::ALL
        .iter()
        .map(|s| (s.to_string(), totals.section(*s)))
        .collect();
    bars.push(("Overall".to_string(), totals.overall_score));

    let path = output_dir.join("2_esg_scores.png");
    draw_bars(&path, "ESG Scores", "Score (%)", &bars, GREEN)?;
    println!("[Plotting] ESG chart saved to '{}'.", path.display());
    Ok(())
}

fn draw_bars(path: &Path, caption: &str, y_desc: &str, bars: &[(String, f64)], color: RGBColor) -> Result<()> {
    let root = BitMapBackend::new(path, (1024, 768)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_value = bars.iter().map(|(_, v)| *v).fold(0.0f64, f64::max);
    let y_max = if max_value > 0.0 { max_value * 1.1 } else { 1.0 };
    let labels: Vec<&str> = bars.iter().map(|(label, _)| label.as_str()).collect();

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 50).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d((0u32..bars.len() as u32).into_segmented(), 0f64..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(bars.len())
        .x_label_formatter(&|value| match value {
            SegmentValue::CenterOf(i) => labels.get(*i as usize).map_or(String::new(), |l| l.to_string()),
            _ => String::new(),
        })
        .y_desc(y_desc)
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(color.filled())
            .margin(20)
            .data(bars.iter().enumerate().map(|(i, (_, v))| (i as u32, *v))),
    )?;

    root.present()?;
    Ok(())
}
