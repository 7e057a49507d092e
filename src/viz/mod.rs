//! Visualization: multi-series line charts of [`MacroTable`] columns.
//!
//! - Output to **SVG** or **PNG** (chosen by file extension), or to an in-memory RGB
//!   buffer for the GUI
//! - Distinct series colors (Microsoft Office palette)
//! - One Y axis; large magnitudes are scaled (thousands/millions/...) unless the shared
//!   unit is percent-like
//! - Locale-aware tick labels (`30,000` vs `30.000`)
//! - Gaps in a series break the line; every observation also gets a marker

pub mod text;
pub mod util;

use crate::table::MacroTable;
use anyhow::{Result, anyhow};

use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;

use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;

use std::path::Path;
use std::sync::Once;

use text::truncate_to_width;
use util::{
    choose_axis_scale, compute_left_label_area_px, derive_axis_unit, format_tick,
    is_percentage_like, map_locale, office_color,
};

pub const DEFAULT_TITLE: &str = "Key Trends";

/// One-time registration for a fallback "sans-serif" font when using the `ab_glyph` text path.
/// Required because `ab_glyph` doesn't discover OS fonts.
static INIT_FONTS: Once = Once::new();

fn ensure_fonts_registered() {
    INIT_FONTS.call_once(|| {
        let _ = plotters::style::register_font(
            "sans-serif",
            plotters::style::FontStyle::Normal,
            include_bytes!("../../assets/DejaVuSans.ttf"),
        );
    });
}

/// Plot `series` (column labels) of `table` with the default locale (`"en"`).
pub fn plot_table<P: AsRef<Path>, S: AsRef<str>>(
    table: &MacroTable,
    series: &[S],
    out_path: P,
    width: u32,
    height: u32,
    title: &str,
) -> Result<()> {
    plot_table_locale(table, series, out_path, width, height, title, "en")
}

/// Same as [`plot_table`] with a locale tag for tick labels (e.g. `"en"`, `"de"`).
pub fn plot_table_locale<P: AsRef<Path>, S: AsRef<str>>(
    table: &MacroTable,
    series: &[S],
    out_path: P,
    width: u32,
    height: u32,
    title: &str,
    locale_tag: &str,
) -> Result<()> {
    let selected = chart_data(table, series)?;
    ensure_fonts_registered();

    let out_path = out_path.as_ref();
    let path_string = out_path.to_string_lossy().into_owned();
    if out_path.extension().and_then(|s| s.to_str()) == Some("svg") {
        let root = SVGBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_chart(root, &selected, title, locale_tag)
    } else {
        let root = BitMapBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_chart(root, &selected, title, locale_tag)
    }
}

/// Render into a packed RGB8 buffer of `width * height * 3` bytes.
pub fn render_rgb<S: AsRef<str>>(
    table: &MacroTable,
    series: &[S],
    width: u32,
    height: u32,
    title: &str,
) -> Result<Vec<u8>> {
    let selected = chart_data(table, series)?;
    ensure_fonts_registered();

    let mut buf = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buf, (width, height)).into_drawing_area();
        draw_chart(root, &selected, title, "en")?;
    }
    Ok(buf)
}

fn chart_data<S: AsRef<str>>(table: &MacroTable, series: &[S]) -> Result<MacroTable> {
    if series.is_empty() {
        return Err(anyhow!("no series selected"));
    }
    let selected = table.select(series);
    if selected.is_empty() {
        return Err(anyhow!("no data to plot"));
    }
    Ok(selected)
}

/// Split a column into runs of consecutive present values.
fn contiguous_runs(points: &[(f64, Option<f64>)]) -> Vec<Vec<(f64, f64)>> {
    let mut runs = Vec::new();
    let mut cur = Vec::new();
    for (x, v) in points {
        match v {
            Some(v) => cur.push((*x, *v)),
            None if !cur.is_empty() => runs.push(std::mem::take(&mut cur)),
            None => {}
        }
    }
    if !cur.is_empty() {
        runs.push(cur);
    }
    runs
}

/// Helper that draws to any Plotters backend.
fn draw_chart<DB>(
    root: DrawingArea<DB, Shift>,
    table: &MacroTable,
    title: &str,
    locale_tag: &str,
) -> Result<()>
where
    DB: DrawingBackend,
{
    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;

    let years = table.years();
    let (mut min_year, mut max_year) = match (years.first(), years.last()) {
        (Some(a), Some(b)) => (*a, *b),
        _ => return Err(anyhow!("no valid years")),
    };
    if min_year == max_year {
        min_year -= 1;
        max_year += 1;
    }

    let values: Vec<f64> = table
        .rows()
        .flat_map(|(_, r)| r.iter().flatten().copied())
        .collect();
    if values.is_empty() {
        return Err(anyhow!("no numeric values to plot"));
    }
    let (mut min_val, mut max_val) = (
        values.iter().cloned().fold(f64::INFINITY, f64::min),
        values.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
    );
    if (max_val - min_val).abs() < f64::EPSILON {
        min_val -= 1.0;
        max_val += 1.0;
    }

    // Percent-like units are not scaled; currencies and counts are.
    let base_unit = derive_axis_unit(table.columns());
    let max_abs = min_val.abs().max(max_val.abs());
    let (yscale, scale_word) = match base_unit.as_deref() {
        Some(unit) if is_percentage_like(unit) => (1.0, ""),
        _ => choose_axis_scale(max_abs),
    };
    let y_axis_title = match (base_unit.as_deref(), scale_word) {
        (Some(u), "") => u.to_string(),
        (Some(u), sw) => format!("{u} ({sw})"),
        (None, "") => "Value".to_string(),
        (None, sw) => format!("Value ({sw})"),
    };

    let (num_locale, dec_sep) = map_locale(locale_tag);
    let tick = |v: f64| format_tick(v, num_locale, dec_sep);
    let x_label_fmt = |x: &f64| (x.round() as i32).to_string();
    let y_label_fmt = |v: &f64| tick(*v);
    let x_label_count = ((max_year - min_year + 1) as usize).min(12);
    let y_label_count = 10usize;
    let left_label_width_px =
        compute_left_label_area_px(min_val / yscale, max_val / yscale, y_label_count, 12, &tick);

    let caption = if title.trim().is_empty() {
        DEFAULT_TITLE
    } else {
        title.trim()
    };

    let mut chart = ChartBuilder::on(&root)
        .margin(16)
        .caption(caption, (FontFamily::SansSerif, 22))
        .set_label_area_size(LabelAreaPosition::Left, left_label_width_px)
        .set_label_area_size(LabelAreaPosition::Bottom, 48)
        .build_cartesian_2d(
            min_year as f64..max_year as f64,
            (min_val / yscale)..(max_val / yscale),
        )
        .map_err(|e| anyhow!("{:?}", e))?;

    chart
        .configure_mesh()
        .x_desc("Year")
        .y_desc(y_axis_title)
        .x_labels(x_label_count)
        .y_labels(y_label_count)
        .x_label_formatter(&x_label_fmt)
        .y_label_formatter(&y_label_fmt)
        .label_style((FontFamily::SansSerif, 12))
        .axis_desc_style((FontFamily::SansSerif, 14))
        .draw()
        .map_err(|e| anyhow!("{:?}", e))?;

    let (root_w, _) = root.dim_in_pixel();
    let legend_text_px = (root_w / 2).max(120);

    for (idx, label) in table.columns().iter().enumerate() {
        let color = office_color(idx);
        let points: Vec<(f64, Option<f64>)> = table
            .rows()
            .map(|(y, r)| (y as f64, r[idx].map(|v| v / yscale)))
            .collect();

        let legend_label = truncate_to_width(label, 12, legend_text_px);
        let mut labelled = false;
        for run in contiguous_runs(&points) {
            let anno = chart
                .draw_series(LineSeries::new(run, color.stroke_width(2)))
                .map_err(|e| anyhow!("{:?}", e))?;
            if !labelled {
                let legend_color = color.clone();
                anno.label(legend_label.clone()).legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], legend_color.stroke_width(2))
                });
                labelled = true;
            }
        }

        chart
            .draw_series(
                points
                    .iter()
                    .filter_map(|(x, v)| v.map(|v| Circle::new((*x, v), 3, color.filled()))),
            )
            .map_err(|e| anyhow!("{:?}", e))?;
    }

    chart
        .configure_series_labels()
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(&WHITE.mix(0.85))
        .label_font((FontFamily::SansSerif, 12))
        .draw()
        .map_err(|e| anyhow!("{:?}", e))?;

    root.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_split_on_missing_values() {
        let pts = [
            (2010.0, Some(1.0)),
            (2011.0, None),
            (2012.0, Some(2.0)),
            (2013.0, Some(3.0)),
            (2014.0, None),
        ];
        assert_eq!(
            contiguous_runs(&pts),
            vec![vec![(2010.0, 1.0)], vec![(2012.0, 2.0), (2013.0, 3.0)]]
        );
    }
}
