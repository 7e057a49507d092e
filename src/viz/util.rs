//! Chart helpers: series colors, axis scaling and units, locale-aware ticks.

use num_format::{Locale, ToFormattedString};
use plotters::prelude::*;
use std::collections::BTreeSet;

use super::text::estimate_text_width_px;

/// Series colors, Office 2013+ chart order.
const SERIES_COLORS: [RGBColor; 10] = [
    RGBColor(0x44, 0x72, 0xC4),
    RGBColor(0xED, 0x7D, 0x31),
    RGBColor(0xA5, 0xA5, 0xA5),
    RGBColor(0xFF, 0xC0, 0x00),
    RGBColor(0x5B, 0x9B, 0xD5),
    RGBColor(0x70, 0xAD, 0x47),
    RGBColor(0x26, 0x44, 0x78),
    RGBColor(0x9E, 0x48, 0x0E),
    RGBColor(0x63, 0x63, 0x63),
    RGBColor(0x99, 0x73, 0x00),
];

/// Color of the `idx`-th charted column; wraps after ten.
#[inline]
pub fn office_color(idx: usize) -> RGBAColor {
    SERIES_COLORS[idx % SERIES_COLORS.len()].to_rgba()
}

const AXIS_SCALES: [(f64, &str); 4] = [
    (1.0e12, "trillions"),
    (1.0e9, "billions"),
    (1.0e6, "millions"),
    (1.0e3, "thousands"),
];

/// Divisor and its word for the largest absolute value on the axis, e.g. `(1e9, "billions")`.
pub fn choose_axis_scale(max_abs: f64) -> (f64, &'static str) {
    AXIS_SCALES
        .iter()
        .copied()
        .find(|(scale, _)| max_abs >= *scale)
        .unwrap_or((1.0, ""))
}

/// Unit in the trailing parentheses of a column label:
/// `"GDP (current US$)"` -> `"current US$"`. `"Gini index"` has none.
pub fn extract_unit_from_label(label: &str) -> Option<String> {
    let (_, rest) = label.rsplit_once('(')?;
    let (inner, _) = rest.split_once(')')?;
    let inner = inner.trim();
    (!inner.is_empty()).then(|| inner.to_string())
}

/// Common unit of the charted columns, if every label carries the same one.
pub fn derive_axis_unit<S: AsRef<str>>(labels: &[S]) -> Option<String> {
    let units: Option<BTreeSet<String>> = labels
        .iter()
        .map(|l| extract_unit_from_label(l.as_ref()))
        .collect();
    match units {
        Some(set) if set.len() == 1 => set.into_iter().next(),
        _ => None,
    }
}

/// Percent-like units are never rescaled.
pub fn is_percentage_like(unit: &str) -> bool {
    let u = unit.to_ascii_lowercase();
    u.contains('%') || u.contains("percent") || u.contains("per cent")
}

/// Number locale and decimal separator for a tag such as `en`, `de` or `fr_FR`.
/// Unknown tags fall back to English.
pub fn map_locale(tag: &str) -> (&'static Locale, char) {
    let lang = tag
        .split(['_', '-'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    match lang.as_str() {
        "de" | "german" => (&Locale::de, ','),
        "fr" => (&Locale::fr, ','),
        "es" => (&Locale::es, ','),
        "it" => (&Locale::it, ','),
        "pt" => (&Locale::pt, ','),
        "nl" => (&Locale::nl, ','),
        _ => (&Locale::en, '.'),
    }
}

/// Y tick label: whole numbers with thousands separators from 100 up, otherwise one or
/// two decimals with the locale's decimal separator.
pub fn format_tick(v: f64, locale: &Locale, dec_sep: char) -> String {
    if v.abs() >= 100.0 {
        return (v.round() as i64).to_formatted_string(locale);
    }
    let decimals = if v.abs() >= 10.0 { 1 } else { 2 };
    let s = format!("{v:.decimals$}");
    match dec_sep {
        '.' => s,
        sep => s.replace('.', sep.encode_utf8(&mut [0; 4])),
    }
}

/// Width of the left label area: the widest formatted tick over `ticks` even steps of
/// the (already scaled) range, plus room for the rotated axis title. Clamped to 48..=160.
pub fn compute_left_label_area_px(
    ymin_scaled: f64,
    ymax_scaled: f64,
    ticks: usize,
    font_px: u32,
    fmt: impl Fn(f64) -> String,
) -> u32 {
    let steps = ticks.max(1);
    let widest = (0..=steps)
        .map(|i| ymin_scaled + (ymax_scaled - ymin_scaled) * i as f64 / steps as f64)
        .map(|v| estimate_text_width_px(&fmt(v), font_px))
        .max()
        .unwrap_or(0);
    widest.saturating_add(30).clamp(48, 160)
}
