use std::fs;
use wbi_macro::MacroTable;
use wbi_macro::viz;

fn sample_table() -> MacroTable {
    MacroTable::new(
        vec![2019, 2020, 2021, 2022],
        vec![
            "Unemployment, total (% of labor force)".into(),
            "Tax revenue (% of GDP)".into(),
            "GDP (current US$)".into(),
        ],
        vec![
            vec![Some(5.3), Some(11.0), Some(2.8e12)],
            vec![Some(8.0), None, Some(2.6e12)],
            vec![Some(6.4), Some(11.7), Some(3.1e12)],
            vec![Some(4.8), Some(12.0), Some(3.3e12)],
        ],
    )
    .unwrap()
}

#[test]
fn svg_has_title_and_scaled_unit_axis() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("gdp.svg");
    viz::plot_table(&sample_table(), &["GDP (current US$)"], &out, 900, 500, "Key Trends")
        .unwrap();
    let svg = fs::read_to_string(&out).unwrap();
    assert!(svg.contains("<svg"));
    assert!(svg.contains("Key Trends"));
    assert!(svg.contains("current US$ (trillions)"));
}

#[test]
fn mixed_units_fall_back_to_generic_axis_title() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("mixed.svg");
    viz::plot_table(
        &sample_table(),
        &["Unemployment, total (% of labor force)", "Tax revenue (% of GDP)"],
        &out,
        900,
        500,
        "Key Trends",
    )
    .unwrap();
    let svg = fs::read_to_string(&out).unwrap();
    assert!(svg.contains("Value"));
    assert!(!svg.contains("thousands"));
}

#[test]
fn png_is_written_for_large_magnitudes() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("gdp.png");
    viz::plot_table_locale(
        &sample_table(),
        &["GDP (current US$)"],
        &out,
        640,
        360,
        "",
        "de",
    )
    .unwrap();
    let meta = fs::metadata(&out).unwrap();
    assert!(meta.len() > 0);
}

#[test]
fn render_rgb_fills_the_whole_buffer() {
    let buf = viz::render_rgb(
        &sample_table(),
        &["GDP (current US$)", "Unemployment, total (% of labor force)"],
        320,
        200,
        viz::DEFAULT_TITLE,
    )
    .unwrap();
    assert_eq!(buf.len(), 320 * 200 * 3);
    // white background somewhere, and something drawn that is not white
    assert!(buf.chunks(3).any(|px| px == [255, 255, 255]));
    assert!(buf.chunks(3).any(|px| px != [255, 255, 255]));
}

#[test]
fn nothing_to_plot_is_an_error() {
    let table = sample_table();
    let none: [&str; 0] = [];
    assert!(viz::render_rgb(&table, &none, 100, 100, "t").is_err());
    assert!(viz::render_rgb(&table, &["Gini index"], 100, 100, "t").is_err());
}
