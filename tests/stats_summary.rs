use wbi_macro::MacroTable;
use wbi_macro::stats::column_summary;

#[test]
fn column_stats_handle_missing_and_median_even_odd() {
    // A: [1,2,3,4] -> median 2.5
    // B: [10, None, 30, None] -> missing 2, median 20
    let table = MacroTable::new(
        vec![2021, 2018, 2019, 2020],
        vec!["A".into(), "B".into()],
        vec![
            vec![Some(4.0), None],
            vec![Some(1.0), Some(10.0)],
            vec![Some(2.0), None],
            vec![Some(3.0), Some(30.0)],
        ],
    )
    .unwrap();

    let got = column_summary(&table);
    assert_eq!(got.len(), 2);

    let a = &got[0];
    assert_eq!(a.label, "A");
    assert_eq!(a.count, 4);
    assert_eq!(a.missing, 0);
    assert_eq!(a.min, Some(1.0));
    assert_eq!(a.max, Some(4.0));
    assert_eq!(a.mean, Some(2.5));
    assert_eq!(a.median, Some(2.5));

    let b = &got[1];
    assert_eq!(b.count, 2);
    assert_eq!(b.missing, 2);
    assert_eq!(b.mean, Some(20.0));
    assert_eq!(b.median, Some(20.0));
}

#[test]
fn all_missing_column_has_no_stats() {
    let table = MacroTable::new(
        vec![2010, 2011],
        vec!["Gini index".into(), "GDP".into()],
        vec![vec![None, Some(1.0)], vec![None, Some(3.0)]],
    )
    .unwrap();
    let got = column_summary(&table);
    assert_eq!(got[0].count, 0);
    assert_eq!(got[0].missing, 2);
    assert_eq!(got[0].min, None);
    assert_eq!(got[0].median, None);
    assert_eq!(got[1].median, Some(2.0));
}
