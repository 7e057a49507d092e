use wbi_macro::models::{Country, CountryEntry, DataPoint, Entry, Meta};

#[test]
fn parse_multi_indicator_page() {
    let sample = r#"
    [
      {"page":1,"pages":1,"per_page":"1000","total":2,"sourceid":"2","lastupdated":"2025-07-01"},
      [
        {
          "indicator":{"id":"NY.GDP.MKTP.CD","value":"GDP (current US$)"},
          "country":{"id":"IN","value":"India"},
          "countryiso3code":"IND",
          "date":"2022",
          "value":3353470000000.5,
          "unit":"",
          "obs_status":"",
          "decimal":0
        },
        {
          "indicator":{"id":"SL.UEM.TOTL.ZS","value":"Unemployment, total (% of total labor force) (modeled ILO estimate)"},
          "country":{"id":"IN","value":"India"},
          "countryiso3code":"IND",
          "date":"2022",
          "value":null,
          "unit":"",
          "obs_status":"",
          "decimal":1
        }
      ]
    ]
    "#;

    let v: serde_json::Value = serde_json::from_str(sample).unwrap();
    let arr = v.as_array().unwrap();
    let meta: Meta = serde_json::from_value(arr[0].clone()).unwrap();
    assert_eq!(meta.page, 1);
    assert_eq!(meta.per_page, 1000);
    assert_eq!(meta.total, 2);

    let entries: Vec<Entry> = serde_json::from_value(arr[1].clone()).unwrap();
    let points: Vec<DataPoint> = entries.into_iter().map(DataPoint::from).collect();
    assert_eq!(points[0].indicator_id, "NY.GDP.MKTP.CD");
    assert_eq!(points[0].country_id, "IN");
    assert_eq!(points[0].year, 2022);
    assert_eq!(points[0].value, Some(3_353_470_000_000.5));
    assert_eq!(points[1].value, None);
}

#[test]
fn per_page_accepts_numbers_too() {
    let meta: Meta =
        serde_json::from_str(r#"{"page":2,"pages":3,"per_page":50,"total":120}"#).unwrap();
    assert_eq!(meta.per_page, 50);
    assert_eq!(meta.pages, 3);
}

#[test]
fn parse_country_records() {
    let sample = r#"
    [
      {"id":"IND","iso2Code":"IN","name":"India",
       "region":{"id":"SAS","iso2code":"8S","value":"South Asia"},
       "adminregion":{"id":"SAS","iso2code":"8S","value":"South Asia"},
       "incomeLevel":{"id":"LMC","iso2code":"XN","value":"Lower middle income"},
       "lendingType":{"id":"IBD","iso2code":"XF","value":"IBRD"},
       "capitalCity":"New Delhi","longitude":"77.225","latitude":"28.6353"},
      {"id":"WLD","iso2Code":"1W","name":"World",
       "region":{"id":"NA","iso2code":"NA","value":"Aggregates"},
       "adminregion":{"id":"","iso2code":"","value":""},
       "incomeLevel":{"id":"NA","iso2code":"NA","value":"Aggregates"},
       "lendingType":{"id":"","iso2code":"","value":"Aggregates"},
       "capitalCity":"","longitude":"","latitude":""}
    ]
    "#;

    let entries: Vec<CountryEntry> = serde_json::from_str(sample).unwrap();
    let countries: Vec<Country> = entries.into_iter().map(Country::from).collect();
    assert_eq!(countries[0].name, "India");
    assert_eq!(countries[0].iso2_code, "IN");
    assert_eq!(countries[0].iso3_code, "IND");
    assert_eq!(countries[0].region, "South Asia");
    assert!(!countries[0].is_aggregate());
    assert!(countries[1].is_aggregate());
}
