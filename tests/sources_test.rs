//! File-backed source tests. Files are written under the system temp dir.

use earnings_alpha::sources::{load_watchlist, JsonFileSource, SeriesSource};
use earnings_alpha::AppError;
use std::fs;
use std::path::PathBuf;

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("earnings_alpha_{}_{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_load_series_from_cache_file() {
    let dir = temp_dir("series");
    fs::write(
        dir.join("RELIANCE_ohlcv.json"),
        r#"[
            {"date": "2024-10-02T00:00:00+05:30", "open": 2900, "high": 2950,
             "low": 2880, "close": 2930, "volume": 100000},
            {"date": "2024-10-01", "open": 2850, "high": 2910,
             "low": 2840, "close": 2900, "volume": 90000.0}
        ]"#,
    )
    .unwrap();

    let source = JsonFileSource::new(&dir);
    let series = source.load("RELIANCE").unwrap();

    assert_eq!(series.symbol(), "RELIANCE");
    assert_eq!(series.len(), 2);
    assert!(series.get(0).unwrap().date < series.get(1).unwrap().date);
    assert_eq!(series.get(0).unwrap().volume, 90_000);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_missing_series_is_not_found() {
    let dir = temp_dir("missing");
    let source = JsonFileSource::new(&dir);
    assert!(matches!(source.load("NOPE"), Err(AppError::NotFound(_))));
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_corrupt_series_is_parse_error() {
    let dir = temp_dir("corrupt");
    fs::write(dir.join("BAD_ohlcv.json"), "{not json").unwrap();
    let source = JsonFileSource::new(&dir);
    assert!(matches!(source.load("BAD"), Err(AppError::SerdeJson(_))));
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_load_watchlist_file() {
    let dir = temp_dir("watchlist");
    let path = dir.join("stockSymbolDetails.json");
    fs::write(
        &path,
        r#"[{"symbol": "HDFCBANK", "instrument_token": 341249,
             "earnings_dates": ["2024-07-20", "2024-10-19"]}]"#,
    )
    .unwrap();

    let watchlist = load_watchlist(&path).unwrap();
    let entry = watchlist.get("HDFCBANK").unwrap();
    assert_eq!(entry.events().len(), 2);
    assert_eq!(entry.events()[0].date.to_string(), "2024-10-19");

    let _ = fs::remove_dir_all(&dir);
}
