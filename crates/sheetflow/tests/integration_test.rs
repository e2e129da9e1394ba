//! End-to-end tests across the conversion pipeline.

use std::fs;
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader};
use tempfile::tempdir;

use sheetflow::{
    BatchOrchestrator, CancellationToken, ChunkedConverter, ConversionRequest, FormatSniffer,
    OutputFormat, ReverseConverter, StandardConverter,
};

fn write_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn read_sheet(path: &Path) -> Vec<Vec<Data>> {
    let mut workbook = open_workbook_auto(path).unwrap();
    let name = workbook.sheet_names().to_vec()[0].clone();
    let range = workbook.worksheet_range(&name).unwrap();
    range.rows().map(|r| r.to_vec()).collect()
}

#[test]
fn csv_to_workbook_to_csv_round_trip() {
    let dir = tempdir().unwrap();
    let input = write_file(
        dir.path(),
        "sales.csv",
        b"name,units,price,day\nAlice,30,2.5,2024-01-15\nBob,7,19.99,2024-02-01\n",
    );
    let out = dir.path().join("out");

    let request = ConversionRequest::new(vec![input], OutputFormat::Workbook, out.clone());
    let summary = BatchOrchestrator::new()
        .convert_batch(&request, None, &CancellationToken::new())
        .unwrap();
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.results[0].rows_written, 2);

    let back = dir.path().join("back.csv");
    let rows = ReverseConverter::new()
        .workbook_to_csv(&out.join("sales.xlsx"), &back, None)
        .unwrap();
    assert_eq!(rows, 2);

    let bytes = fs::read(&back).unwrap();
    assert!(bytes.starts_with(&[0xEF, 0xBB, 0xBF]));
    let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
    assert_eq!(
        text,
        "name,units,price,day\nAlice,30,2.5,2024-01-15\nBob,7,19.99,2024-02-01\n"
    );
}

#[test]
fn standard_and_chunked_paths_agree() {
    let dir = tempdir().unwrap();
    let mut content = String::from("id,label,amount\n");
    for i in 0..25 {
        content.push_str(&format!("{},item{},{}.5\n", i, i, i));
    }
    let input = write_file(dir.path(), "data.csv", content.as_bytes());
    let format = FormatSniffer::new().detect(&input).unwrap();

    let standard_path = dir.path().join("standard.xlsx");
    let mut workbook = rust_xlsxwriter::Workbook::new();
    StandardConverter::new()
        .convert(&input, &format, workbook.add_worksheet(), None)
        .unwrap();
    workbook.save(&standard_path).unwrap();

    let chunked_path = dir.path().join("chunked.xlsx");
    let mut workbook = rust_xlsxwriter::Workbook::new();
    ChunkedConverter::with_chunk_rows(10)
        .convert(
            &input,
            &format,
            workbook.add_worksheet(),
            None,
            None,
            &CancellationToken::new(),
        )
        .unwrap();
    workbook.save(&chunked_path).unwrap();

    assert_eq!(read_sheet(&standard_path), read_sheet(&chunked_path));
}

#[test]
fn merged_workbook_sheet_names_stay_unique_and_bounded() {
    let dir = tempdir().unwrap();
    // Stems identical for their first 31 characters.
    let long = "a_very_long_quarterly_report_name";
    let inputs: Vec<PathBuf> = (0..3)
        .map(|i| write_file(dir.path(), &format!("{}_{}.csv", long, i), b"h\n1\n"))
        .collect();
    let out = dir.path().join("out");

    let mut request = ConversionRequest::new(inputs, OutputFormat::Workbook, out.clone());
    request.merged_workbook = Some("merged".to_string());

    let summary = BatchOrchestrator::new()
        .convert_batch(&request, None, &CancellationToken::new())
        .unwrap();
    assert_eq!(summary.succeeded, 3);

    let mut workbook = open_workbook_auto(out.join("merged.xlsx")).unwrap();
    let names = workbook.sheet_names().to_vec();
    assert_eq!(names.len(), 3);
    let mut lowered: Vec<String> = names.iter().map(|n| n.to_lowercase()).collect();
    lowered.sort();
    lowered.dedup();
    assert_eq!(lowered.len(), 3);
    for name in &names {
        assert!(name.chars().count() <= 31, "'{}' exceeds 31 chars", name);
    }
}

#[test]
fn shift_jis_input_survives_conversion() {
    let dir = tempdir().unwrap();
    let (encoded, _, _) = encoding_rs::SHIFT_JIS.encode("名前,値\nテスト,30\n");
    let input = write_file(dir.path(), "jp.csv", &encoded);
    let out = dir.path().join("out");

    let request = ConversionRequest::new(vec![input], OutputFormat::Workbook, out.clone());
    let summary = BatchOrchestrator::new()
        .convert_batch(&request, None, &CancellationToken::new())
        .unwrap();
    assert_eq!(summary.succeeded, 1);

    let rows = read_sheet(&out.join("jp.xlsx"));
    assert_eq!(rows[0][0], Data::String("名前".to_string()));
    assert_eq!(rows[1][0], Data::String("テスト".to_string()));
    assert_eq!(rows[1][1], Data::Float(30.0));
}

#[test]
fn empty_csv_yields_empty_sheet_not_error() {
    let dir = tempdir().unwrap();
    let input = write_file(dir.path(), "empty.csv", b"");
    let out = dir.path().join("out");

    let request = ConversionRequest::new(vec![input], OutputFormat::Workbook, out.clone());
    let summary = BatchOrchestrator::new()
        .convert_batch(&request, None, &CancellationToken::new())
        .unwrap();
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.results[0].rows_written, 0);
    assert!(out.join("empty.xlsx").exists());
}

#[test]
fn small_threshold_forces_chunked_path() {
    let dir = tempdir().unwrap();
    let mut content = String::from("id\n");
    for i in 0..100 {
        content.push_str(&format!("{}\n", i));
    }
    let input = write_file(dir.path(), "big.csv", content.as_bytes());
    let out = dir.path().join("out");

    let mut request = ConversionRequest::new(vec![input], OutputFormat::Workbook, out.clone());
    request.chunk_threshold_bytes = 16;
    let summary = BatchOrchestrator::new()
        .convert_batch(&request, None, &CancellationToken::new())
        .unwrap();
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.results[0].rows_written, 100);
}

#[test]
fn batch_failure_is_isolated_and_reported() {
    let dir = tempdir().unwrap();
    let good = write_file(dir.path(), "good.csv", b"a\n1\n");
    let bad = dir.path().join("missing.csv");
    let out = dir.path().join("out");

    let request =
        ConversionRequest::new(vec![bad, good], OutputFormat::Workbook, out.clone());
    let summary = BatchOrchestrator::new()
        .convert_batch(&request, None, &CancellationToken::new())
        .unwrap();

    assert_eq!(summary.total, 2);
    assert_eq!(summary.failed, 1);
    assert!(!summary.results[0].success);
    assert!(summary.results[1].success);
    assert!(out.join("good.xlsx").exists());
}

#[test]
fn validate_request_is_read_only_and_deterministic() {
    let dir = tempdir().unwrap();
    let input = write_file(dir.path(), "a.csv", b"h,h\n1,2\n");
    let out = dir.path().join("never_made");
    let request = ConversionRequest::new(vec![input], OutputFormat::Workbook, out.clone());

    let orchestrator = BatchOrchestrator::new();
    let first = serde_json::to_string(&orchestrator.validate_request(&request)).unwrap();
    let second = serde_json::to_string(&orchestrator.validate_request(&request)).unwrap();
    assert_eq!(first, second);
    assert!(!out.exists());
}
