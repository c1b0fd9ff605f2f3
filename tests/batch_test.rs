//! End-to-end tests: xlsx files on disk through the batch converter.

mod common;

use common::sample_upd;
use std::fs;
use updxml::{
    read_grid, BatchConverter, Cell, ConverterConfig, FileStatus, OutputEncoding, UpdConverter,
};

#[test]
fn test_reader_preserves_absolute_coordinates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("upd.xlsx");
    fs::write(&path, sample_upd().to_xlsx()).unwrap();

    let grid = read_grid(&path).unwrap();
    assert_eq!(grid.get(1, 1), &Cell::from("Счет-фактура №"));
    assert_eq!(grid.get(1, 15), &Cell::from("А-17"));
    assert_eq!(grid.get(15, 26), &Cell::Number(100.0));
    assert_eq!(grid.get(10, 56), &Cell::from("6901000000 / 690101001"));
    assert!(grid.get(0, 0).is_empty());
}

#[test]
fn test_batch_continues_after_failures() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("upd.xlsx");
    let corrupt = dir.path().join("broken.xlsx");
    let not_a_sheet = dir.path().join("notes.xlsx");
    fs::write(&good, sample_upd().to_xlsx()).unwrap();
    fs::write(&corrupt, b"PK\x03\x04 definitely not a zip archive").unwrap();
    fs::write(&not_a_sheet, "just some text").unwrap();

    let out = dir.path().join("xml");
    let batch = BatchConverter::new(UpdConverter::default());
    let mut progress = Vec::new();
    let report = batch
        .convert_all(&[&corrupt, &good, &not_a_sheet], &out, |p| {
            progress.push(p.current)
        })
        .unwrap();

    assert_eq!(progress, vec![1, 2, 3]);
    assert_eq!(report.succeeded(), 1);
    assert_eq!(report.failed(), 2);
    assert!(!report.outcomes[0].is_success());
    assert!(report.outcomes[1].is_success());
    assert_eq!(report.outcomes[2].file_name, "notes.xlsx");

    match &report.outcomes[1].status {
        FileStatus::Success {
            output_path,
            file_id,
            item_count,
        } => {
            assert_eq!(output_path, &out.join("upd.xml"));
            assert_eq!(*item_count, 3);
            assert!(file_id.starts_with("ON_NSCHFDOPPR_6901000000_690101001_"));

            let bytes = fs::read(output_path).unwrap();
            assert!(bytes.starts_with(b"<?xml version=\"1.0\" encoding=\"windows-1251\"?>\n"));
            let (text, _, had_errors) = encoding_rs::WINDOWS_1251.decode(&bytes);
            assert!(!had_errors);
            assert!(text.contains(&format!("ИдФайл=\"{}\"", file_id)));
            assert!(text.contains("НаимОрг=\"ООО &quot;Ромашка&quot;\""));
        }
        FileStatus::Failed { message } => panic!("conversion failed: {}", message),
    }

    match &report.outcomes[2].status {
        FileStatus::Failed { message } => assert!(message.contains("Unknown file format")),
        other => panic!("expected failure, got {:?}", other),
    }
    assert!(!out.join("broken.xml").exists());
}

#[test]
fn test_utf8_output_encoding() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("upd.xlsx");
    fs::write(&input, sample_upd().to_xlsx()).unwrap();

    let config = ConverterConfig::default().with_encoding(OutputEncoding::Utf8);
    let written = UpdConverter::new(config)
        .convert_file(&input, dir.path())
        .unwrap();

    let text = fs::read_to_string(&written.output_path).unwrap();
    assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(text.contains("Кабель ВВГ"));
}

#[test]
fn test_unencodable_text_is_written_as_references() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("cn.xlsx");
    let sheet = sample_upd().set(16, 9, "Розетка 插座 двойная");
    fs::write(&input, sheet.to_xlsx()).unwrap();

    let batch = BatchConverter::new(UpdConverter::default());
    let report = batch.convert_all(&[&input], dir.path(), |_| {}).unwrap();
    assert!(report.all_succeeded());

    let FileStatus::Success { output_path, .. } = &report.outcomes[0].status else {
        panic!("expected success, got {:?}", report.outcomes[0].status);
    };
    let bytes = fs::read(output_path).unwrap();
    let (text, _, had_errors) = encoding_rs::WINDOWS_1251.decode(&bytes);
    assert!(!had_errors);
    assert!(text.contains("НаимТов=\"Розетка &#25554;&#24231; двойная\""));
}

#[cfg(feature = "async")]
#[tokio::test]
async fn test_convert_file_async() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("upd.xlsx");
    fs::write(&input, sample_upd().to_xlsx()).unwrap();

    let written = UpdConverter::default()
        .convert_file_async(&input, dir.path())
        .await
        .unwrap();
    assert_eq!(written.item_count, 3);
    assert!(written.output_path.exists());
}
