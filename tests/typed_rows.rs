#![cfg(feature = "typed-rows")]

use anyhow::Result;
use ironbatch::testing::*;
use ironbatch::*;
use serde::Deserialize;

#[derive(Debug, PartialEq, Deserialize)]
struct Row {
    id: i64,
    name: Option<String>,
}

#[test]
fn read_rows_decodes_selected_rows() -> Result<()> {
    let dir = TempDirPath::new()?;
    let metadata = BatchFileBuilder::new(sample_schema())
        .sample_batches([0..4, 4..8])
        .write_metadata(dir.path(), "rows.batch")?;

    let fs = LocalFileSystem;
    let mut reader = BatchFileReader::new(&fs, dir.path(), &metadata);
    let rows: Vec<Row> = reader.read_rows(2, 4)?;

    assert_eq!(
        rows,
        vec![
            Row { id: 2, name: Some("row-2".into()) },
            Row { id: 3, name: None },
            Row { id: 4, name: Some("row-4".into()) },
            Row { id: 5, name: Some("row-5".into()) },
        ]
    );
    Ok(())
}

#[test]
fn empty_read_yields_no_rows() -> Result<()> {
    let dir = TempDirPath::new()?;
    let metadata = BatchFileBuilder::new(sample_schema())
        .sample_batches([0..4])
        .write_metadata(dir.path(), "rows.batch")?;

    let fs = LocalFileSystem;
    let mut reader = BatchFileReader::new(&fs, dir.path(), &metadata);
    let rows: Vec<Row> = reader.read_rows(1, 0)?;
    assert!(rows.is_empty());
    Ok(())
}

#[test]
fn mismatched_row_type_is_rows_error() -> Result<()> {
    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Wrong {
        id: String,
    }

    let dir = TempDirPath::new()?;
    let metadata = BatchFileBuilder::new(sample_schema())
        .sample_batches([0..4])
        .write_metadata(dir.path(), "rows.batch")?;

    let fs = LocalFileSystem;
    let mut reader = BatchFileReader::new(&fs, dir.path(), &metadata);
    let err = reader.read_rows::<Wrong>(0, 2).unwrap_err();
    assert!(matches!(err, Error::Rows(_)), "got {err:?}");
    Ok(())
}
