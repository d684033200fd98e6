//! Integration tests for the testing utilities.

use anyhow::Result;
use ironbatch::testing::*;
use ironbatch::*;

#[test]
fn builder_files_load_back() -> Result<()> {
    let dir = TempDirPath::new()?;
    let builder = BatchFileBuilder::new(sample_schema())
        .sample_batches([0..2, 2..5])
        .empty_batch();
    let footer = builder.write(dir.file_path("b.batch"))?;

    assert_eq!(footer.batches.len(), 3);
    assert_eq!(footer.batches[2].record_count, 0);
    assert_eq!(footer.non_empty_batches(), 2);

    let (bytes, same) = builder.to_bytes()?;
    assert_eq!(same, footer);
    assert_eq!(std::fs::read(dir.file_path("b.batch"))?, bytes);

    let loaded = FileMetadata::load(&LocalFileSystem, dir.path(), "b.batch")?;
    assert_eq!(loaded.footer, footer);
    assert_eq!(loaded.schema, Some(builder.schema()));
    Ok(())
}

#[test]
fn window_ids_follow_windows() {
    let windows = vec![
        BatchWindow::try_new(sample_batch(0..4), 1, 3).unwrap(),
        BatchWindow::try_new(sample_batch(10..12), 0, 2).unwrap(),
    ];
    assert_eq!(window_ids(&windows), vec![1, 2, 10, 11]);
}

#[test]
#[should_panic(expected = "window sizes add up")]
fn cover_assertion_catches_short_read() {
    let windows = vec![BatchWindow::try_new(sample_batch(0..10), 0, 4).unwrap()];
    assert_windows_cover(&windows, 0, 5);
}

#[test]
#[should_panic(expected = "do not reconstruct")]
fn cover_assertion_catches_wrong_rows() {
    let windows = vec![BatchWindow::try_new(sample_batch(0..10), 2, 6).unwrap()];
    assert_windows_cover(&windows, 0, 4);
}

#[test]
fn counting_fs_sees_reader_lifecycle() -> Result<()> {
    let dir = TempDirPath::new()?;
    let metadata = BatchFileBuilder::new(sample_schema())
        .sample_batches([0..3])
        .write_metadata(dir.path(), "c.batch")?;

    let fs = CountingFileSystem::new(LocalFileSystem);
    let handle = fs.clone();
    let mut reader = BatchFileReader::new(&fs, dir.path(), &metadata);
    reader.read(0, 3)?;
    assert_eq!(handle.open_streams(), 1);
    reader.close();
    assert_eq!(handle.releases(), 1);
    Ok(())
}
