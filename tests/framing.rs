use anyhow::Result;
use ironbatch::testing::*;
use ironbatch::*;

fn validating() -> ReaderConfig {
    ReaderConfig::default().with_framing_validation(true)
}

fn write_sample(dir: &TempDirPath, name: &str) -> Result<FileMetadata> {
    BatchFileBuilder::new(sample_schema())
        .sample_batches([0..6, 6..12])
        .write_metadata(dir.path(), name)
}

#[test]
fn valid_file_passes_validation() -> Result<()> {
    let dir = TempDirPath::new()?;
    let metadata = write_sample(&dir, "ok.batch")?;
    let fs = CountingFileSystem::new(LocalFileSystem);
    let mut reader = BatchFileReader::with_config(&fs, dir.path(), &metadata, validating());

    let windows = reader.read(4, 8)?;
    assert_windows_cover(&windows, 4, 8);
    assert_eq!(fs.attribute_calls(), 1);

    // Validation happens once, at open.
    reader.read(0, 1)?;
    assert_eq!(fs.attribute_calls(), 1);
    Ok(())
}

#[test]
fn bad_magic_fails_with_validation() -> Result<()> {
    let dir = TempDirPath::new()?;
    let metadata = write_sample(&dir, "magic.batch")?;
    corrupt_trailing_magic(dir.file_path("magic.batch"))?;

    let fs = LocalFileSystem;
    let mut reader = BatchFileReader::with_config(&fs, dir.path(), &metadata, validating());
    let err = reader.read(0, 3).unwrap_err();
    assert!(err.is_data_format(), "got {err:?}");
    assert!(err.to_string().contains("magic"), "got {err}");
    assert!(!reader.is_open());
    Ok(())
}

#[test]
fn bad_magic_is_ignored_without_validation() -> Result<()> {
    let dir = TempDirPath::new()?;
    let metadata = write_sample(&dir, "magic.batch")?;
    corrupt_trailing_magic(dir.file_path("magic.batch"))?;

    let fs = LocalFileSystem;
    let mut reader = BatchFileReader::new(&fs, dir.path(), &metadata);
    assert!(!reader.config().validate_framing);
    let windows = reader.read(0, 12)?;
    assert_windows_cover(&windows, 0, 12);
    Ok(())
}

#[test]
fn footer_offset_out_of_bounds_is_rejected() -> Result<()> {
    let dir = TempDirPath::new()?;
    let metadata = write_sample(&dir, "offset.batch")?;
    let path = dir.file_path("offset.batch");
    let size = std::fs::metadata(&path)?.len();

    let fs = LocalFileSystem;
    for bad in [0, 9, size - 18, size, u64::MAX] {
        overwrite_footer_offset(&path, bad)?;
        let mut reader = BatchFileReader::with_config(&fs, dir.path(), &metadata, validating());
        let err = reader.read(0, 1).unwrap_err();
        assert!(err.is_data_format(), "offset {bad} gave {err:?}");
    }
    Ok(())
}

#[test]
fn too_small_file_is_rejected() -> Result<()> {
    let dir = TempDirPath::new()?;
    let metadata = write_sample(&dir, "small.batch")?;
    truncate_file(dir.file_path("small.batch"), 27)?;

    let fs = LocalFileSystem;
    let mut reader = BatchFileReader::with_config(&fs, dir.path(), &metadata, validating());
    let err = reader.read(0, 1).unwrap_err();
    assert!(err.is_data_format());
    assert!(err.to_string().contains("too small"), "got {err}");
    Ok(())
}

#[test]
fn truncated_batch_is_a_format_error() -> Result<()> {
    let dir = TempDirPath::new()?;
    let metadata = write_sample(&dir, "cut.batch")?;
    truncate_file(dir.file_path("cut.batch"), metadata.footer.batches[1].offset + 12)?;

    let fs = LocalFileSystem;
    let mut reader = BatchFileReader::new(&fs, dir.path(), &metadata);
    let windows = reader.read(0, 6)?;
    assert_windows_cover(&windows, 0, 6);
    let err = reader.read(6, 6).unwrap_err();
    assert!(err.is_data_format(), "got {err:?}");
    Ok(())
}

#[test]
fn load_reads_footer_and_schema() -> Result<()> {
    let dir = TempDirPath::new()?;
    let written = BatchFileBuilder::new(sample_schema())
        .sample_batches([0..3])
        .empty_batch()
        .sample_batches([3..9])
        .write_metadata(dir.path(), "nested/load.batch")?;

    let fs = LocalFileSystem;
    let loaded = FileMetadata::load(&fs, dir.path(), "nested/load.batch")?;
    assert_eq!(loaded.footer, written.footer);
    assert_eq!(loaded.record_count, 9);
    assert_eq!(loaded.schema, Some(sample_schema()));
    assert_eq!(loaded.path, written.path);

    let mut reader = BatchFileReader::new(&fs, dir.path(), &loaded);
    let windows = reader.read(2, 5)?;
    assert_windows_cover(&windows, 2, 5);
    Ok(())
}

#[test]
fn load_rejects_damaged_files() -> Result<()> {
    let dir = TempDirPath::new()?;
    write_sample(&dir, "a.batch")?;
    write_sample(&dir, "b.batch")?;
    write_sample(&dir, "c.batch")?;
    corrupt_trailing_magic(dir.file_path("a.batch"))?;
    overwrite_footer_offset(dir.file_path("b.batch"), 4)?;
    truncate_file(dir.file_path("c.batch"), 20)?;

    let fs = LocalFileSystem;
    for name in ["a.batch", "b.batch", "c.batch"] {
        let err = FileMetadata::load(&fs, dir.path(), name).unwrap_err();
        assert!(err.is_data_format(), "{name} gave {err:?}");
    }
    Ok(())
}

#[test]
fn load_rejects_garbage_footer() -> Result<()> {
    let dir = TempDirPath::new()?;
    write_sample(&dir, "g.batch")?;
    let path = dir.file_path("g.batch");
    let size = std::fs::metadata(&path)?.len();
    // Point the footer at the first batch; the bytes there are not a footer.
    overwrite_footer_offset(&path, 10)?;
    assert!(size > 28);

    let fs = LocalFileSystem;
    let err = FileMetadata::load(&fs, dir.path(), "g.batch").unwrap_err();
    assert!(err.is_data_format(), "got {err:?}");
    Ok(())
}

#[test]
fn load_missing_file_is_io_error() -> Result<()> {
    let dir = TempDirPath::new()?;
    let fs = LocalFileSystem;
    let err = FileMetadata::load(&fs, dir.path(), "missing.batch").unwrap_err();
    assert!(matches!(err, Error::Io { .. }), "got {err:?}");
    Ok(())
}

#[test]
fn load_rejects_overflowing_record_counts() -> Result<()> {
    let dir = TempDirPath::new()?;
    let path = dir.file_path("huge.batch");
    write_index_only(
        &path,
        &sample_schema(),
        &[BatchSummary::new(10, u64::MAX), BatchSummary::new(10, 2)],
    )?;

    let fs = LocalFileSystem;
    let err = FileMetadata::load(&fs, dir.path(), "huge.batch").unwrap_err();
    assert!(err.is_data_format(), "got {err:?}");
    assert!(err.to_string().contains("overflow"), "got {err}");
    Ok(())
}

#[test]
fn load_accepts_index_without_overflow() -> Result<()> {
    let dir = TempDirPath::new()?;
    write_index_only(
        dir.file_path("index.batch"),
        &sample_schema(),
        &[BatchSummary::new(10, u64::MAX - 2), BatchSummary::new(10, 2)],
    )?;

    let loaded = FileMetadata::load(&LocalFileSystem, dir.path(), "index.batch")?;
    assert_eq!(loaded.record_count, u64::MAX);
    Ok(())
}
