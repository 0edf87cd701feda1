use std::fs;

use azpak::{Archive, ArchiveBuilder, Compression};

#[test]
fn file_round_trip_identity() {
    let dir = tempfile::tempdir().unwrap();
    let contents: [(&str, &[u8]); 3] = [
        ("docs/readme.txt", b"hello from the docs"),
        ("img/logo.bin", &[0u8, 1, 2, 3, 254, 255]),
        ("data/table.csv", b"a,b\n1,2\n"),
    ];

    let mut builder = ArchiveBuilder::new();
    for (i, (virtual_path, data)) in contents.iter().enumerate() {
        let src = dir.path().join(format!("src{i}"));
        fs::write(&src, data).unwrap();
        assert!(builder.add_file(&src, *virtual_path));
    }

    let out = dir.path().join("bundle.zap");
    builder.build_file(&out, Compression::None).unwrap();

    let mut archive = Archive::open_file(&out).unwrap();
    assert_eq!(archive.file_count(), contents.len());
    assert_eq!(
        archive.file_list(),
        vec!["data/table.csv", "docs/readme.txt", "img/logo.bin"]
    );

    for (virtual_path, data) in contents {
        assert_eq!(archive.data(virtual_path).unwrap(), data);
        assert_eq!(archive.raw_data(virtual_path).unwrap(), data);
    }
}

#[test]
fn concrete_scenario_missing_source() {
    let dir = tempfile::tempdir().unwrap();
    let readme = dir.path().join("readme.txt");
    let text: &[u8; 37] = b"this readme file is 37 bytes long!!!\n";
    fs::write(&readme, text).unwrap();

    let mut builder = ArchiveBuilder::new();
    assert!(builder.add_file(&readme, "docs/readme.txt"));
    assert!(builder.add_file(dir.path().join("missing.bin"), "img/logo.bin"));

    let out = dir.path().join("sample.zap");
    builder.build_file(&out, Compression::None).unwrap();

    let mut archive = Archive::open_file(&out).unwrap();
    assert_eq!(archive.file_count(), 2);
    assert_eq!(archive.entry("docs/readme.txt").unwrap().decompressed_size, 37);
    assert!(archive.data("img/logo.bin").is_err());
    assert_eq!(archive.data("docs/readme.txt").unwrap(), text);
}

#[test]
fn corrupt_magic_refuses_to_open() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("a.txt");
    fs::write(&src, b"payload").unwrap();

    let mut builder = ArchiveBuilder::new();
    builder.add_file(&src, "a.txt");
    let out = dir.path().join("ok.zap");
    builder.build_file(&out, Compression::None).unwrap();

    let mut bytes = fs::read(&out).unwrap();
    bytes[0] ^= 0xFF;
    let bad = dir.path().join("bad.zap");
    fs::write(&bad, &bytes).unwrap();

    assert!(Archive::open_file(&bad).is_err());
    // The intact copy still opens.
    assert!(Archive::open_file(&out).is_ok());
}

#[cfg(feature = "zstd")]
#[test]
fn file_round_trip_zstd_with_external_decode() {
    let dir = tempfile::tempdir().unwrap();
    let data = b"a very repetitive asset payload ".repeat(128);
    let src = dir.path().join("asset.bin");
    fs::write(&src, &data).unwrap();

    let mut builder = ArchiveBuilder::new();
    builder.add_file(&src, "asset.bin");
    let out = dir.path().join("packed.zap");
    builder.build_file(&out, Compression::Zstd).unwrap();

    let mut archive = Archive::open_file(&out).unwrap();
    let entry = archive.entry("asset.bin").unwrap();
    assert_eq!(entry.decompressed_size as usize, data.len());
    assert!(entry.compressed_size < entry.decompressed_size);

    assert_eq!(archive.data("asset.bin").unwrap(), data);

    // The stored form plus the stored decompressed size is enough to
    // decode without going through the reader.
    let raw = archive.raw_data("asset.bin").unwrap();
    assert_ne!(raw, data);
    let decoded = zstd::bulk::decompress(&raw, entry.decompressed_size as usize).unwrap();
    assert_eq!(decoded, data);
}

#[test]
fn extract_skips_bad_entries_and_writes_the_rest() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.txt");
    fs::write(&good, b"survives").unwrap();

    let mut builder = ArchiveBuilder::new();
    builder.add_file(&good, "keep/good.txt");
    builder.add_file(dir.path().join("nope"), "keep/broken.bin");

    let out = dir.path().join("mixed.zap");
    builder.build_file(&out, Compression::None).unwrap();

    let extracted = dir.path().join("extracted");
    azpak::zap::extract(&out, &extracted, false).unwrap();

    assert_eq!(fs::read(extracted.join("keep/good.txt")).unwrap(), b"survives");
    assert!(!extracted.join("keep/broken.bin").exists());
}

#[test]
fn memory_and_file_builds_are_identical() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("x.bin");
    fs::write(&src, b"same bytes either way").unwrap();

    let mut builder = ArchiveBuilder::new();
    builder.add_file(&src, "x.bin");

    let from_memory = builder.build_memory(Compression::None).unwrap();
    let out = dir.path().join("x.zap");
    builder.build_file(&out, Compression::None).unwrap();
    let from_file = fs::read(&out).unwrap();

    assert_eq!(from_memory, from_file);
}
