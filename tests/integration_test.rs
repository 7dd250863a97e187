use maj::codec::encode_u64;
use maj::header::{Header, HeaderError, HEADER_SIZE};
use maj::index::IndexTable;
use maj::io_stream::MajWriter;
use maj::package::PackageManager;
use maj::Error;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use tempfile::tempdir;

fn write_tree(root: &Path, files: &[(&str, &[u8])]) {
    for (path, data) in files {
        let mut full = root.to_path_buf();
        full.extend(path.split('/'));
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(&full, data).unwrap();
    }
}

fn collect_tree(root: &Path) -> Vec<(String, Vec<u8>)> {
    fn walk(root: &Path, dir: &Path, out: &mut Vec<(String, Vec<u8>)>) {
        let mut children: Vec<_> = fs::read_dir(dir).unwrap().map(|e| e.unwrap()).collect();
        children.sort_by_key(|e| e.file_name());
        for child in children {
            let path = child.path();
            if path.is_dir() {
                walk(root, &path, out);
            } else {
                let rel = path
                    .strip_prefix(root)
                    .unwrap()
                    .components()
                    .map(|c| c.as_os_str().to_str().unwrap().to_owned())
                    .collect::<Vec<_>>()
                    .join("/");
                out.push((rel, fs::read(&path).unwrap()));
            }
        }
    }
    let mut out = Vec::new();
    walk(root, root, &mut out);
    out
}

fn quiet_manager(workdir: &Path) -> PackageManager {
    let log = maj::Log::to_file(workdir.join("test.log")).unwrap();
    PackageManager::with_log(log)
}

#[test]
fn test_pack_install_roundtrip() {
    let workdir = tempdir().unwrap();
    let source = workdir.path().join("source");
    let binary: Vec<u8> = (0u8..=255).cycle().take(100_000).collect();
    let files: Vec<(&str, &[u8])> = vec![
        ("a.txt", b"abc".as_slice()),
        ("empty.bin", b"".as_slice()),
        ("sub/b.txt", b"hello from a subdirectory".as_slice()),
        ("sub/deep/c.bin", binary.as_slice()),
    ];
    fs::create_dir(&source).unwrap();
    write_tree(&source, &files);

    let package = workdir.path().join("release.maj");
    let dest = workdir.path().join("installed");

    let mut pm = quiet_manager(workdir.path());
    pm.create(&source, &package).unwrap();
    pm.install(&package, &dest).unwrap();

    assert_eq!(collect_tree(&dest), collect_tree(&source));
}

#[test]
fn test_known_tree_header_numbers() {
    let workdir = tempdir().unwrap();
    let source = workdir.path().join("source");
    fs::create_dir(&source).unwrap();
    write_tree(&source, &[("a.txt", b"abc"), ("sub/b.txt", b"")]);

    let package = workdir.path().join("known.maj");
    let mut pm = quiet_manager(workdir.path());
    let header = pm.create(&source, &package).unwrap();

    // Records: (8 + 5 + 8) for "a.txt" and (8 + 9 + 8) for "sub/b.txt".
    assert_eq!(header.index_size, 46);
    assert_eq!(header.data_size, 3);
    assert_eq!(header.file_size, 77);
    assert_eq!(fs::metadata(&package).unwrap().len(), 77);
}

#[test]
fn test_empty_directory() {
    let workdir = tempdir().unwrap();
    let source = workdir.path().join("source");
    fs::create_dir(&source).unwrap();

    let package = workdir.path().join("empty.maj");
    let dest = workdir.path().join("installed");

    let mut pm = quiet_manager(workdir.path());
    let header = pm.create(&source, &package).unwrap();
    assert_eq!(header.index_size, 0);
    assert_eq!(header.data_size, 0);
    assert_eq!(header.file_size, HEADER_SIZE);
    assert_eq!(fs::metadata(&package).unwrap().len(), HEADER_SIZE);

    pm.install(&package, &dest).unwrap();
    assert!(dest.is_dir());
    assert_eq!(fs::read_dir(&dest).unwrap().count(), 0);
}

#[test]
fn test_magic_rejection_before_index() {
    let workdir = tempdir().unwrap();
    let package = workdir.path().join("bad.maj");

    // Valid layout except for the magic number; the index bytes are
    // garbage on purpose, since a bad magic must abort before they are
    // read.
    let mut bytes = Vec::new();
    Header::new(4, 0).write(&mut bytes).unwrap();
    bytes[0] = b'X';
    bytes.extend_from_slice(&[0xFF; 4]);
    fs::write(&package, &bytes).unwrap();

    let mut pm = quiet_manager(workdir.path());
    let err = pm.open(&package).unwrap_err();
    assert!(matches!(err, Error::Header(HeaderError::InvalidMagic)));
}

#[test]
fn test_size_arithmetic_rejection() {
    let workdir = tempdir().unwrap();
    let package = workdir.path().join("bad.maj");

    let mut header = Header::new(0, 0);
    header.file_size += 1;
    let mut bytes = Vec::new();
    header.write(&mut bytes).unwrap();
    fs::write(&package, &bytes).unwrap();

    let mut pm = quiet_manager(workdir.path());
    let err = pm.open(&package).unwrap_err();
    assert!(matches!(
        err,
        Error::Header(HeaderError::SizeMismatch { .. })
    ));
}

#[test]
fn test_truncated_index_fails() {
    let workdir = tempdir().unwrap();
    let source = workdir.path().join("source");
    fs::create_dir(&source).unwrap();
    write_tree(&source, &[("a.txt", b"abc")]);

    let package = workdir.path().join("truncated.maj");
    let mut pm = quiet_manager(workdir.path());
    let header = pm.create(&source, &package).unwrap();

    // Chop one byte out of the index segment; the declared budget no
    // longer fits in the stream.
    let bytes = fs::read(&package).unwrap();
    let cut = (HEADER_SIZE + header.index_size - 1) as usize;
    fs::write(&package, &bytes[..cut]).unwrap();

    let err = pm.open(&package).unwrap_err();
    assert!(matches!(err, Error::Index(_)));
}

#[test]
fn test_order_sensitivity_of_data_segment() {
    let workdir = tempdir().unwrap();
    let dest = workdir.path().join("installed");
    let package = workdir.path().join("swapped.maj");

    // Hand-built package whose index lists entries in the OPPOSITE
    // order to the data bytes.  The format has no per-entry offsets, so
    // installation must slice the data segment wrongly; that order
    // coupling is part of the format, not a bug.
    let mut bytes = Vec::new();
    Header::new(42, 6).write(&mut bytes).unwrap();
    for (name, size) in [("b.txt", 2u64), ("a.txt", 4u64)] {
        bytes.extend_from_slice(&encode_u64(name.len() as u64));
        bytes.extend_from_slice(name.as_bytes());
        bytes.extend_from_slice(&encode_u64(size));
    }
    // Data written for a.txt = "aaaa" then b.txt = "bb".
    bytes.extend_from_slice(b"aaaabb");
    fs::write(&package, &bytes).unwrap();

    let mut pm = quiet_manager(workdir.path());
    pm.install(&package, &dest).unwrap();

    assert_eq!(fs::read(dest.join("b.txt")).unwrap(), b"aa");
    assert_eq!(fs::read(dest.join("a.txt")).unwrap(), b"aabb");
}

#[test]
fn test_install_into_existing_destination() {
    let workdir = tempdir().unwrap();
    let source = workdir.path().join("source");
    fs::create_dir(&source).unwrap();
    write_tree(&source, &[("a.txt", b"abc")]);

    let package = workdir.path().join("release.maj");
    let dest = workdir.path().join("installed");
    fs::create_dir(&dest).unwrap();

    // Pre-existing destination degrades to a warning, not an error.
    let mut pm = quiet_manager(workdir.path());
    pm.create(&source, &package).unwrap();
    pm.install(&package, &dest).unwrap();
    assert_eq!(fs::read(dest.join("a.txt")).unwrap(), b"abc");
}

#[test]
fn test_create_rejects_relative_source() {
    let workdir = tempdir().unwrap();
    let mut pm = quiet_manager(workdir.path());
    let err = pm
        .create("relative/source", workdir.path().join("out.maj"))
        .unwrap_err();
    assert!(matches!(err, Error::SourceNotAbsolute(_)));
}

#[test]
fn test_create_rejects_missing_source() {
    let workdir = tempdir().unwrap();
    let missing = workdir.path().join("no-such-directory");
    let mut pm = quiet_manager(workdir.path());
    let err = pm.create(&missing, workdir.path().join("out.maj")).unwrap_err();
    assert!(matches!(err, Error::SourceNotFound(_)));
}

#[test]
fn test_pack_detects_file_grown_after_scan() {
    let workdir = tempdir().unwrap();
    let source = workdir.path().join("source");
    fs::create_dir(&source).unwrap();
    write_tree(&source, &[("a.txt", b"abc")]);

    // Scan first, then grow the file behind the index's back.
    let index = IndexTable::from_directory(&source).unwrap();
    let header = Header::new(index.encoded_len(), index.data_len());
    OpenOptions::new()
        .append(true)
        .open(source.join("a.txt"))
        .unwrap()
        .write_all(b"defg")
        .unwrap();

    let mut writer = MajWriter::new(Vec::new());
    let err = writer.pack(&header, &source, &index).unwrap_err();
    assert!(matches!(err, Error::EntrySizeMismatch { .. }));
}
