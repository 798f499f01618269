//! End-to-end extraction tests against synthetic volumes

use apfsdump_core::{Error, ROOT_DIR_ID};
use apfsdump_extract::{ExtractOptions, VolumeExtractor};
use apfsdump_testkit::{SyntheticContainer, SyntheticVolume};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tempfile::TempDir;

fn lenient() -> ExtractOptions {
    ExtractOptions {
        strict: false,
        progress: false,
    }
}

fn strict() -> ExtractOptions {
    ExtractOptions {
        strict: true,
        progress: false,
    }
}

fn output_root(tmp: &TempDir) -> std::path::PathBuf {
    // The extractor expects a root that does not yet exist
    tmp.path().join("extracted")
}

fn mode_of(path: &Path) -> u32 {
    fs::metadata(path).unwrap().permissions().mode() & 0o7777
}

#[test]
fn round_trip_scenario() {
    // One volume with /a.txt (12 bytes), /dir/b.txt (10000 bytes), /link -> a.txt
    let mut vol = SyntheticVolume::new("Macintosh HD");
    vol.add_file(ROOT_DIR_ID, "a.txt", 0o644, b"hello world\n");
    let dir = vol.add_directory(ROOT_DIR_ID, "dir");
    let big: Vec<u8> = (0..10000u32).map(|i| (i % 251) as u8).collect();
    vol.add_file(dir, "b.txt", 0o600, &big);
    vol.add_symlink(ROOT_DIR_ID, "link", "a.txt");

    let mut container = SyntheticContainer::new(vec![vol]);
    let tmp = TempDir::new().unwrap();
    let root = output_root(&tmp);

    let report = VolumeExtractor::new(&mut container, &root, lenient())
        .extract_all()
        .unwrap();

    let out = root.join("Volume 0").join("out");

    let a = out.join("a.txt");
    assert_eq!(fs::read(&a).unwrap(), b"hello world\n");
    assert_eq!(fs::metadata(&a).unwrap().len(), 12);
    assert_eq!(mode_of(&a), 0o644);

    // 10000 bytes: two full 4096-byte reads plus one 1808-byte tail
    let b = out.join("dir").join("b.txt");
    assert_eq!(fs::read(&b).unwrap(), big);
    assert_eq!(mode_of(&b), 0o600);

    let link = out.join("link");
    let meta = fs::symlink_metadata(&link).unwrap();
    assert!(meta.file_type().is_symlink());
    assert_eq!(fs::read_link(&link).unwrap(), Path::new("a.txt"));

    // Entries: a.txt, dir, b.txt, link — each visited exactly once
    assert_eq!(report.volumes.len(), 1);
    assert_eq!(report.volumes[0].objects_processed, 4);
    assert_eq!(report.volumes[0].objects_skipped, 0);
    assert_eq!(report.volumes[0].objects_declared, 4);
}

#[test]
fn non_utf8_symlink_target_round_trips_verbatim() {
    use std::os::unix::ffi::OsStrExt;

    // "caf\xe9": valid as a path byte string, invalid as UTF-8
    let target = b"caf\xe9";
    let mut vol = SyntheticVolume::new("Bytes");
    vol.add_symlink_bytes(ROOT_DIR_ID, "link", target);

    let mut container = SyntheticContainer::new(vec![vol]);
    let tmp = TempDir::new().unwrap();
    let root = output_root(&tmp);

    VolumeExtractor::new(&mut container, &root, strict())
        .extract_all()
        .unwrap();

    let link = root.join("Volume 0").join("out").join("link");
    let read_target = fs::read_link(&link).unwrap();
    assert_eq!(read_target.as_os_str().as_bytes(), target);
}

#[test]
fn compressed_file_extraction() {
    let mut vol = SyntheticVolume::new("Compressed");
    vol.add_compressed_file(ROOT_DIR_ID, "notes.txt", 0o640, b"squeezed contents");

    let mut container = SyntheticContainer::new(vec![vol]);
    let tmp = TempDir::new().unwrap();
    let root = output_root(&tmp);

    VolumeExtractor::new(&mut container, &root, lenient())
        .extract_all()
        .unwrap();

    let path = root.join("Volume 0").join("out").join("notes.txt");
    assert_eq!(fs::read(&path).unwrap(), b"squeezed contents");
    assert_eq!(mode_of(&path), 0o640);
}

#[test]
fn empty_file_extraction() {
    let mut vol = SyntheticVolume::new("Empty");
    vol.add_file(ROOT_DIR_ID, "empty", 0o644, b"");

    let mut container = SyntheticContainer::new(vec![vol]);
    let tmp = TempDir::new().unwrap();
    let root = output_root(&tmp);

    VolumeExtractor::new(&mut container, &root, lenient())
        .extract_all()
        .unwrap();

    let path = root.join("Volume 0").join("out").join("empty");
    assert_eq!(fs::metadata(&path).unwrap().len(), 0);
}

#[test]
fn missing_decmpfs_attr_lenient_skips_only_that_file() {
    // Listing order: bad file first, then a healthy sibling
    let mut vol = SyntheticVolume::new("Broken");
    vol.add_compressed_file_missing_attr(ROOT_DIR_ID, "bad.bin", 0o644);
    vol.add_file(ROOT_DIR_ID, "good.txt", 0o644, b"still here");

    let mut container = SyntheticContainer::new(vec![vol]);
    let tmp = TempDir::new().unwrap();
    let root = output_root(&tmp);

    let report = VolumeExtractor::new(&mut container, &root, lenient())
        .extract_all()
        .unwrap();

    let out = root.join("Volume 0").join("out");
    assert!(!out.join("bad.bin").exists());
    assert_eq!(fs::read(out.join("good.txt")).unwrap(), b"still here");
    assert_eq!(report.volumes[0].objects_processed, 2);
    assert_eq!(report.volumes[0].objects_skipped, 1);
}

#[test]
fn missing_decmpfs_attr_strict_aborts_walk() {
    let mut vol = SyntheticVolume::new("Broken");
    vol.add_compressed_file_missing_attr(ROOT_DIR_ID, "bad.bin", 0o644);
    vol.add_file(ROOT_DIR_ID, "after.txt", 0o644, b"never written");

    let mut container = SyntheticContainer::new(vec![vol]);
    let tmp = TempDir::new().unwrap();
    let root = output_root(&tmp);

    let result = VolumeExtractor::new(&mut container, &root, strict()).extract_all();
    assert!(matches!(result, Err(Error::AttributeMissing { .. })));

    // Nothing after the failing entry in listing order was written
    let out = root.join("Volume 0").join("out");
    assert!(!out.join("bad.bin").exists());
    assert!(!out.join("after.txt").exists());
}

#[test]
fn encrypted_volume_refused_without_writes() {
    let mut vol = SyntheticVolume::new("FileVault");
    vol.add_file(ROOT_DIR_ID, "secret.txt", 0o600, b"ciphertext");
    vol.set_fs_flags(0); // no unencrypted bit

    let mut container = SyntheticContainer::new(vec![vol]);
    let tmp = TempDir::new().unwrap();
    let root = output_root(&tmp);

    let result = VolumeExtractor::new(&mut container, &root, lenient()).extract_all();
    assert!(matches!(result, Err(Error::Unsupported(_))));

    assert!(!root.join("Volume 0").exists());
}

#[test]
fn unrecognized_entry_type_is_skipped_not_fatal() {
    let mut vol = SyntheticVolume::new("Mixed");
    vol.add_other(ROOT_DIR_ID, "socket", 12);
    vol.add_file(ROOT_DIR_ID, "normal.txt", 0o644, b"fine");

    let mut container = SyntheticContainer::new(vec![vol]);
    let tmp = TempDir::new().unwrap();
    let root = output_root(&tmp);

    // Strict policy: unknown types are still only skipped
    let report = VolumeExtractor::new(&mut container, &root, strict())
        .extract_all()
        .unwrap();

    let out = root.join("Volume 0").join("out");
    assert!(!out.join("socket").exists());
    assert_eq!(fs::read(out.join("normal.txt")).unwrap(), b"fine");
    assert_eq!(report.volumes[0].objects_skipped, 1);
}

#[test]
fn volumes_extract_to_indexed_directories() {
    let mut first = SyntheticVolume::new("System");
    first.add_file(ROOT_DIR_ID, "one.txt", 0o644, b"1");
    let mut second = SyntheticVolume::new("Data");
    second.add_file(ROOT_DIR_ID, "two.txt", 0o644, b"2");

    let mut container = SyntheticContainer::new(vec![first, second]);
    let tmp = TempDir::new().unwrap();
    let root = output_root(&tmp);

    let report = VolumeExtractor::new(&mut container, &root, lenient())
        .extract_all()
        .unwrap();

    assert_eq!(report.volumes.len(), 2);
    assert_eq!(report.volumes[0].name, "System");
    assert_eq!(report.volumes[1].name, "Data");
    assert!(root.join("Volume 0").join("out").join("one.txt").exists());
    assert!(root.join("Volume 1").join("out").join("two.txt").exists());
}

#[test]
fn pre_existing_output_root_is_refused_untouched() {
    let mut vol = SyntheticVolume::new("Fresh");
    vol.add_file(ROOT_DIR_ID, "a.txt", 0o644, b"data");

    let mut container = SyntheticContainer::new(vec![vol]);
    let tmp = TempDir::new().unwrap();
    let root = output_root(&tmp);
    fs::create_dir_all(&root).unwrap();

    let result = VolumeExtractor::new(&mut container, &root, lenient()).extract_all();
    assert!(matches!(result, Err(Error::AlreadyExists(_))));

    // The pre-existing directory was not merged into
    assert_eq!(fs::read_dir(&root).unwrap().count(), 0);
}

#[test]
fn empty_container_is_fatal() {
    let mut container = SyntheticContainer::new(Vec::new());
    let tmp = TempDir::new().unwrap();
    let root = output_root(&tmp);

    let result = VolumeExtractor::new(&mut container, &root, lenient()).extract_all();
    assert!(matches!(result, Err(Error::ContainerInit(_))));
}

#[test]
fn directory_cycle_is_refused() {
    use apfsdump_core::EntryKind;

    // dir/loop points back at the root directory object
    let mut vol = SyntheticVolume::new("Cyclic");
    let dir = vol.add_directory(ROOT_DIR_ID, "dir");
    vol.add_entry_raw(dir, "loop", ROOT_DIR_ID, EntryKind::Directory);

    let mut container = SyntheticContainer::new(vec![vol]);
    let tmp = TempDir::new().unwrap();
    let root = output_root(&tmp);

    // Strict policy surfaces the structural corruption
    let result = VolumeExtractor::new(&mut container, &root, strict()).extract_all();
    assert!(matches!(result, Err(Error::Corrupt(_))));
}

#[test]
fn directory_cycle_lenient_still_terminates() {
    use apfsdump_core::EntryKind;

    let mut vol = SyntheticVolume::new("Cyclic");
    let dir = vol.add_directory(ROOT_DIR_ID, "dir");
    vol.add_entry_raw(dir, "loop", ROOT_DIR_ID, EntryKind::Directory);
    vol.add_file(ROOT_DIR_ID, "a.txt", 0o644, b"content");

    let mut container = SyntheticContainer::new(vec![vol]);
    let tmp = TempDir::new().unwrap();
    let root = output_root(&tmp);

    let report = VolumeExtractor::new(&mut container, &root, lenient())
        .extract_all()
        .unwrap();

    // The cycle is recorded as a skip and the rest of the tree extracts
    assert_eq!(report.volumes[0].objects_skipped, 1);
    let out = root.join("Volume 0").join("out");
    assert_eq!(fs::read(out.join("a.txt")).unwrap(), b"content");
}

#[test]
fn deep_tree_round_trip_paths() {
    let mut vol = SyntheticVolume::new("Deep");
    let mut parent = ROOT_DIR_ID;
    for depth in 0..8 {
        parent = vol.add_directory(parent, &format!("level{}", depth));
    }
    vol.add_file(parent, "leaf.txt", 0o400, b"bottom");

    let mut container = SyntheticContainer::new(vec![vol]);
    let tmp = TempDir::new().unwrap();
    let root = output_root(&tmp);

    VolumeExtractor::new(&mut container, &root, strict())
        .extract_all()
        .unwrap();

    let mut path = root.join("Volume 0").join("out");
    for depth in 0..8 {
        path = path.join(format!("level{}", depth));
    }
    let leaf = path.join("leaf.txt");
    assert_eq!(fs::read(&leaf).unwrap(), b"bottom");
    assert_eq!(mode_of(&leaf), 0o400);
}
