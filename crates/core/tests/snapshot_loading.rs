mod common;

use std::fs;

use tempfile::tempdir;
use unidis_core::backends::{HostEngine, SnapshotHost};
use unidis_core::{Database, DisasmError};

const YAML_SNAPSHOT: &str = r#"
sdk_version: 750
bitness: 32
big_endian: true
processor: ARM
memory:
  - start: 256
    bytes: "deadbeef 00112233"
segments:
  - name: CODE
    start: 256
    end: 264
    permissions: r-x
functions:
  - start: 256
    end: 264
    name: reset
"#;

#[test]
fn loads_json_from_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("analysis.json");
    fs::write(&path, common::sample_snapshot_json().to_string()).unwrap();

    let host = SnapshotHost::from_path(&path).unwrap();
    assert_eq!(host.snapshot().functions.len(), 3);
    let db = Database::new(host);
    assert_eq!(db.get_function(0x1000).unwrap().name(), "main");
}

#[test]
fn loads_yaml_from_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("analysis.yaml");
    fs::write(&path, YAML_SNAPSHOT).unwrap();

    let db = Database::new(SnapshotHost::from_path(&path).unwrap());
    assert_eq!(db.processor_name(), "ARM");
    assert!(db.is_big_endian());
    // Old SDK: bitness comes from the 64/32-bit probes.
    assert_eq!(db.bit_size(), 32);
    assert_eq!(db.get_dword(0x100).unwrap(), 0xdeadbeef);
    assert_eq!(db.get_segment("CODE").unwrap().start(), 0x100);
    assert_eq!(db.get_function(0x104).unwrap().name(), "reset");
}

#[test]
fn functions_are_sorted_on_load() {
    let mut snapshot = common::sample_snapshot();
    snapshot.functions.reverse();
    let host = SnapshotHost::new(snapshot).unwrap();
    let entries: Vec<u64> = host.function_entries(None, None).collect();
    assert_eq!(entries, vec![0x1000, 0x1010, 0x1020]);
}

#[test]
fn inverted_ranges_are_rejected() {
    let mut snapshot = common::sample_snapshot();
    snapshot.functions[0].end = 0x0fff;
    let err = SnapshotHost::new(snapshot).unwrap_err();
    assert!(matches!(err, DisasmError::Snapshot(_)));
    assert!(err.to_string().contains("ends before it starts"));

    let mut snapshot = common::sample_snapshot();
    snapshot.segments[1].end = 0;
    assert!(matches!(SnapshotHost::new(snapshot).unwrap_err(), DisasmError::Snapshot(_)));
}

#[test]
fn malformed_documents_report_parse_errors() {
    let err = SnapshotHost::from_json_str(r#"{"memory": [{"start": 0, "bytes": "zz"}]}"#)
        .unwrap_err();
    assert!(matches!(err, DisasmError::Json(_)));

    let err = SnapshotHost::from_yaml_str("bitness: [1, 2").unwrap_err();
    assert!(matches!(err, DisasmError::Yaml(_)));
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    let err = SnapshotHost::from_path(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, DisasmError::Io(_)));
}

#[test]
fn sentinels_surface_from_host() {
    let host = SnapshotHost::new(common::sample_snapshot()).unwrap();
    assert_eq!(host.fileregion_ea(0x9999), unidis_core::backends::BAD_ADDRESS);
    assert_eq!(host.fileregion_offset(0x9999), -1);
    assert_eq!(host.entry_ordinal(7), unidis_core::backends::BAD_ADDRESS);
    assert!(host.func_at(0x5000).is_none());
}
