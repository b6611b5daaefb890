mod common;

use unidis_core::backends::XrefRecord;
use unidis_core::model::{Reference, ReferenceType};
use unidis_core::DisasmError;

fn record(kind: u8, is_code: bool) -> XrefRecord {
    XrefRecord { from: 0x1000, to: 0x2000, kind, is_code }
}

#[test]
fn raw_codes_map_onto_normalized_kinds() {
    let table = [
        (0, ReferenceType::Unknown),
        (1, ReferenceType::DataOffset),
        (2, ReferenceType::DataWrite),
        (3, ReferenceType::DataRead),
        (4, ReferenceType::DataText),
        (5, ReferenceType::DataInformational),
        (16, ReferenceType::CodeCall),
        (17, ReferenceType::CodeCall),
        (18, ReferenceType::CodeJump),
        (19, ReferenceType::CodeJump),
        (20, ReferenceType::CodeUser),
        (21, ReferenceType::OrdinaryFlow),
    ];
    for (code, expected) in table {
        assert_eq!(ReferenceType::from_raw(code), Some(expected), "code {code}");
    }
}

#[test]
fn unmapped_codes_are_internal_errors() {
    for code in [6u8, 7, 15, 22, 255] {
        assert_eq!(ReferenceType::from_raw(code), None);
        let err = Reference::from_record(&record(code, false)).unwrap_err();
        assert!(matches!(err, DisasmError::UnexpectedReferenceType(c) if c == code));
    }
}

#[test]
fn is_data_follows_classification_not_host_flag() {
    let read = Reference::from_record(&record(3, false)).unwrap();
    assert!(read.is_data);
    assert!(!read.is_code);
    assert_eq!(read.kind.name(), "data_read");

    let call = Reference::from_record(&record(17, true)).unwrap();
    assert!(call.is_code);
    assert!(!call.is_data);
}

#[test]
fn code_and_data_flags_are_not_complementary() {
    let unknown = Reference::from_record(&record(0, false)).unwrap();
    assert!(!unknown.is_code && !unknown.is_data);

    let user = Reference::from_record(&record(20, false)).unwrap();
    assert_eq!(user.kind, ReferenceType::CodeUser);
    assert!(!user.is_code && !user.is_data);

    let flow = Reference::from_record(&record(21, true)).unwrap();
    assert!(flow.is_code && !flow.is_data);
}

#[test]
fn references_from_drop_ordinary_flow() {
    let db = common::sample_db();
    let refs: Vec<Reference> = db.references_from(0x1000).map(|r| r.unwrap()).collect();
    assert_eq!(refs.len(), 1);
    assert_eq!(refs[0].to_address, 0x1020);
    assert_eq!(refs[0].kind, ReferenceType::CodeCall);
    assert!(refs.iter().all(|r| r.kind != ReferenceType::OrdinaryFlow));
}

#[test]
fn references_to_keep_ordinary_flow() {
    let db = common::sample_db();
    let refs: Vec<Reference> = db.references_to(0x1004).map(|r| r.unwrap()).collect();
    assert_eq!(refs.len(), 1);
    assert_eq!(refs[0].from_address, 0x1000);
    assert_eq!(refs[0].kind, ReferenceType::OrdinaryFlow);
}

#[test]
fn data_references_are_classified() {
    let db = common::sample_db();
    let refs: Vec<Reference> = db.references_to(0x2008).map(|r| r.unwrap()).collect();
    assert_eq!(refs.len(), 1);
    assert_eq!(refs[0].kind, ReferenceType::DataRead);
    assert!(refs[0].is_data);
}

#[test]
fn enumeration_surfaces_unmapped_codes_as_errors() {
    let mut snapshot = common::sample_snapshot();
    snapshot.xrefs.push(serde_json::from_value(serde_json::json!({
        "from": 8192, "to": 8200, "type": 6
    })).unwrap());
    let db = common::db_from(snapshot);
    let results: Vec<_> = db.references_from(0x2000).collect();
    assert_eq!(results.len(), 1);
    assert!(matches!(results[0], Err(DisasmError::UnexpectedReferenceType(6))));
}

#[test]
fn references_serialize_with_snake_case_kind() {
    let reference = Reference::from_record(&record(4, false)).unwrap();
    let value = serde_json::to_value(reference).unwrap();
    assert_eq!(value["type"], "data_text");
    assert_eq!(value["from_address"], 0x1000);
    assert_eq!(value["is_data"], true);
}
