mod common;

#[test]
fn variable_lookup_resolves_item_head() {
    let db = common::sample_db();
    let var = db.get_variable(0x200b).unwrap();
    assert_eq!(var.address(), 0x2008);
    assert_eq!(var.name(), "g_counter");
    assert_eq!(var.size(), 8);
    assert_eq!(var.data().unwrap(), vec![0xef, 0xbe, 0xad, 0xde, 0, 0, 0, 0]);

    let data_type = var.data_type().unwrap();
    assert_eq!(data_type.name, "QWORD");
    assert_eq!(data_type.size, 8);
}

#[test]
fn named_code_is_not_a_variable() {
    let db = common::sample_db();
    // `loop_top` is a named instruction (a label).
    let err = db.get_variable(0x1008).unwrap_err();
    assert!(err.is_not_found());
    assert!(db.get_variable(0x100c).unwrap_err().is_not_found());
    assert!(db.get_variable(0x1000).unwrap_err().is_not_found());
}

#[test]
fn unnamed_data_is_not_a_variable() {
    let db = common::sample_db();
    let err = db.get_variable(0x2010).unwrap_err();
    assert!(err.to_string().contains("Variable doesn't exist at 0x2010"));
}

#[test]
fn data_type_lookup_is_case_normalized() {
    let db = common::sample_db();
    let dword = db.get_data_type("dword").unwrap();
    assert_eq!(dword.name, "DWORD");
    assert_eq!(dword.size, 4);
    assert!(!dword.is_pointer);
    assert_eq!(db.get_data_type("  Dword ").unwrap(), dword);
}

#[test]
fn pointer_suffix_wraps_resolved_base_type() {
    let db = common::sample_db();
    let ptr = db.get_data_type("dword *").unwrap();
    assert!(ptr.is_pointer);
    assert_eq!(ptr.name, "DWORD *");
    assert_eq!(ptr.size, 8);
    assert_eq!(ptr.pointee.as_deref().map(|p| p.name.as_str()), Some("DWORD"));

    let compact = db.get_data_type("HANDLE*").unwrap();
    assert!(compact.is_pointer);
}

#[test]
fn pointer_size_tracks_bitness() {
    let mut snapshot = common::sample_snapshot();
    snapshot.bitness = 32;
    let db = common::db_from(snapshot);
    assert_eq!(db.get_data_type("QWORD *").unwrap().size, 4);
}

#[test]
fn unknown_types_fail_regardless_of_pointer_suffix() {
    let db = common::sample_db();
    for name in ["FOO", "FOO *", "foo*", "  *FOO* "] {
        let err = db.get_data_type(name).unwrap_err();
        assert!(err.is_not_found(), "expected not found for {name:?}");
        assert!(err.to_string().contains("Invalid data type: FOO"));
    }
}

#[test]
fn registers_resolve_by_name() {
    let db = common::sample_db();
    let rax = db.get_register("RAX").unwrap();
    assert_eq!(rax.number, 0);
    assert_eq!(rax.size, 8);
    assert_eq!(db.get_register("eax").unwrap().size, 4);
    let err = db.get_register("xmm99").unwrap_err();
    assert!(err.to_string().contains("Invalid register name: xmm99"));
}

#[test]
fn names_and_lines_reflect_listing() {
    let db = common::sample_db();
    assert_eq!(db.get_name(0x2020).unwrap(), "g_wide");
    assert!(db.get_name(0x2010).unwrap_err().is_not_found());

    let line = db.get_line(0x2003);
    assert_eq!(line.address(), 0x2000);
    assert_eq!(line.size(), 5);
    assert!(!line.is_code());
    assert_eq!(line.name().as_deref(), Some("g_greeting"));
    assert_eq!(line.data().unwrap(), b"ABCD\0");
    assert_eq!(line.references_to().count(), 0);
}
