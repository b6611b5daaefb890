#![allow(dead_code)]

use serde_json::{json, Value};
use unidis_core::backends::{AnalysisSnapshot, SnapshotHost};
use unidis_core::Database;

/// Small x86-64 listing: three functions in .text, a few variables in .data.
pub fn sample_snapshot_json() -> Value {
    json!({
        "sdk_version": 900,
        "bitness": 64,
        "big_endian": false,
        "processor": "metapc",
        "memory": [
            {
                "start": 4096,
                "bytes": "554889e5c39090900f1f400090909090 554889e5c39090900f1f400090909090 554889e5c39090900f1f400090909090"
            },
            {
                "start": 8192,
                "bytes": "4142434400000000 efbeadde00000000 0102030400000000 0000000000000000 6800690000000000 0000000000000000"
            }
        ],
        "file_regions": [
            { "address": 4096, "offset": 1024, "size": 256 },
            { "address": 8192, "offset": 1536, "size": 256 }
        ],
        "functions": [
            { "start": 4096, "end": 4112, "name": "main" },
            { "start": 4112, "end": 4128 },
            { "start": 4128, "end": 4144, "name": "helper" }
        ],
        "signatures": [
            {
                "address": 4096,
                "declaration": "int __cdecl main(int argc, char **argv)",
                "return_type": "int",
                "calling_convention": "__cdecl",
                "parameters": [
                    { "name": "argc", "type": "int" },
                    { "name": "argv", "type": "char **" }
                ]
            }
        ],
        "segments": [
            { "name": ".text", "start": 4096, "end": 4352, "permissions": "r-x" },
            { "name": ".data", "start": 8192, "end": 8448, "permissions": "rw-" }
        ],
        "items": [
            { "address": 4096, "size": 4, "code": true, "name": "main" },
            { "address": 4100, "size": 4, "code": true },
            { "address": 4104, "size": 8, "code": true, "name": "loop_top" },
            { "address": 4112, "size": 16, "code": true },
            { "address": 4128, "size": 16, "code": true, "name": "helper" },
            { "address": 8192, "size": 5, "name": "g_greeting", "type": "CHAR", "string_width": 8 },
            { "address": 8200, "size": 8, "name": "g_counter", "type": "QWORD" },
            { "address": 8208, "size": 4 },
            { "address": 8224, "size": 6, "name": "g_wide", "string_width": 16 }
        ],
        "xrefs": [
            { "from": 4096, "to": 4100, "type": 21, "code": true },
            { "from": 4096, "to": 4128, "type": 17, "code": true },
            { "from": 4100, "to": 8200, "type": 3, "code": false },
            { "from": 4104, "to": 4096, "type": 19, "code": true },
            { "from": 4112, "to": 4128, "type": 16, "code": true }
        ],
        "types": [
            { "name": "CHAR", "size": 1 },
            { "name": "DWORD", "size": 4 },
            { "name": "QWORD", "size": 8 },
            { "name": "HANDLE", "size": 8 }
        ],
        "registers": [
            { "name": "rax", "number": 0, "size": 8 },
            { "name": "eax", "number": 0, "size": 4 }
        ],
        "imports": [
            { "address": 12288, "name": "CreateFileA", "namespace": "KERNEL32" },
            { "address": 12296, "name": "ExitProcess", "namespace": "KERNEL32" },
            { "address": 12304, "name": "CreateFileA", "namespace": "KERNEL32" }
        ],
        "exports": [
            { "ordinal": 1, "address": 4096, "name": "main" },
            { "ordinal": 2, "address": 4128, "name": "helper" }
        ]
    })
}

pub fn sample_snapshot() -> AnalysisSnapshot {
    serde_json::from_value(sample_snapshot_json()).expect("sample snapshot parses")
}

pub fn db_from(snapshot: AnalysisSnapshot) -> Database {
    Database::new(SnapshotHost::new(snapshot).expect("valid snapshot"))
}

pub fn sample_db() -> Database {
    db_from(sample_snapshot())
}
