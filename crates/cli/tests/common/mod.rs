#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;

/// Two functions in .text, a string and a counter in .data.
pub fn snapshot_json() -> serde_json::Value {
    json!({
        "sdk_version": 900,
        "bitness": 64,
        "processor": "metapc",
        "memory": [
            { "start": 4096, "bytes": "554889e5e80b000000c3909090909090 554889e5c3909090" },
            { "start": 8192, "bytes": "68656c6c6f000000 2a00000000000000" }
        ],
        "file_regions": [
            { "address": 4096, "offset": 1024, "size": 512 }
        ],
        "functions": [
            { "start": 4096, "end": 4112, "name": "main" },
            { "start": 4112, "end": 4120 }
        ],
        "segments": [
            { "name": ".text", "start": 4096, "end": 4352, "permissions": "r-x" },
            { "name": ".data", "start": 8192, "end": 8448, "permissions": "rw-" }
        ],
        "items": [
            { "address": 4096, "size": 4, "code": true, "name": "main" },
            { "address": 4100, "size": 5, "code": true },
            { "address": 4105, "size": 1, "code": true },
            { "address": 4112, "size": 4, "code": true },
            { "address": 8192, "size": 6, "name": "g_hello", "type": "CHAR", "string_width": 8 },
            { "address": 8200, "size": 8, "name": "g_answer", "type": "QWORD" }
        ],
        "xrefs": [
            { "from": 4100, "to": 4105, "type": 21, "code": true },
            { "from": 4100, "to": 4112, "type": 17, "code": true },
            { "from": 4112, "to": 8200, "type": 3 }
        ],
        "types": [
            { "name": "CHAR", "size": 1 },
            { "name": "DWORD", "size": 4 },
            { "name": "QWORD", "size": 8 }
        ],
        "imports": [
            { "address": 12288, "name": "puts", "namespace": "libc.so.6" }
        ],
        "exports": [
            { "ordinal": 1, "address": 4096, "name": "main" }
        ]
    })
}

/// Write the sample snapshot into `dir` and return its path.
pub fn write_snapshot(dir: &Path) -> PathBuf {
    let path = dir.join("analysis.json");
    fs::write(&path, serde_json::to_string_pretty(&snapshot_json()).unwrap()).unwrap();
    path
}

pub fn open_db(dir: &Path) -> unidis_core::db::DatabaseContext {
    let path = write_snapshot(dir);
    unidis_core::db::DatabaseContext::open(&path, None).expect("open snapshot")
}
