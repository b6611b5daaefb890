use anyhow::Result;
use serde::Serialize;
use unidis_core::model::{Permissions, Segment};
use unidis_core::{Database, SegmentKey};

use crate::print_json;

#[derive(Debug, Serialize)]
pub struct SegmentSummary {
    pub name: String,
    pub start: u64,
    pub end: u64,
    pub bit_size: u32,
    pub permissions: Permissions,
}

impl From<&Segment<'_>> for SegmentSummary {
    fn from(seg: &Segment<'_>) -> Self {
        Self {
            name: seg.name().to_string(),
            start: seg.start(),
            end: seg.end(),
            bit_size: seg.bit_size(),
            permissions: seg.permissions(),
        }
    }
}

fn permission_string(perms: &Permissions) -> String {
    [(perms.read, 'r'), (perms.write, 'w'), (perms.execute, 'x')]
        .iter()
        .map(|&(set, flag)| if set { flag } else { '-' })
        .collect()
}

fn print_segment(seg: &SegmentSummary) {
    println!(
        "  - {} 0x{:08x}-0x{:08x} {} {}-bit",
        seg.name,
        seg.start,
        seg.end,
        permission_string(&seg.permissions),
        seg.bit_size
    );
}

pub fn list_segments_command(db: &Database, json: bool) -> Result<()> {
    let segments: Vec<SegmentSummary> = db.segments().map(|s| SegmentSummary::from(&s)).collect();
    if json {
        return print_json(&segments);
    }

    println!("Segments ({}):", segments.len());
    if segments.is_empty() {
        println!("  (none)");
        return Ok(());
    }
    for seg in &segments {
        print_segment(seg);
    }
    Ok(())
}

/// Show one segment, looked up by containing address or by name.
pub fn segment_command(db: &Database, key: SegmentKey, json: bool) -> Result<()> {
    let segment = db.get_segment(key)?;
    let summary = SegmentSummary::from(&segment);
    if json {
        return print_json(&summary);
    }
    print_segment(&summary);
    Ok(())
}
