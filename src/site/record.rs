//! RECORD file handling
//!
//! A RECORD is a CSV of `path,hash,size` rows listing every installed file.

use std::path::PathBuf;

/// One installed file listed in RECORD
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordEntry {
    pub path: PathBuf,
    pub size: Option<u64>,
}

/// Parse RECORD rows; paths may contain commas, so hash and size are taken from the right
pub fn entries(record: &str) -> Vec<RecordEntry> {
    record
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let mut fields = line.rsplitn(3, ',');
            let size = fields.next()?;
            let _hash = fields.next()?;
            let path = fields.next()?.trim_matches('"');
            Some(RecordEntry {
                path: PathBuf::from(path),
                size: size.trim().parse().ok(),
            })
        })
        .collect()
}

/// Total installed size in bytes; rows without a size count as zero
pub fn installed_size(record: &str) -> u64 {
    entries(record).iter().filter_map(|e| e.size).sum()
}
