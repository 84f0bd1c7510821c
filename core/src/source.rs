//! Record loading: the input boundary.
//!
//! RULE: This is the only place records are validated, and only for what the
//! metrics cannot work without (non-empty ids). Ordering, counter sanity and
//! recipient uniqueness stay producer contracts.

use crate::{
    error::{MetricsError, MetricsResult},
    event::EventRecord,
};
use std::path::Path;

/// Read a JSON array or newline-delimited JSON file of records.
pub fn load_records(path: impl AsRef<Path>) -> MetricsResult<Vec<EventRecord>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let records = parse_records(&content)?;
    log::info!("loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Parse either a JSON array of records or one record per line.
pub fn parse_records(content: &str) -> MetricsResult<Vec<EventRecord>> {
    let trimmed = content.trim_start();
    let records: Vec<EventRecord> = if trimmed.starts_with('[') {
        serde_json::from_str(trimmed)?
    } else {
        let mut records: Vec<EventRecord> = Vec::new();
        for (line_no, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let record: EventRecord = serde_json::from_str(line).map_err(|e| {
                log::warn!("line {}: unparseable record: {e}", line_no + 1);
                MetricsError::InvalidRecord {
                    index: records.len(),
                    reason: format!("line {}: {e}", line_no + 1),
                }
            })?;
            records.push(record);
        }
        records
    };

    for (index, record) in records.iter().enumerate() {
        validate_ids(index, record)?;
    }
    Ok(records)
}

fn validate_ids(index: usize, record: &EventRecord) -> MetricsResult<()> {
    if record.campaign_id.is_empty() {
        return Err(MetricsError::InvalidRecord {
            index,
            reason: "campaignId is empty".into(),
        });
    }
    if record.recipient_id.is_empty() {
        return Err(MetricsError::InvalidRecord {
            index,
            reason: "recipientId is empty".into(),
        });
    }
    Ok(())
}
