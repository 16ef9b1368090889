// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Energy consumption CSV uploads.
//!
//! Uploaded objects are named
//! `uploads/{customer_id}/{provider}/[{property_id}/]{filename}`. Each CSV
//! row with a readable timestamp and reading becomes one consumption row
//! tagged with the customer, property and provider from the object name.

use crate::error::UploadError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;

/// Top-level directory uploads must live under.
pub const UPLOADS_PREFIX: &str = "uploads";

/// Property id used when the object name does not carry one.
pub const DEFAULT_PROPERTY_ID: &str = "default-property";

/// Header names accepted for the timestamp column, in priority order.
const TIMESTAMP_COLUMNS: &[&str] = &["Timestamp", "Time", "Date"];
/// Header names accepted for the kWh reading column, in priority order.
const CONSUMPTION_COLUMNS: &[&str] = &["Value", "Consumption", "Energy"];

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Who an uploaded object belongs to, parsed from its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPath {
    pub customer_id: String,
    pub provider: String,
    pub property_id: String,
}

impl UploadPath {
    pub fn parse(object_name: &str) -> Result<Self, UploadError> {
        let invalid = |reason| UploadError::InvalidPath {
            path: object_name.to_string(),
            reason,
        };

        let parts: Vec<&str> = object_name.split('/').collect();
        if parts.len() < 3 {
            return Err(invalid("path structure too short"));
        }
        if parts[0] != UPLOADS_PREFIX {
            return Err(invalid("not in uploads/ directory"));
        }
        if parts[1].is_empty() || parts[2].is_empty() {
            return Err(invalid("empty customer or provider segment"));
        }

        // A property segment only exists when a filename follows it.
        let property_id = match parts.get(3) {
            Some(property) if parts.len() >= 5 && !property.is_empty() => property.to_string(),
            _ => DEFAULT_PROPERTY_ID.to_string(),
        };

        Ok(Self {
            customer_id: parts[1].to_string(),
            provider: parts[2].to_string(),
            property_id,
        })
    }

    fn row(&self, reading: Reading) -> ConsumptionRow {
        ConsumptionRow {
            customer_id: self.customer_id.clone(),
            property_id: self.property_id.clone(),
            timestamp: reading.timestamp,
            consumption_kwh: reading.consumption_kwh,
            provider: self.provider.clone(),
        }
    }
}

/// One meter reading from a CSV row.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub timestamp: DateTime<Utc>,
    pub consumption_kwh: f64,
}

/// A reading ready for the consumption table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsumptionRow {
    pub customer_id: String,
    pub property_id: String,
    pub timestamp: DateTime<Utc>,
    pub consumption_kwh: f64,
    pub provider: String,
}

/// Parse an upload and tag its readings with the owner from `object_name`.
pub fn process_upload(object_name: &str, content: &str) -> Result<Vec<ConsumptionRow>, UploadError> {
    let path = UploadPath::parse(object_name)?;
    let readings = parse_readings(content)?;

    let rows: Vec<ConsumptionRow> = readings.into_iter().map(|r| path.row(r)).collect();

    tracing::info!(
        object = object_name,
        customer = %path.customer_id,
        provider = %path.provider,
        property = %path.property_id,
        rows = rows.len(),
        "Processed upload"
    );

    Ok(rows)
}

/// Extract readings from CSV text.
///
/// Rows whose timestamp or reading cannot be parsed are dropped. A file
/// without both a timestamp and a reading column is an error.
pub fn parse_readings(content: &str) -> Result<Vec<Reading>, UploadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| UploadError::Csv(format!("failed to read headers: {e}")))?
        .clone();

    let column = |names: &[&str]| {
        names
            .iter()
            .find_map(|name| headers.iter().position(|h| h == *name))
    };
    let (Some(timestamp_col), Some(consumption_col)) =
        (column(TIMESTAMP_COLUMNS), column(CONSUMPTION_COLUMNS))
    else {
        return Err(UploadError::MissingColumns(
            headers.iter().map(str::to_string).collect(),
        ));
    };

    let mut readings = Vec::new();
    let mut dropped = 0usize;

    for record in reader.records() {
        let Ok(record) = record else {
            dropped += 1;
            continue;
        };

        let timestamp = record.get(timestamp_col).and_then(parse_timestamp);
        let consumption = record.get(consumption_col).and_then(parse_consumption);

        match (timestamp, consumption) {
            (Some(timestamp), Some(consumption_kwh)) => readings.push(Reading {
                timestamp,
                consumption_kwh,
            }),
            _ => dropped += 1,
        }
    }

    if dropped > 0 {
        tracing::debug!(dropped, kept = readings.len(), "Dropped unparseable CSV rows");
    }

    Ok(readings)
}

/// Timestamps without an offset are taken as UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if raw.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|ts| ts.and_utc())
}

fn parse_consumption(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| !v.is_nan())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn upload_path_with_property() {
        let path = UploadPath::parse("uploads/cust-1/helen/prop-9/2026-01.csv").unwrap();

        assert_eq!(path.customer_id, "cust-1");
        assert_eq!(path.provider, "helen");
        assert_eq!(path.property_id, "prop-9");
    }

    #[test]
    fn upload_path_without_property_uses_default() {
        let path = UploadPath::parse("uploads/cust-1/lumme_energia/readings.csv").unwrap();

        assert_eq!(path.provider, "lumme_energia");
        assert_eq!(path.property_id, DEFAULT_PROPERTY_ID);
    }

    #[test]
    fn upload_path_rejects_short_and_foreign_paths() {
        assert!(matches!(
            UploadPath::parse("uploads/cust-1"),
            Err(UploadError::InvalidPath {
                reason: "path structure too short",
                ..
            })
        ));
        assert!(matches!(
            UploadPath::parse("exports/cust-1/helen/file.csv"),
            Err(UploadError::InvalidPath {
                reason: "not in uploads/ directory",
                ..
            })
        ));
        assert!(matches!(
            UploadPath::parse("uploads//helen/file.csv"),
            Err(UploadError::InvalidPath { .. })
        ));
    }

    #[test]
    fn parse_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();

        assert_eq!(parse_timestamp("2026-01-02T03:04:05Z"), Some(expected));
        assert_eq!(parse_timestamp("2026-01-02T05:04:05+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2026-01-02 03:04:05"), Some(expected));
        assert_eq!(
            parse_timestamp("2026-01-02 03:04"),
            Some(Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 0).unwrap())
        );
        assert_eq!(
            parse_timestamp("2026-01-02"),
            Some(Utc.with_ymd_and_hms(2026, 1, 2, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp(""), None);
    }

    #[test]
    fn parse_consumption_values() {
        assert_eq!(parse_consumption("1.25"), Some(1.25));
        assert_eq!(parse_consumption("0"), Some(0.0));
        assert_eq!(parse_consumption("NaN"), None);
        assert_eq!(parse_consumption("n/a"), None);
        assert_eq!(parse_consumption(""), None);
    }
}
