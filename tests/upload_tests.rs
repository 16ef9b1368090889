// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Consumption upload parsing tests.

use chrono::{TimeZone, Utc};
use property_session::error::UploadError;
use property_session::services::{parse_readings, process_upload};

#[test]
fn test_timestamp_value_columns() {
    let csv = "\
Timestamp,Value
2026-01-01T00:00:00Z,1.5
2026-01-01T01:00:00Z,2.25
";

    let readings = parse_readings(csv).unwrap();

    assert_eq!(readings.len(), 2);
    assert_eq!(
        readings[0].timestamp,
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
    );
    assert_eq!(readings[0].consumption_kwh, 1.5);
    assert_eq!(readings[1].consumption_kwh, 2.25);
}

#[test]
fn test_alternate_column_names() {
    let time_energy = "Time,Energy\n2026-02-01 12:00:00,0.75\n";
    let date_consumption = "Meter,Date,Consumption\nM-1,2026-02-01,10\n";

    let a = parse_readings(time_energy).unwrap();
    let b = parse_readings(date_consumption).unwrap();

    assert_eq!(a[0].consumption_kwh, 0.75);
    assert_eq!(
        b[0].timestamp,
        Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap()
    );
    assert_eq!(b[0].consumption_kwh, 10.0);
}

#[test]
fn test_unparseable_rows_dropped() {
    let csv = "\
Timestamp,Value
2026-01-01T00:00:00Z,1.0
not-a-date,2.0
2026-01-01T02:00:00Z,
2026-01-01T03:00:00Z,n/a
2026-01-01T04:00:00Z,4.0,extra
2026-01-01T05:00:00Z
  2026-01-01T06:00:00Z , 6.0
";

    let readings = parse_readings(csv).unwrap();
    let values: Vec<f64> = readings.iter().map(|r| r.consumption_kwh).collect();

    assert_eq!(values, vec![1.0, 4.0, 6.0]);
}

#[test]
fn test_missing_columns_reported() {
    let csv = "When,Kilowatts\n2026-01-01,1.0\n";

    assert_eq!(
        parse_readings(csv),
        Err(UploadError::MissingColumns(vec![
            "When".to_string(),
            "Kilowatts".to_string()
        ]))
    );
}

#[test]
fn test_header_names_are_case_sensitive() {
    let csv = "timestamp,value\n2026-01-01,1.0\n";

    assert!(matches!(
        parse_readings(csv),
        Err(UploadError::MissingColumns(_))
    ));
}

#[test]
fn test_empty_file_is_missing_columns() {
    assert_eq!(parse_readings(""), Err(UploadError::MissingColumns(vec![])));
}

#[test]
fn test_header_only_file_has_no_readings() {
    assert_eq!(parse_readings("Timestamp,Value\n").unwrap(), vec![]);
}

#[test]
fn test_process_upload_tags_rows() {
    let csv = "Timestamp,Value\n2026-03-01T00:00:00Z,3.5\n";

    let rows = process_upload("uploads/cust-42/helen/prop-7/march.csv", csv).unwrap();

    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.customer_id, "cust-42");
    assert_eq!(row.provider, "helen");
    assert_eq!(row.property_id, "prop-7");
    assert_eq!(row.consumption_kwh, 3.5);

    let json = serde_json::to_value(row).unwrap();
    assert_eq!(json["customer_id"], "cust-42");
    assert_eq!(json["consumption_kwh"], 3.5);
    assert_eq!(json["timestamp"], "2026-03-01T00:00:00Z");
}

#[test]
fn test_process_upload_rejects_path_before_parsing() {
    let result = process_upload("other/cust-42/helen/march.csv", "garbage");

    assert!(matches!(result, Err(UploadError::InvalidPath { .. })));
}
