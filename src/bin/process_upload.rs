// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Convert an uploaded consumption CSV into newline-delimited JSON rows.
//!
//! Usage: `process_upload <object-name> [csv-file]`
//!
//! The object name (`uploads/{customer_id}/{provider}/...`) says who the
//! readings belong to. The CSV is read from `csv-file`, or stdin when
//! omitted. Output is ready for a newline-delimited JSON table load.

use anyhow::Context;
use property_session::services::process_upload;
use std::io::{Read, Write};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("property_session=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let object_name = args
        .next()
        .context("usage: process_upload <object-name> [csv-file]")?;

    let content = match args.next() {
        Some(file) => std::fs::read_to_string(&file).with_context(|| format!("reading {file}"))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading CSV from stdin")?;
            buf
        }
    };

    let rows = process_upload(&object_name, &content)?;
    if rows.is_empty() {
        tracing::warn!(object = %object_name, "No valid data extracted");
    }

    let mut out = std::io::stdout().lock();
    for row in &rows {
        serde_json::to_writer(&mut out, row)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;

    Ok(())
}
