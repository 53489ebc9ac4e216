// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tabular result decoding
//!
//! A finished execution's results download as comma-separated text: a header
//! row naming the columns, then one row per (date, asset) pair. The first
//! column is always `date`, the second is the asset-identifier column (named
//! after the execution's asset format), and the rest are the pipeline's
//! declared outputs.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while decoding a result table
#[derive(Debug, Error)]
pub enum TableError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("result is missing the {0:?} column")]
    MissingColumn(String),

    #[error("result has no header row")]
    Empty,

    #[error("invalid date {value:?} in row {row}")]
    InvalidDate { row: usize, value: String },
}

/// One row of a result table
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub date: NaiveDate,
    pub asset: String,
    /// Output values, in column order
    pub values: Vec<Value>,
}

/// A pipeline's tabular output, keyed by (date, asset identifier)
#[derive(Debug, Clone, Default)]
pub struct ResultTable {
    columns: Vec<String>,
    rows: Vec<ResultRow>,
    index: BTreeMap<(NaiveDate, String), usize>,
}

impl ResultTable {
    /// Decode comma-separated text into a table.
    ///
    /// `asset_column` is the expected name of the second header field,
    /// `symbol`, `sid`, or `fsym_region_id` depending on the execution.
    pub fn parse(text: &str, asset_column: &str) -> Result<Self, TableError> {
        let mut reader = csv::Reader::from_reader(text.as_bytes());

        let headers = reader.headers()?.clone();
        if headers.is_empty() {
            return Err(TableError::Empty);
        }

        let mut fields = headers.iter();
        if fields.next() != Some("date") {
            return Err(TableError::MissingColumn("date".to_string()));
        }
        if fields.next() != Some(asset_column) {
            return Err(TableError::MissingColumn(asset_column.to_string()));
        }
        let columns: Vec<String> = fields.map(String::from).collect();

        let mut rows: Vec<ResultRow> = Vec::new();
        let mut index = BTreeMap::new();
        for (position, record) in reader.records().enumerate() {
            let record = record?;
            let date_text = record.get(0).unwrap_or_default();
            let date =
                NaiveDate::parse_from_str(date_text, "%Y-%m-%d").map_err(|_| {
                    TableError::InvalidDate {
                        row: position + 1,
                        value: date_text.to_string(),
                    }
                })?;
            let asset = record.get(1).unwrap_or_default().to_string();
            let values = record.iter().skip(2).map(infer_value).collect();

            index.insert((date, asset.clone()), rows.len());
            rows.push(ResultRow {
                date,
                asset,
                values,
            });
        }

        Ok(Self {
            columns,
            rows,
            index,
        })
    }

    /// Output column names, excluding the two key columns
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Look up a row by its (date, asset) key
    pub fn row(&self, date: NaiveDate, asset: &str) -> Option<&ResultRow> {
        self.index
            .get(&(date, asset.to_string()))
            .map(|&i| &self.rows[i])
    }

    /// Look up a single cell by key and output column name
    pub fn value(&self, date: NaiveDate, asset: &str, column: &str) -> Option<&Value> {
        let row = self.row(date, asset)?;
        let position = self.columns.iter().position(|c| c == column)?;
        row.values.get(position)
    }
}

/// Infer a cell's type from its text: empty → null, then integer, float,
/// boolean, falling back to text
fn infer_value(text: &str) -> Value {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    if let Ok(n) = trimmed.parse::<i64>() {
        return Value::from(n);
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        // Non-finite values have no JSON representation; treat as missing
        return if f.is_finite() {
            Value::from(f)
        } else {
            Value::Null
        };
    }
    match trimmed {
        "true" | "True" => Value::Bool(true),
        "false" | "False" => Value::Bool(false),
        _ => Value::String(trimmed.to_string()),
    }
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
