use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::DataError;
use crate::region::Region;
use crate::schema::{self, ColumnType};

pub const MISSING_INT: i64 = -1;
pub const MISSING_FLOAT: f64 = -1.0;
pub const MISSING_TEXT: &str = "-1";

/// Outcome of coercing one raw field: either a value of the declared type or
/// the missing-value tag. Coercion is total; it never fails the parse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coercion<T> {
    Value(T),
    Missing,
}

fn is_missing_token(raw: &str) -> bool {
    raw.is_empty() || raw == "XX"
}

pub fn coerce_integer(raw: &str) -> Coercion<i64> {
    if is_missing_token(raw) {
        return Coercion::Missing;
    }
    match raw.trim().parse::<i64>() {
        Ok(value) => Coercion::Value(value),
        Err(_) => Coercion::Missing,
    }
}

/// Float fields use a decimal comma on the wire.
pub fn coerce_float(raw: &str) -> Coercion<f64> {
    if is_missing_token(raw) {
        return Coercion::Missing;
    }
    match raw.trim().replace(',', ".").parse::<f64>() {
        Ok(value) => Coercion::Value(value),
        Err(_) => Coercion::Missing,
    }
}

/// One homogeneously typed schema column. `Date` keeps the raw calendar
/// strings; [`ColumnData::dates`] materializes them downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnData {
    Text(Vec<String>),
    Integer(Vec<i64>),
    Float(Vec<f64>),
    Date(Vec<String>),
}

impl ColumnData {
    fn empty(column_type: ColumnType) -> Self {
        match column_type {
            ColumnType::Text => ColumnData::Text(Vec::new()),
            ColumnType::Integer => ColumnData::Integer(Vec::new()),
            ColumnType::Float => ColumnData::Float(Vec::new()),
            ColumnType::Date => ColumnData::Date(Vec::new()),
        }
    }

    fn column_type(&self) -> ColumnType {
        match self {
            ColumnData::Text(_) => ColumnType::Text,
            ColumnData::Integer(_) => ColumnType::Integer,
            ColumnData::Float(_) => ColumnType::Float,
            ColumnData::Date(_) => ColumnType::Date,
        }
    }

    fn push_raw(&mut self, raw: &str) {
        match self {
            ColumnData::Text(values) => {
                if is_missing_token(raw) {
                    values.push(MISSING_TEXT.to_string());
                } else {
                    values.push(raw.to_string());
                }
            }
            ColumnData::Integer(values) => match coerce_integer(raw) {
                Coercion::Value(value) => values.push(value),
                Coercion::Missing => values.push(MISSING_INT),
            },
            ColumnData::Float(values) => match coerce_float(raw) {
                Coercion::Value(value) => values.push(value),
                Coercion::Missing => values.push(MISSING_FLOAT),
            },
            ColumnData::Date(values) => {
                if is_missing_token(raw) {
                    values.push(MISSING_TEXT.to_string());
                } else {
                    values.push(raw.to_string());
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnData::Text(values) => values.len(),
            ColumnData::Integer(values) => values.len(),
            ColumnData::Float(values) => values.len(),
            ColumnData::Date(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_text(&self) -> Option<&[String]> {
        match self {
            ColumnData::Text(values) | ColumnData::Date(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<&[i64]> {
        match self {
            ColumnData::Integer(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<&[f64]> {
        match self {
            ColumnData::Float(values) => Some(values),
            _ => None,
        }
    }

    /// Calendar view of a `Date` column. Placeholder and unparseable entries
    /// come back as `None`.
    pub fn dates(&self) -> Option<Vec<Option<NaiveDate>>> {
        match self {
            ColumnData::Date(values) => Some(
                values
                    .iter()
                    .map(|raw| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
                    .collect(),
            ),
            _ => None,
        }
    }

    fn extend_from(&mut self, other: &ColumnData) -> Result<(), DataError> {
        match (self, other) {
            (ColumnData::Text(dst), ColumnData::Text(src))
            | (ColumnData::Date(dst), ColumnData::Date(src)) => {
                dst.extend(src.iter().cloned());
                Ok(())
            }
            (ColumnData::Integer(dst), ColumnData::Integer(src)) => {
                dst.extend_from_slice(src);
                Ok(())
            }
            (ColumnData::Float(dst), ColumnData::Float(src)) => {
                dst.extend_from_slice(src);
                Ok(())
            }
            _ => Err(DataError::Snapshot(
                "column type mismatch while concatenating datasets".to_string(),
            )),
        }
    }
}

/// Column-oriented accident records for one region, or for a merged set of
/// regions. Columns are positionally aligned with [`schema::COLUMNS`] and
/// always share the same length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    columns: Vec<ColumnData>,
}

impl Dataset {
    pub fn empty() -> Self {
        Self {
            columns: schema::COLUMNS
                .iter()
                .map(|(_, column_type)| ColumnData::empty(*column_type))
                .collect(),
        }
    }

    /// Appends one raw record. `fields` must hold exactly
    /// [`schema::RAW_FIELD_COUNT`] entries; the synthetic trailing column
    /// receives the region abbreviation.
    pub(crate) fn push_row(&mut self, fields: &[&str], region: Region) {
        debug_assert_eq!(fields.len(), schema::RAW_FIELD_COUNT);
        for (column, raw) in self.columns.iter_mut().zip(fields.iter().copied()) {
            column.push_raw(raw);
        }
        if let Some(region_column) = self.columns.last_mut() {
            region_column.push_raw(region.abbrev());
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.columns.first().map(ColumnData::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn column(&self, name: &str) -> Option<&ColumnData> {
        schema::column_index(name).map(|index| &self.columns[index])
    }

    pub fn columns(&self) -> impl Iterator<Item = (&'static str, &ColumnData)> {
        self.columns
            .iter()
            .enumerate()
            .map(|(index, column)| (schema::COLUMNS[index].0, column))
    }

    pub fn date_column(&self, name: &str) -> Option<Vec<Option<NaiveDate>>> {
        self.column(name).and_then(ColumnData::dates)
    }

    /// Column-wise concatenation; `other`'s rows are appended after `self`'s.
    pub(crate) fn extend_from(&mut self, other: &Dataset) -> Result<(), DataError> {
        if self.columns.len() != other.columns.len() {
            return Err(DataError::Snapshot(
                "column count mismatch while concatenating datasets".to_string(),
            ));
        }
        for (dst, src) in self.columns.iter_mut().zip(&other.columns) {
            dst.extend_from(src)?;
        }
        Ok(())
    }

    /// Structural check applied to snapshots read back from disk: schema
    /// column count, schema column types, equal column lengths.
    pub fn validate(&self) -> Result<(), DataError> {
        if self.columns.len() != schema::COLUMNS.len() {
            return Err(DataError::Snapshot(format!(
                "expected {} columns, found {}",
                schema::COLUMNS.len(),
                self.columns.len()
            )));
        }
        for (column, (name, column_type)) in self.columns.iter().zip(schema::COLUMNS.iter()) {
            if column.column_type() != *column_type {
                return Err(DataError::Snapshot(format!("column {name} has wrong type")));
            }
        }
        let rows = self.len();
        for (column, (name, _)) in self.columns.iter().zip(schema::COLUMNS.iter()) {
            if column.len() != rows {
                return Err(DataError::Snapshot(format!(
                    "column {name} has {} rows, expected {rows}",
                    column.len()
                )));
            }
        }
        Ok(())
    }
}
