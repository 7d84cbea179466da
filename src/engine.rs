//! Certified-count aggregation over a single case file.
//!
//! [`CertifiedCounter`] reads the header once at construction, resolves the
//! occupation, status and worksite-state roles, then counts certified rows
//! per value for any requested column. Counted columns are cached for the
//! life of the counter:
//!
//! - a column already in the cache is never scanned again, even if the file
//!   has changed since;
//! - all new columns of one request are counted in a single pass;
//! - a request that fails publishes nothing, so the cache only ever holds
//!   tables from completed scans.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use anyhow::Context;
use encoding_rs::{Encoding, UTF_8};
use itertools::Itertools;
use log::{debug, info};
use serde_yaml::Value as YamlValue;

use crate::{
    error::EngineError,
    frequency::{FrequencyAccumulator, FrequencyTable},
    io_utils,
    request::{ColumnRequest, TopCount, value_kind},
    schema::{Role, SchemaResolver},
};

#[derive(Debug, Clone, Copy)]
pub struct EngineOptions {
    pub delimiter: u8,
    pub encoding: &'static Encoding,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            delimiter: io_utils::DEFAULT_DELIMITER,
            encoding: UTF_8,
        }
    }
}

#[derive(Debug)]
pub struct CertifiedCounter {
    path: PathBuf,
    options: EngineOptions,
    schema: SchemaResolver,
    counts: BTreeMap<String, FrequencyTable>,
}

impl CertifiedCounter {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        Self::with_options(path, EngineOptions::default())
    }

    pub fn with_options(
        path: impl AsRef<Path>,
        options: EngineOptions,
    ) -> Result<Self, EngineError> {
        let path = path.as_ref().to_path_buf();
        let mut reader = io_utils::open_csv_reader_from_path(&path, options.delimiter)?;
        let raw_header = io_utils::reader_headers(&mut reader, options.encoding)
            .with_context(|| format!("Reading header of {path:?}"))?;
        let schema = SchemaResolver::new(&raw_header)?;
        debug!(
            "Resolved {:?}: occupation={} status={} worksite-state={}",
            path,
            schema.column(Role::Occupation),
            schema.column(Role::Status),
            schema.column(Role::WorksiteState)
        );
        Ok(Self {
            path,
            options,
            schema,
            counts: BTreeMap::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn header(&self) -> &[String] {
        self.schema.header()
    }

    pub fn schema(&self) -> &SchemaResolver {
        &self.schema
    }

    pub fn column_for(&self, role: Role) -> &str {
        self.schema.column(role)
    }

    pub fn occupation_column(&self) -> &str {
        self.column_for(Role::Occupation)
    }

    pub fn status_column(&self) -> &str {
        self.column_for(Role::Status)
    }

    pub fn state_column(&self) -> &str {
        self.column_for(Role::WorksiteState)
    }

    pub fn table(&self, column: &str) -> Option<&FrequencyTable> {
        self.counts.get(&column.to_uppercase())
    }

    /// Certified rows behind a counted column, or `None` if not yet counted.
    pub fn certified_total(&self, column: &str) -> Option<usize> {
        self.table(column).map(FrequencyTable::total)
    }

    pub fn counted_columns(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }

    /// Counts certified rows per value for every requested column not yet
    /// cached, in one pass over the file.
    pub fn count(&mut self, request: impl Into<ColumnRequest>) -> Result<(), EngineError> {
        let request = request.into();
        let pending = request
            .columns()
            .iter()
            .map(|column| column.to_uppercase())
            .unique()
            .filter(|column| !self.counts.contains_key(column))
            .collect::<Vec<_>>();
        if pending.is_empty() {
            debug!("All requested columns already counted; skipping scan");
            return Ok(());
        }

        let mut reader = io_utils::open_csv_reader_from_path(&self.path, self.options.delimiter)?;
        reader
            .byte_headers()
            .with_context(|| format!("Reading header of {:?}", self.path))?;

        let columns = pending
            .into_iter()
            .map(|column| match self.schema.position(&column) {
                Some(index) => Ok((column, index)),
                None => Err(EngineError::UnknownColumn { column }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        let status = self.schema.resolved(Role::Status);

        let mut accumulator = FrequencyAccumulator::new(
            (status.name.clone(), status.index),
            columns,
            self.options.encoding,
        );
        let mut record = csv::ByteRecord::new();
        loop {
            let more = reader
                .read_byte_record(&mut record)
                .with_context(|| format!("Reading {:?}", self.path))?;
            if !more {
                break;
            }
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            accumulator.ingest(line, &record)?;
        }

        info!(
            "Scanned {} row(s) of {:?}; {} certified",
            accumulator.rows_read(),
            self.path,
            accumulator.certified_rows()
        );
        for (column, table) in accumulator.finish() {
            debug!("Counted {} distinct value(s) for {column}", table.distinct());
            self.counts.insert(column, table);
        }
        Ok(())
    }

    /// Untyped entry point for [`count`](Self::count); rejects anything other
    /// than text or a sequence of text before touching the file.
    pub fn count_value(&mut self, columns: &YamlValue) -> Result<(), EngineError> {
        let request = ColumnRequest::from_value(columns)?;
        self.count(request)
    }

    /// Highest-count values of `column`, counting it first if needed.
    pub fn top_n(&mut self, column: &str, n: usize) -> Result<Vec<(String, usize)>, EngineError> {
        let key = column.to_uppercase();
        if !self.counts.contains_key(&key) {
            self.count(key.as_str())?;
        }
        let table = self
            .counts
            .get(&key)
            .ok_or_else(|| EngineError::UnknownColumn { column: key.clone() })?;
        Ok(table.ranked(n))
    }

    /// Untyped entry point for [`top_n`](Self::top_n).
    pub fn top_n_value(
        &mut self,
        column: &YamlValue,
        n: &YamlValue,
    ) -> Result<Vec<(String, usize)>, EngineError> {
        let n = TopCount::from_value(n)?;
        let column = match column {
            YamlValue::String(column) => column.as_str(),
            other => {
                return Err(EngineError::InvalidColumnType {
                    found: value_kind(other),
                });
            }
        };
        self.top_n(column, n.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const SAMPLE: &str = "\
CASE_NUMBER;CASE_STATUS;SOC_NAME;WORKSITE_STATE
I-1;CERTIFIED;ACTUARIES;FL
I-2;DENIED;ACTUARIES;FL
I-3;certified;Actuaries;ca
I-4;CERTIFIED;CHEMISTS;FL
";

    #[test]
    fn count_caches_tables_keyed_by_uppercase_name() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("cases.csv");
        fs::write(&path, SAMPLE).expect("write sample");

        let mut counter = CertifiedCounter::open(&path).expect("open");
        counter.count("soc_name").expect("count");
        let table = counter.table("SOC_NAME").expect("cached");
        assert_eq!(table.get("ACTUARIES"), 2);
        assert_eq!(table.get("CHEMISTS"), 1);
        assert_eq!(counter.certified_total("soc_name"), Some(3));
        assert_eq!(counter.counted_columns().collect::<Vec<_>>(), vec!["SOC_NAME"]);
    }

    #[test]
    fn duplicate_names_in_one_request_scan_once() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("cases.csv");
        fs::write(&path, SAMPLE).expect("write sample");

        let mut counter = CertifiedCounter::open(&path).expect("open");
        counter
            .count(&["WORKSITE_STATE", "worksite_state"][..])
            .expect("count");
        assert_eq!(counter.certified_total("WORKSITE_STATE"), Some(3));
        assert_eq!(counter.counted_columns().count(), 1);
    }

    #[test]
    fn top_n_value_validates_before_counting() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("cases.csv");
        fs::write(&path, SAMPLE).expect("write sample");

        let mut counter = CertifiedCounter::open(&path).expect("open");
        let column = YamlValue::String("WORKSITE_STATE".to_string());
        let err = counter
            .top_n_value(&column, &YamlValue::from(1.5))
            .expect_err("float count");
        assert!(matches!(err, EngineError::InvalidCount { .. }));
        let err = counter
            .top_n_value(&YamlValue::from(3), &YamlValue::from(1))
            .expect_err("integer column");
        assert!(matches!(err, EngineError::InvalidColumnType { .. }));
        assert_eq!(counter.counted_columns().count(), 0);

        let top = counter
            .top_n_value(&column, &YamlValue::from(1))
            .expect("top");
        assert_eq!(top, vec![("FL".to_string(), 2)]);
    }
}
