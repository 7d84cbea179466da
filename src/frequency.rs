use std::collections::HashMap;

use encoding_rs::Encoding;

use crate::{error::EngineError, io_utils};

/// Status value marking a certified case, compared after uppercasing.
pub const CERTIFIED_MARKER: &str = "CERTIFIED";

/// Count of certified rows per uppercased value of one column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: HashMap<String, usize>,
}

impl FrequencyTable {
    pub fn get(&self, value: &str) -> usize {
        self.counts.get(value).copied().unwrap_or(0)
    }

    /// Number of certified rows that contributed to this table.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(value, count)| (value.as_str(), *count))
    }

    fn record(&mut self, value: String) {
        *self.counts.entry(value).or_insert(0) += 1;
    }

    /// Top `n` values, highest count first, ties in ascending value order.
    pub fn ranked(&self, n: usize) -> Vec<(String, usize)> {
        let mut items = self
            .counts
            .iter()
            .map(|(value, count)| (value.clone(), *count))
            .collect::<Vec<_>>();
        items.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        items.truncate(n);
        items
    }
}

impl FromIterator<(String, usize)> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = (String, usize)>>(iter: I) -> Self {
        let mut table = FrequencyTable::default();
        for (value, count) in iter {
            *table.counts.entry(value).or_insert(0) += count;
        }
        table
    }
}

/// Builds frequency tables for several columns during one pass over the rows.
///
/// Tables only leave the accumulator through [`FrequencyAccumulator::finish`],
/// so a scan that fails part way publishes nothing.
pub(crate) struct FrequencyAccumulator {
    status: (String, usize),
    columns: Vec<(String, usize)>,
    tables: Vec<FrequencyTable>,
    encoding: &'static Encoding,
    rows_read: usize,
    certified_rows: usize,
}

impl FrequencyAccumulator {
    pub(crate) fn new(
        status: (String, usize),
        columns: Vec<(String, usize)>,
        encoding: &'static Encoding,
    ) -> Self {
        let tables = vec![FrequencyTable::default(); columns.len()];
        Self {
            status,
            columns,
            tables,
            encoding,
            rows_read: 0,
            certified_rows: 0,
        }
    }

    /// Counts one data row. `line` is the row's 1-based line in the file.
    pub(crate) fn ingest(
        &mut self,
        line: u64,
        record: &csv::ByteRecord,
    ) -> Result<(), EngineError> {
        self.rows_read += 1;
        let (status_name, status_index) = &self.status;
        let status = self.field(line, record, status_name, *status_index)?;
        if status.to_uppercase() != CERTIFIED_MARKER {
            return Ok(());
        }

        let mut values = Vec::with_capacity(self.columns.len());
        for (name, index) in &self.columns {
            values.push(self.field(line, record, name, *index)?.to_uppercase());
        }
        for (table, value) in self.tables.iter_mut().zip(values) {
            table.record(value);
        }
        self.certified_rows += 1;
        Ok(())
    }

    fn field(
        &self,
        line: u64,
        record: &csv::ByteRecord,
        column: &str,
        index: usize,
    ) -> Result<String, EngineError> {
        io_utils::decode_field(record, index, self.encoding)?.ok_or_else(|| {
            EngineError::MalformedRow {
                row: line,
                width: record.len(),
                column: column.to_string(),
                index,
            }
        })
    }

    pub(crate) fn rows_read(&self) -> usize {
        self.rows_read
    }

    pub(crate) fn certified_rows(&self) -> usize {
        self.certified_rows
    }

    pub(crate) fn finish(self) -> Vec<(String, FrequencyTable)> {
        self.columns
            .into_iter()
            .map(|(name, _)| name)
            .zip(self.tables)
            .collect()
    }
}
