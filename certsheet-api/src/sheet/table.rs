//! Header+rows to record conversion

use indexmap::IndexMap;

/// A single sheet row keyed by header name, in header order.
/// Empty and missing cells are `None` and serialize as JSON `null`.
pub type Record = IndexMap<String, Option<String>>;

/// Convert a block of rows into records, treating row 0 as the header.
///
/// Rows shorter than the header produce `None` for every missing trailing
/// field; an explicitly empty cell is treated the same way. Cells beyond the
/// header width are ignored.
pub fn rows_to_records(rows: &[Vec<String>]) -> Vec<Record> {
    let Some((header, data)) = rows.split_first() else {
        return Vec::new();
    };

    data.iter().map(|row| record_from_row(header, row)).collect()
}

/// Build one record from a data row using the given header.
pub fn record_from_row(header: &[String], row: &[String]) -> Record {
    let mut record = Record::with_capacity(header.len());
    for (index, field) in header.iter().enumerate() {
        let value = row
            .get(index)
            .filter(|cell| !cell.is_empty())
            .cloned();
        record.insert(field.clone(), value);
    }
    record
}
