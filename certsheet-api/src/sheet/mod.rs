//! Spreadsheet row model
//!
//! Pure conversion between the tabular header+rows shape returned by the
//! Sheets API and keyed records, plus the business-key lookup that turns a
//! certificate number into a physical row for targeted writes.

pub mod range;
pub mod resolver;
pub mod row;
pub mod table;

pub use range::{ColumnSpan, PhysicalRow, SheetRange};
pub use resolver::{KeyMatch, find_row_by_key};
pub use row::{CERTIFICATE_FIELDS, CertificateInput};
pub use table::{Record, record_from_row, rows_to_records};
