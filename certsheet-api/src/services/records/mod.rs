//! Intern certificate records stored in one spreadsheet tab

mod error;
mod models;
mod service;

pub use error::RecordError;
pub use models::SheetTarget;
pub use service::RecordService;
