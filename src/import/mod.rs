mod csv_import;
mod detect;
mod source;

pub(crate) use csv_import::{CsvImporter, CsvProfile, ImportReport};
pub(crate) use detect::detect_bank_format;
pub(crate) use source::{load_all, CsvSource};
