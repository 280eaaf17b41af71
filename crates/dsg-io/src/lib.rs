//! CSV import of the solar prediction dataset and CSV export of derived views.

pub mod export;
pub mod import;

pub use export::{write_map_csv, write_series_csv, write_to_path};
pub use import::{load_dataset, parse_timestamp, read_dataset};
