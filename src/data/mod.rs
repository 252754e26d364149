//! Market data acquisition.

pub mod csv_loader;

pub use csv_loader::{load_csv, parse_reader};
