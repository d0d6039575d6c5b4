//! Dataset sources

mod csv_loader;

pub use csv_loader::CsvDatasetSource;
