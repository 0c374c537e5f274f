//! # nimbus-io
//!
//! Read daily weather observations from CSV and persist trained models as
//! JSON. Bridges external files into the record and model types of
//! `nimbus-markov`.

mod error;
mod model;
mod observed;
mod reader;
mod validate;

pub use error::IoError;
pub use model::{SavedModel, read_model, write_model};
pub use observed::ObservedSeries;
pub use reader::{DATE_FORMAT, ReaderConfig, read_csv, read_csv_from};
