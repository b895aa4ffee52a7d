//! csvcf-core: Core library for preparing contact lists
//!
//! This library provides functionality to:
//! - Convert contact CSV files to vCard 2.1 files and back
//! - Load, rename and concatenate tabular CSV datasets
//! - Merge numbered CSV files in numeric file-name order
//! - Build a contact CSV from a list of phone numbers

pub mod contact;
pub mod converter;
pub mod error;
pub mod job;
pub mod maker;
pub mod merger;
pub mod naming;
pub mod parser;
pub mod scanner;
pub mod store;
pub mod table;
pub mod tabular;
pub mod vcard;

pub use contact::ContactRecord;
pub use converter::{convert, ConvertOptions, ConvertReport, Direction, FileOutcome};
pub use error::{Error, ErrorKind, Result};
pub use job::ConvertJob;
pub use maker::make_dataset;
pub use merger::{concatenate_two, merge_ordered, MergeOrderKey};
pub use naming::NamingSequence;
pub use parser::{parse_csv, write_csv};
pub use scanner::collect_inputs;
pub use store::{concat_all, load_datasets, rename_first_column, save, LoadReport, SessionState};
pub use table::{Record, TableView, TabularDataset};
