pub mod record_dtos;

pub use record_dtos::{Record, RecordInput};
