//! Record and value model

mod record;
mod record_serde;
mod value;

pub use record::*;
pub use record_serde::records_from_json;
pub use value::*;
