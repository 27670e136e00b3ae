pub mod aggregate;
pub mod error;
pub mod field_value;
pub mod json;
pub mod record;
pub mod record_type;

pub use aggregate::{Esu, Property, Street};
pub use error::CoreError;
pub use field_value::FieldValue;
pub use record::Record;
pub use record_type::{Aggregate, PropertySubRecord, RecordType, StreetSubRecord};
