pub mod fixtures;
pub mod session;
pub mod validators;

pub use session::{TempSqlite, TestSession};
pub use validators::{ScriptedValidators, ValidatorCall};
