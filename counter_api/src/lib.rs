mod errors;
mod query;
mod source;
pub mod types;
pub use self::errors::Error;
pub use self::query::{AccessType, ItemReportParams};
pub use self::source::{JsonFileSource, StaticSource, UsageSource};
