mod fields;
pub use self::fields::*;

mod record;
pub use self::record::{FieldValue, UsageRecord};

mod report;
pub use self::report::ItemReport;
