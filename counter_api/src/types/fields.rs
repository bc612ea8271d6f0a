//! Column names of a COUNTER5 item report row, plus the columns the royalty
//! pipeline adds.

pub const PROPRIETARY_ID: &str = "Proprietary_ID";
pub const PARENT_PROPRIETARY_ID: &str = "Parent_Proprietary_ID";
pub const SECTION_TYPE: &str = "Section_Type";
pub const ISBN: &str = "ISBN";
pub const PUBLISHER: &str = "Publisher";
pub const ACCESS_TYPE: &str = "Access_Type";
pub const METRIC_TYPE: &str = "Metric_Type";
pub const REPORTING_PERIOD_TOTAL: &str = "Reporting_Period_Total";

pub const HITS: &str = "Hits";
pub const HEBID: &str = "hebid";
pub const RIGHTSHOLDER: &str = "Rightsholder";
pub const EBOOK_ISBN: &str = "ebook ISBN";
pub const HARDCOVER_ISBN: &str = "hardcover ISBN";
pub const PAPER_ISBN: &str = "paper ISBN";
