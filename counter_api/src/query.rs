//! Parameters for a COUNTER5 item report request.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

/// COUNTER5 access types a royalty report covers.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessType {
    Controlled,
    #[serde(rename = "OA_Gold")]
    OaGold,
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Controlled => f.write_str("Controlled"),
            Self::OaGold => f.write_str("OA_Gold"),
        }
    }
}

/// Filters sent to the usage-metrics source when asking for an item report.
///
/// [`ItemReportParams::royalty`] gives the filter set royalty reporting needs:
/// book-level `Total_Item_Requests` over regular access, both access types,
/// with parent details and a monthly breakdown.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ItemReportParams {
    pub report_type: String,
    pub institution: String,
    pub press: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub metric_type: String,
    pub data_type: String,
    pub access_types: Vec<AccessType>,
    pub access_method: String,
    pub attributes_to_show: Vec<String>,
    pub include_parent_details: bool,
    pub include_monthly_details: bool,
}

impl ItemReportParams {
    pub fn royalty(press: &str, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            report_type: "ir".to_string(),
            institution: "*".to_string(),
            press: press.to_string(),
            start_date,
            end_date,
            metric_type: "Total_Item_Requests".to_string(),
            data_type: "Book".to_string(),
            access_types: vec![AccessType::Controlled, AccessType::OaGold],
            access_method: "Regular".to_string(),
            attributes_to_show: [
                "Authors",
                "Publication_Date",
                "Data_Type",
                "YOP",
                "Access_Type",
                "Access_Method",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            include_parent_details: true,
            include_monthly_details: true,
        }
    }

    pub fn with_institution(mut self, institution: &str) -> Self {
        self.institution = institution.to_string();
        self
    }

    pub fn with_access_types(mut self, access_types: &[AccessType]) -> Self {
        self.access_types = access_types.to_vec();
        self
    }

    pub fn with_monthly_details(mut self, include: bool) -> Self {
        self.include_monthly_details = include;
        self
    }

    /// Renders the parameters as `(key, value)` pairs. List values are
    /// repeated once per entry.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("report_type".to_string(), self.report_type.clone()),
            ("institution".to_string(), self.institution.clone()),
            ("press".to_string(), self.press.clone()),
            ("start_date".to_string(), self.start_date.to_string()),
            ("end_date".to_string(), self.end_date.to_string()),
            ("metric_type".to_string(), self.metric_type.clone()),
            ("data_type".to_string(), self.data_type.clone()),
        ];
        for access_type in &self.access_types {
            pairs.push(("access_type".to_string(), access_type.to_string()));
        }
        pairs.push(("access_method".to_string(), self.access_method.clone()));
        for attribute in &self.attributes_to_show {
            pairs.push(("attributes_to_show".to_string(), attribute.clone()));
        }
        pairs.push((
            "include_parent_details".to_string(),
            self.include_parent_details.to_string(),
        ));
        pairs.push((
            "include_monthly_details".to_string(),
            self.include_monthly_details.to_string(),
        ));
        pairs.push((
            "exclude_monthly_details".to_string(),
            (!self.include_monthly_details).to_string(),
        ));
        pairs
    }
}
