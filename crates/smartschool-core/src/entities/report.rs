use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::user::SchoolClass;

/// A report card published in the results module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(deserialize_with = "crate::de::datetime")]
    pub date: DateTime<FixedOffset>,
    /// Endpoint answering `{"url": ...}` with the actual file location.
    pub download_url: String,
    #[serde(rename = "class")]
    pub class: SchoolClass,
    #[serde(default)]
    pub schoolyear_label: String,
}
