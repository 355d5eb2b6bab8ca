use serde::{Deserialize, Serialize};

use super::course::SkoreWorkYear;
use super::user::SchoolClass;

/// A grading period ("1 september - 24 oktober").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub icon: String,
    pub skore_work_year: SkoreWorkYear,
    pub is_active: bool,
    #[serde(rename = "class")]
    pub class: SchoolClass,
}
