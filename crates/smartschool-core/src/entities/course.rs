use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::user::{SchoolClass, Teacher};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseGraphic {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(deserialize_with = "crate::de::datetime")]
    pub start: DateTime<FixedOffset>,
    #[serde(deserialize_with = "crate::de::datetime")]
    pub end: DateTime<FixedOffset>,
}

/// A school year as the grade book ("Skore") sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkoreWorkYear {
    pub id: i64,
    pub date_range: DateRange,
}

/// A course as listed by the results API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: i64,
    pub name: String,
    pub graphic: CourseGraphic,
    #[serde(default)]
    pub teachers: Vec<Teacher>,
    pub skore_class_id: i64,
    pub parent_course_id: Option<i64>,
    pub skore_work_year: SkoreWorkYear,
    #[serde(rename = "class")]
    pub class: SchoolClass,
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plural = if self.teachers.len() == 1 { "" } else { "s" };
        let names: Vec<&str> = self
            .teachers
            .iter()
            .map(|t| t.name.starting_with_last_name.as_str())
            .collect();
        write!(f, "{} (Teacher{plural}: {})", self.name, names.join(", "))
    }
}

/// A course as listed in the top navigation bar. This is the entry point of
/// the document tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseCondensed {
    pub name: String,
    #[serde(default)]
    pub teacher: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, deserialize_with = "crate::de::lenient_opt_i64")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "crate::de::lenient_opt_i64")]
    pub platform_id: Option<i64>,
    #[serde(default)]
    pub descr: String,
    #[serde(default)]
    pub icon: String,
}

impl fmt::Display for CourseCondensed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (Teacher: {})", self.name, self.teacher)
    }
}
