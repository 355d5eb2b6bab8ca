//! Upcoming tasks ("future tasks") grouped per day and course.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FutureTask {
    #[serde(deserialize_with = "crate::de::lenient_string")]
    pub label: String,
    #[serde(default, deserialize_with = "crate::de::lenient_string")]
    pub description: String,
    #[serde(default, deserialize_with = "crate::de::lenient_string")]
    pub icon: String,
    #[serde(default, deserialize_with = "crate::de::lenient_bool")]
    pub warning: bool,
    #[serde(default, deserialize_with = "crate::de::lenient_string")]
    pub click_handle: String,
    #[serde(rename = "activityID", deserialize_with = "crate::de::lenient_i64")]
    pub activity_id: i64,
    #[serde(rename = "dateID", default, deserialize_with = "crate::de::lenient_string")]
    pub date_id: String,
    #[serde(rename = "assignmentID", default, deserialize_with = "crate::de::lenient_string")]
    pub assignment_id: String,
    #[serde(rename = "endMomentTS", default, deserialize_with = "crate::de::lenient_opt_string")]
    pub end_moment_ts: Option<String>,
    #[serde(rename = "startMomentID", default, deserialize_with = "crate::de::lenient_string")]
    pub start_moment_id: String,
    #[serde(rename = "endMomentID", default, deserialize_with = "crate::de::lenient_string")]
    pub end_moment_id: String,
    #[serde(rename = "lessonID", default, deserialize_with = "crate::de::lenient_string")]
    pub lesson_id: String,
    #[serde(rename = "type", default, deserialize_with = "crate::de::lenient_string")]
    pub kind: String,
    #[serde(rename = "classID", default, deserialize_with = "crate::de::lenient_string")]
    pub class_id: String,
    #[serde(default, deserialize_with = "crate::de::lenient_string")]
    pub course: String,
    #[serde(deserialize_with = "crate::de::date")]
    pub date: NaiveDate,
    #[serde(rename = "hourID", default, deserialize_with = "crate::de::lenient_string")]
    pub hour_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FutureTaskItems {
    #[serde(default)]
    pub tasks: Vec<FutureTask>,
    #[serde(default)]
    pub materials: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FutureTaskCourse {
    #[serde(rename = "lessonID", default, deserialize_with = "crate::de::lenient_string")]
    pub lesson_id: String,
    #[serde(rename = "hourID", default, deserialize_with = "crate::de::lenient_string")]
    pub hour_id: String,
    #[serde(rename = "classID", default, deserialize_with = "crate::de::lenient_string")]
    pub class_id: String,
    pub course_title: String,
    #[serde(default)]
    pub items: FutureTaskItems,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FutureTaskDay {
    #[serde(deserialize_with = "crate::de::date")]
    pub date: NaiveDate,
    #[serde(default)]
    pub pretty_date: String,
    #[serde(default)]
    pub courses: Vec<FutureTaskCourse>,
}
