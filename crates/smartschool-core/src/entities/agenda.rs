//! Agenda records served by the XML dispatcher. Every leaf arrives as text.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A timetable slot ("Hour" in the portal).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgendaHour {
    #[serde(rename = "hourID", deserialize_with = "crate::de::lenient_string")]
    pub hour_id: String,
    /// `HH:MM`
    #[serde(deserialize_with = "crate::de::lenient_string")]
    pub start: String,
    /// `HH:MM`
    #[serde(deserialize_with = "crate::de::lenient_string")]
    pub end: String,
    #[serde(default, deserialize_with = "crate::de::lenient_string")]
    pub title: String,
}

/// One lesson in the agenda grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgendaLesson {
    #[serde(rename = "momentID", deserialize_with = "crate::de::lenient_string")]
    pub moment_id: String,
    #[serde(rename = "lessonID", default, deserialize_with = "crate::de::lenient_string")]
    pub lesson_id: String,
    #[serde(rename = "hourID", deserialize_with = "crate::de::lenient_string")]
    pub hour_id: String,
    #[serde(deserialize_with = "crate::de::date")]
    pub date: NaiveDate,
    /// Explanation written by the teacher.
    #[serde(default, deserialize_with = "crate::de::lenient_opt_string")]
    pub subject: Option<String>,
    #[serde(default, deserialize_with = "crate::de::lenient_string")]
    pub course: String,
    #[serde(default, deserialize_with = "crate::de::lenient_string")]
    pub course_title: String,
    #[serde(default, deserialize_with = "crate::de::lenient_string")]
    pub classroom: String,
    #[serde(default, deserialize_with = "crate::de::lenient_string")]
    pub classroom_title: String,
    #[serde(default, deserialize_with = "crate::de::lenient_string")]
    pub teacher: String,
    #[serde(default, deserialize_with = "crate::de::lenient_string")]
    pub teacher_title: String,
    #[serde(default, deserialize_with = "crate::de::lenient_string")]
    pub klassen: String,
    #[serde(default, deserialize_with = "crate::de::lenient_string")]
    pub klassen_title: String,
    #[serde(rename = "classIDs", default, deserialize_with = "crate::de::lenient_string")]
    pub class_ids: String,
    #[serde(default, deserialize_with = "crate::de::lenient_string")]
    pub both_start_status: String,
    #[serde(default, deserialize_with = "crate::de::lenient_string")]
    pub assignment_end_status: String,
    #[serde(default, deserialize_with = "crate::de::lenient_string")]
    pub test_deadline_status: String,
    #[serde(default, deserialize_with = "crate::de::lenient_string")]
    pub note_status: String,
    #[serde(default, deserialize_with = "crate::de::lenient_opt_string")]
    pub note: Option<String>,
    #[serde(rename = "date_listview", default, deserialize_with = "crate::de::lenient_string")]
    pub date_listview: String,
    #[serde(default, deserialize_with = "crate::de::lenient_string")]
    pub hour: String,
    #[serde(default, deserialize_with = "crate::de::lenient_string")]
    pub activity: String,
    #[serde(rename = "activityID", default, deserialize_with = "crate::de::lenient_opt_string")]
    pub activity_id: Option<String>,
    #[serde(default, deserialize_with = "crate::de::lenient_string")]
    pub color: String,
    #[serde(default, deserialize_with = "crate::de::lenient_string")]
    pub hour_value: String,
    #[serde(rename = "components_hidden", default)]
    pub components_hidden: serde_json::Value,
    #[serde(default, deserialize_with = "crate::de::lenient_string")]
    pub freeday_icon: String,
    #[serde(default, deserialize_with = "crate::de::lenient_opt_string")]
    pub some_subjects_empty: Option<String>,
}

/// An assignment attached to an agenda moment (test, task, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgendaMomentAssignment {
    #[serde(default, deserialize_with = "crate::de::lenient_string")]
    pub start_assignment: String,
    #[serde(default, deserialize_with = "crate::de::lenient_string")]
    pub start: String,
    #[serde(default, deserialize_with = "crate::de::lenient_string")]
    pub end: String,
    #[serde(rename = "type", default, deserialize_with = "crate::de::lenient_string")]
    pub kind: String,
    #[serde(default, deserialize_with = "crate::de::lenient_string")]
    pub description: String,
    #[serde(rename = "atdescription", default, deserialize_with = "crate::de::lenient_string")]
    pub at_description: String,
    #[serde(rename = "freedeadline", default, deserialize_with = "crate::de::lenient_string")]
    pub free_deadline: String,
    #[serde(default, deserialize_with = "crate::de::lenient_string")]
    pub warning: String,
    #[serde(default, deserialize_with = "crate::de::lenient_string")]
    pub assignment_info: String,
    #[serde(default, deserialize_with = "crate::de::lenient_string")]
    pub assignment_deadline: String,
}

/// Details of one agenda moment (the book icon in the grid).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgendaMomentInfo {
    #[serde(default, deserialize_with = "crate::de::lenient_string")]
    pub class_name: String,
    #[serde(default, deserialize_with = "crate::de::lenient_string")]
    pub subject: String,
    #[serde(default, deserialize_with = "crate::de::lenient_opt_string")]
    pub materials: Option<String>,
    #[serde(rename = "momentID", deserialize_with = "crate::de::lenient_string")]
    pub moment_id: String,
    #[serde(default, deserialize_with = "crate::de::one_or_many")]
    pub assignments: Vec<AgendaMomentAssignment>,
}
