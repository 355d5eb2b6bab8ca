use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::course::Course;
use super::period::Period;
use super::user::{SchoolClass, Student, Teacher};
use crate::CoreError;
use crate::enums::ResultColor;
use crate::text::as_float;

/// The score badge of an evaluation. `description` reads `"13,5/18"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultGraphic {
    #[serde(rename = "type")]
    pub kind: String,
    pub color: ResultColor,
    pub value: i64,
    pub description: String,
}

impl ResultGraphic {
    fn score_part(&self, index: usize) -> Result<f64, CoreError> {
        let part = self.description.split('/').nth(index).ok_or_else(|| {
            CoreError::Parse(format!("score without '/': {:?}", self.description))
        })?;
        as_float(part)
    }

    /// # Errors
    ///
    /// Returns [`CoreError::Parse`] if the description is not `"x/y"`.
    pub fn achieved_points(&self) -> Result<f64, CoreError> {
        self.score_part(0)
    }

    /// # Errors
    ///
    /// Returns [`CoreError::Parse`] if the description is not `"x/y"`.
    pub fn total_points(&self) -> Result<f64, CoreError> {
        self.score_part(1)
    }

    /// Achieved over total, in `0.0..=1.0` for regular scores.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Parse`] if the description is not `"x/y"` or the
    /// total is zero.
    pub fn percentage(&self) -> Result<f64, CoreError> {
        let total = self.total_points()?;
        if total == 0.0 {
            return Err(CoreError::Parse(format!("zero total in {:?}", self.description)));
        }
        Ok(self.achieved_points()? / total)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub abbreviation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub text: String,
    pub user: Teacher,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackFull {
    #[serde(default)]
    pub attachments: Vec<String>,
    #[serde(deserialize_with = "crate::de::datetime")]
    pub changed_at: DateTime<FixedOffset>,
    #[serde(deserialize_with = "crate::de::datetime")]
    pub created_at: DateTime<FixedOffset>,
    pub evaluation_id: String,
    pub id: String,
    pub student: Student,
    pub teacher: Teacher,
    pub text: String,
}

/// Extra information only served by the single-evaluation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultDetails {
    #[serde(default)]
    pub central_tendencies: Vec<serde_json::Value>,
    #[serde(default)]
    pub teachers: Vec<Teacher>,
    #[serde(deserialize_with = "crate::de::datetime")]
    pub date_changed: DateTime<FixedOffset>,
    pub user_changed: Teacher,
    #[serde(rename = "class")]
    pub class: SchoolClass,
}

/// One graded evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    pub identifier: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub graphic: ResultGraphic,
    #[serde(deserialize_with = "crate::de::datetime")]
    pub date: DateTime<FixedOffset>,
    pub gradebook_owner: Teacher,
    pub component: Option<Component>,
    #[serde(default)]
    pub courses: Vec<Course>,
    pub period: Period,
    #[serde(default)]
    pub feedback: Vec<Feedback>,
    #[serde(default)]
    pub feedbacks: Vec<FeedbackFull>,
    #[serde(deserialize_with = "crate::de::datetime")]
    pub availability_date: DateTime<FixedOffset>,
    pub is_published: bool,
    pub does_count: bool,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub details: Option<ResultDetails>,
}
