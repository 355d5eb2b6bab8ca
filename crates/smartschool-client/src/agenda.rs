//! Agenda via the XML dispatcher. Answers are cached per week of the
//! reference date.

use chrono::{DateTime, Duration, Local};
use serde_json::Value;
use smartschool_core::entities::{AgendaHour, AgendaLesson, AgendaMomentInfo};

use crate::Smartschool;
use crate::error::ClientError;
use crate::xml::XmlCommand;

const MODULE: &str = "Agenda";
const LESSON_WINDOW_DAYS: i64 = 20;

/// Cache key of the week `at` falls in (`%Y-%U`, weeks starting on Sunday).
pub(crate) fn week_key(at: &DateTime<Local>) -> String {
    at.format("%Y-%U").to_string()
}

pub(crate) fn lessons_command(at: &DateTime<Local>) -> XmlCommand {
    let start = at.timestamp();
    let end = (*at + Duration::days(LESSON_WINDOW_DAYS)).timestamp();
    XmlCommand::new(MODULE, "agenda", "get lessons", "lesson")
        .param("startDateTimestamp", start)
        .param("endDateTimestamp", end)
        .param("filterType", "false")
        .param("filterID", "false")
        .param("gridType", "1")
        .param("classID", "0")
        .param("endDateTimestampOld", end)
        .param("forcedTeacher", "0")
        .param("forcedClass", "0")
        .param("forcedClassroom", "0")
        .param("assignmentTypeID", "1")
        .cached(week_key(at))
}

pub(crate) fn hours_command(at: &DateTime<Local>) -> XmlCommand {
    XmlCommand::new(MODULE, "grid", "get hours", "hour")
        .param("date", at.timestamp())
        .cached(week_key(at))
}

/// `assignments` arrives as `{"assignment": x}` with `x` one entry or many.
fn unwrap_assignments(entry: &mut Value) {
    if let Some(assignments) = entry.get_mut("assignments") {
        if let Some(inner) = assignments.get_mut("assignment").map(Value::take) {
            *assignments = inner;
        }
    }
}

impl Smartschool {
    /// Lessons in the 20 days starting at `at`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails or an entry cannot be
    /// parsed.
    pub async fn lessons(&self, at: DateTime<Local>) -> Result<Vec<AgendaLesson>, ClientError> {
        self.dispatch_as(&lessons_command(&at), |_| {}).await
    }

    /// Timetable slots of the week of `at`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails or an entry cannot be
    /// parsed.
    pub async fn hours(&self, at: DateTime<Local>) -> Result<Vec<AgendaHour>, ClientError> {
        self.dispatch_as(&hours_command(&at), |_| {}).await
    }

    /// The slot with `hour_id` in this week's timetable, if any.
    ///
    /// # Errors
    ///
    /// See [`Self::hours`].
    pub async fn hour_by_id(&self, hour_id: &str) -> Result<Option<AgendaHour>, ClientError> {
        Ok(self
            .hours(Local::now())
            .await?
            .into_iter()
            .find(|hour| hour.hour_id == hour_id))
    }

    /// Details (subject, materials, assignments) of one agenda moment.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidArgument`] for a blank `moment_id` and
    /// [`ClientError`] if the request fails or an entry cannot be parsed.
    pub async fn moment_infos(&self, moment_id: &str) -> Result<Vec<AgendaMomentInfo>, ClientError> {
        let moment_id = moment_id.trim();
        if moment_id.is_empty() {
            return Err(ClientError::InvalidArgument(
                "a moment id is required".into(),
            ));
        }

        let command = XmlCommand::new(MODULE, "agenda", "get moment info", "class")
            .param("momentID", moment_id)
            .param("dateID", "")
            .param("assignmentIDs", "")
            .param("activityID", "0")
            .cached(format!("{}/{moment_id}", week_key(&Local::now())));
        self.dispatch_as(&command, unwrap_assignments).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn week_key_uses_sunday_weeks() {
        let saturday = Local.with_ymd_and_hms(2023, 11, 18, 12, 0, 0).unwrap();
        let sunday = Local.with_ymd_and_hms(2023, 11, 19, 12, 0, 0).unwrap();
        assert_eq!(week_key(&saturday), "2023-46");
        assert_eq!(week_key(&sunday), "2023-47");
    }

    #[test]
    fn lessons_span_twenty_days() {
        let at = Local.with_ymd_and_hms(2023, 11, 15, 12, 0, 0).unwrap();
        let envelope = lessons_command(&at).envelope();
        let start = at.timestamp();
        let end = (at + Duration::days(20)).timestamp();
        assert!(envelope.contains(&format!(
            r#"<param name="startDateTimestamp"><![CDATA[{start}]]></param>"#
        )));
        assert!(envelope.contains(&format!(
            r#"<param name="endDateTimestampOld"><![CDATA[{end}]]></param>"#
        )));
        assert!(envelope.contains("<action>get lessons</action>"));
    }

    #[test]
    fn same_week_shares_a_cache_key() {
        let monday = Local.with_ymd_and_hms(2023, 11, 13, 8, 0, 0).unwrap();
        let friday = Local.with_ymd_and_hms(2023, 11, 17, 8, 0, 0).unwrap();
        assert_eq!(
            hours_command(&monday).cache_key(),
            hours_command(&friday).cache_key()
        );
        assert_ne!(
            hours_command(&monday).cache_key(),
            lessons_command(&monday).cache_key()
        );
    }

    #[test]
    fn assignments_are_unwrapped() {
        let mut single = json!({"assignments": {"assignment": {"description": "Toets"}}});
        unwrap_assignments(&mut single);
        assert_eq!(single, json!({"assignments": {"description": "Toets"}}));

        let mut none = json!({"assignments": null});
        unwrap_assignments(&mut none);
        assert_eq!(none, json!({"assignments": null}));
    }
}
