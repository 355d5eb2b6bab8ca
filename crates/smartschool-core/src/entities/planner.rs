//! Planner records: planned assignments, to-dos and placeholders.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::user::{Group, User};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedElementPeriod {
    #[serde(deserialize_with = "crate::de::datetime")]
    pub date_time_from: DateTime<FixedOffset>,
    #[serde(deserialize_with = "crate::de::datetime")]
    pub date_time_to: DateTime<FixedOffset>,
    #[serde(default)]
    pub whole_day: bool,
    #[serde(default)]
    pub deadline: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedElementOrganisers {
    #[serde(default)]
    pub users: Vec<User>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupFilters {
    #[serde(default)]
    pub filters: Vec<serde_json::Value>,
    #[serde(default)]
    pub additional_users: Vec<User>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedElementParticipants {
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub group_filters: GroupFilters,
}

/// Which properties of a planned element the user may see.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserSeeProperties {
    pub id: bool,
    pub platform_id: bool,
    pub period: bool,
    pub organisers: bool,
    pub participants: bool,
    pub planned_element_type: bool,
    pub is_participant: bool,
    pub capabilities: bool,
    pub courses: bool,
    pub locations: bool,
    pub name: bool,
}

/// What the user may do with a planned element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserCapabilities {
    pub can_user_trash: bool,
    pub can_user_restore_from_trash: bool,
    pub can_user_delete: bool,
    pub can_user_edit: bool,
    pub can_user_replace: bool,
    pub can_user_edit_presence: bool,
    pub can_user_reschedule: bool,
    pub can_user_change_user_color: bool,
    pub can_user_change_user_view_metadata: bool,
    pub can_user_see_properties: UserSeeProperties,
    pub can_user_change_organisers: bool,
    pub can_user_change_participants: bool,
    pub can_user_change_participant_group_filters: bool,
    pub can_user_change_courses: bool,
    pub can_user_change_locations: bool,
    pub can_user_create_video_call: bool,
    pub can_user_see_video_call: bool,
    pub can_user_manage_video_call: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedElementCourseCluster {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedElementCourse {
    pub id: String,
    pub platform_id: i64,
    pub name: String,
    #[serde(default)]
    pub schedule_codes: Vec<String>,
    #[serde(default)]
    pub icon: String,
    pub course_cluster: Option<PlannedElementCourseCluster>,
    #[serde(default)]
    pub is_visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedElementLocation {
    pub id: String,
    pub platform_id: i64,
    #[serde(default)]
    pub platform_name: String,
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub icon: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub selectable: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedElementJoinIds {
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedElementAssignmentType {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub abbreviation: String,
    #[serde(default)]
    pub is_visible: bool,
    #[serde(default, deserialize_with = "crate::de::lenient_f64")]
    pub weight: f64,
}

/// An element in the planner (assignment, to-do, placeholder, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedElement {
    pub id: String,
    pub platform_id: i64,
    pub period: PlannedElementPeriod,
    #[serde(default)]
    pub organisers: PlannedElementOrganisers,
    #[serde(default)]
    pub participants: PlannedElementParticipants,
    pub planned_element_type: String,
    #[serde(default)]
    pub is_participant: bool,
    #[serde(default)]
    pub capabilities: UserCapabilities,
    #[serde(default)]
    pub courses: Vec<PlannedElementCourse>,
    #[serde(default)]
    pub locations: Vec<PlannedElementLocation>,
    #[serde(default)]
    pub sort: String,
    #[serde(default)]
    pub unconfirmed: bool,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub join_ids: PlannedElementJoinIds,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub assignment_type: Option<PlannedElementAssignmentType>,
    #[serde(default)]
    pub resolved_status: String,
    #[serde(default)]
    pub online_session: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicableAssignmentType {
    pub id: String,
    pub platform_id: i64,
    pub name: String,
    #[serde(default)]
    pub abbreviation: String,
    #[serde(default)]
    pub is_visible: bool,
    #[serde(deserialize_with = "crate::de::lenient_f64")]
    pub weight: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_planned_element() {
        let element: PlannedElement = serde_json::from_str(
            r#"{
                "id": "0b5d2f8a-7c1e-4c57-9b3a-2f1d6e8a9c01",
                "platformId": 49,
                "period": {
                    "dateTimeFrom": "2025-05-06T08:25:00+02:00",
                    "dateTimeTo": "2025-05-06T09:15:00+02:00",
                    "wholeDay": false,
                    "deadline": false
                },
                "plannedElementType": "planned-placeholders",
                "capabilities": { "canUserEdit": false, "canUserSeeProperties": { "name": true } },
                "courses": [{
                    "id": "1c5d2f8a-7c1e-4c57-9b3a-2f1d6e8a9c01", "platformId": 49, "name": "Godsdienst",
                    "scheduleCodes": ["GOD"], "icon": "", "courseCluster": { "id": 1, "name": "Godsdienst" },
                    "isVisible": true
                }],
                "unconfirmed": false,
                "joinIds": { "from": "a", "to": "b" }
            }"#,
        )
        .unwrap();
        assert_eq!(element.courses[0].name, "Godsdienst");
        assert_eq!(element.planned_element_type, "planned-placeholders");
        assert!(element.capabilities.can_user_see_properties.name);
        assert!(!element.unconfirmed);
    }

    #[test]
    fn parses_assignment_type() {
        let kind: ApplicableAssignmentType = serde_json::from_str(
            r#"{"id": "12657aa0-3b29-4977-925b-e2a0f133f2ba", "platformId": 49, "name": "-",
                "abbreviation": "-", "isVisible": true, "weight": 1}"#,
        )
        .unwrap();
        assert_eq!(kind.platform_id, 49);
        assert!((kind.weight - 1.0).abs() < f64::EPSILON);
    }
}
