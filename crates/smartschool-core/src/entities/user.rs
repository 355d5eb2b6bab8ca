use serde::{Deserialize, Serialize};

/// A name rendered in both orders, as the portal sends it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonDescription {
    #[serde(default)]
    pub starting_with_first_name: String,
    #[serde(default)]
    pub starting_with_last_name: String,
}

/// A portal account as embedded in results, feedback and planner payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub picture_hash: String,
    #[serde(default)]
    pub picture_url: String,
    #[serde(default)]
    pub description: PersonDescription,
    #[serde(default)]
    pub name: PersonDescription,
    #[serde(default)]
    pub sort: String,
    #[serde(default)]
    pub deleted: bool,
}

pub type Teacher = User;
pub type Student = User;

/// A group of users (class, subgroup) in planner participant lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub identifier: String,
    pub id: String,
    pub platform_id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub sort: String,
}

/// A school class (`"3ENW"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolClass {
    pub identifier: String,
    pub id: i64,
    pub platform_id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub icon: String,
}

/// The account the session is logged in as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    #[serde(deserialize_with = "crate::de::lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "crate::de::lenient_opt_i64")]
    pub platform_id: Option<i64>,
    #[serde(default)]
    pub name: PersonDescription,
    #[serde(default)]
    pub username: Option<String>,
}
