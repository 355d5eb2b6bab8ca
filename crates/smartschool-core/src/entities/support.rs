use serde::{Deserialize, Serialize};

/// A help line link from the student support panel on the home page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSupportLink {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    pub link: String,
    #[serde(default)]
    pub clean_link: String,
    #[serde(default)]
    pub is_visible: bool,
}
