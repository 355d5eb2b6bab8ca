//! Course listings.

use serde::Deserialize;
use smartschool_core::entities::{Course, CourseCondensed};

use crate::Smartschool;
use crate::error::ClientError;
use crate::http::PortalRequest;

#[derive(Deserialize)]
struct TopNavConfig {
    #[serde(default)]
    own: Vec<CourseCondensed>,
}

impl Smartschool {
    /// Courses as the results module knows them (teachers, class, school
    /// year).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails or the answer cannot be
    /// parsed.
    pub async fn courses(&self) -> Result<Vec<Course>, ClientError> {
        self.json(PortalRequest::get("/results/api/v1/courses/")).await
    }

    /// Courses of the top navigation bar. These lead to the document tree.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails or the answer cannot be
    /// parsed.
    pub async fn top_nav_courses(&self) -> Result<Vec<CourseCondensed>, ClientError> {
        let config: TopNavConfig = self
            .json(PortalRequest::post("/Topnav/getCourseConfig"))
            .await?;
        Ok(config.own)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_nav_keeps_own_courses() {
        let config: TopNavConfig = serde_json::from_str(
            r#"{"own": [{"name": "Aardrijkskunde_3_LOP_2023-2024", "teacher": "Lotte Peeters",
                         "url": "/Documents/Index/Index/courseID/4128/ssID/49",
                         "id": 4128, "platformId": 49, "descr": "", "icon": "briefcase"}],
                "other": []}"#,
        )
        .unwrap();
        assert_eq!(config.own.len(), 1);
        assert_eq!(config.own[0].id, Some(4128));
        assert_eq!(
            config.own[0].to_string(),
            "Aardrijkskunde_3_LOP_2023-2024 (Teacher: Lotte Peeters)"
        );
    }
}
