//! Upcoming tasks.

use serde::Deserialize;
use smartschool_core::entities::FutureTaskDay;

use crate::Smartschool;
use crate::error::ClientError;
use crate::http::PortalRequest;

#[derive(Deserialize)]
struct FutureTasksPage {
    #[serde(default)]
    days: Vec<FutureTaskDay>,
}

impl Smartschool {
    /// Tasks due in the near future, grouped per day and course.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails or the answer cannot be
    /// parsed.
    pub async fn future_tasks(&self) -> Result<Vec<FutureTaskDay>, ClientError> {
        let page: FutureTasksPage = self
            .json(
                PortalRequest::post("/Agenda/Futuretasks/getFuturetasks")
                    .form([
                        ("lastAssignmentID", "0"),
                        ("lastDate", ""),
                        ("filterType", "false"),
                        ("filterID", "false"),
                    ])
                    .xhr(),
            )
            .await?;
        Ok(page.days)
    }
}
