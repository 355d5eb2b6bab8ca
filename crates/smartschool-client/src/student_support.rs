use smartschool_core::entities::StudentSupportLink;

use crate::Smartschool;
use crate::error::ClientError;
use crate::http::PortalRequest;

impl Smartschool {
    /// Help line links shown on the home page.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails or the answer cannot be
    /// parsed.
    pub async fn student_support_links(&self) -> Result<Vec<StudentSupportLink>, ClientError> {
        self.json(PortalRequest::get("/student-support/api/v1/")).await
    }
}
