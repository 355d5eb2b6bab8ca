use smartschool_core::entities::Period;

use crate::Smartschool;
use crate::error::ClientError;
use crate::http::PortalRequest;

impl Smartschool {
    /// Grading periods of the current school year.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails or the answer cannot be
    /// parsed.
    pub async fn periods(&self) -> Result<Vec<Period>, ClientError> {
        self.json(PortalRequest::get("/results/api/v1/periods/")).await
    }
}
