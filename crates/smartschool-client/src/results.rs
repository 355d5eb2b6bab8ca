//! Evaluations, walked page by page.

use smartschool_core::entities::{EvaluationResult, ResultDetails};

use crate::Smartschool;
use crate::error::ClientError;
use crate::http::PortalRequest;

impl Smartschool {
    /// Every evaluation of the student, newest first.
    ///
    /// Pages of `session.results_per_page` entries are fetched until one
    /// comes back short.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if a page cannot be fetched or parsed.
    pub async fn results(&self) -> Result<Vec<EvaluationResult>, ClientError> {
        let per_page = self.settings.results_per_page.max(1);
        let mut all = Vec::new();

        for page_number in 1.. {
            let page: Vec<EvaluationResult> = self
                .json(
                    PortalRequest::get("/results/api/v1/evaluations/")
                        .query("pageNumber", page_number.to_string())
                        .query("itemsOnPage", per_page.to_string()),
                )
                .await?;
            let short = page.len() < per_page as usize;
            all.extend(page);
            if short {
                break;
            }
        }

        tracing::debug!(count = all.len(), "fetched results");
        Ok(all)
    }

    /// Details of one evaluation, fetched on first use and kept on the
    /// record.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails or the portal sends no
    /// details.
    pub async fn result_details<'r>(
        &self,
        result: &'r mut EvaluationResult,
    ) -> Result<&'r ResultDetails, ClientError> {
        if result.details.is_none() {
            let full: EvaluationResult = self
                .json(PortalRequest::get(format!(
                    "/results/api/v1/evaluations/{}",
                    urlencoding::encode(&result.identifier)
                )))
                .await?;
            result.details = full.details;
        }
        result.details.as_ref().ok_or_else(|| {
            ClientError::Parse(format!("no details for evaluation {}", result.identifier))
        })
    }
}
