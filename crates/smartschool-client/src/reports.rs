//! Report cards.

use serde::Deserialize;
use smartschool_core::entities::Report;

use crate::Smartschool;
use crate::error::ClientError;
use crate::http::PortalRequest;

#[derive(Deserialize)]
struct ReportLocation {
    url: String,
}

impl Smartschool {
    /// Report cards published so far.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails or the answer cannot be
    /// parsed.
    pub async fn reports(&self) -> Result<Vec<Report>, ClientError> {
        self.json(PortalRequest::get("/results/api/v1/reports")).await
    }

    /// The report file (usually a PDF). The report's download URL answers
    /// with the real file location first.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if either request fails.
    pub async fn download_report(&self, report: &Report) -> Result<Vec<u8>, ClientError> {
        let location: ReportLocation = self
            .json(PortalRequest::get(report.download_url.as_str()))
            .await?;
        tracing::debug!(report = report.id, url = %location.url, "downloading report");
        self.get_bytes(&location.url).await
    }
}
