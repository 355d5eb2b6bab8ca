//! Planner: planned assignments and to-dos.

use chrono::{DateTime, Duration, FixedOffset, Local, SecondsFormat};
use smartschool_core::entities::{ApplicableAssignmentType, PlannedElement};

use crate::Smartschool;
use crate::error::ClientError;
use crate::http::PortalRequest;

const DEFAULT_WINDOW_DAYS: i64 = 34;
const PLANNED_TYPES: &str = "planned-assignments,planned-to-dos";

/// End of the default window: 34 days after `from`, minus one second.
pub(crate) fn default_till(from: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    from + Duration::days(DEFAULT_WINDOW_DAYS) - Duration::seconds(1)
}

/// Start of today, local time.
fn today() -> Result<DateTime<FixedOffset>, ClientError> {
    Local::now()
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .and_then(|midnight| midnight.and_local_timezone(Local).earliest())
        .map(|dt| dt.fixed_offset())
        .ok_or_else(|| ClientError::InvalidArgument("local midnight does not exist".into()))
}

impl Smartschool {
    /// Planned assignments and to-dos between `from` and `till`.
    ///
    /// `till` defaults to 34 days after `from`.
    ///
    /// `from`, `to` and `types` go out as query parameters. The portal's own
    /// web client sends the same fields as a form-encoded body on the GET.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the user cannot be determined or the
    /// request fails.
    pub async fn planned_elements(
        &self,
        from: DateTime<FixedOffset>,
        till: Option<DateTime<FixedOffset>>,
    ) -> Result<Vec<PlannedElement>, ClientError> {
        let till = till.unwrap_or_else(|| default_till(from));
        if till < from {
            return Err(ClientError::InvalidArgument(format!(
                "planner window ends ({till}) before it starts ({from})"
            )));
        }

        let user = self.authenticated_user().await?;
        self.json(
            PortalRequest::get(format!(
                "/planner/api/v1/planned-elements/user/{}",
                urlencoding::encode(&user.id)
            ))
            .query("from", from.to_rfc3339_opts(SecondsFormat::Secs, false))
            .query("to", till.to_rfc3339_opts(SecondsFormat::Secs, false))
            .query("types", PLANNED_TYPES),
        )
        .await
    }

    /// Planned elements from the start of today, over the default window.
    ///
    /// # Errors
    ///
    /// See [`Self::planned_elements`].
    pub async fn upcoming_planned_elements(&self) -> Result<Vec<PlannedElement>, ClientError> {
        self.planned_elements(today()?, None).await
    }

    /// Assignment types (test, task, ...) the planner accepts.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails or the answer cannot be
    /// parsed.
    pub async fn applicable_assignment_types(
        &self,
    ) -> Result<Vec<ApplicableAssignmentType>, ClientError> {
        self.json(PortalRequest::get(
            "/lesson-content/api/v1/assignments/applicable-assigment-types",
        ))
        .await
    }
}
