//! The signed-in account.

use smartschool_core::entities::AuthenticatedUser;

use crate::Smartschool;
use crate::error::ClientError;
use crate::http::PortalRequest;

const MARKER: &str = "\"authenticatedUser\":";

/// Pull the `authenticatedUser` object out of the bootstrap data of a portal
/// page.
pub(crate) fn extract_authenticated_user(page: &str) -> Result<AuthenticatedUser, ClientError> {
    let start = page
        .find(MARKER)
        .ok_or_else(|| ClientError::Parse("no authenticatedUser on the main page".into()))?;
    let rest = page[start + MARKER.len()..].trim_start();

    serde_json::Deserializer::from_str(rest)
        .into_iter::<AuthenticatedUser>()
        .next()
        .ok_or_else(|| ClientError::Parse("empty authenticatedUser value".into()))?
        .map_err(ClientError::from)
}

impl Smartschool {
    /// The account this session is signed in as. Fetched once per session.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the main page cannot be fetched or does not
    /// carry the user.
    pub async fn authenticated_user(&self) -> Result<AuthenticatedUser, ClientError> {
        self.user
            .get_or_try_init(|| async {
                let page = self.send(PortalRequest::get("/")).await?;
                extract_authenticated_user(&page.text())
            })
            .await
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_user_in_bootstrap_script() {
        let page = r#"<script>window.SMSC = {"platform": 49, "authenticatedUser": {"id": "49_1234_0", "platformId": 49,
            "name": {"startingWithFirstName": "Bumba Delu", "startingWithLastName": "Delu Bumba"}}, "other": []};</script>"#;
        let user = extract_authenticated_user(page).unwrap();
        assert_eq!(user.id, "49_1234_0");
        assert_eq!(user.platform_id, Some(49));
        assert_eq!(user.name.starting_with_last_name, "Delu Bumba");
    }

    #[test]
    fn missing_user_is_a_parse_error() {
        assert!(matches!(
            extract_authenticated_user("<html></html>"),
            Err(ClientError::Parse(_))
        ));
    }
}
