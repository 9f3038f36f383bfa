//! Confirmation delivery through the structured log.
//!
//! No mail transport is wired in; operators (and local developers) pick the
//! confirmation link out of the JSON log stream.

use async_trait::async_trait;
use tracing::info;
use url::Url;

use crate::domain::ports::{ConfirmationNotifier, ConfirmationNotifierError};
use crate::domain::{ConfirmationToken, EmailAddress};

const CONFIRMATION_PATH: &str = "api/v1/auth/confirmed_email";

/// [`ConfirmationNotifier`] that logs the confirmation link.
#[derive(Debug, Clone)]
pub struct LoggingConfirmationNotifier {
    public_base_url: Url,
}

impl LoggingConfirmationNotifier {
    pub fn new(public_base_url: Url) -> Self {
        Self { public_base_url }
    }

    /// `{base}/api/v1/auth/confirmed_email/{email}/{token}` with each
    /// segment percent-encoded.
    pub fn confirmation_link(
        &self,
        email: &EmailAddress,
        token: &ConfirmationToken,
    ) -> Result<Url, ConfirmationNotifierError> {
        let mut link = self.public_base_url.clone();
        {
            let mut segments = link.path_segments_mut().map_err(|()| {
                ConfirmationNotifierError::delivery("public base URL cannot carry a path")
            })?;
            segments.pop_if_empty();
            segments.extend(CONFIRMATION_PATH.split('/'));
            segments.push(email.as_str());
            segments.push(token.as_str());
        }
        Ok(link)
    }
}

#[async_trait]
impl ConfirmationNotifier for LoggingConfirmationNotifier {
    async fn send_confirmation(
        &self,
        email: &EmailAddress,
        username: &str,
        token: &ConfirmationToken,
    ) -> Result<(), ConfirmationNotifierError> {
        let link = self.confirmation_link(email, token)?;
        info!(%email, username, link = %link, "confirmation link issued");
        Ok(())
    }
}
