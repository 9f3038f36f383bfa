//! Port for delivering email confirmation links.

use async_trait::async_trait;

use crate::domain::{ConfirmationToken, EmailAddress};

use super::define_port_error;

define_port_error! {
    /// Errors raised while delivering a confirmation.
    pub enum ConfirmationNotifierError {
        /// The message could not be handed to the delivery channel.
        Delivery { message: String } => "confirmation delivery failed: {message}",
    }
}

/// Sends the confirmation token to the address being verified.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConfirmationNotifier: Send + Sync {
    async fn send_confirmation(
        &self,
        email: &EmailAddress,
        username: &str,
        token: &ConfirmationToken,
    ) -> Result<(), ConfirmationNotifierError>;
}
