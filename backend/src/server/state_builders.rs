//! Builders wiring persistence and third-party adapters into HTTP state.

use std::sync::Arc;
use std::time::Duration;

use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use contacts_backend::domain::ports::{AvatarStore, UnconfiguredAvatarStore};
use contacts_backend::domain::{AccountsService, AccountsServiceDeps, ContactsService};
use contacts_backend::inbound::http::state::{HttpState, HttpStatePorts};
use contacts_backend::outbound::avatars::{CloudinaryAvatarStore, GravatarDefaultAvatar};
use contacts_backend::outbound::credentials::Argon2PasswordHasher;
use contacts_backend::outbound::notifications::LoggingConfirmationNotifier;
use contacts_backend::outbound::persistence::{DieselContactRepository, DieselUserRepository};

use super::ServerConfig;

const AVATAR_UPLOAD_TIMEOUT: Duration = Duration::from_secs(10);

/// Pick the Cloudinary store when credentials are configured.
///
/// A client that cannot be built degrades to the unconfigured store so the
/// rest of the API still starts.
fn build_avatar_store(config: &ServerConfig, clock: Arc<dyn Clock>) -> Arc<dyn AvatarStore> {
    let Some(credentials) = config.cloudinary.clone() else {
        info!("Cloudinary credentials not set; avatar uploads disabled");
        return Arc::new(UnconfiguredAvatarStore);
    };
    match CloudinaryAvatarStore::new(credentials, AVATAR_UPLOAD_TIMEOUT, clock) {
        Ok(store) => Arc::new(store),
        Err(error) => {
            warn!(%error, "failed to build Cloudinary client; avatar uploads disabled");
            Arc::new(UnconfiguredAvatarStore)
        }
    }
}

/// Build the HTTP state from the configured pool and adapters.
pub(super) fn build_http_state(config: &ServerConfig) -> HttpState {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    let contacts = Arc::new(ContactsService::new(
        Arc::new(DieselContactRepository::new(config.db_pool.clone())),
        clock.clone(),
    ));
    let accounts = Arc::new(AccountsService::new(
        Arc::new(DieselUserRepository::new(config.db_pool.clone())),
        AccountsServiceDeps {
            hasher: Arc::new(Argon2PasswordHasher),
            default_avatar: Arc::new(GravatarDefaultAvatar),
            avatars: build_avatar_store(config, clock),
            notifier: Arc::new(LoggingConfirmationNotifier::new(
                config.public_base_url.clone(),
            )),
        },
    ));

    HttpState::new(HttpStatePorts {
        contacts: contacts.clone(),
        contacts_query: contacts,
        accounts: accounts.clone(),
        users: accounts,
    })
}
