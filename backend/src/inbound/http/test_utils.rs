//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use mockable::Clock;

use crate::domain::ports::{UnconfiguredAvatarStore, AvatarStore};
use crate::domain::{AccountsService, AccountsServiceDeps, ContactsService};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::test_support::{
    FixedDefaultAvatar, InMemoryContactRepository, InMemoryUserRepository, PlainPasswordHasher,
    RecordingConfirmationNotifier,
};

/// Build a session middleware configured for tests.
///
/// Generates a fresh key per invocation and disables the `Secure` flag for
/// local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// In-memory collaborators behind an [`HttpState`], kept for assertions.
pub struct InMemoryBackend {
    pub contacts: Arc<InMemoryContactRepository>,
    pub users: Arc<InMemoryUserRepository>,
    pub notifier: Arc<RecordingConfirmationNotifier>,
    pub state: HttpState,
}

/// Wire the real services over in-memory adapters.
pub fn in_memory_backend(clock: Arc<dyn Clock>, avatars: Option<Arc<dyn AvatarStore>>) -> InMemoryBackend {
    let contacts = Arc::new(InMemoryContactRepository::new());
    let users = Arc::new(InMemoryUserRepository::new());
    let notifier = Arc::new(RecordingConfirmationNotifier::new());

    let contacts_service = Arc::new(ContactsService::new(contacts.clone(), clock));
    let accounts_service = Arc::new(AccountsService::new(
        users.clone(),
        AccountsServiceDeps {
            hasher: Arc::new(PlainPasswordHasher),
            default_avatar: Arc::new(FixedDefaultAvatar("https://avatars.test/default".to_owned())),
            avatars: avatars.unwrap_or_else(|| Arc::new(UnconfiguredAvatarStore)),
            notifier: notifier.clone(),
        },
    ));

    let state = HttpState::new(HttpStatePorts {
        contacts: contacts_service.clone(),
        contacts_query: contacts_service,
        accounts: accounts_service.clone(),
        users: accounts_service,
    });

    InMemoryBackend {
        contacts,
        users,
        notifier,
        state,
    }
}
