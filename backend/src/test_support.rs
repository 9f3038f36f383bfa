//! In-memory adapters and doubles shared by unit and integration tests.
//!
//! Compiled for `cfg(test)` and behind the `test-support` feature. The
//! in-memory repositories enforce the same ownership scoping and email
//! uniqueness rules as the PostgreSQL schema so service and HTTP tests
//! exercise realistic behaviour without a database.

mod clock;
mod doubles;
mod in_memory_contacts;
mod in_memory_users;

pub use clock::SteppingClock;
pub use doubles::{
    FixedDefaultAvatar, PlainPasswordHasher, RecordingAvatarStore, RecordingConfirmationNotifier,
    SentConfirmation,
};
pub use in_memory_contacts::InMemoryContactRepository;
pub use in_memory_users::InMemoryUserRepository;
