//! `UserRepository` backed by a vector behind a mutex.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{EmailAddress, NewUser, User, UserId};

#[derive(Default)]
struct State {
    last_id: i32,
    rows: Vec<User>,
    failure: Option<UserPersistenceError>,
}

/// In-memory account store with unique emails.
#[derive(Default)]
pub struct InMemoryUserRepository {
    state: Mutex<State>,
}

impl InMemoryUserRepository {
    /// Empty store; ids start at one.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with `error` until cleared with `None`.
    pub fn set_failure(&self, error: Option<UserPersistenceError>) {
        self.lock().failure = error;
    }

    /// Insert an account directly, bypassing registration.
    pub fn seed(&self, user: &NewUser, confirmed: bool) -> User {
        let mut state = self.lock();
        let stored = Self::insert(&mut state, user);
        let index = state.rows.len() - 1;
        state.rows[index].confirmed = confirmed;
        User { confirmed, ..stored }
    }

    /// Every stored account, ordered by id.
    pub fn snapshot(&self) -> Vec<User> {
        self.lock().rows.clone()
    }

    fn insert(state: &mut State, user: &NewUser) -> User {
        state.last_id += 1;
        let row = User {
            id: UserId::new(state.last_id).unwrap_or_else(|err| panic!("serial id: {err}")),
            username: user.username.as_str().to_owned(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            refresh_token_digest: None,
            avatar: user.avatar.clone(),
            confirmed: false,
            confirmation_token_digest: user.confirmation_token_digest.clone(),
        };
        state.rows.push(row.clone());
        row
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn guarded(&self) -> Result<MutexGuard<'_, State>, UserPersistenceError> {
        let state = self.lock();
        match &state.failure {
            Some(error) => Err(error.clone()),
            None => Ok(state),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.guarded()?.rows.iter().find(|row| row.email == *email).cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.guarded()?.rows.iter().find(|row| row.id == *id).cloned())
    }

    async fn find_by_refresh_digest(&self, digest: &str) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .guarded()?
            .rows
            .iter()
            .find(|row| row.refresh_token_digest.as_deref() == Some(digest))
            .cloned())
    }

    async fn create_user(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut state = self.guarded()?;
        if state.rows.iter().any(|row| row.email == user.email) {
            return Err(UserPersistenceError::duplicate_email(user.email.as_str()));
        }
        Ok(Self::insert(&mut state, user))
    }

    async fn set_refresh_token(
        &self,
        id: &UserId,
        token_digest: Option<String>,
    ) -> Result<bool, UserPersistenceError> {
        let mut state = self.guarded()?;
        match state.rows.iter_mut().find(|row| row.id == *id) {
            Some(row) => {
                row.refresh_token_digest = token_digest;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn mark_confirmed(&self, email: &EmailAddress) -> Result<Option<User>, UserPersistenceError> {
        let mut state = self.guarded()?;
        Ok(state.rows.iter_mut().find(|row| row.email == *email).map(|row| {
            row.confirmed = true;
            row.confirmation_token_digest = None;
            row.clone()
        }))
    }

    async fn set_avatar(
        &self,
        email: &EmailAddress,
        url: &str,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut state = self.guarded()?;
        Ok(state.rows.iter_mut().find(|row| row.email == *email).map(|row| {
            row.avatar = Some(url.to_owned());
            row.clone()
        }))
    }
}
