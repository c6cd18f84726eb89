//! Shared handle to the session store.
//!
//! `AuthProvider` is created once at the application root and cloned into
//! every consumer that needs the signed-in user. Clones share state, so a
//! `sign_out` through one handle is visible through all of them, and
//! `subscribe` lets consumers react to changes instead of polling.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::api::SessionApi;
use crate::models::{Credentials, User};
use crate::storage::Storage;

use super::{AuthError, Session, SessionData};

#[derive(Clone)]
pub struct AuthProvider {
    session: Arc<Mutex<Session>>,
    changes: Arc<watch::Sender<Option<SessionData>>>,
    api: Arc<dyn SessionApi>,
    signing_in: Arc<AtomicBool>,
}

/// Clears the in-flight flag when a sign-in finishes, however it finishes.
struct SignInGuard<'a>(&'a AtomicBool);

impl<'a> SignInGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, AuthError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| AuthError::SignInInProgress)?;
        Ok(Self(flag))
    }
}

impl Drop for SignInGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl AuthProvider {
    /// Restore any persisted session from `storage` and wrap it in a provider
    pub fn new(storage: Arc<dyn Storage>, api: Arc<dyn SessionApi>) -> Self {
        let mut session = Session::new(storage);
        if session.load() {
            info!("Signed in from stored session");
        }
        let (changes, _) = watch::channel(session.data.clone());

        Self {
            session: Arc::new(Mutex::new(session)),
            changes: Arc::new(changes),
            api,
            signing_in: Arc::new(AtomicBool::new(false)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn publish(&self, session: &Session) {
        self.changes.send_replace(session.data.clone());
    }

    /// Create a session on the backend and persist it.
    ///
    /// API errors propagate unchanged and leave the current state alone.
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<(), AuthError> {
        let _guard = SignInGuard::acquire(&self.signing_in)?;
        info!(email = %credentials.email, "Signing in");

        let response = self.api.create_session(credentials).await?;
        let data = SessionData {
            user: response.user,
            token: response.token,
        };

        let mut session = self.lock();
        session.save(&data)?;
        info!(user_id = %data.user.id, "Signed in");
        session.update(data);
        self.publish(&session);
        Ok(())
    }

    /// Forget the session. Safe to call when already signed out.
    pub fn sign_out(&self) {
        let mut session = self.lock();
        let was_signed_in = session.is_authenticated();
        session.clear();
        if was_signed_in {
            info!("Signed out");
        }
        self.publish(&session);
    }

    /// Replace the signed-in user, keeping the token.
    ///
    /// Returns `false` when nothing was changed: either no one is signed in
    /// or the user could not be written to storage.
    pub fn update_user(&self, user: User) -> bool {
        let mut session = self.lock();
        match session.update_user(user) {
            Ok(true) => {
                self.publish(&session);
                true
            }
            Ok(false) => {
                warn!("update_user called while signed out, ignoring");
                false
            }
            Err(e) => {
                error!(error = %e, "Failed to persist updated user");
                false
            }
        }
    }

    pub fn user(&self) -> Option<User> {
        self.lock().user().cloned()
    }

    pub fn token(&self) -> Option<String> {
        self.lock().token().map(str::to_string)
    }

    pub fn session(&self) -> Option<SessionData> {
        self.lock().data.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.lock().is_authenticated()
    }

    /// Receive the session every time it changes
    pub fn subscribe(&self) -> watch::Receiver<Option<SessionData>> {
        self.changes.subscribe()
    }
}
