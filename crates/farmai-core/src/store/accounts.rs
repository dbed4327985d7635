//! Local account registry (session/identity provider).
//!
//! Credentials are placeholders for a real auth backend: the registry keeps
//! a SHA-256 digest per email and nothing more.
//!
//! Multi-key updates are ordered so that a failed write never leaves a
//! credential without a user record: the user list is written before the
//! credential map on signup, and after it on delete.

use std::collections::HashMap;

use sha2::{Digest, Sha256};

use super::{get_json, set_json, KeyValueStore, StoreError, StoreResult};
use crate::models::{normalize_email, ProfileUpdate, Role, User};

pub const USERS_KEY: &str = "farmAiAllUsers";
pub const CREDENTIALS_KEY: &str = "farmAiCredentials";
pub const SESSION_KEY: &str = "farmAiUser";

/// Demo accounts for previews and first launch: (email, password, name, role).
pub const DEMO_ACCOUNTS: &[(&str, &str, &str, Role)] = &[
    ("admin@farmai.com", "admin123", "Admin User", Role::Admin),
    ("farmer@farmai.com", "farmer123", "John Farmer", Role::Farmer),
];

/// Signup, login and the current session.
pub struct AccountRegistry<'a> {
    kv: &'a dyn KeyValueStore,
}

impl<'a> AccountRegistry<'a> {
    pub fn new(kv: &'a dyn KeyValueStore) -> Self {
        Self { kv }
    }

    /// Register a new farmer account and make it the current session.
    pub fn signup(&self, email: &str, password: &str, name: &str) -> StoreResult<User> {
        if email.trim().is_empty() || password.is_empty() || name.trim().is_empty() {
            return Err(StoreError::InvalidInput(
                "email, password and name are required".into(),
            ));
        }

        let email = normalize_email(email);
        let credentials = self.credentials()?;
        if credentials.contains_key(&email) {
            return Err(StoreError::EmailTaken(email));
        }

        let user = self.register(User::new(&email, name), password, credentials)?;
        set_json(self.kv, SESSION_KEY, &user)?;
        tracing::info!(user = %user.id, "Registered new account");
        Ok(user)
    }

    /// Create the demo admin and farmer accounts when missing.
    ///
    /// Does not touch the session. Returns the accounts created by this call.
    pub fn seed_demo_accounts(&self) -> StoreResult<Vec<User>> {
        let mut created = Vec::new();
        for &(email, password, name, role) in DEMO_ACCOUNTS {
            let credentials = self.credentials()?;
            if credentials.contains_key(email) {
                continue;
            }
            let mut user = User::new(email, name);
            user.role = role;
            created.push(self.register(user, password, credentials)?);
        }
        if !created.is_empty() {
            tracing::info!(count = created.len(), "Seeded demo accounts");
        }
        Ok(created)
    }

    /// Check credentials. On success the user becomes the current session.
    pub fn login(&self, email: &str, password: &str) -> StoreResult<Option<User>> {
        let email = normalize_email(email);
        let credentials = self.credentials()?;

        let verified = credentials
            .get(&email)
            .is_some_and(|digest| *digest == password_digest(password));
        if !verified {
            tracing::info!("Rejected login attempt");
            return Ok(None);
        }

        let user = self.list_users()?.into_iter().find(|u| u.email == email);
        match &user {
            Some(user) => {
                set_json(self.kv, SESSION_KEY, user)?;
                tracing::info!(user = %user.id, "Logged in");
            }
            None => tracing::warn!("Credentials exist without a user record"),
        }
        Ok(user)
    }

    /// End the current session.
    pub fn logout(&self) -> StoreResult<()> {
        self.kv.remove(SESSION_KEY)
    }

    /// The logged-in user. A corrupt session record is cleared.
    pub fn current_user(&self) -> StoreResult<Option<User>> {
        match get_json::<User>(self.kv, SESSION_KEY) {
            Ok(user) => Ok(user),
            Err(StoreError::Json(e)) => {
                tracing::warn!(error = %e, "Discarding unreadable session");
                self.kv.remove(SESSION_KEY)?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// All registered users, in signup order.
    pub fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(get_json(self.kv, USERS_KEY)?.unwrap_or_default())
    }

    /// Replace a user's profile fields. `None` when the user is unknown.
    pub fn update_profile(&self, user_id: &str, update: ProfileUpdate) -> StoreResult<Option<User>> {
        if update.name.trim().is_empty() {
            return Err(StoreError::InvalidInput("name is required".into()));
        }
        let user = self.modify_user(user_id, |user| user.apply_profile(update))?;
        if user.is_some() {
            tracing::info!(user = user_id, "Updated profile");
        }
        Ok(user)
    }

    /// Grant or revoke admin rights. `None` when the user is unknown.
    pub fn set_role(&self, user_id: &str, role: Role) -> StoreResult<Option<User>> {
        let user = self.modify_user(user_id, |user| user.role = role)?;
        if user.is_some() {
            tracing::info!(user = user_id, ?role, "Changed role");
        }
        Ok(user)
    }

    /// Replace the password after checking the current one.
    ///
    /// Returns `false` for an unknown user or a wrong current password.
    pub fn change_password(&self, user_id: &str, current: &str, new: &str) -> StoreResult<bool> {
        if new.is_empty() {
            return Err(StoreError::InvalidInput("new password is required".into()));
        }
        let Some(user) = self.find_user(user_id)? else {
            return Ok(false);
        };

        let mut credentials = self.credentials()?;
        let verified = credentials
            .get(&user.email)
            .is_some_and(|digest| *digest == password_digest(current));
        if !verified {
            tracing::info!(user = user_id, "Rejected password change");
            return Ok(false);
        }

        credentials.insert(user.email, password_digest(new));
        set_json(self.kv, CREDENTIALS_KEY, &credentials)?;
        tracing::info!(user = user_id, "Changed password");
        Ok(true)
    }

    /// Remove a user, their credentials and, if theirs, the session.
    ///
    /// Returns whether the user existed. Their scan history and stock are
    /// left in place.
    pub fn delete_user(&self, user_id: &str) -> StoreResult<bool> {
        let mut users = self.list_users()?;
        let Some(pos) = users.iter().position(|u| u.id == user_id) else {
            return Ok(false);
        };
        let user = users.remove(pos);

        let mut credentials = self.credentials()?;
        if credentials.remove(&user.email).is_some() {
            set_json(self.kv, CREDENTIALS_KEY, &credentials)?;
        }
        set_json(self.kv, USERS_KEY, &users)?;

        if self.session_user_id()?.as_deref() == Some(user_id) {
            self.kv.remove(SESSION_KEY)?;
        }
        tracing::info!(user = user_id, "Deleted account");
        Ok(true)
    }

    fn find_user(&self, user_id: &str) -> StoreResult<Option<User>> {
        Ok(self.list_users()?.into_iter().find(|u| u.id == user_id))
    }

    /// Apply `change` to a stored user and keep the session copy in sync.
    fn modify_user(&self, user_id: &str, change: impl FnOnce(&mut User)) -> StoreResult<Option<User>> {
        let mut users = self.list_users()?;
        let Some(user) = users.iter_mut().find(|u| u.id == user_id) else {
            return Ok(None);
        };
        change(user);
        let user = user.clone();
        set_json(self.kv, USERS_KEY, &users)?;

        if self.session_user_id()?.as_deref() == Some(user_id) {
            set_json(self.kv, SESSION_KEY, &user)?;
        }
        Ok(Some(user))
    }

    fn session_user_id(&self) -> StoreResult<Option<String>> {
        Ok(self.current_user()?.map(|u| u.id))
    }

    /// Persist a new user and their credential.
    ///
    /// The user list goes first; if the credential write then fails the list
    /// is restored, so the email stays free for a retry.
    fn register(
        &self,
        user: User,
        password: &str,
        mut credentials: HashMap<String, String>,
    ) -> StoreResult<User> {
        let previous = self.list_users()?;
        let mut users: Vec<User> = previous
            .iter()
            .filter(|u| u.email != user.email)
            .cloned()
            .collect();
        users.push(user.clone());
        set_json(self.kv, USERS_KEY, &users)?;

        credentials.insert(user.email.clone(), password_digest(password));
        if let Err(e) = set_json(self.kv, CREDENTIALS_KEY, &credentials) {
            if let Err(rollback) = set_json(self.kv, USERS_KEY, &previous) {
                tracing::warn!(error = %rollback, "Could not restore user list after failed signup");
            }
            return Err(e);
        }
        Ok(user)
    }

    fn credentials(&self) -> StoreResult<HashMap<String, String>> {
        Ok(get_json(self.kv, CREDENTIALS_KEY)?.unwrap_or_default())
    }
}

fn password_digest(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}
