//! User accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Farmer,
}

/// A registered user (never carries the password).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    /// Local UUID
    pub id: String,
    /// Login email, stored lowercase
    pub email: String,
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub farm_name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new farmer account record.
    pub fn new(email: &str, name: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            email: normalize_email(email),
            name: name.trim().to_string(),
            role: Role::Farmer,
            farm_name: None,
            location: None,
            age: None,
            created_at: Utc::now(),
        }
    }

    /// Overwrite the editable profile fields.
    pub fn apply_profile(&mut self, update: ProfileUpdate) {
        self.name = update.name.trim().to_string();
        self.farm_name = non_blank(update.farm_name);
        self.location = non_blank(update.location);
        self.age = update.age;
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Editable profile fields (settings screen).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileUpdate {
    pub name: String,
    pub farm_name: Option<String>,
    pub location: Option<String>,
    pub age: Option<u32>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Canonical form used for lookups.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
