//! User entity referencing identities in the Savora user store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role of an identity in the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    /// A customer ordering food, authenticated by phone OTP
    Customer,
    /// An administrator managing the catalog, authenticated by password
    Admin,
}

impl UserRole {
    /// Stable lowercase name, used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Customer => "customer",
            UserRole::Admin => "admin",
        }
    }
}

/// A registered user.
///
/// For administrators the phone column doubles as the login name and
/// `password_hash` holds an argon2 hash; customers have neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: Uuid,

    /// Phone number in E.164 format (admin login name)
    pub phone: String,

    /// Display name, if the user supplied one
    pub name: Option<String>,

    /// Role of the user
    pub role: UserRole,

    /// Argon2 password hash, admins only
    #[serde(default, skip_serializing)]
    pub password_hash: Option<String>,

    /// Timestamp when the user was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the user was last updated
    pub updated_at: DateTime<Utc>,

    /// Timestamp of the user's last login
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    /// Creates a new customer identified by phone
    pub fn new_customer(phone: String, name: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            phone,
            name,
            role: UserRole::Customer,
            password_hash: None,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        }
    }

    /// Updates the display name
    pub fn set_name(&mut self, name: String) {
        self.name = Some(name);
        self.updated_at = Utc::now();
    }

    /// Stamps a successful login
    pub fn touch_login(&mut self) {
        let now = Utc::now();
        self.last_login_at = Some(now);
        self.updated_at = now;
    }

    /// Whether the user is an administrator
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}
