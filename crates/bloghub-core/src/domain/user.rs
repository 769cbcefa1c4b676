use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User entity - an account that authors posts and comments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub bio: Option<String>,
    pub avatar: Option<String>,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// Editable profile fields. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<String>,
}

impl User {
    /// Create a new regular user with generated ID and timestamp.
    pub fn new(username: String, email: String, password_hash: String, full_name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            password_hash,
            full_name,
            bio: None,
            avatar: None,
            is_admin: false,
            created_at: Utc::now(),
        }
    }

    /// Apply a profile update. Only `full_name`, `bio` and `avatar` are editable.
    pub fn apply_profile(&mut self, patch: ProfilePatch) {
        if let Some(full_name) = patch.full_name {
            self.full_name = full_name;
        }
        if let Some(bio) = patch.bio {
            self.bio = Some(bio);
        }
        if let Some(avatar) = patch.avatar {
            self.avatar = Some(avatar);
        }
    }
}
