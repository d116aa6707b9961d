//! Profile entity definitions

use serde::{Deserialize, Serialize};

/// A person on the platform, identified externally by `public_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub public_id: String,
    pub email: String,
    pub display_name: String,
    pub role: ProfileRole,
    /// Object-storage path of the avatar, resolved to a public URL at the
    /// API boundary.
    pub avatar_path: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProfileRequest {
    pub email: String,
    pub display_name: String,
    pub role: ProfileRole,
    pub avatar_path: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileRole {
    Mentor,
    Student,
}

impl ProfileRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileRole::Mentor => "mentor",
            ProfileRole::Student => "student",
        }
    }
}

impl From<&str> for ProfileRole {
    fn from(value: &str) -> Self {
        match value {
            "mentor" => ProfileRole::Mentor,
            _ => ProfileRole::Student,
        }
    }
}

impl std::fmt::Display for ProfileRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
