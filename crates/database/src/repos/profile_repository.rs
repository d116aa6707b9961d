//! Repository for profile data access operations.

use sqlx::{Row, SqlitePool};
use tracing::info;

use crate::entities::{CreateProfileRequest, Profile, ProfileRole};
use crate::types::{StoreError, StoreResult};

pub struct ProfileRepository {
    pool: SqlitePool,
}

impl ProfileRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, request: &CreateProfileRequest) -> StoreResult<Profile> {
        if request.email.trim().is_empty() {
            return Err(StoreError::validation("email must not be empty"));
        }

        let public_id = cuid2::create_id();
        let now = chrono::Utc::now().to_rfc3339();

        let result = sqlx::query(
            "INSERT INTO profiles (public_id, email, display_name, role, avatar_path, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&public_id)
        .bind(&request.email)
        .bind(&request.display_name)
        .bind(request.role.as_str())
        .bind(&request.avatar_path)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        info!(public_id = %public_id, email = %request.email, "created profile");

        Ok(Profile {
            id: result.last_insert_rowid(),
            public_id,
            email: request.email.clone(),
            display_name: request.display_name.clone(),
            role: request.role,
            avatar_path: request.avatar_path.clone(),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    pub async fn find_by_public_id(&self, public_id: &str) -> StoreResult<Option<Profile>> {
        let row = sqlx::query(
            "SELECT id, public_id, email, display_name, role, avatar_path, created_at, updated_at
             FROM profiles WHERE public_id = ?",
        )
        .bind(public_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(map_profile_row).transpose()
    }

    pub async fn find_by_email(&self, email: &str) -> StoreResult<Option<Profile>> {
        let row = sqlx::query(
            "SELECT id, public_id, email, display_name, role, avatar_path, created_at, updated_at
             FROM profiles WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(map_profile_row).transpose()
    }
}

pub(crate) fn map_profile_row(row: sqlx::sqlite::SqliteRow) -> StoreResult<Profile> {
    let role: String = row.try_get("role")?;
    Ok(Profile {
        id: row.try_get("id")?,
        public_id: row.try_get("public_id")?,
        email: row.try_get("email")?,
        display_name: row.try_get("display_name")?,
        role: ProfileRole::from(role.as_str()),
        avatar_path: row.try_get("avatar_path")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
