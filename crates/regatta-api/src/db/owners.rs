//! Race committee persistence operations on the `race_committees` table.

use chrono::{DateTime, Utc};
use regatta_core::{ExternalIdentity, Owner, OwnerId, OwnerProfile};
use sqlx::PgPool;
use uuid::Uuid;

/// Get-or-create the race committee for `profile` in a single statement.
///
/// A first-seen identity is inserted. A known identity has its display name
/// refreshed, and its logo when the profile carries one; `updated_at` only
/// moves when something changed.
pub async fn upsert(
    pool: &PgPool,
    profile: &OwnerProfile,
    now: DateTime<Utc>,
) -> Result<OwnerRow, sqlx::Error> {
    sqlx::query_as::<_, OwnerRow>(
        "INSERT INTO race_committees (id, external_identity, display_name, logo_url, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $5)
         ON CONFLICT (external_identity) DO UPDATE
            SET display_name = EXCLUDED.display_name,
                logo_url = COALESCE(EXCLUDED.logo_url, race_committees.logo_url),
                updated_at = CASE
                    WHEN race_committees.display_name IS DISTINCT FROM EXCLUDED.display_name
                      OR (EXCLUDED.logo_url IS NOT NULL
                          AND race_committees.logo_url IS DISTINCT FROM EXCLUDED.logo_url)
                    THEN EXCLUDED.updated_at
                    ELSE race_committees.updated_at
                END
         RETURNING id, external_identity, display_name, logo_url, created_at, updated_at",
    )
    .bind(Uuid::new_v4())
    .bind(profile.external_identity.as_str())
    .bind(&profile.display_name)
    .bind(profile.logo_url.as_deref())
    .bind(now)
    .fetch_one(pool)
    .await
}

/// Database row for the `race_committees` table.
#[derive(Debug, sqlx::FromRow)]
pub struct OwnerRow {
    id: Uuid,
    external_identity: String,
    display_name: String,
    logo_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OwnerRow {
    /// Convert to the domain type. Fails only for a blank stored identity.
    pub fn into_owner(self) -> Result<Owner, String> {
        Ok(Owner {
            id: OwnerId::from_uuid(self.id),
            external_identity: ExternalIdentity::new(self.external_identity)
                .map_err(|e| e.to_string())?,
            display_name: self.display_name,
            logo_url: self.logo_url,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
