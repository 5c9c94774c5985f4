//! # Persistence Gateway
//!
//! Owner-scoped document storage and owner get-or-create, with two backends:
//!
//! - **Postgres** when `DATABASE_URL` is configured ([`crate::db`]).
//! - **Memory** otherwise, built on [`Store`].
//!
//! Both give the same guarantees: every read and write is filtered by
//! owner, a document owned by someone else is reported exactly like a
//! missing one, listings are ordered by `updated_at` descending, and the
//! owner upsert is atomic. Each call is a single round trip; failures
//! surface immediately without retry.

use chrono::Utc;
use regatta_core::{
    DocumentContent, DocumentId, ExternalIdentity, Owner, OwnerId, OwnerProfile, RegattaDocument,
};
use sqlx::PgPool;
use thiserror::Error;

use crate::db;
use crate::state::Store;

/// Persistence failures.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// No document with this id belongs to the caller.
    #[error("document {0} not found")]
    NotFound(DocumentId),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored row could not be turned back into a valid domain value.
    #[error("stored record could not be decoded: {0}")]
    Encoding(String),
}

/// In-memory backend.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    owners: Store<ExternalIdentity, Owner>,
    documents: Store<DocumentId, RegattaDocument>,
}

/// Document and owner storage.
#[derive(Debug, Clone)]
pub enum DocumentGateway {
    Postgres(PgPool),
    Memory(MemoryBackend),
}

impl DocumentGateway {
    /// A gateway over an empty in-memory store.
    pub fn in_memory() -> Self {
        Self::Memory(MemoryBackend::default())
    }

    /// Postgres when a pool is available, memory otherwise.
    pub fn from_pool(pool: Option<PgPool>) -> Self {
        match pool {
            Some(pool) => Self::Postgres(pool),
            None => Self::in_memory(),
        }
    }

    /// Whether documents survive a restart.
    pub fn is_persistent(&self) -> bool {
        matches!(self, Self::Postgres(_))
    }

    /// Check the backend answers. Always succeeds for memory.
    pub async fn ping(&self) -> Result<(), GatewayError> {
        match self {
            Self::Postgres(pool) => Ok(db::ping(pool).await?),
            Self::Memory(_) => Ok(()),
        }
    }

    /// Get-or-create the owner for a session profile, refreshing its
    /// display name and logo when they changed.
    pub async fn upsert_owner(&self, profile: &OwnerProfile) -> Result<Owner, GatewayError> {
        let now = Utc::now();
        match self {
            Self::Postgres(pool) => db::owners::upsert(pool, profile, now)
                .await?
                .into_owner()
                .map_err(GatewayError::Encoding),
            Self::Memory(mem) => Ok(mem.owners.upsert(
                profile.external_identity.clone(),
                || Owner::from_profile(profile.clone(), now),
                |owner| {
                    owner.refresh(profile, now);
                },
            )),
        }
    }

    /// Store a new document for `owner`.
    pub async fn create(
        &self,
        owner: OwnerId,
        content: DocumentContent,
    ) -> Result<RegattaDocument, GatewayError> {
        let now = Utc::now();
        let doc = RegattaDocument {
            id: DocumentId::new(),
            owner_id: owner,
            content,
            created_at: now,
            updated_at: now,
        };
        match self {
            Self::Postgres(pool) => db::documents::insert(pool, &doc).await?,
            Self::Memory(mem) => {
                mem.documents.insert(doc.id, doc.clone());
            }
        }
        tracing::info!(document_id = %doc.id, owner_id = %owner, "document created");
        Ok(doc)
    }

    /// Fetch a document owned by `owner`.
    pub async fn get(&self, id: DocumentId, owner: OwnerId) -> Result<RegattaDocument, GatewayError> {
        match self {
            Self::Postgres(pool) => db::documents::get(pool, id, owner)
                .await?
                .ok_or(GatewayError::NotFound(id))?
                .into_document()
                .map_err(GatewayError::Encoding),
            Self::Memory(mem) => mem
                .documents
                .get(&id)
                .filter(|doc| doc.owner_id == owner)
                .ok_or(GatewayError::NotFound(id)),
        }
    }

    /// All documents of `owner`, most recently updated first.
    pub async fn list(&self, owner: OwnerId) -> Result<Vec<RegattaDocument>, GatewayError> {
        match self {
            Self::Postgres(pool) => db::documents::list(pool, owner)
                .await?
                .into_iter()
                .map(|row| row.into_document().map_err(GatewayError::Encoding))
                .collect(),
            Self::Memory(mem) => {
                let mut docs = mem.documents.filter(|doc| doc.owner_id == owner);
                docs.sort_by(|a, b| {
                    b.updated_at
                        .cmp(&a.updated_at)
                        .then_with(|| a.id.cmp(&b.id))
                });
                Ok(docs)
            }
        }
    }

    /// Replace the content of a document owned by `owner`.
    ///
    /// Last write wins; `created_at` is preserved.
    pub async fn update(
        &self,
        id: DocumentId,
        owner: OwnerId,
        content: DocumentContent,
    ) -> Result<RegattaDocument, GatewayError> {
        let now = Utc::now();
        let doc = match self {
            Self::Postgres(pool) => db::documents::replace(pool, id, owner, &content, now)
                .await?
                .ok_or(GatewayError::NotFound(id))?
                .into_document()
                .map_err(GatewayError::Encoding)?,
            Self::Memory(mem) => mem
                .documents
                .try_update(&id, |doc| {
                    if doc.owner_id != owner {
                        return Err(GatewayError::NotFound(id));
                    }
                    doc.content = content;
                    doc.updated_at = now;
                    Ok(doc.clone())
                })
                .unwrap_or(Err(GatewayError::NotFound(id)))?,
        };
        tracing::info!(document_id = %id, owner_id = %owner, "document updated");
        Ok(doc)
    }

    /// Delete a document owned by `owner`. Returns whether one was removed.
    pub async fn delete(&self, id: DocumentId, owner: OwnerId) -> Result<bool, GatewayError> {
        let removed = match self {
            Self::Postgres(pool) => db::documents::delete(pool, id, owner).await?,
            Self::Memory(mem) => mem
                .documents
                .remove_if(&id, |doc| doc.owner_id == owner)
                .is_some(),
        };
        if removed {
            tracing::info!(document_id = %id, owner_id = %owner, "document deleted");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regatta_core::RuleId;

    fn profile(identity: &str, name: &str) -> OwnerProfile {
        OwnerProfile {
            external_identity: ExternalIdentity::new(identity).unwrap(),
            display_name: name.to_string(),
            logo_url: None,
        }
    }

    #[tokio::test]
    async fn upsert_owner_is_keyed_by_identity_not_name() {
        let gw = DocumentGateway::in_memory();
        let first = gw.upsert_owner(&profile("org_1", "Yacht Club")).await.unwrap();
        let renamed = gw.upsert_owner(&profile("org_1", "Renamed YC")).await.unwrap();
        let other = gw.upsert_owner(&profile("org_2", "Yacht Club")).await.unwrap();

        assert_eq!(first.id, renamed.id);
        assert_eq!(renamed.display_name, "Renamed YC");
        assert_ne!(first.id, other.id);
    }

    #[tokio::test]
    async fn documents_are_owner_scoped() {
        let gw = DocumentGateway::in_memory();
        let a = OwnerId::new();
        let b = OwnerId::new();
        let doc = gw.create(a, DocumentContent::titled("Spring")).await.unwrap();

        assert_eq!(gw.get(doc.id, a).await.unwrap().content.title, "Spring");
        assert!(matches!(gw.get(doc.id, b).await, Err(GatewayError::NotFound(_))));
        assert!(matches!(
            gw.update(doc.id, b, DocumentContent::titled("Hijack")).await,
            Err(GatewayError::NotFound(_))
        ));
        assert!(!gw.delete(doc.id, b).await.unwrap());
        assert!(gw.list(b).await.unwrap().is_empty());

        assert_eq!(gw.get(doc.id, a).await.unwrap().content.title, "Spring");
    }

    #[tokio::test]
    async fn list_is_most_recently_updated_first() {
        let gw = DocumentGateway::in_memory();
        let owner = OwnerId::new();
        let first = gw.create(owner, DocumentContent::titled("First")).await.unwrap();
        let second = gw.create(owner, DocumentContent::titled("Second")).await.unwrap();

        let mut content = DocumentContent::titled("First, edited");
        content.selection.select(&RuleId::new("rule-1").unwrap()).unwrap();
        gw.update(first.id, owner, content).await.unwrap();

        let titles: Vec<_> = gw
            .list(owner)
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.content.title)
            .collect();
        assert_eq!(titles, vec!["First, edited", "Second"]);
        assert!(gw.get(second.id, owner).await.is_ok());
    }

    #[tokio::test]
    async fn update_preserves_created_at() {
        let gw = DocumentGateway::in_memory();
        let owner = OwnerId::new();
        let doc = gw.create(owner, DocumentContent::titled("A")).await.unwrap();
        let updated = gw.update(doc.id, owner, DocumentContent::titled("B")).await.unwrap();
        assert_eq!(updated.created_at, doc.created_at);
        assert!(updated.updated_at >= doc.updated_at);
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let gw = DocumentGateway::in_memory();
        let owner = OwnerId::new();
        let doc = gw.create(owner, DocumentContent::titled("Gone")).await.unwrap();
        assert!(gw.delete(doc.id, owner).await.unwrap());
        assert!(!gw.delete(doc.id, owner).await.unwrap());
        assert!(matches!(gw.get(doc.id, owner).await, Err(GatewayError::NotFound(_))));
    }

    #[tokio::test]
    async fn memory_backend_is_ready_and_not_persistent() {
        let gw = DocumentGateway::from_pool(None);
        assert!(!gw.is_persistent());
        assert!(gw.ping().await.is_ok());
    }
}
