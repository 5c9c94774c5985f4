//! Document persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `regatta_documents`
//! table. Every statement filters on `race_committee_id`, so a document owned
//! by another race committee is indistinguishable from an absent one.

use chrono::{DateTime, Utc};
use regatta_core::{
    CustomFields, DocumentContent, DocumentId, DocumentPayload, EventMetadata, Fleet, OwnerId,
    Provision, RegattaDocument,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

const COLUMNS: &str = "id, race_committee_id, title, event_data, selected_rules, modified_rules, \
                       custom_fields, fleets, created_at, updated_at";

/// One entry of the `custom_fields` column. JSONB objects do not keep key
/// order, so fields are stored as an array.
#[derive(Debug, Serialize, Deserialize)]
struct NamedField {
    name: String,
    value: String,
}

/// Shape of the `fleets` column.
#[derive(Debug, Default, Serialize, Deserialize)]
struct FleetColumn {
    #[serde(default)]
    fleets: Vec<Fleet>,
    #[serde(default)]
    provisions: Vec<Provision>,
}

/// The JSON columns of a document, encoded for binding.
struct EncodedContent {
    event_data: Value,
    selected_rules: Value,
    modified_rules: Value,
    custom_fields: Value,
    fleets: Value,
}

fn encode(content: &DocumentContent) -> Result<EncodedContent, sqlx::Error> {
    let encode_err = |column: &'static str| {
        move |e: serde_json::Error| {
            tracing::error!(error = %e, column, "failed to serialize document column");
            sqlx::Error::Encode(Box::new(e))
        }
    };

    let custom_fields: Vec<NamedField> = content
        .custom_fields
        .iter()
        .map(|(name, value)| NamedField {
            name: name.to_string(),
            value: value.to_string(),
        })
        .collect();
    let fleets = FleetColumn {
        fleets: content.fleets.fleets().to_vec(),
        provisions: content.fleets.provisions().to_vec(),
    };

    Ok(EncodedContent {
        event_data: serde_json::to_value(&content.event).map_err(encode_err("event_data"))?,
        selected_rules: serde_json::to_value(content.selected_rule_ids())
            .map_err(encode_err("selected_rules"))?,
        modified_rules: serde_json::to_value(content.modified_rules())
            .map_err(encode_err("modified_rules"))?,
        custom_fields: serde_json::to_value(custom_fields).map_err(encode_err("custom_fields"))?,
        fleets: serde_json::to_value(fleets).map_err(encode_err("fleets"))?,
    })
}

/// Insert a new document.
pub async fn insert(pool: &PgPool, doc: &RegattaDocument) -> Result<(), sqlx::Error> {
    let cols = encode(&doc.content)?;

    sqlx::query(
        "INSERT INTO regatta_documents (id, race_committee_id, title, event_data, selected_rules,
                                        modified_rules, custom_fields, fleets, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
    )
    .bind(doc.id.as_uuid())
    .bind(doc.owner_id.as_uuid())
    .bind(&doc.content.title)
    .bind(&cols.event_data)
    .bind(&cols.selected_rules)
    .bind(&cols.modified_rules)
    .bind(&cols.custom_fields)
    .bind(&cols.fleets)
    .bind(doc.created_at)
    .bind(doc.updated_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Replace every content column of an owned document in one statement.
///
/// Returns `None` if no document with this id belongs to `owner`.
pub async fn replace(
    pool: &PgPool,
    id: DocumentId,
    owner: OwnerId,
    content: &DocumentContent,
    updated_at: DateTime<Utc>,
) -> Result<Option<DocumentRow>, sqlx::Error> {
    let cols = encode(content)?;

    sqlx::query_as::<_, DocumentRow>(&format!(
        "UPDATE regatta_documents
            SET title = $1, event_data = $2, selected_rules = $3, modified_rules = $4,
                custom_fields = $5, fleets = $6, updated_at = $7
          WHERE id = $8 AND race_committee_id = $9
         RETURNING {COLUMNS}"
    ))
    .bind(&content.title)
    .bind(&cols.event_data)
    .bind(&cols.selected_rules)
    .bind(&cols.modified_rules)
    .bind(&cols.custom_fields)
    .bind(&cols.fleets)
    .bind(updated_at)
    .bind(id.as_uuid())
    .bind(owner.as_uuid())
    .fetch_optional(pool)
    .await
}

/// Fetch an owned document by id.
pub async fn get(
    pool: &PgPool,
    id: DocumentId,
    owner: OwnerId,
) -> Result<Option<DocumentRow>, sqlx::Error> {
    sqlx::query_as::<_, DocumentRow>(&format!(
        "SELECT {COLUMNS} FROM regatta_documents WHERE id = $1 AND race_committee_id = $2"
    ))
    .bind(id.as_uuid())
    .bind(owner.as_uuid())
    .fetch_optional(pool)
    .await
}

/// List an owner's documents, most recently updated first.
pub async fn list(pool: &PgPool, owner: OwnerId) -> Result<Vec<DocumentRow>, sqlx::Error> {
    sqlx::query_as::<_, DocumentRow>(&format!(
        "SELECT {COLUMNS} FROM regatta_documents
          WHERE race_committee_id = $1
          ORDER BY updated_at DESC, id"
    ))
    .bind(owner.as_uuid())
    .fetch_all(pool)
    .await
}

/// Delete an owned document. Returns whether a row was removed.
pub async fn delete(pool: &PgPool, id: DocumentId, owner: OwnerId) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM regatta_documents WHERE id = $1 AND race_committee_id = $2")
        .bind(id.as_uuid())
        .bind(owner.as_uuid())
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

// -- Row types ----------------------------------------------------------------

/// Database row for the `regatta_documents` table.
#[derive(Debug, sqlx::FromRow)]
pub struct DocumentRow {
    id: Uuid,
    race_committee_id: Uuid,
    title: String,
    event_data: Value,
    selected_rules: Value,
    modified_rules: Value,
    custom_fields: Value,
    fleets: Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl DocumentRow {
    /// Decode the JSON columns and re-validate them against the catalog.
    ///
    /// Stored content passes the same checks as a client payload, so a row
    /// written before a catalog change is reported instead of silently
    /// dropping rules.
    pub fn into_document(self) -> Result<RegattaDocument, String> {
        let decode = |column: &str, e: serde_json::Error| format!("column {column}: {e}");

        let event_data: EventMetadata =
            serde_json::from_value(self.event_data).map_err(|e| decode("event_data", e))?;
        let selected_rules: Vec<String> =
            serde_json::from_value(self.selected_rules).map_err(|e| decode("selected_rules", e))?;
        let modified_rules = serde_json::from_value(self.modified_rules)
            .map_err(|e| decode("modified_rules", e))?;
        let custom_fields: Vec<NamedField> =
            serde_json::from_value(self.custom_fields).map_err(|e| decode("custom_fields", e))?;
        let fleets: FleetColumn =
            serde_json::from_value(self.fleets).map_err(|e| decode("fleets", e))?;

        let content = DocumentPayload {
            id: None,
            title: self.title,
            event_data,
            selected_rules,
            modified_rules,
            custom_fields: custom_fields
                .into_iter()
                .map(|f| (f.name, f.value))
                .collect::<CustomFields>(),
            fleets: fleets.fleets,
            fleet_provisions: fleets.provisions,
        }
        .into_content()
        .map_err(|e| format!("stored content is invalid: {e}"))?;

        Ok(RegattaDocument {
            id: DocumentId::from_uuid(self.id),
            owner_id: OwnerId::from_uuid(self.race_committee_id),
            content,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
