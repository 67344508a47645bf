//! Document domain models.
//!
//! Wire values (serde renames) follow the site's existing frontend
//! contract, which predates this backend: categories and statuses travel
//! as Portuguese strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::user::UserRole;

/// Closed category set for published documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "document_category", rename_all = "snake_case")]
pub enum DocumentCategory {
    #[serde(rename = "Relatorios")]
    Report,
    #[serde(rename = "Prestacao de contas")]
    FinancialStatement,
    #[serde(rename = "Documentos")]
    Document,
}

impl DocumentCategory {
    /// Wire representation, as the frontend sends and receives it.
    pub fn as_wire(&self) -> &'static str {
        match self {
            Self::Report => "Relatorios",
            Self::FinancialStatement => "Prestacao de contas",
            Self::Document => "Documentos",
        }
    }
}

impl FromStr for DocumentCategory {
    type Err = InvalidEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Relatorios" => Ok(Self::Report),
            "Prestacao de contas" => Ok(Self::FinancialStatement),
            "Documentos" => Ok(Self::Document),
            other => Err(InvalidEnumValue(other.to_string())),
        }
    }
}

/// Visibility status. Only `Active` documents are served on public routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "document_status", rename_all = "lowercase")]
pub enum DocumentStatus {
    #[serde(rename = "ativo")]
    Active,
    #[serde(rename = "inativo")]
    Inactive,
    #[serde(rename = "arquivado")]
    Archived,
}

/// Error for a wire string that names no known enum value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidEnumValue(pub String);

impl fmt::Display for InvalidEnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown value: {}", self.0)
    }
}

impl std::error::Error for InvalidEnumValue {}

/// Database row for `documents`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DocumentRow {
    pub id: uuid::Uuid,
    pub title: String,
    pub category: DocumentCategory,
    pub note: Option<String>,
    pub period: String,
    pub file_name: String,
    pub file_path: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub status: DocumentStatus,
    pub created_by: uuid::Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// A document joined with its creator's public fields.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DocumentWithCreator {
    #[sqlx(flatten)]
    pub document: DocumentRow,
    pub creator_name: String,
    pub creator_email: String,
    pub creator_role: UserRole,
}

/// Fields for inserting a document. The file has already been persisted
/// by the storage engine; `file_path` is the storage-relative path it
/// returned.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub title: String,
    pub category: DocumentCategory,
    pub note: Option<String>,
    pub period: String,
    pub file_name: String,
    pub file_path: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub created_by: uuid::Uuid,
}

/// Partial update of a document. Only title, note, and status may change
/// after creation; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateDocument {
    pub title: Option<String>,
    pub note: Option<String>,
    pub status: Option<DocumentStatus>,
}

/// Conjunctive listing filter. Absent fields do not constrain the result.
#[derive(Debug, Clone, Default)]
pub struct DocumentFilter {
    pub category: Option<DocumentCategory>,
    pub status: Option<DocumentStatus>,
    pub period: Option<String>,
}

/// One page of documents plus the total match count across all pages.
#[derive(Debug, Clone)]
pub struct DocumentPage {
    pub items: Vec<DocumentWithCreator>,
    pub total: i64,
}

/// Active-document count for one category.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CategoryCount {
    pub category: DocumentCategory,
    pub total: i64,
}

/// Document count for one status.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StatusCount {
    pub status: DocumentStatus,
    pub total: i64,
}
