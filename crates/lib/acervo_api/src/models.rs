//! Request/response models.
//!
//! The wire format is the site frontend's existing contract: Portuguese
//! camelCase field names. Rust-side names stay English; `serde(rename)`
//! does the bridging.

use acervo_core::models::document::{
    CategoryCount, DocumentCategory, DocumentStatus, DocumentWithCreator,
};
use acervo_core::models::user::{UserRole, UserRow};
use acervo_core::storage::Storage;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Error body: `{"erro": "..."}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(rename = "erro")]
    pub error: String,
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    #[serde(rename = "senha")]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "senha")]
    pub password: String,
    #[serde(rename = "tipo")]
    pub role: Option<UserRole>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(rename = "usuario")]
    pub user: UserView,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub redirect: String,
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// External projection of a staff account. Never carries the password
/// hash — it is built field-by-field, not from serializing the row.
#[derive(Debug, Serialize)]
pub struct UserView {
    pub id: Uuid,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "tipo")]
    pub role: UserRole,
    #[serde(rename = "ativo")]
    pub active: bool,
    #[serde(rename = "criadoEm")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl UserView {
    pub fn from_row(row: &UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name.clone(),
            email: row.email.clone(),
            role: row.role,
            active: row.active,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(rename = "nome")]
    pub name: Option<String>,
    #[serde(rename = "tipo")]
    pub role: Option<UserRole>,
    #[serde(rename = "ativo")]
    pub active: Option<bool>,
}

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

/// Creator fields embedded in a document response.
#[derive(Debug, Serialize)]
pub struct CreatorView {
    pub id: Uuid,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "tipo")]
    pub role: UserRole,
}

/// A document as the frontend sees it. `urlPublica` is recomputed from
/// the stored relative path on every response.
#[derive(Debug, Serialize)]
pub struct DocumentView {
    pub id: Uuid,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "categoria")]
    pub category: DocumentCategory,
    #[serde(rename = "nota")]
    pub note: Option<String>,
    #[serde(rename = "data")]
    pub period: String,
    #[serde(rename = "nomeArquivo")]
    pub file_name: String,
    #[serde(rename = "caminhoArquivo")]
    pub file_path: String,
    #[serde(rename = "tipoArquivo")]
    pub mime_type: String,
    #[serde(rename = "tamanhoArquivo")]
    pub size_bytes: i64,
    pub status: DocumentStatus,
    #[serde(rename = "urlPublica")]
    pub public_url: String,
    #[serde(rename = "criadoPorId")]
    pub created_by_id: Uuid,
    #[serde(rename = "criadoPor")]
    pub created_by: CreatorView,
    #[serde(rename = "criadoEm")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(rename = "atualizadoEm")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl DocumentView {
    pub fn from_record(record: &DocumentWithCreator, storage: &Storage) -> Self {
        let doc = &record.document;
        Self {
            id: doc.id,
            title: doc.title.clone(),
            category: doc.category,
            note: doc.note.clone(),
            period: doc.period.clone(),
            file_name: doc.file_name.clone(),
            file_path: doc.file_path.clone(),
            mime_type: doc.mime_type.clone(),
            size_bytes: doc.size_bytes,
            status: doc.status,
            public_url: storage.public_url(&doc.file_path),
            created_by_id: doc.created_by,
            created_by: CreatorView {
                id: doc.created_by,
                name: record.creator_name.clone(),
                email: record.creator_email.clone(),
                role: record.creator_role,
            },
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateDocumentRequest {
    #[serde(rename = "titulo")]
    pub title: Option<String>,
    #[serde(rename = "nota")]
    pub note: Option<String>,
    pub status: Option<DocumentStatus>,
}

/// One page of documents, with the arithmetic the frontend relies on:
/// `totalPaginas = ceil(total / limite)`.
#[derive(Debug, Serialize)]
pub struct PaginatedDocuments {
    #[serde(rename = "documentos")]
    pub items: Vec<DocumentView>,
    pub total: i64,
    #[serde(rename = "pagina")]
    pub page: i64,
    #[serde(rename = "totalPaginas")]
    pub total_pages: i64,
    #[serde(rename = "limite")]
    pub page_size: i64,
}

#[derive(Debug, Serialize)]
pub struct CategoryCountView {
    #[serde(rename = "categoria")]
    pub category: DocumentCategory,
    pub total: i64,
}

impl CategoryCountView {
    pub fn from_count(count: &CategoryCount) -> Self {
        Self {
            category: count.category,
            total: count.total,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DocumentStats {
    pub total: i64,
    #[serde(rename = "ativos")]
    pub active: i64,
    #[serde(rename = "inativos")]
    pub inactive: i64,
    #[serde(rename = "arquivados")]
    pub archived: i64,
    #[serde(rename = "porCategoria")]
    pub by_category: Vec<CategoryCountView>,
}

// ---------------------------------------------------------------------------
// Query strings
// ---------------------------------------------------------------------------

/// Conjunctive listing filter, as query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(rename = "categoria")]
    pub category: Option<DocumentCategory>,
    pub status: Option<DocumentStatus>,
    #[serde(rename = "data")]
    pub period: Option<String>,
}

/// Pagination + filter + search, as query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    #[serde(rename = "pagina")]
    pub page: Option<i64>,
    #[serde(rename = "limite")]
    pub page_size: Option<i64>,
    #[serde(rename = "busca")]
    pub search: Option<String>,
    #[serde(rename = "categoria")]
    pub category: Option<DocumentCategory>,
    pub status: Option<DocumentStatus>,
    #[serde(rename = "data")]
    pub period: Option<String>,
}

/// Public filter parameters — no status: the public tree only ever
/// sees active documents.
#[derive(Debug, Default, Deserialize)]
pub struct PublicFilterQuery {
    #[serde(rename = "categoria")]
    pub category: Option<DocumentCategory>,
    #[serde(rename = "data")]
    pub period: Option<String>,
}

/// Public listing parameters — no status: the public tree only ever
/// sees active documents.
#[derive(Debug, Default, Deserialize)]
pub struct PublicPageQuery {
    #[serde(rename = "pagina")]
    pub page: Option<i64>,
    #[serde(rename = "limite")]
    pub page_size: Option<i64>,
    #[serde(rename = "busca")]
    pub search: Option<String>,
    #[serde(rename = "categoria")]
    pub category: Option<DocumentCategory>,
    #[serde(rename = "data")]
    pub period: Option<String>,
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub environment: String,
}

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub message: String,
    pub status: String,
    pub version: String,
    pub environment: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_response_serializes_to_erro() {
        let body = serde_json::to_value(ErrorResponse {
            error: "Token não fornecido".into(),
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"erro": "Token não fornecido"}));
    }

    #[test]
    fn login_request_reads_senha() {
        let req: LoginRequest =
            serde_json::from_str(r#"{"email": "a@b.c", "senha": "s3cret"}"#).unwrap();
        assert_eq!(req.email, "a@b.c");
        assert_eq!(req.password, "s3cret");
    }

    #[test]
    fn paginated_response_uses_frontend_field_names() {
        let body = serde_json::to_value(PaginatedDocuments {
            items: vec![],
            total: 25,
            page: 3,
            total_pages: 3,
            page_size: 12,
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "documentos": [],
                "total": 25,
                "pagina": 3,
                "totalPaginas": 3,
                "limite": 12
            })
        );
    }
}
