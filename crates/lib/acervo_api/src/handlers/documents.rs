//! Document management request handlers (authenticated staff routes).

use axum::Json;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use acervo_core::models::document::{DocumentCategory, DocumentFilter};

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::handlers::parse_id;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{
    DocumentStats, DocumentView, ListQuery, PageQuery, PaginatedDocuments, UpdateDocumentRequest,
};
use crate::services::documents::{self, CreateDocumentInput, DEFAULT_PAGE_SIZE};

fn upload_error(e: axum::extract::multipart::MultipartError) -> AppError {
    AppError::Validation(format!("Upload inválido: {e}"))
}

/// `POST /api/documentos` — create a document from a multipart form
/// (`titulo`, `categoria`, `nota?`, `data`, `arquivo`).
pub async fn create_document_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DocumentView>)> {
    let mut title = None;
    let mut category = None;
    let mut note = None;
    let mut period = None;
    let mut file = None;

    while let Some(field) = multipart.next_field().await.map_err(upload_error)? {
        let name = field.name().map(|n| n.to_string());
        match name.as_deref() {
            Some("titulo") => title = Some(field.text().await.map_err(upload_error)?),
            Some("categoria") => category = Some(field.text().await.map_err(upload_error)?),
            Some("nota") => note = Some(field.text().await.map_err(upload_error)?),
            Some("data") => period = Some(field.text().await.map_err(upload_error)?),
            Some("arquivo") => {
                let file_name = field.file_name().unwrap_or("arquivo").to_string();
                let mime_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await.map_err(upload_error)?;
                file = Some((file_name, mime_type, bytes));
            }
            _ => {}
        }
    }

    let (file_name, mime_type, bytes) =
        file.ok_or_else(|| AppError::Validation("Arquivo é obrigatório".into()))?;

    let (title, category, period) = match (title, category, period) {
        (Some(t), Some(c), Some(p)) if !t.is_empty() && !c.is_empty() && !p.is_empty() => {
            (t, c, p)
        }
        _ => {
            return Err(AppError::Validation(
                "Título, categoria e data são obrigatórios".into(),
            ));
        }
    };
    let category: DocumentCategory = category
        .parse()
        .map_err(|_| AppError::Validation("Categoria inválida".into()))?;

    let created_by = Uuid::parse_str(&user.0.sub)
        .map_err(|_| AppError::Unauthorized("Token inválido ou expirado".into()))?;

    let view = documents::create_document(
        &state,
        CreateDocumentInput {
            title,
            category,
            note: note.filter(|n| !n.is_empty()),
            period,
            file_name,
            mime_type,
            bytes,
            created_by,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(view)))
}

/// `GET /api/documentos` — filtered listing, newest first.
pub async fn list_documents_handler(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<DocumentView>>> {
    let filter = DocumentFilter {
        category: query.category,
        status: query.status,
        period: query.period,
    };
    Ok(Json(documents::list_documents(&state, &filter).await?))
}

/// `GET /api/documentos/paginado` — filtered + searched pagination.
pub async fn list_paginated_handler(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<PaginatedDocuments>> {
    let filter = DocumentFilter {
        category: query.category,
        status: query.status,
        period: query.period,
    };
    let page = documents::list_documents_page(
        &state,
        query.page.unwrap_or(1),
        query.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        &filter,
        query.search.as_deref(),
    )
    .await?;
    Ok(Json(page))
}

/// `GET /api/documentos/estatisticas` — totals by status and category.
pub async fn stats_handler(State(state): State<AppState>) -> AppResult<Json<DocumentStats>> {
    Ok(Json(documents::stats(&state).await?))
}

/// `GET /api/documentos/{id}`.
pub async fn get_document_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DocumentView>> {
    Ok(Json(documents::get_document(&state, parse_id(&id)?).await?))
}

/// `PUT /api/documentos/{id}` — partial update of title/note/status.
pub async fn update_document_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateDocumentRequest>,
) -> AppResult<Json<DocumentView>> {
    let view = documents::update_document(&state, parse_id(&id)?, body).await?;
    Ok(Json(view))
}

/// `DELETE /api/documentos/{id}` — remove the file, then the row.
pub async fn delete_document_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    documents::delete_document(&state, parse_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}
