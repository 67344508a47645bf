//! Document service — the create/read/update/delete use cases.

use axum::body::Bytes;
use tracing::{info, warn};
use uuid::Uuid;

use acervo_core::documents::{queries, total_pages};
use acervo_core::models::document::{
    DocumentCategory, DocumentFilter, DocumentStatus, DocumentWithCreator, NewDocument,
    UpdateDocument,
};
use acervo_core::storage::{StorageError, UploadedFile};

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{
    CategoryCountView, DocumentStats, DocumentView, PaginatedDocuments, UpdateDocumentRequest,
};

/// Default page size for listings.
pub const DEFAULT_PAGE_SIZE: i64 = 12;

fn not_found() -> AppError {
    AppError::NotFound("Documento não encontrado".into())
}

/// Input to the create-document use case. The file content arrives
/// in-memory from the multipart layer; staging to disk only happens
/// after validation passes.
#[derive(Debug)]
pub struct CreateDocumentInput {
    pub title: String,
    pub category: DocumentCategory,
    pub note: Option<String>,
    pub period: String,
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Bytes,
    pub created_by: Uuid,
}

/// `YYYY-MM`, with a real month.
fn valid_period(period: &str) -> bool {
    let Some((year, month)) = period.split_once('-') else {
        return false;
    };
    year.len() == 4
        && year.chars().all(|c| c.is_ascii_digit())
        && month.len() == 2
        && month.parse::<u8>().is_ok_and(|m| (1..=12).contains(&m))
}

/// Create a document: validate the file, persist it, then insert the
/// row. Every check runs before anything is written, so a rejected
/// upload leaves no file and no row behind.
pub async fn create_document(
    state: &AppState,
    input: CreateDocumentInput,
) -> AppResult<DocumentView> {
    if !valid_period(&input.period) {
        return Err(AppError::Validation(
            "Data deve estar no formato YYYY-MM".into(),
        ));
    }
    state
        .storage
        .validate(&input.mime_type, input.bytes.len() as u64)?;

    let temp_path = state.storage.stage(&input.file_name, &input.bytes).await?;
    let upload = UploadedFile {
        original_name: input.file_name.clone(),
        mime_type: input.mime_type.clone(),
        size: input.bytes.len() as u64,
        temp_path,
    };
    let file_path = state.storage.save(&upload).await?;

    let record = queries::insert_document(
        &state.pool,
        &NewDocument {
            title: input.title,
            category: input.category,
            note: input.note,
            period: input.period,
            file_name: input.file_name,
            file_path: file_path.clone(),
            mime_type: input.mime_type,
            size_bytes: input.bytes.len() as i64,
            created_by: input.created_by,
        },
    )
    .await?;

    info!(id = %record.document.id, path = %file_path, "document created");

    Ok(DocumentView::from_record(&record, &state.storage))
}

/// Fetch a document by ID.
pub async fn get_document(state: &AppState, id: Uuid) -> AppResult<DocumentView> {
    let record = queries::get_document(&state.pool, id)
        .await?
        .ok_or_else(not_found)?;
    Ok(DocumentView::from_record(&record, &state.storage))
}

/// Fetch a document by ID for the public routes: anything that is not
/// active does not exist out there.
async fn get_active_record(state: &AppState, id: Uuid) -> AppResult<DocumentWithCreator> {
    let record = queries::get_document(&state.pool, id)
        .await?
        .filter(|r| r.document.status == DocumentStatus::Active)
        .ok_or_else(not_found)?;
    Ok(record)
}

/// Public variant of `get_document`.
pub async fn get_active_document(state: &AppState, id: Uuid) -> AppResult<DocumentView> {
    let record = get_active_record(state, id).await?;
    Ok(DocumentView::from_record(&record, &state.storage))
}

/// A stored file ready to be served as a download.
#[derive(Debug)]
pub struct FileDownload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Read the stored file backing an active document.
pub async fn download_active_document(state: &AppState, id: Uuid) -> AppResult<FileDownload> {
    let record = get_active_record(state, id).await?;
    let bytes = state
        .storage
        .read(&record.document.file_path)
        .await
        .map_err(|e| match &e {
            StorageError::Io(io) if io.kind() == std::io::ErrorKind::NotFound => {
                AppError::NotFound("Arquivo não encontrado".into())
            }
            _ => e.into(),
        })?;
    Ok(FileDownload {
        file_name: record.document.file_name.clone(),
        mime_type: record.document.mime_type.clone(),
        bytes,
    })
}

/// List documents matching the filter, newest first.
pub async fn list_documents(
    state: &AppState,
    filter: &DocumentFilter,
) -> AppResult<Vec<DocumentView>> {
    let rows = queries::list_documents(&state.pool, filter).await?;
    Ok(rows
        .iter()
        .map(|r| DocumentView::from_record(r, &state.storage))
        .collect())
}

/// List active documents matching the filter, newest first.
pub async fn list_active_documents(
    state: &AppState,
    filter: &DocumentFilter,
) -> AppResult<Vec<DocumentView>> {
    let rows = queries::list_active_documents(&state.pool, filter).await?;
    Ok(rows
        .iter()
        .map(|r| DocumentView::from_record(r, &state.storage))
        .collect())
}

/// One page of documents. A page beyond the end is not an error: it
/// yields an empty list with the true totals.
pub async fn list_documents_page(
    state: &AppState,
    page: i64,
    page_size: i64,
    filter: &DocumentFilter,
    search: Option<&str>,
) -> AppResult<PaginatedDocuments> {
    if page < 1 || page_size < 1 {
        return Err(AppError::Validation(
            "Parâmetros de paginação inválidos".into(),
        ));
    }

    let page_data =
        queries::list_documents_page(&state.pool, page, page_size, filter, search).await?;

    Ok(PaginatedDocuments {
        items: page_data
            .items
            .iter()
            .map(|r| DocumentView::from_record(r, &state.storage))
            .collect(),
        total: page_data.total,
        page,
        total_pages: total_pages(page_data.total, page_size),
        page_size,
    })
}

/// Apply a partial update (title, note, status).
pub async fn update_document(
    state: &AppState,
    id: Uuid,
    req: UpdateDocumentRequest,
) -> AppResult<DocumentView> {
    let update = UpdateDocument {
        title: req.title,
        note: req.note,
        status: req.status,
    };
    let record = queries::update_document(&state.pool, id, &update)
        .await?
        .ok_or_else(not_found)?;
    Ok(DocumentView::from_record(&record, &state.storage))
}

/// Delete a document: backing file first, then the row. A file that
/// cannot be removed is logged and does not block the row deletion.
pub async fn delete_document(state: &AppState, id: Uuid) -> AppResult<()> {
    let record = queries::get_document(&state.pool, id)
        .await?
        .ok_or_else(not_found)?;

    if let Err(e) = state.storage.delete(&record.document.file_path).await {
        warn!(
            error = %e,
            path = %record.document.file_path,
            "could not remove stored file, deleting row anyway"
        );
    }

    queries::delete_document(&state.pool, id).await?;
    info!(%id, "document deleted");
    Ok(())
}

/// Totals by status plus active per-category counts.
pub async fn stats(state: &AppState) -> AppResult<DocumentStats> {
    let by_status = queries::count_by_status(&state.pool).await?;
    let by_category = queries::count_by_category(&state.pool).await?;

    let mut active = 0;
    let mut inactive = 0;
    let mut archived = 0;
    for row in &by_status {
        match row.status {
            DocumentStatus::Active => active = row.total,
            DocumentStatus::Inactive => inactive = row.total,
            DocumentStatus::Archived => archived = row.total,
        }
    }

    Ok(DocumentStats {
        total: active + inactive + archived,
        active,
        inactive,
        archived,
        by_category: by_category.iter().map(CategoryCountView::from_count).collect(),
    })
}
