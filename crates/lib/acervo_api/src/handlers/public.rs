//! Public document routes. No authentication; the status filter is
//! forced to active no matter what the caller sends.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, HeaderValue, header};

use acervo_core::models::document::{DocumentFilter, DocumentStatus};

use crate::AppState;
use crate::error::AppResult;
use crate::handlers::parse_id;
use crate::models::{DocumentView, PaginatedDocuments, PublicFilterQuery, PublicPageQuery};
use crate::services::documents::{self, DEFAULT_PAGE_SIZE};

/// `GET /api/documentos/publicos` — paginated public listing.
pub async fn list_public_handler(
    State(state): State<AppState>,
    Query(query): Query<PublicPageQuery>,
) -> AppResult<Json<PaginatedDocuments>> {
    let filter = DocumentFilter {
        category: query.category,
        status: Some(DocumentStatus::Active),
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

/// `GET /api/documentos/ativos` — the full active listing, unpaginated.
pub async fn list_active_handler(
    State(state): State<AppState>,
    Query(query): Query<PublicFilterQuery>,
) -> AppResult<Json<Vec<DocumentView>>> {
    let filter = DocumentFilter {
        category: query.category,
        status: None,
        period: query.period,
    };
    Ok(Json(
        documents::list_active_documents(&state, &filter).await?,
    ))
}

/// `GET /api/documentos/publicos/{id}` — active documents only.
pub async fn get_public_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DocumentView>> {
    Ok(Json(
        documents::get_active_document(&state, parse_id(&id)?).await?,
    ))
}

/// `GET /api/documentos/publicos/{id}/download` — stream the stored
/// file under its original name.
pub async fn download_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<(HeaderMap, Vec<u8>)> {
    let download = documents::download_active_document(&state, parse_id(&id)?).await?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(&download.mime_type)
            .unwrap_or(HeaderValue::from_static("application/octet-stream")),
    );
    let disposition = format!(
        "attachment; filename=\"{}\"",
        download.file_name.replace('"', "")
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition)
            .unwrap_or(HeaderValue::from_static("attachment")),
    );

    Ok((headers, download.bytes))
}
