//! Document database queries.
//!
//! Listing filters are conjunctive; the optional search term adds a
//! case-insensitive substring match over title and note.

use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::document::{
    CategoryCount, DocumentFilter, DocumentPage, DocumentStatus, DocumentWithCreator,
    NewDocument, StatusCount, UpdateDocument,
};
use crate::uuid::uuidv7;

/// Joined select used by every read: document columns plus the creator's
/// public fields.
const SELECT_DOCUMENT: &str = "SELECT d.id, d.title, d.category, d.note, d.period, \
     d.file_name, d.file_path, d.mime_type, d.size_bytes, d.status, \
     d.created_by, d.created_at, d.updated_at, \
     u.name AS creator_name, u.email AS creator_email, u.role AS creator_role \
     FROM documents d JOIN users u ON u.id = d.created_by";

/// Append the conjunctive filter (and optional search) to a query that
/// already ends in a `WHERE` clause.
fn push_filters(
    qb: &mut QueryBuilder<'_, Postgres>,
    filter: &DocumentFilter,
    search: Option<&str>,
) {
    if let Some(category) = filter.category {
        qb.push(" AND d.category = ").push_bind(category);
    }
    if let Some(status) = filter.status {
        qb.push(" AND d.status = ").push_bind(status);
    }
    if let Some(period) = &filter.period {
        qb.push(" AND d.period = ").push_bind(period.clone());
    }
    if let Some(term) = search {
        let pattern = format!("%{term}%");
        qb.push(" AND (d.title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR d.note ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

/// Insert a document (ID generated app-side, UUIDv7) and return it with
/// its creator loaded.
pub async fn insert_document(
    pool: &PgPool,
    doc: &NewDocument,
) -> Result<DocumentWithCreator, sqlx::Error> {
    let id = uuidv7();
    sqlx::query(
        "INSERT INTO documents \
             (id, title, category, note, period, file_name, file_path, \
              mime_type, size_bytes, created_by) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
    )
    .bind(id)
    .bind(&doc.title)
    .bind(doc.category)
    .bind(doc.note.as_deref())
    .bind(&doc.period)
    .bind(&doc.file_name)
    .bind(&doc.file_path)
    .bind(&doc.mime_type)
    .bind(doc.size_bytes)
    .bind(doc.created_by)
    .execute(pool)
    .await?;

    get_document(pool, id).await?.ok_or(sqlx::Error::RowNotFound)
}

/// Fetch a document by ID, including its creator.
pub async fn get_document(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<DocumentWithCreator>, sqlx::Error> {
    let mut qb = QueryBuilder::new(SELECT_DOCUMENT);
    qb.push(" WHERE d.id = ").push_bind(id);
    qb.build_query_as::<DocumentWithCreator>()
        .fetch_optional(pool)
        .await
}

/// List documents matching the filter, newest first.
pub async fn list_documents(
    pool: &PgPool,
    filter: &DocumentFilter,
) -> Result<Vec<DocumentWithCreator>, sqlx::Error> {
    let mut qb = QueryBuilder::new(SELECT_DOCUMENT);
    qb.push(" WHERE 1 = 1");
    push_filters(&mut qb, filter, None);
    // id is a tie-break so equal timestamps still list deterministically
    qb.push(" ORDER BY d.created_at DESC, d.id DESC");
    qb.build_query_as::<DocumentWithCreator>()
        .fetch_all(pool)
        .await
}

/// `list_documents` with the status forced to active, whatever the
/// caller's filter says. This is the only listing public routes reach.
pub async fn list_active_documents(
    pool: &PgPool,
    filter: &DocumentFilter,
) -> Result<Vec<DocumentWithCreator>, sqlx::Error> {
    let filter = DocumentFilter {
        status: Some(DocumentStatus::Active),
        ..filter.clone()
    };
    list_documents(pool, &filter).await
}

/// One page of documents plus the total match count.
///
/// `page` is 1-based; a page past the end yields an empty list with the
/// true total, which the caller reports unchanged.
pub async fn list_documents_page(
    pool: &PgPool,
    page: i64,
    page_size: i64,
    filter: &DocumentFilter,
    search: Option<&str>,
) -> Result<DocumentPage, sqlx::Error> {
    let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM documents d WHERE 1 = 1");
    push_filters(&mut count_qb, filter, search);
    let total: i64 = count_qb.build_query_scalar().fetch_one(pool).await?;

    let mut qb = QueryBuilder::new(SELECT_DOCUMENT);
    qb.push(" WHERE 1 = 1");
    push_filters(&mut qb, filter, search);
    qb.push(" ORDER BY d.created_at DESC, d.id DESC OFFSET ")
        .push_bind((page - 1) * page_size)
        .push(" LIMIT ")
        .push_bind(page_size);
    let items = qb
        .build_query_as::<DocumentWithCreator>()
        .fetch_all(pool)
        .await?;

    Ok(DocumentPage { items, total })
}

/// Apply a partial update (title, note, status), bumping `updated_at`.
/// Returns the updated document with creator, or `None` if it does not
/// exist.
pub async fn update_document(
    pool: &PgPool,
    id: Uuid,
    update: &UpdateDocument,
) -> Result<Option<DocumentWithCreator>, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE documents SET \
             title = COALESCE($2, title), \
             note = COALESCE($3, note), \
             status = COALESCE($4, status), \
             updated_at = now() \
         WHERE id = $1",
    )
    .bind(id)
    .bind(update.title.as_deref())
    .bind(update.note.as_deref())
    .bind(update.status)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get_document(pool, id).await
}

/// Delete a document row. Returns the number of rows removed (0 or 1).
pub async fn delete_document(pool: &PgPool, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM documents WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Active-document counts per category.
pub async fn count_by_category(pool: &PgPool) -> Result<Vec<CategoryCount>, sqlx::Error> {
    sqlx::query_as::<_, CategoryCount>(
        "SELECT category, COUNT(*) AS total FROM documents \
         WHERE status = 'active' GROUP BY category",
    )
    .fetch_all(pool)
    .await
}

/// Document counts per status.
pub async fn count_by_status(pool: &PgPool) -> Result<Vec<StatusCount>, sqlx::Error> {
    sqlx::query_as::<_, StatusCount>(
        "SELECT status, COUNT(*) AS total FROM documents GROUP BY status",
    )
    .fetch_all(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::DocumentCategory;

    #[test]
    fn filters_are_conjunctive_in_declared_order() {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM documents d WHERE 1 = 1");
        let filter = DocumentFilter {
            category: Some(DocumentCategory::Report),
            status: Some(DocumentStatus::Active),
            period: Some("2026-02".into()),
        };
        push_filters(&mut qb, &filter, Some("relatório"));
        assert_eq!(
            qb.sql(),
            "SELECT COUNT(*) FROM documents d WHERE 1 = 1 \
             AND d.category = $1 AND d.status = $2 AND d.period = $3 \
             AND (d.title ILIKE $4 OR d.note ILIKE $5)"
        );
    }

    #[test]
    fn empty_filter_adds_no_predicates() {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM documents d WHERE 1 = 1");
        push_filters(&mut qb, &DocumentFilter::default(), None);
        assert_eq!(qb.sql(), "SELECT COUNT(*) FROM documents d WHERE 1 = 1");
    }
}
