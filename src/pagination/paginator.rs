//! Cursor Paginator
//!
//! Lookahead pagination: the caller fetches `limit + 1` rows after the
//! cursor, and the extra row only tells us whether another page exists.
//!
//! ```text
//! fetched = [a, b, c]   limit = 2
//! page    = [a, b]      has_more = true   next_cursor = encode(key(b))
//! ```
//!
//! No count query is needed and the backing store does not matter.

use serde::Serialize;

use crate::pagination::cursor::{Cursor, CursorCodec, CursorKey};
use crate::pagination::error::{PaginationError, PaginationResult};

/// One page of a cursor-paginated collection
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Present exactly when `has_more` is true
    pub next_cursor: Option<Cursor>,
    pub has_more: bool,
}

impl<T> Page<T> {
    /// The final (or only) page
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_cursor: None,
            has_more: false,
        }
    }

    pub fn empty() -> Self {
        Self::last(Vec::new())
    }

    /// Map items while keeping the page boundary
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            next_cursor: self.next_cursor,
            has_more: self.has_more,
        }
    }
}

/// Splits over-fetched rows into a page for one collection
#[derive(Debug, Clone, Copy)]
pub struct CursorPaginator {
    codec: CursorCodec,
}

impl CursorPaginator {
    pub fn new(codec: CursorCodec) -> Self {
        Self { codec }
    }

    pub fn codec(&self) -> CursorCodec {
        self.codec
    }

    /// Validate `limit` and return how many rows the caller must fetch
    pub fn fetch_limit(limit: i64) -> PaginationResult<usize> {
        if limit <= 0 {
            return Err(PaginationError::InvalidLimit(limit));
        }
        usize::try_from(limit)
            .ok()
            .and_then(|l| l.checked_add(1))
            .ok_or(PaginationError::InvalidLimit(limit))
    }

    /// Build the page from rows fetched in sort order after the cursor
    pub fn paginate<T, F>(
        &self,
        mut over_fetched: Vec<T>,
        limit: i64,
        key_of: F,
    ) -> PaginationResult<Page<T>>
    where
        F: Fn(&T) -> CursorKey,
    {
        let fetch = Self::fetch_limit(limit)?;
        let limit = fetch - 1;

        if over_fetched.len() <= limit {
            return Ok(Page::last(over_fetched));
        }

        if over_fetched.len() > fetch {
            tracing::debug!(
                fetched = over_fetched.len(),
                expected = fetch,
                "Discarding rows beyond the lookahead row"
            );
        }
        over_fetched.truncate(limit);

        let next_cursor = over_fetched
            .last()
            .map(|item| self.codec.encode(key_of(item)));

        Ok(Page {
            items: over_fetched,
            has_more: next_cursor.is_some(),
            next_cursor,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paginator() -> CursorPaginator {
        CursorPaginator::new(CursorCodec::ids())
    }

    fn id_key(id: &i64) -> CursorKey {
        CursorKey::Id(*id)
    }

    /// Rows strictly after the cursor, at most `fetch` of them
    fn fetch_after(collection: &[i64], after: Option<CursorKey>, fetch: usize) -> Vec<i64> {
        collection
            .iter()
            .copied()
            .filter(|id| match after {
                Some(CursorKey::Id(last)) => *id > last,
                _ => true,
            })
            .take(fetch)
            .collect()
    }

    #[test]
    fn test_fetch_limit() {
        assert_eq!(CursorPaginator::fetch_limit(1), Ok(2));
        assert_eq!(CursorPaginator::fetch_limit(20), Ok(21));
        assert_eq!(
            CursorPaginator::fetch_limit(0),
            Err(PaginationError::InvalidLimit(0))
        );
        assert_eq!(
            CursorPaginator::fetch_limit(-3),
            Err(PaginationError::InvalidLimit(-3))
        );
    }

    #[test]
    fn test_invalid_limit_rejected() {
        let result = paginator().paginate(vec![1i64, 2], 0, id_key);
        assert_eq!(result, Err(PaginationError::InvalidLimit(0)));
    }

    #[test]
    fn test_short_page_has_no_more() {
        let page = paginator().paginate(vec![1i64, 2], 2, id_key).unwrap();
        assert_eq!(page.items, vec![1, 2]);
        assert!(!page.has_more);
        assert!(page.next_cursor.is_none());

        let page = paginator().paginate(Vec::<i64>::new(), 5, id_key).unwrap();
        assert_eq!(page, Page::empty());
    }

    #[test]
    fn test_lookahead_row_dropped() {
        let page = paginator().paginate(vec![1i64, 2, 3], 2, id_key).unwrap();
        assert_eq!(page.items, vec![1, 2]);
        assert!(page.has_more);
        assert_eq!(page.next_cursor, Some(CursorCodec::ids().encode(CursorKey::Id(2))));
    }

    #[test]
    fn test_surplus_rows_discarded() {
        let page = paginator().paginate(vec![1i64, 2, 3, 4, 5], 2, id_key).unwrap();
        assert_eq!(page.items, vec![1, 2]);
        assert!(page.has_more);
    }

    #[test]
    fn test_walk_ids_one_to_five() {
        let collection = [1i64, 2, 3, 4, 5];
        let p = paginator();
        let codec = p.codec();

        let fetched = fetch_after(&collection, codec.decode(None), 3);
        assert_eq!(fetched, vec![1, 2, 3]);
        let page = p.paginate(fetched, 2, id_key).unwrap();
        assert_eq!(page.items, vec![1, 2]);
        assert!(page.has_more);
        assert_eq!(page.next_cursor, Some(codec.encode(CursorKey::Id(2))));

        let cursor = page.next_cursor.unwrap();
        let fetched = fetch_after(&collection, codec.decode(Some(cursor.as_str())), 3);
        assert_eq!(fetched, vec![3, 4, 5]);
        let page = p.paginate(fetched, 2, id_key).unwrap();
        assert_eq!(page.items, vec![3, 4]);
        assert!(page.has_more);
        assert_eq!(page.next_cursor, Some(codec.encode(CursorKey::Id(4))));

        let cursor = page.next_cursor.unwrap();
        let fetched = fetch_after(&collection, codec.decode(Some(cursor.as_str())), 3);
        assert_eq!(fetched, vec![5]);
        let page = p.paginate(fetched, 2, id_key).unwrap();
        assert_eq!(page.items, vec![5]);
        assert!(!page.has_more);
        assert!(page.next_cursor.is_none());
    }

    #[test]
    fn test_walk_is_complete_for_every_limit() {
        let collection: Vec<i64> = (1..=23).collect();
        let p = paginator();

        for limit in 1..=25i64 {
            let fetch = CursorPaginator::fetch_limit(limit).unwrap();
            let mut seen = Vec::new();
            let mut cursor: Option<Cursor> = None;

            loop {
                let after = p.codec().decode(cursor.as_ref().map(Cursor::as_str));
                let page = p
                    .paginate(fetch_after(&collection, after, fetch), limit, id_key)
                    .unwrap();
                assert_eq!(page.has_more, page.next_cursor.is_some());
                seen.extend(page.items);
                if !page.has_more {
                    break;
                }
                cursor = page.next_cursor;
            }

            assert_eq!(seen, collection, "limit {}", limit);
        }
    }

    #[test]
    fn test_page_serialization() {
        let page = paginator().paginate(vec![1i64, 2, 3], 2, id_key).unwrap();
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["items"], serde_json::json!([1, 2]));
        assert_eq!(json["hasMore"], true);
        assert!(json["nextCursor"].is_string());

        let json = serde_json::to_value(Page::<i64>::empty()).unwrap();
        assert!(json["nextCursor"].is_null());
        assert_eq!(json["hasMore"], false);
    }

    #[test]
    fn test_map_keeps_boundary() {
        let page = paginator()
            .paginate(vec![1i64, 2, 3], 2, id_key)
            .unwrap()
            .map(|id| id.to_string());
        assert_eq!(page.items, vec!["1", "2"]);
        assert!(page.has_more);
    }
}
