//! Daybook Cursor Pagination
//!
//! - **cursor**: opaque `Cursor` strings and the `CursorCodec`
//! - **paginator**: `CursorPaginator` and `Page<T>`
//! - **error**: `PaginationError`
//!
//! # Flow
//!
//! ```text
//! client cursor → CursorCodec::decode → fetch limit+1 rows after key
//!               → CursorPaginator::paginate → Page { items, next_cursor, has_more }
//! ```

pub mod cursor;
pub mod error;
pub mod paginator;

pub use cursor::{Cursor, CursorCodec, CursorKey, KeyKind};
pub use error::{PaginationError, PaginationResult};
pub use paginator::{CursorPaginator, Page};
