//! Opaque pagination cursors
//!
//! A cursor names the sort key of the last item a client has seen. On the
//! wire it is URL-safe base64 (no padding) over a short tagged text form:
//!
//! ```text
//! i:<id>              collections ordered by id
//! t:<millis>:<id>     merged collections ordered by (timestamp, id)
//! ```
//!
//! Decoding never fails loudly. Anything that is not a cursor this codec
//! would have produced means "start from the beginning".

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Opaque cursor string handed to clients
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    /// Wrap a raw client-supplied string
    pub fn from_string(s: String) -> Self {
        Self(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Cursor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Decoded sort key of the last item on a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CursorKey {
    /// Auto-incrementing identifier
    Id(i64),
    /// Timestamp (ms) with identifier as tie-breaker
    Timestamped { timestamp: i64, id: i64 },
}

impl CursorKey {
    pub fn kind(&self) -> KeyKind {
        match self {
            CursorKey::Id(_) => KeyKind::Id,
            CursorKey::Timestamped { .. } => KeyKind::Timestamped,
        }
    }

    fn to_text(self) -> String {
        match self {
            CursorKey::Id(id) => format!("i:{}", id),
            CursorKey::Timestamped { timestamp, id } => format!("t:{}:{}", timestamp, id),
        }
    }

    fn parse_text(text: &str) -> Option<Self> {
        let (tag, rest) = text.split_once(':')?;
        match tag {
            "i" => Some(CursorKey::Id(rest.parse().ok()?)),
            "t" => {
                let (ts, id) = rest.split_once(':')?;
                Some(CursorKey::Timestamped {
                    timestamp: ts.parse().ok()?,
                    id: id.parse().ok()?,
                })
            }
            _ => None,
        }
    }
}

/// Shape of the key a collection is ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Id,
    Timestamped,
}

/// Encodes and decodes cursors for one collection's key kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorCodec {
    kind: KeyKind,
}

impl CursorCodec {
    pub fn new(kind: KeyKind) -> Self {
        Self { kind }
    }

    /// Codec for id-ordered collections
    pub fn ids() -> Self {
        Self::new(KeyKind::Id)
    }

    /// Codec for (timestamp, id)-ordered collections
    pub fn timestamped() -> Self {
        Self::new(KeyKind::Timestamped)
    }

    pub fn kind(&self) -> KeyKind {
        self.kind
    }

    /// Encode a key into an opaque cursor
    pub fn encode(&self, key: CursorKey) -> Cursor {
        Cursor(URL_SAFE_NO_PAD.encode(key.to_text().as_bytes()))
    }

    /// Decode a client cursor; malformed or foreign cursors yield `None`
    pub fn decode(&self, cursor: Option<&str>) -> Option<CursorKey> {
        let raw = cursor.map(str::trim).filter(|s| !s.is_empty())?;

        let key = URL_SAFE_NO_PAD
            .decode(raw)
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok())
            .and_then(|text| CursorKey::parse_text(&text));

        match key {
            Some(key) if key.kind() == self.kind => Some(key),
            Some(key) => {
                tracing::debug!(
                    expected = ?self.kind,
                    got = ?key.kind(),
                    "Cursor for another collection, starting over"
                );
                None
            }
            None => {
                tracing::debug!(cursor = %raw, "Malformed cursor, starting over");
                None
            }
        }
    }
}
