//! News item types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::NewsId;

/// Importance level of a news item.
///
/// The wire format carries importance as a raw integer. Values 0 to 2 map
/// to the three named levels; anything else lands in `Unspecified`, which
/// is a real bucket in live data, not dead code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Importance {
    /// Wire value 0. Displayed as "Important".
    Critical,
    /// Wire value 1. Displayed as "Mild".
    #[default]
    Mild,
    /// Wire value 2. Displayed as "Not Important".
    Informational,
    /// Any other wire value. Displayed as "Default (NOVALUE)".
    Unspecified,
}

impl Importance {
    /// The levels a user can pick when submitting an item.
    pub const SELECTABLE: [Importance; 3] = [
        Importance::Critical,
        Importance::Mild,
        Importance::Informational,
    ];

    /// Maps a raw wire integer to an importance level.
    pub fn from_wire(value: i64) -> Self {
        match value {
            0 => Importance::Critical,
            1 => Importance::Mild,
            2 => Importance::Informational,
            _ => Importance::Unspecified,
        }
    }

    /// Returns the wire integer for this level.
    ///
    /// `Unspecified` has no reserved wire value; -1 keeps it outside the
    /// mapped range so it reads back as `Unspecified`.
    pub fn to_wire(self) -> i64 {
        match self {
            Importance::Critical => 0,
            Importance::Mild => 1,
            Importance::Informational => 2,
            Importance::Unspecified => -1,
        }
    }

    /// Returns the display label for this level.
    pub fn label(self) -> &'static str {
        match self {
            Importance::Critical => "Important",
            Importance::Mild => "Mild",
            Importance::Informational => "Not Important",
            Importance::Unspecified => "Default (NOVALUE)",
        }
    }

    /// Returns the next selectable level, wrapping around.
    pub fn next_selectable(self) -> Self {
        match self {
            Importance::Critical => Importance::Mild,
            Importance::Mild => Importance::Informational,
            Importance::Informational => Importance::Critical,
            Importance::Unspecified => Importance::Critical,
        }
    }
}

/// One entry on the news board.
///
/// Items are immutable once created; there is no edit operation. The
/// remote store is the source of truth and assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    /// Server-assigned document id.
    pub id: NewsId,

    /// The news text.
    pub text: String,

    /// Importance level.
    pub importance: Importance,

    /// Client-supplied creation time, milliseconds since the epoch.
    pub created_at_millis: i64,
}

impl NewsItem {
    /// Creates an item from its parts.
    pub fn new(
        id: impl Into<NewsId>,
        text: impl Into<String>,
        importance: Importance,
        created_at_millis: i64,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            importance,
            created_at_millis,
        }
    }

    /// Returns the creation time as a UTC datetime, if representable.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.created_at_millis)
    }
}
