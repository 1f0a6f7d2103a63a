//! Migration timestamp planning.
//!
//! Laravel replays migrations in filename order, so every create migration
//! of a run gets a distinct timestamp in dependency order, and pivot
//! migrations are pushed past all of them.

use chrono::{Duration, Local, NaiveDateTime};

/// `2024_01_15_093000`
pub const TIMESTAMP_FORMAT: &str = "%Y_%m_%d_%H%M%S";

/// Offset of column additions from the base timestamp, past the create
/// migrations of the same run.
const ALTERATION_OFFSET_MINUTES: i64 = 5;

/// Offset of pivot migrations from the base timestamp.
const PIVOT_OFFSET_MINUTES: i64 = 10;

/// Hands out migration timestamps relative to one base instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationClock {
    base: NaiveDateTime,
}

impl MigrationClock {
    pub fn new(base: NaiveDateTime) -> Self {
        Self { base }
    }

    /// Clock starting at the current local time.
    pub fn now() -> Self {
        Self::new(Local::now().naive_local())
    }

    /// Parse a pinned base timestamp (`YYYY_MM_DD_HHMMSS`).
    pub fn parse(s: &str) -> Result<Self, chrono::ParseError> {
        NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).map(Self::new)
    }

    pub fn instant(&self) -> NaiveDateTime {
        self.base
    }

    /// Base timestamp, used by single-file migrations.
    pub fn base(&self) -> String {
        self.base.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Timestamp of the create migration at position `index` in table order.
    pub fn table(&self, index: usize) -> String {
        self.offset(Duration::seconds(index as i64))
    }

    /// Timestamp of the `index`th column addition found by a re-run.
    pub fn alteration(&self, index: usize) -> String {
        self.offset(Duration::minutes(ALTERATION_OFFSET_MINUTES) + Duration::seconds(index as i64))
    }

    /// Timestamp of the pivot migration at position `index`.
    pub fn pivot(&self, index: usize) -> String {
        self.offset(Duration::minutes(PIVOT_OFFSET_MINUTES) + Duration::seconds(index as i64))
    }

    fn offset(&self, by: Duration) -> String {
        (self.base + by).format(TIMESTAMP_FORMAT).to_string()
    }
}
