use thiserror::Error;

use crate::Family;

/// Errors surfaced by [`LocaleStore`](crate::LocaleStore) lookups and
/// customisation persistence.
///
/// Unreadable locale files are not errors; they are logged while loading
/// and the locale is left out of that family.
#[derive(Debug, Error)]
pub enum LocaleError {
    /// Neither the requested locale nor the default locale has a table in
    /// this family.
    #[error("no {family} table for locale '{locale}' or default locale '{default}'")]
    MissingLocale {
        family: Family,
        locale: String,
        default: String,
    },

    /// The id is absent from both the requested and the default table.
    #[error("{family} entry {id} not found for locale '{locale}' or default locale '{default}'")]
    MissingEntry {
        family: Family,
        id: u32,
        locale: String,
        default: String,
    },

    /// A template override was not a string, or targeted a family that has
    /// no template.
    #[error("invalid template: {0}")]
    InvalidTemplate(String),

    /// The loaded customisation has no template for this family.
    #[error("customisation has no '{0}' template")]
    MissingTemplate(&'static str),

    /// I/O error while persisting the customisation.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error while persisting the customisation.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
