use std::fmt;

/// One of the three independent string-table categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Family {
    /// Generic UI strings, `lang.<locale>.json`.
    Generic,
    /// Species names, `pokemon.<locale>.json`.
    Species,
    /// Move names, `moves.<locale>.json`.
    Move,
}

impl Family {
    pub const ALL: [Family; 3] = [Family::Generic, Family::Species, Family::Move];

    /// Filename prefix before `.<locale>.json`.
    pub fn file_prefix(self) -> &'static str {
        match self {
            Family::Generic => "lang",
            Family::Species => "pokemon",
            Family::Move => "moves",
        }
    }

    /// Key of this family's template in the customisation file.
    ///
    /// Generic strings are returned raw and have no template.
    pub fn template_key(self) -> Option<&'static str> {
        match self {
            Family::Generic => None,
            Family::Species => Some("pok_name"),
            Family::Move => Some("move"),
        }
    }

    /// Extracts the locale code if `file_name` is `<prefix>.<locale>.json`.
    pub fn match_file_name(self, file_name: &str) -> Option<&str> {
        let locale = file_name
            .strip_prefix(self.file_prefix())?
            .strip_prefix('.')?
            .strip_suffix(".json")?;
        if locale.is_empty() || locale.contains('.') {
            return None;
        }
        Some(locale)
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Family::Generic => "generic",
            Family::Species => "species",
            Family::Move => "move",
        })
    }
}
