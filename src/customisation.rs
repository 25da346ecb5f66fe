//! User-editable name templates, persisted as `messages.json`.
//!
//! ```json
//! {
//!     "move": "$MOVE_NAME",
//!     "pok_name": "$POKE_NAME (#$POKE_NUMBER)"
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::{ Captures, Regex };
use serde::{ Deserialize, Serialize };
use serde_json::ser::{ Formatter, PrettyFormatter };
use serde_json::{ Map, Value };

use crate::{ Family, LocaleError };

pub const DEFAULT_POKE_TEMPLATE: &str = "$POKE_NAME";
pub const DEFAULT_MOVE_TEMPLATE: &str = "$MOVE_NAME";

/// Templates applied to species and move names.
///
/// The file is kept verbatim as a JSON object: keys are looked up one by
/// one, so a missing or non-string `move`/`pok_name` only fails lookups in
/// that family with [`LocaleError::MissingTemplate`], and keys this crate
/// does not know survive a save.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Customisation {
    entries: Map<String, Value>,
}

impl Default for Customisation {
    fn default() -> Self {
        let mut entries = Map::new();
        entries.insert("move".to_string(), Value::String(DEFAULT_MOVE_TEMPLATE.to_string()));
        entries.insert("pok_name".to_string(), Value::String(DEFAULT_POKE_TEMPLATE.to_string()));
        Self { entries }
    }
}

impl Customisation {
    /// Reads a customisation file. Fails only if it is not a JSON object.
    pub fn read(path: &Path) -> Result<Self, LocaleError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Loads `path`, falling back to the built-in templates when the file is
    /// missing or unreadable. Defaults are never written back.
    pub fn load_or_default(path: &Path) -> Self {
        tracing::info!("Customisation loading.");
        if !path.is_file() {
            tracing::warn!("No customisation file present at '{}'", path.display());
            return Self::default();
        }

        match Self::read(path) {
            Ok(customisation) => {
                tracing::info!("Customisation loaded successfully.");
                customisation
            }
            Err(e) => {
                tracing::error!("Failed to load customisation '{}': {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Writes every key, sorted, one per line as `"key":value`.
    pub fn save(&self, path: &Path) -> Result<(), LocaleError> {
        let mut buf = Vec::new();
        let sorted: BTreeMap<&String, &Value> = self.entries.iter().collect();
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, MessagesFormatter::new());
        sorted.serialize(&mut ser)?;
        fs::write(path, buf)?;
        Ok(())
    }

    /// Raw value stored under `key`, including keys without a family.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Stored template for `family`.
    pub fn template(&self, family: Family) -> Result<&str, LocaleError> {
        let key = family
            .template_key()
            .ok_or_else(|| LocaleError::InvalidTemplate(format!("{family} strings have no template")))?;
        self.entries
            .get(key)
            .and_then(Value::as_str)
            .ok_or(LocaleError::MissingTemplate(key))
    }

    pub fn set_template(&mut self, family: Family, template: impl Into<String>) -> Result<(), LocaleError> {
        let key = family
            .template_key()
            .ok_or_else(|| LocaleError::InvalidTemplate(format!("{family} strings have no template")))?;
        self.entries.insert(key.to_string(), Value::String(template.into()));
        Ok(())
    }
}

/// Pretty output with 4-space indentation and no space after `:`.
struct MessagesFormatter(PrettyFormatter<'static>);

impl MessagesFormatter {
    fn new() -> Self {
        Self(PrettyFormatter::with_indent(b"    "))
    }
}

impl Formatter for MessagesFormatter {
    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_array(writer)
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.0.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_object(writer)
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.0.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b":")
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_object_value(writer)
    }
}

/// Accepts a template handed over as JSON, e.g. from a bot command payload.
pub fn template_from_value(value: &Value) -> Result<&str, LocaleError> {
    value
        .as_str()
        .ok_or_else(|| LocaleError::InvalidTemplate(format!("expected a string, got {value}")))
}

// ---------- Placeholders ----------
static POKE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$POKE_(NAME|NUMBER)").unwrap());
static MOVE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$MOVE_(NAME|NUMBER)").unwrap());

/// Substitutes the family's name and number placeholders in one pass, so a
/// name that itself contains a placeholder is inserted literally.
pub(crate) fn apply_template(family: Family, template: &str, name: &str, id: u32) -> String {
    let re = match family {
        Family::Species => &POKE_RE,
        Family::Move => &MOVE_RE,
        Family::Generic => {
            return template.to_string();
        }
    };

    re.replace_all(template, |caps: &Captures| {
        if &caps[1] == "NAME" { name.to_string() } else { id.to_string() }
    }).into_owned()
}
