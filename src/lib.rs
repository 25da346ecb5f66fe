#![doc = include_str!("../README.md")]

//! # poke-locales
//!
//! Localized lookup of Pokémon species names, move names and generic UI strings:
//!
//! - **Three families**: `pokemon.<locale>.json`, `moves.<locale>.json`, `lang.<locale>.json`
//! - **Partial translations**: a locale may ship any subset of the families
//! - **Fallback System**: missing locales and missing ids fall back to the default locale
//! - **Customisation**: user templates from `messages.json` with `$POKE_NAME`/`$POKE_NUMBER`
//!   and `$MOVE_NAME`/`$MOVE_NUMBER` placeholders
//! - **Flexible Loading**: filesystem, or bundled at build time with `features = ["bundle-only"]`
//! - **Bevy**: optional `LocalesPlugin` behind the `bevy` feature
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use poke_locales::LocaleStore;
//!
//! let store = LocaleStore::from_dir("Locales");
//! println!("{}", store.get_pokemon_name("de", 25, None)?);
//! println!("{}", store.get_move("de", 33, Some("$MOVE_NAME (#$MOVE_NUMBER)"))?);
//! # Ok::<(), poke_locales::LocaleError>(())
//! ```

mod customisation;
mod error;
mod family;
#[cfg(feature = "bevy")]
mod plugin;

use std::collections::{ BTreeSet, HashMap };
use std::fs;
use std::path::{ Path, PathBuf };

use serde::Deserialize;
use serde_json::Value;

pub use customisation::{
    Customisation,
    DEFAULT_MOVE_TEMPLATE,
    DEFAULT_POKE_TEMPLATE,
    template_from_value,
};
pub use error::LocaleError;
pub use family::Family;
#[cfg(feature = "bevy")]
pub use plugin::LocalesPlugin;

use customisation::apply_template;

/// Folder name looked up next to the running executable.
pub const LOCALES_DIR: &str = "Locales";
/// Locale preferred as default when its `lang.<locale>.json` is present.
pub const DEFAULT_LANG: &str = "en";
pub const CUSTOMISATION_FILE: &str = "messages.json";

/// Entry id (as string) to localized text, for one locale in one family.
pub type StringTable = HashMap<String, String>;
/// Locale code to that locale's table.
type LocaleMap = HashMap<String, StringTable>;

/// Configuration for [`LocaleStore`].
///
/// Controls where locale files are read from and which locale is preferred
/// as the default.
///
/// # Example
///
/// ```rust
/// use poke_locales::LocaleStoreConfig;
///
/// let config = LocaleStoreConfig {
///     locales_folder: "assets/Locales".into(),
///     default_lang: "de".to_string(),
///     ..Default::default()
/// };
/// assert_eq!(config.customisation_file, "messages.json");
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "bevy", derive(bevy::prelude::Resource))]
pub struct LocaleStoreConfig {
    /// Whether to use bundled locales (true) or filesystem loading (false).
    /// Defaults to `true` for WASM targets or when `bundle-only` is enabled.
    pub use_bundled_translations: bool,
    /// Directory containing the locale files and the customisation file.
    /// Default: `Locales` next to the running executable
    pub locales_folder: PathBuf,
    /// Preferred default locale.
    /// Default: "en"
    pub default_lang: String,
    /// Customisation file name inside `locales_folder`.
    /// Default: "messages.json"
    pub customisation_file: String,
}

impl Default for LocaleStoreConfig {
    fn default() -> Self {
        Self {
            use_bundled_translations: cfg!(target_arch = "wasm32") || cfg!(feature = "bundle-only"),
            locales_folder: default_locales_folder(),
            default_lang: DEFAULT_LANG.to_string(),
            customisation_file: CUSTOMISATION_FILE.to_string(),
        }
    }
}

impl LocaleStoreConfig {
    pub fn customisation_path(&self) -> PathBuf {
        self.locales_folder.join(&self.customisation_file)
    }
}

fn default_locales_folder() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(LOCALES_DIR)))
        .unwrap_or_else(|| PathBuf::from(LOCALES_DIR))
}

/// The three families of tables, each keyed by locale.
#[derive(Debug, Clone, Default)]
struct LocaleTables {
    strings: LocaleMap,
    pokemon_names: LocaleMap,
    move_names: LocaleMap,
    /// Locales whose `lang.<locale>.json` was seen, loaded or not.
    generic_files_found: BTreeSet<String>,
}

impl LocaleTables {
    fn get(&self, family: Family) -> &LocaleMap {
        match family {
            Family::Generic => &self.strings,
            Family::Species => &self.pokemon_names,
            Family::Move => &self.move_names,
        }
    }

    fn get_mut(&mut self, family: Family) -> &mut LocaleMap {
        match family {
            Family::Generic => &mut self.strings,
            Family::Species => &mut self.pokemon_names,
            Family::Move => &mut self.move_names,
        }
    }

    fn locale_sets(&self) -> impl Iterator<Item = BTreeSet<&String>> {
        Family::ALL.into_iter().map(move |family| self.get(family).keys().collect())
    }
}

/// Localized string store.
///
/// Holds every loaded table plus the default locale and the customisation
/// templates. All lookups take `&self`; template overrides are per call.
///
/// # Example
///
/// ```rust,no_run
/// use poke_locales::{ Family, LocaleStore };
///
/// let store = LocaleStore::new();
/// for locale in store.list_locales(true) {
///     let name = store.get_pokemon_name(&locale, 1, Some("$POKE_NAME #$POKE_NUMBER"))?;
///     println!("{locale}: {name}");
/// }
/// let table = store.resolve_locale("xx", Family::Generic)?;
/// println!("{} generic strings in the fallback table", table.len());
/// # Ok::<(), poke_locales::LocaleError>(())
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "bevy", derive(bevy::prelude::Resource))]
pub struct LocaleStore {
    tables: LocaleTables,
    default_locale: String,
    customisation: Customisation,
    customisation_path: PathBuf,
}

// ---------- Loaders ----------

impl LocaleStore {
    /// Loads from `Locales/` next to the running executable (or the bundle
    /// when bundled loading is the default for this build).
    pub fn new() -> Self {
        Self::with_config(LocaleStoreConfig::default())
    }

    /// Loads every locale file found directly inside `dir`.
    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        Self::with_config(LocaleStoreConfig {
            use_bundled_translations: false,
            locales_folder: dir.into(),
            ..Default::default()
        })
    }

    /// Loads the locale files bundled by the build script.
    pub fn bundled() -> Self {
        Self::with_config(LocaleStoreConfig {
            use_bundled_translations: true,
            ..Default::default()
        })
    }

    pub fn with_config(config: LocaleStoreConfig) -> Self {
        if config.use_bundled_translations {
            load_bundled_locales(config)
        } else {
            load_filesystem_locales(config)
        }
    }

    fn assemble(tables: LocaleTables, customisation: Customisation, config: LocaleStoreConfig) -> Self {
        let default_locale = pick_default_locale(&tables, &config.default_lang);
        Self {
            tables,
            default_locale,
            customisation,
            customisation_path: config.customisation_path(),
        }
    }
}

// Loading from filesystem
fn load_filesystem_locales(config: LocaleStoreConfig) -> LocaleStore {
    let tables = read_locale_dir(&config.locales_folder);
    let customisation = Customisation::load_or_default(&config.customisation_path());
    LocaleStore::assemble(tables, customisation, config)
}

fn read_locale_dir(dir: &Path) -> LocaleTables {
    let mut tables = LocaleTables::default();

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::error!("Failed to read locales folder '{}': {}", dir.display(), e);
            return tables;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::error!("Failed to read entry in '{}': {}", dir.display(), e);
                continue;
            }
        };
        let file_name = entry.file_name().to_string_lossy().to_string();

        for family in Family::ALL {
            let Some(locale) = family.match_file_name(&file_name) else {
                continue;
            };
            tracing::info!("Reading {} names. <{}>", family, locale);
            if family == Family::Generic {
                tables.generic_files_found.insert(locale.to_string());
            }
            match read_table(&entry.path()) {
                Ok(table) => {
                    tables.get_mut(family).insert(locale.to_string(), table);
                }
                Err(e) => {
                    // The locale is left out of this family only.
                    tracing::error!("Failed to load '{}': {}", file_name, e);
                }
            }
        }
    }

    tables
}

fn read_table(path: &Path) -> Result<StringTable, LocaleError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

// Loading from bundled locales (generated by build.rs)
const BUNDLED_LOCALES: &str = include_str!(concat!(env!("OUT_DIR"), "/bundled_locales.json"));

/// Shape of `bundled_locales.json`. Tables stay raw until decoded so a bad
/// table only drops its own locale.
#[derive(Debug, Default, Deserialize)]
struct Bundle {
    #[serde(default)]
    pokemon: HashMap<String, Value>,
    #[serde(default)]
    moves: HashMap<String, Value>,
    #[serde(default)]
    lang: HashMap<String, Value>,
    #[serde(default)]
    messages: Option<Value>,
}

impl Bundle {
    fn parse(raw: &str) -> Self {
        serde_json::from_str(raw).unwrap_or_else(|e| {
            tracing::error!("Failed to parse bundled locales: {}", e);
            Self::default()
        })
    }

    fn is_empty(&self) -> bool {
        self.pokemon.is_empty() && self.moves.is_empty() && self.lang.is_empty()
    }

    fn into_parts(self) -> (LocaleTables, Customisation) {
        let mut tables = LocaleTables::default();
        for (family, raw) in [
            (Family::Generic, self.lang),
            (Family::Species, self.pokemon),
            (Family::Move, self.moves),
        ] {
            for (locale, table) in raw {
                if family == Family::Generic {
                    tables.generic_files_found.insert(locale.clone());
                }
                match serde_json::from_value::<StringTable>(table) {
                    Ok(table) => {
                        tables.get_mut(family).insert(locale, table);
                    }
                    Err(e) => {
                        tracing::error!("Bundled {} table for '{}' is invalid: {}", family, locale, e);
                    }
                }
            }
        }

        let customisation = match self.messages {
            Some(raw) => serde_json::from_value(raw).unwrap_or_else(|e| {
                tracing::error!("Bundled customisation is invalid: {}", e);
                Customisation::default()
            }),
            None => {
                tracing::warn!("No customisation file bundled.");
                Customisation::default()
            }
        };

        (tables, customisation)
    }
}

fn load_bundled_locales(config: LocaleStoreConfig) -> LocaleStore {
    let bundle = Bundle::parse(BUNDLED_LOCALES);
    if bundle.is_empty() {
        // Nothing was bundled, fall back to filesystem
        return load_filesystem_locales(config);
    }
    let (tables, customisation) = bundle.into_parts();
    LocaleStore::assemble(tables, customisation, config)
}

/// The preferred locale if its generic strings file was found, otherwise
/// the smallest locale code found in any family.
fn pick_default_locale(tables: &LocaleTables, preferred: &str) -> String {
    if tables.generic_files_found.contains(preferred) || tables.strings.contains_key(preferred) {
        return preferred.to_string();
    }

    let known: BTreeSet<&String> = tables.locale_sets().flatten().collect();
    match known.first() {
        Some(locale) => {
            tracing::warn!("Default locale '{}' not found, using '{}'", preferred, locale);
            locale.to_string()
        }
        None => {
            tracing::warn!("No locale files found, keeping '{}' as default", preferred);
            preferred.to_string()
        }
    }
}

// ---------- API ----------

impl LocaleStore {
    /// Locale used when a requested locale or id is missing.
    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    pub fn customisation(&self) -> &Customisation {
        &self.customisation
    }

    /// Returns `family`'s table for `locale`, or the default locale's table
    /// when `locale` has none.
    pub fn resolve_locale(&self, locale: &str, family: Family) -> Result<&StringTable, LocaleError> {
        let tables = self.tables.get(family);
        tables
            .get(locale)
            .or_else(|| tables.get(&self.default_locale))
            .ok_or_else(|| LocaleError::MissingLocale {
                family,
                locale: locale.to_string(),
                default: self.default_locale.clone(),
            })
    }

    /// Gets a generic string. Falls back to the default locale when the id
    /// is missing from the requested locale.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # let store = poke_locales::LocaleStore::new();
    /// // lang.en.json: {"1": "Hello"}, lang.de.json: {"1": "Hallo"}
    /// assert_eq!(store.get_string("de", 1)?, "Hallo");
    /// assert_eq!(store.get_string("fr", 1)?, "Hello");
    /// # Ok::<(), poke_locales::LocaleError>(())
    /// ```
    pub fn get_string(&self, locale: &str, id: u32) -> Result<&str, LocaleError> {
        self.lookup(locale, Family::Generic, id)
    }

    /// Gets a species name formatted with the `pok_name` template, or with
    /// `template` when given.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # let store = poke_locales::LocaleStore::new();
    /// // pokemon.en.json: {"25": "Pikachu"}
    /// let name = store.get_pokemon_name("en", 25, Some("$POKE_NAME (#$POKE_NUMBER)"))?;
    /// assert_eq!(name, "Pikachu (#25)");
    /// # Ok::<(), poke_locales::LocaleError>(())
    /// ```
    pub fn get_pokemon_name(&self, locale: &str, id: u32, template: Option<&str>) -> Result<String, LocaleError> {
        self.format_name(Family::Species, locale, id, template)
    }

    /// Gets a move name formatted with the `move` template, or with
    /// `template` when given.
    pub fn get_move(&self, locale: &str, id: u32, template: Option<&str>) -> Result<String, LocaleError> {
        self.format_name(Family::Move, locale, id, template)
    }

    /// Locale codes with data in every family (`complete_only`), or in at
    /// least one family.
    pub fn list_locales(&self, complete_only: bool) -> BTreeSet<String> {
        let mut sets = self.tables.locale_sets();
        let first = sets.next().unwrap_or_default();
        let locales = if complete_only {
            sets.fold(first, |acc, set| acc.intersection(&set).copied().collect())
        } else {
            sets.fold(first, |mut acc, set| {
                acc.extend(set);
                acc
            })
        };
        locales.into_iter().cloned().collect()
    }

    /// Replaces the stored template for `family`. Use
    /// [`save_customisation`](Self::save_customisation) to persist it.
    pub fn set_template(&mut self, family: Family, template: impl Into<String>) -> Result<(), LocaleError> {
        self.customisation.set_template(family, template)
    }

    /// Writes the current templates to the customisation file.
    pub fn save_customisation(&self) -> Result<(), LocaleError> {
        tracing::info!("Customisation saving.");
        match self.customisation.save(&self.customisation_path) {
            Ok(()) => {
                tracing::info!("Customisation saved to '{}'", self.customisation_path.display());
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Error while saving customisation: {}", e);
                Err(e)
            }
        }
    }

    fn lookup(&self, locale: &str, family: Family, id: u32) -> Result<&str, LocaleError> {
        let key = id.to_string();
        if let Some(text) = self.resolve_locale(locale, family)?.get(&key) {
            return Ok(text.as_str());
        }

        self.tables
            .get(family)
            .get(&self.default_locale)
            .and_then(|table| table.get(&key))
            .map(String::as_str)
            .ok_or_else(|| LocaleError::MissingEntry {
                family,
                id,
                locale: locale.to_string(),
                default: self.default_locale.clone(),
            })
    }

    fn format_name(&self, family: Family, locale: &str, id: u32, template: Option<&str>) -> Result<String, LocaleError> {
        let name = self.lookup(locale, family, id)?;
        let template = match template {
            Some(template) => template,
            None => self.customisation.template(family)?,
        };
        Ok(apply_template(family, template, name, id))
    }
}
