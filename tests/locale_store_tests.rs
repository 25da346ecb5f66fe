use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use poke_locales::{ Customisation, Family, LocaleError, LocaleStore, LocaleStoreConfig };
use rstest::{ fixture, rstest };
use serde_json::json;
use tempfile::TempDir;

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

/// en is complete, de lacks moves, ja only has species names.
#[fixture]
fn locales_dir() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    write(dir, "lang.en.json", r#"{"1": "Hello", "2": "Goodbye"}"#);
    write(dir, "lang.de.json", r#"{"1": "Hallo"}"#);
    write(dir, "pokemon.en.json", r#"{"1": "Bulbasaur", "25": "Pikachu"}"#);
    write(dir, "pokemon.de.json", r#"{"1": "Bisasam"}"#);
    write(dir, "pokemon.ja.json", r#"{"1": "フシギダネ", "25": "ピカチュウ"}"#);
    write(dir, "moves.en.json", r#"{"1": "Pound", "33": "Tackle"}"#);
    temp_dir
}

#[rstest]
fn get_string_uses_requested_locale(locales_dir: TempDir) {
    let store = LocaleStore::from_dir(locales_dir.path());
    assert_eq!(store.default_locale(), "en");
    assert_eq!(store.get_string("de", 1).unwrap(), "Hallo");
}

#[rstest]
#[case::unknown_locale("fr", 1, "Hello")]
#[case::missing_id("de", 2, "Goodbye")]
#[case::species_only_locale("ja", 2, "Goodbye")]
fn get_string_falls_back_to_default(
    locales_dir: TempDir,
    #[case] locale: &str,
    #[case] id: u32,
    #[case] expected: &str
) {
    let store = LocaleStore::from_dir(locales_dir.path());
    assert_eq!(store.get_string(locale, id).unwrap(), expected);
}

#[rstest]
fn get_string_missing_everywhere(locales_dir: TempDir) {
    let store = LocaleStore::from_dir(locales_dir.path());
    let err = store.get_string("de", 404).unwrap_err();
    assert!(
        matches!(err, LocaleError::MissingEntry { family: Family::Generic, id: 404, .. }),
        "unexpected error: {err}"
    );
}

#[rstest]
fn species_names_contain_name_and_number(locales_dir: TempDir) {
    let store = LocaleStore::from_dir(locales_dir.path());
    let template = Some("$POKE_NAME (#$POKE_NUMBER)");

    assert_eq!(store.get_pokemon_name("en", 25, template).unwrap(), "Pikachu (#25)");
    assert_eq!(store.get_pokemon_name("ja", 25, template).unwrap(), "ピカチュウ (#25)");
    assert_eq!(store.get_pokemon_name("de", 1, None).unwrap(), "Bisasam");
    // de has no #25, falls back to en
    assert_eq!(store.get_pokemon_name("de", 25, None).unwrap(), "Pikachu");
}

#[rstest]
fn stored_template_formats_names(locales_dir: TempDir) {
    write(
        locales_dir.path(),
        "messages.json",
        r##"{"move": "$MOVE_NAME [$MOVE_NUMBER]", "pok_name": "#$POKE_NUMBER $POKE_NAME"}"##
    );
    let store = LocaleStore::from_dir(locales_dir.path());

    assert_eq!(store.get_pokemon_name("en", 25, None).unwrap(), "#25 Pikachu");
    assert_eq!(store.get_move("de", 33, None).unwrap(), "Tackle [33]");
}

#[rstest]
fn override_does_not_leak(locales_dir: TempDir) {
    let store = LocaleStore::from_dir(locales_dir.path());

    assert_eq!(store.get_move("en", 1, Some("<$MOVE_NAME>")).unwrap(), "<Pound>");
    assert_eq!(store.get_move("en", 1, None).unwrap(), "Pound");

    assert!(store.get_pokemon_name("en", 999, Some("broken $POKE_NAME")).is_err());
    assert_eq!(store.get_pokemon_name("en", 1, None).unwrap(), "Bulbasaur");
    assert_eq!(store.customisation(), &Customisation::default());
}

#[rstest]
fn json_override_must_be_string(locales_dir: TempDir) {
    let store = LocaleStore::from_dir(locales_dir.path());

    let payload = json!({ "template": "$MOVE_NAME!" });
    let template = poke_locales::template_from_value(&payload["template"]).unwrap();
    assert_eq!(store.get_move("en", 33, Some(template)).unwrap(), "Tackle!");

    assert!(matches!(
        poke_locales::template_from_value(&json!(["$MOVE_NAME"])),
        Err(LocaleError::InvalidTemplate(_))
    ));
}

#[rstest]
fn missing_template_key_is_reported(locales_dir: TempDir) {
    write(locales_dir.path(), "messages.json", r#"{"pok_name": "$POKE_NAME"}"#);
    let store = LocaleStore::from_dir(locales_dir.path());

    assert_eq!(store.get_pokemon_name("en", 1, None).unwrap(), "Bulbasaur");
    assert!(matches!(store.get_move("en", 1, None), Err(LocaleError::MissingTemplate("move"))));
    assert_eq!(store.get_move("en", 1, Some("$MOVE_NAME")).unwrap(), "Pound");
}

#[rstest]
fn list_locales_complete_and_partial(locales_dir: TempDir) {
    let store = LocaleStore::from_dir(locales_dir.path());

    let complete = store.list_locales(true);
    let partial = store.list_locales(false);

    assert_eq!(complete, BTreeSet::from(["en".to_string()]));
    assert_eq!(partial, BTreeSet::from(["de".to_string(), "en".to_string(), "ja".to_string()]));
    assert!(complete.is_subset(&partial));
}

#[rstest]
fn list_locales_equal_when_all_complete(locales_dir: TempDir) {
    let dir = locales_dir.path();
    fs::remove_file(dir.join("pokemon.ja.json")).unwrap();
    write(dir, "moves.de.json", r#"{"1": "Klaps"}"#);
    let store = LocaleStore::from_dir(dir);

    assert_eq!(store.list_locales(true), store.list_locales(false));
}

#[rstest]
fn bad_file_only_drops_its_family(locales_dir: TempDir) {
    let dir = locales_dir.path();
    write(dir, "moves.de.json", "{ broken");
    write(dir, "lang.ja.json", r#"{"1": 5}"#);
    let store = LocaleStore::from_dir(dir);

    assert!(store.list_locales(false).contains("de"));
    assert_eq!(store.get_move("de", 33, None).unwrap(), "Tackle");
    assert_eq!(store.get_string("ja", 1).unwrap(), "Hello");
    assert_eq!(store.get_pokemon_name("de", 1, None).unwrap(), "Bisasam");
}

#[rstest]
fn unrelated_files_are_ignored(locales_dir: TempDir) {
    let dir = locales_dir.path();
    write(dir, "pokemon.json", r#"{"1": "nope"}"#);
    write(dir, "notes.txt", "not a locale");
    fs::create_dir(dir.join("lang.xx.json.d")).unwrap();
    let store = LocaleStore::from_dir(dir);

    assert_eq!(store.list_locales(false).len(), 3);
}

#[test]
fn default_falls_back_to_smallest_locale() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    write(dir, "lang.fr.json", r#"{"1": "Bonjour"}"#);
    write(dir, "lang.de.json", r#"{"1": "Hallo"}"#);
    write(dir, "moves.it.json", r#"{"1": "Botta"}"#);
    let store = LocaleStore::from_dir(dir);

    assert_eq!(store.default_locale(), "de");
    assert_eq!(store.get_string("en", 1).unwrap(), "Hallo");
}

#[test]
fn configured_default_lang_is_preferred() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    write(dir, "lang.en.json", r#"{"1": "Hello"}"#);
    write(dir, "lang.fr.json", r#"{"1": "Bonjour"}"#);
    let store = LocaleStore::with_config(LocaleStoreConfig {
        use_bundled_translations: false,
        locales_folder: dir.to_path_buf(),
        default_lang: "fr".to_string(),
        ..Default::default()
    });

    assert_eq!(store.default_locale(), "fr");
    assert_eq!(store.get_string("es", 1).unwrap(), "Bonjour");
}

#[test]
fn missing_folder_gives_empty_store() {
    let temp_dir = TempDir::new().unwrap();
    let store = LocaleStore::from_dir(temp_dir.path().join("does-not-exist"));

    assert_eq!(store.default_locale(), "en");
    assert!(store.list_locales(false).is_empty());
    assert!(matches!(store.get_string("en", 1), Err(LocaleError::MissingLocale { .. })));
    assert_eq!(store.customisation(), &Customisation::default());
}

#[rstest]
fn defaults_are_not_written_to_disk(locales_dir: TempDir) {
    let _store = LocaleStore::from_dir(locales_dir.path());
    assert!(!locales_dir.path().join("messages.json").exists());
}

#[rstest]
fn customisation_save_and_reload(locales_dir: TempDir) {
    let mut store = LocaleStore::from_dir(locales_dir.path());
    store.set_template(Family::Species, "$POKE_NAME (#$POKE_NUMBER)").unwrap();
    store.set_template(Family::Move, "* $MOVE_NAME").unwrap();
    store.save_customisation().unwrap();

    let reloaded = LocaleStore::from_dir(locales_dir.path());
    assert_eq!(reloaded.customisation(), store.customisation());
    assert_eq!(reloaded.get_pokemon_name("en", 25, None).unwrap(), "Pikachu (#25)");
    assert_eq!(reloaded.get_move("en", 33, None).unwrap(), "* Tackle");
}

#[rstest]
fn resolve_locale_returns_default_table(locales_dir: TempDir) {
    let store = LocaleStore::from_dir(locales_dir.path());

    let table = store.resolve_locale("ja", Family::Move).unwrap();
    assert_eq!(table.get("33").map(String::as_str), Some("Tackle"));

    let table = store.resolve_locale("ja", Family::Species).unwrap();
    assert_eq!(table.get("25").map(String::as_str), Some("ピカチュウ"));
}

#[test]
fn unreadable_lang_file_still_sets_default() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    write(dir, "lang.en.json", "{ broken");
    write(dir, "lang.de.json", r#"{"1": "Hallo"}"#);
    write(dir, "pokemon.en.json", r#"{"25": "Pikachu"}"#);
    write(dir, "pokemon.de.json", r#"{"25": "Pikachu-DE"}"#);
    let store = LocaleStore::from_dir(dir);

    assert_eq!(store.default_locale(), "en");
    assert_eq!(store.get_pokemon_name("fr", 25, None).unwrap(), "Pikachu");
    assert_eq!(store.get_string("de", 1).unwrap(), "Hallo");
    assert!(matches!(store.get_string("fr", 1), Err(LocaleError::MissingLocale { .. })));
}

#[rstest]
fn bad_template_key_keeps_the_rest_of_the_file(locales_dir: TempDir) {
    let dir = locales_dir.path();
    write(dir, "messages.json", r#"{"move": 5, "pok_name": "<$POKE_NAME>", "extra": true}"#);
    let mut store = LocaleStore::from_dir(dir);

    assert_eq!(store.get_pokemon_name("en", 25, None).unwrap(), "<Pikachu>");
    assert!(matches!(store.get_move("en", 33, None), Err(LocaleError::MissingTemplate("move"))));

    store.set_template(Family::Move, "$MOVE_NAME").unwrap();
    store.save_customisation().unwrap();

    let saved: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.join("messages.json")).unwrap()).unwrap();
    assert_eq!(saved, json!({ "extra": true, "move": "$MOVE_NAME", "pok_name": "<$POKE_NAME>" }));

    let reloaded = LocaleStore::from_dir(dir);
    assert_eq!(reloaded.get_move("en", 33, None).unwrap(), "Tackle");
    assert_eq!(reloaded.get_pokemon_name("en", 25, None).unwrap(), "<Pikachu>");
}
