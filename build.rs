use std::error::Error;
use std::{ fs, path::Path, path::PathBuf };
use serde_json::{ Value, Map };
use anyhow::Result;

const LOCALES_DIR: &str = "Locales";
const CUSTOMISATION_FILE: &str = "messages.json";
const FAMILIES: [&str; 3] = ["pokemon", "moves", "lang"];

fn main() -> Result<(), Box<dyn Error>> {
    // Look for a Locales directory in the consuming project
    let locales_dir = find_locales_directory()?;
    let out_path = Path::new(&std::env::var("OUT_DIR")?).join("bundled_locales.json");

    // Always create the file, even if empty, so include_str! works
    if !locales_dir.exists() {
        fs::write(out_path, "{}")?;
        return Ok(());
    }

    let bundle = build_bundle(&locales_dir)?;
    fs::write(out_path, serde_json::to_string(&bundle)?)?;

    println!("cargo:rerun-if-changed={}", locales_dir.display());
    Ok(())
}

fn build_bundle(locales_dir: &Path) -> Result<Value> {
    let mut families: Map<String, Value> = FAMILIES
        .iter()
        .map(|family| (family.to_string(), Value::Object(Map::new())))
        .collect();
    let mut bundle = Map::new();

    for entry in fs::read_dir(locales_dir)? {
        let file = entry?;
        if !file.path().is_file() {
            continue;
        }
        let file_name = file.file_name().to_string_lossy().to_string();

        if file_name == CUSTOMISATION_FILE {
            match read_json(&file.path()) {
                Ok(json) => {
                    bundle.insert("messages".to_string(), json);
                }
                Err(e) => println!("cargo:warning=Skipping {}: {}", file_name, e),
            }
            continue;
        }

        let Some((family, locale)) = split_locale_file(&file_name) else {
            continue;
        };

        match read_json(&file.path()) {
            Ok(json) => {
                if let Some(Value::Object(tables)) = families.get_mut(family) {
                    tables.insert(locale.to_string(), json);
                }
            }
            Err(e) => println!("cargo:warning=Skipping {}: {}", file_name, e),
        }
    }

    bundle.extend(families);
    Ok(Value::Object(bundle))
}

// `<family>.<locale>.json` -> (family, locale)
fn split_locale_file(file_name: &str) -> Option<(&'static str, &str)> {
    let stem = file_name.strip_suffix(".json")?;
    let (prefix, locale) = stem.split_once('.')?;
    let family = FAMILIES.iter().copied().find(|f| *f == prefix)?;
    if locale.is_empty() || locale.contains('.') {
        return None;
    }
    Some((family, locale))
}

fn read_json(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn find_locales_directory() -> Result<PathBuf> {
    // Walk up from the build output towards the workspace root
    if let Ok(out_dir) = std::env::var("OUT_DIR") {
        let mut current = Path::new(&out_dir)
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Invalid out dir"))?
            .to_path_buf();
        loop {
            let locales_path = current.join(LOCALES_DIR);
            if locales_path.is_dir() {
                return Ok(locales_path);
            }

            if !current.pop() {
                break;
            }
        }
    }

    // Try current working directory and its parents
    let mut current = std::env::current_dir()?;
    loop {
        let locales_path = current.join(LOCALES_DIR);
        if locales_path.is_dir() {
            return Ok(locales_path);
        }

        if !current.pop() {
            break;
        }
    }

    // Fallback to Locales in current directory (even if it doesn't exist)
    Ok(Path::new(LOCALES_DIR).to_path_buf())
}
