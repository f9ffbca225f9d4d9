//! Flat key-value translation lookup with a fallback chain.
//!
//! Lookups walk `locale -> default locale -> key itself`, so a missing
//! translation degrades to the raw key rather than an error.

use std::collections::HashMap;
use std::path::Path;

use log::error;
use log::info;
use serde_json::Value;

const DEFAULT_LOCALE: &str = "en";
const EMBEDDED_EN: &str = include_str!("../../translations/en.json");

pub struct Translator {
    locales: HashMap<String, Value>,
    locale: String,
}

impl Translator {
    /// Builds a translator backed by the embedded English table.
    pub fn new(locale: &str) -> Self {
        let mut locales = HashMap::new();
        match serde_json::from_str(EMBEDDED_EN) {
            Ok(table) => {
                locales.insert(DEFAULT_LOCALE.to_string(), table);
            }
            Err(e) => error!("Embedded translation table is invalid: {}", e),
        }
        Self {
            locales,
            locale: locale.to_string(),
        }
    }

    /// Loads every `<locale>.json` file from a directory on top of the
    /// embedded defaults. Unreadable files are skipped with an error log.
    pub fn load_dir(dir: &Path, locale: &str) -> Self {
        let mut translator = Self::new(locale);

        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                error!(
                    "Could not read translations directory '{}': {}",
                    dir.to_string_lossy(),
                    e
                );
                return translator;
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match std::fs::read_to_string(&path).map_err(|e| e.to_string()).and_then(|content| {
                serde_json::from_str::<Value>(&content).map_err(|e| e.to_string())
            }) {
                Ok(table) => {
                    translator.locales.insert(name.to_string(), table);
                }
                Err(e) => error!(
                    "Skipping translation file '{}': {}",
                    path.to_string_lossy(),
                    e
                ),
            }
        }

        info!("Loaded {} translation locale(s).", translator.locales.len());
        translator
    }

    /// Resolves a translation, falling back to the default locale, then to
    /// the key itself.
    pub fn translate(&self, namespace: &str, category: &str, key: &str) -> String {
        self.lookup(&self.locale, namespace, category, key)
            .or_else(|| self.lookup(DEFAULT_LOCALE, namespace, category, key))
            .unwrap_or_else(|| key.to_string())
    }

    fn lookup(&self, locale: &str, namespace: &str, category: &str, key: &str) -> Option<String> {
        self.locales
            .get(locale)?
            .get(namespace)?
            .get(category)?
            .get(key)?
            .as_str()
            .map(|s| s.to_string())
    }
}
