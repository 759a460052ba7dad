//! The persistent store that writing-system definitions are saved into.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// One named set of collation rules.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollationRules {
    /// The name the rule set is listed under.
    pub name: String,
    /// The tailoring rules in ICU syntax.
    pub rules: String,
}

macro_rules! persisted_fields {
    ($($(#[$doc:meta])* $field:ident, $setter:ident: $ty:ty;)*) => {
        $(
            $(#[$doc])*
            pub fn $field(&self) -> &$ty {
                &self.$field
            }

            $(#[$doc])*
            ///
            /// Marks the writing system dirty only if the value changes.
            pub fn $setter(&mut self, value: $ty) {
                if self.$field != value {
                    self.$field = value;
                    self.dirty = true;
                }
            }
        )*
    };
}

/// A writing system as the store keeps it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedWritingSystem {
    locale: String,
    fonts: Vec<String>,
    collations: Vec<CollationRules>,
    valid_chars: String,
    matched_pairs: String,
    punctuation_patterns: String,
    capitalization_info: String,
    quotation_marks: String,
    right_to_left: bool,
    numeric_locale_id: u32,
    keyboard: String,
    spell_check_dictionary: String,
    legacy_mapping: String,
    names: BTreeMap<String, String>,
    abbreviations: BTreeMap<String, String>,
    #[serde(skip)]
    dirty: bool,
}

impl PersistedWritingSystem {
    /// A new, dirty writing system for `locale`.
    pub fn new(locale: &str) -> Self {
        PersistedWritingSystem {
            locale: locale.to_owned(),
            dirty: true,
            ..Self::default()
        }
    }

    persisted_fields! {
        /// The locale string the writing system is stored under.
        locale, set_locale: String;
        /// Font names, default font first.
        fonts, set_fonts: Vec<String>;
        /// Collation rule sets.
        collations, set_collations: Vec<CollationRules>;
        /// The space-separated valid characters.
        valid_chars, set_valid_chars: String;
        /// Matched punctuation pairs.
        matched_pairs, set_matched_pairs: String;
        /// Punctuation patterns.
        punctuation_patterns, set_punctuation_patterns: String;
        /// Capitalization information.
        capitalization_info, set_capitalization_info: String;
        /// Quotation marks.
        quotation_marks, set_quotation_marks: String;
        /// The keyboard to switch to.
        keyboard, set_keyboard: String;
        /// The spell-check dictionary id.
        spell_check_dictionary, set_spell_check_dictionary: String;
        /// The legacy encoding converter name.
        legacy_mapping, set_legacy_mapping: String;
    }

    /// Whether text runs right to left.
    pub fn right_to_left(&self) -> bool {
        self.right_to_left
    }

    /// Sets the direction, marking dirty on change.
    pub fn set_right_to_left(&mut self, value: bool) {
        if self.right_to_left != value {
            self.right_to_left = value;
            self.dirty = true;
        }
    }

    /// The numeric (Windows) locale id.
    pub fn numeric_locale_id(&self) -> u32 {
        self.numeric_locale_id
    }

    /// Sets the numeric locale id, marking dirty on change.
    pub fn set_numeric_locale_id(&mut self, value: u32) {
        if self.numeric_locale_id != value {
            self.numeric_locale_id = value;
            self.dirty = true;
        }
    }

    /// The name displayed to users of `ui_locale`.
    pub fn name(&self, ui_locale: &str) -> Option<&str> {
        self.names.get(ui_locale).map(String::as_str)
    }

    /// Sets the name for `ui_locale`, marking dirty on change.
    pub fn set_name(&mut self, ui_locale: &str, value: &str) {
        if self.name(ui_locale) != Some(value) {
            self.names.insert(ui_locale.to_owned(), value.to_owned());
            self.dirty = true;
        }
    }

    /// The abbreviation displayed to users of `ui_locale`.
    pub fn abbreviation(&self, ui_locale: &str) -> Option<&str> {
        self.abbreviations.get(ui_locale).map(String::as_str)
    }

    /// Sets the abbreviation for `ui_locale`, marking dirty on change.
    pub fn set_abbreviation(&mut self, ui_locale: &str, value: &str) {
        if self.abbreviation(ui_locale) != Some(value) {
            self.abbreviations
                .insert(ui_locale.to_owned(), value.to_owned());
            self.dirty = true;
        }
    }

    /// Whether there are changes the store has not saved.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Marks the writing system as needing a save.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn mark_clean(&mut self) {
        self.dirty = false;
    }
}

/// Where writing systems live between sessions.
pub trait WritingSystemStore {
    /// The writing system stored under `locale`.
    fn get(&self, locale: &str) -> Option<&PersistedWritingSystem>;
    /// The writing system stored under `locale`, mutably.
    fn get_mut(&mut self, locale: &str) -> Option<&mut PersistedWritingSystem>;
    /// The writing system stored under `locale`, created if missing.
    fn create(&mut self, locale: &str) -> &mut PersistedWritingSystem;
    /// Persists every dirty writing system and returns how many there were.
    fn save_all_dirty(&mut self) -> Result<usize>;
}

/// A store that keeps everything in memory.
#[derive(Clone, Debug, Default)]
pub struct InMemoryStore {
    systems: Vec<PersistedWritingSystem>,
    last_saved: Vec<String>,
}

impl InMemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stored writing system.
    pub fn systems(&self) -> &[PersistedWritingSystem] {
        &self.systems
    }

    /// The locales written by the most recent `save_all_dirty`.
    pub fn last_saved(&self) -> &[String] {
        &self.last_saved
    }

    fn dirty_count(&self) -> usize {
        self.systems.iter().filter(|ws| ws.is_dirty()).count()
    }
}

impl WritingSystemStore for InMemoryStore {
    fn get(&self, locale: &str) -> Option<&PersistedWritingSystem> {
        self.systems.iter().find(|ws| ws.locale == locale)
    }

    fn get_mut(&mut self, locale: &str) -> Option<&mut PersistedWritingSystem> {
        self.systems.iter_mut().find(|ws| ws.locale == locale)
    }

    fn create(&mut self, locale: &str) -> &mut PersistedWritingSystem {
        let idx = match self.systems.iter().position(|ws| ws.locale == locale) {
            Some(idx) => idx,
            None => {
                self.systems.push(PersistedWritingSystem::new(locale));
                self.systems.len() - 1
            }
        };
        &mut self.systems[idx]
    }

    fn save_all_dirty(&mut self) -> Result<usize> {
        self.last_saved.clear();
        for ws in self.systems.iter_mut().filter(|ws| ws.is_dirty()) {
            ws.mark_clean();
            self.last_saved.push(ws.locale.clone());
        }
        log::debug!("saved writing systems {:?}", self.last_saved);
        Ok(self.last_saved.len())
    }
}

/// A store persisted as one JSON file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    inner: InMemoryStore,
}

impl JsonFileStore {
    /// Opens the store at `path`, starting empty if the file does not exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let systems = if path.exists() {
            serde_json::from_str(&fs::read_to_string(&path)?)?
        } else {
            Vec::new()
        };
        Ok(JsonFileStore {
            path,
            inner: InMemoryStore {
                systems,
                last_saved: Vec::new(),
            },
        })
    }

    /// Every stored writing system.
    pub fn systems(&self) -> &[PersistedWritingSystem] {
        self.inner.systems()
    }
}

impl WritingSystemStore for JsonFileStore {
    fn get(&self, locale: &str) -> Option<&PersistedWritingSystem> {
        self.inner.get(locale)
    }

    fn get_mut(&mut self, locale: &str) -> Option<&mut PersistedWritingSystem> {
        self.inner.get_mut(locale)
    }

    fn create(&mut self, locale: &str) -> &mut PersistedWritingSystem {
        self.inner.create(locale)
    }

    fn save_all_dirty(&mut self) -> Result<usize> {
        if self.inner.dirty_count() == 0 {
            return Ok(0);
        }
        let json = serde_json::to_string_pretty(&self.inner.systems)?;
        fs::write(&self.path, json)?;
        self.inner.save_all_dirty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setters_mark_dirty_only_on_change() {
        let mut ws = PersistedWritingSystem::new("en");
        ws.mark_clean();
        ws.set_valid_chars(String::new());
        assert!(!ws.is_dirty());
        ws.set_valid_chars("a b".to_owned());
        assert!(ws.is_dirty());
        ws.mark_clean();
        ws.set_name("en", "English");
        assert!(ws.is_dirty());
        ws.mark_clean();
        ws.set_name("en", "English");
        assert!(!ws.is_dirty());
    }

    #[test]
    fn test_save_all_dirty() {
        let mut store = InMemoryStore::new();
        store.create("en");
        store.create("fr");
        assert_eq!(2, store.save_all_dirty().unwrap());
        assert_eq!(0, store.save_all_dirty().unwrap());
        store.get_mut("fr").unwrap().set_right_to_left(true);
        assert_eq!(1, store.save_all_dirty().unwrap());
        assert_eq!(vec!["fr".to_owned()], store.last_saved());
    }

    #[test]
    fn test_create_returns_existing() {
        let mut store = InMemoryStore::new();
        store.create("en").set_keyboard("US".to_owned());
        assert_eq!("US", store.create("en").keyboard());
        assert_eq!(1, store.systems().len());
    }
}
