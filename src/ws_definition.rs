//! The writing-system definition: a locale, its custom characters and the
//! metadata an editor needs to display and validate text in it.

use crate::char_unit::{
    parse_delimited_character_list, segment_character_units, CategoryOverrides, CharacterList,
};
use crate::custom_pua::CustomPuaSet;
use crate::error::{Error, Result};
use crate::locale_id::{title_case_script, LocaleIdentifier, LocalePart};
use crate::provider::UnicodePropertyProvider;
use crate::pua_char_ty::CustomCharacterRecord;
use crate::ws_store::{CollationRules, WritingSystemStore};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

const DEFAULT_UI_LOCALE: &str = "en";

/// How far a definition has come in being set up.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum InitState {
    /// No locale has been assigned yet.
    #[default]
    Uninitialized,
    /// Fields are being copied in from a store.
    Initializing,
    /// A locale is assigned; display names follow their parts.
    Ready,
}

macro_rules! definition_fields {
    ($($(#[$doc:meta])* $field:ident, $setter:ident: $ty:ty;)*) => {
        $(
            $(#[$doc])*
            pub fn $field(&self) -> &$ty {
                &self.$field
            }

            $(#[$doc])*
            pub fn $setter(&mut self, value: $ty) {
                self.$field = value;
            }
        )*
    };
}

/// A writing system as it is being edited.
///
/// Changes stay local until [`save_to_store`](Self::save_to_store) copies
/// them onto the persisted writing system.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WritingSystemDefinition {
    locale: Option<String>,
    original_locale: Option<String>,
    #[serde(skip)]
    state: InitState,
    ui_locale: String,
    language_name: String,
    script_name: String,
    region_name: String,
    variant_name: String,
    display_name: String,
    abbreviation: String,
    pua_chars: Vec<CustomCharacterRecord>,
    valid_chars: String,
    matched_pairs: String,
    punctuation_patterns: String,
    capitalization_info: String,
    quotation_marks: String,
    fonts: Vec<String>,
    keyboard: String,
    collations: Vec<CollationRules>,
    right_to_left: bool,
    numeric_locale_id: u32,
    spell_check_dictionary: String,
    legacy_mapping: String,
}

impl Default for WritingSystemDefinition {
    fn default() -> Self {
        WritingSystemDefinition {
            locale: None,
            original_locale: None,
            state: InitState::Uninitialized,
            ui_locale: DEFAULT_UI_LOCALE.to_owned(),
            language_name: String::new(),
            script_name: String::new(),
            region_name: String::new(),
            variant_name: String::new(),
            display_name: String::new(),
            abbreviation: String::new(),
            pua_chars: Vec::new(),
            valid_chars: String::new(),
            matched_pairs: String::new(),
            punctuation_patterns: String::new(),
            capitalization_info: String::new(),
            quotation_marks: String::new(),
            fonts: Vec::new(),
            keyboard: String::new(),
            collations: Vec::new(),
            right_to_left: false,
            numeric_locale_id: 0,
            spell_check_dictionary: String::new(),
            legacy_mapping: String::new(),
        }
    }
}

impl WritingSystemDefinition {
    /// An empty, uninitialized definition.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the writing system stored under `locale`.
    ///
    /// Display names are looked up for `ui_locale`; a name already stored
    /// for that UI locale wins over the composed one.
    pub fn from_store<S, P>(store: &S, locale: &str, ui_locale: &str, provider: &P) -> Option<Self>
    where
        S: WritingSystemStore + ?Sized,
        P: UnicodePropertyProvider + ?Sized,
    {
        let ws = store.get(locale)?;
        let mut def = WritingSystemDefinition {
            state: InitState::Initializing,
            ui_locale: ui_locale.to_owned(),
            valid_chars: ws.valid_chars().clone(),
            matched_pairs: ws.matched_pairs().clone(),
            punctuation_patterns: ws.punctuation_patterns().clone(),
            capitalization_info: ws.capitalization_info().clone(),
            quotation_marks: ws.quotation_marks().clone(),
            fonts: ws.fonts().clone(),
            keyboard: ws.keyboard().clone(),
            collations: ws.collations().clone(),
            right_to_left: ws.right_to_left(),
            numeric_locale_id: ws.numeric_locale_id(),
            spell_check_dictionary: ws.spell_check_dictionary().clone(),
            legacy_mapping: ws.legacy_mapping().clone(),
            abbreviation: ws.abbreviation(ui_locale).unwrap_or_default().to_owned(),
            ..Self::default()
        };
        def.set_locale(ws.locale());
        if let Err(e) = def.refresh_display_names(provider, ui_locale) {
            log::debug!("no display names for {}: {}", locale, e);
        }
        if let Some(name) = ws.name(ui_locale).filter(|name| !name.is_empty()) {
            def.display_name = name.to_owned();
        }
        Some(def)
    }

    /// The current initialization state.
    pub fn state(&self) -> InitState {
        self.state
    }

    /// The locale string, `None` until one is assigned.
    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    /// The first locale ever assigned. It never changes afterwards.
    pub fn original_locale(&self) -> Option<&str> {
        self.original_locale.as_deref()
    }

    /// Whether the locale has moved away from the original one.
    pub fn has_pending_rename(&self) -> bool {
        match (&self.original_locale, &self.locale) {
            (Some(original), Some(current)) => original != current,
            _ => false,
        }
    }

    /// Assigns the locale string. The first assignment makes the definition
    /// ready.
    pub fn set_locale(&mut self, locale: &str) {
        self.locale = Some(locale.to_owned());
        if self.original_locale.is_none() {
            self.original_locale = Some(locale.to_owned());
        }
        if self.state != InitState::Ready {
            self.state = InitState::Ready;
            self.sync_display_name();
        }
    }

    /// The locale split into its four parts.
    pub fn locale_identifier<P>(&self, provider: &P) -> LocaleIdentifier
    where
        P: UnicodePropertyProvider + ?Sized,
    {
        LocaleIdentifier::parts(self.locale().unwrap_or_default(), provider)
    }

    fn set_locale_part<P>(&mut self, part: LocalePart, value: &str, provider: &P)
    where
        P: UnicodePropertyProvider + ?Sized,
    {
        let current = self.locale().unwrap_or_default();
        let locale = LocaleIdentifier::with_part(current, part, value, provider);
        if locale != current {
            self.set_locale(&locale);
        }
    }

    /// Replaces the language code.
    pub fn set_language<P>(&mut self, language: &str, provider: &P)
    where
        P: UnicodePropertyProvider + ?Sized,
    {
        self.set_locale_part(LocalePart::Language, language, provider);
    }

    /// Replaces the script code, title-cased. Anything but four characters
    /// or empty leaves the locale unchanged.
    pub fn set_script<P>(&mut self, script: &str, provider: &P)
    where
        P: UnicodePropertyProvider + ?Sized,
    {
        self.set_locale_part(LocalePart::Script, &title_case_script(script), provider);
    }

    /// Replaces the region code. Anything but two or three characters or
    /// empty leaves the locale unchanged.
    pub fn set_region<P>(&mut self, region: &str, provider: &P)
    where
        P: UnicodePropertyProvider + ?Sized,
    {
        self.set_locale_part(LocalePart::Region, region, provider);
    }

    /// Replaces the variant.
    pub fn set_variant<P>(&mut self, variant: &str, provider: &P)
    where
        P: UnicodePropertyProvider + ?Sized,
    {
        self.set_locale_part(LocalePart::Variant, variant, provider);
    }

    /// The UI locale display names are in.
    pub fn ui_locale(&self) -> &str {
        &self.ui_locale
    }

    /// The display name, or the locale string if there is none.
    pub fn display_name(&self) -> &str {
        if self.display_name.is_empty() {
            self.locale().unwrap_or_default()
        } else {
            &self.display_name
        }
    }

    /// Overrides the composed display name.
    pub fn set_display_name(&mut self, name: &str) {
        self.display_name = name.to_owned();
    }

    /// The language's display name.
    pub fn language_name(&self) -> &str {
        &self.language_name
    }

    /// The script's display name.
    pub fn script_name(&self) -> &str {
        &self.script_name
    }

    /// The region's display name.
    pub fn region_name(&self) -> &str {
        &self.region_name
    }

    /// The variant's display name.
    pub fn variant_name(&self) -> &str {
        &self.variant_name
    }

    /// Sets the language's display name and recomposes the display name.
    pub fn set_language_name(&mut self, name: &str) {
        self.language_name = name.to_owned();
        self.sync_display_name();
    }

    /// Sets the script's display name and recomposes the display name.
    pub fn set_script_name(&mut self, name: &str) {
        self.script_name = name.to_owned();
        self.sync_display_name();
    }

    /// Sets the region's display name and recomposes the display name.
    pub fn set_region_name(&mut self, name: &str) {
        self.region_name = name.to_owned();
        self.sync_display_name();
    }

    /// Sets the variant's display name and recomposes the display name.
    pub fn set_variant_name(&mut self, name: &str) {
        self.variant_name = name.to_owned();
        self.sync_display_name();
    }

    // `Name (Script, Region, Variant)`, empty parts left out.
    fn sync_display_name(&mut self) {
        if self.state != InitState::Ready {
            return;
        }
        let extras = [&self.script_name, &self.region_name, &self.variant_name]
            .iter()
            .filter(|part| !part.is_empty())
            .map(|part| part.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        self.display_name = if extras.is_empty() {
            self.language_name.clone()
        } else {
            format!("{} ({})", self.language_name, extras)
        };
    }

    /// Fills the four display-name parts from `provider`, in `ui_locale`.
    pub fn refresh_display_names<P>(&mut self, provider: &P, ui_locale: &str) -> Result<()>
    where
        P: UnicodePropertyProvider + ?Sized,
    {
        let id = self.locale_identifier(provider);
        let display = |code: &str, lookup: &dyn Fn(&str) -> Result<String>| {
            if code.is_empty() {
                Ok(String::new())
            } else {
                lookup(code)
            }
        };
        let language = display(&id.language, &|c| provider.language_display_name(c, ui_locale))?;
        let script = display(&id.script, &|c| provider.script_display_name(c, ui_locale))?;
        let region = display(&id.region, &|c| provider.region_display_name(c, ui_locale))?;
        let variant = display(&id.variant, &|c| provider.variant_display_name(c, ui_locale))?;
        self.ui_locale = ui_locale.to_owned();
        self.language_name = language;
        self.script_name = script;
        self.region_name = region;
        self.variant_name = variant;
        self.sync_display_name();
        Ok(())
    }

    /// The abbreviation shown for the UI locale.
    pub fn abbreviation(&self) -> &str {
        &self.abbreviation
    }

    /// Sets the abbreviation shown for the UI locale.
    pub fn set_abbreviation(&mut self, abbreviation: &str) {
        self.abbreviation = abbreviation.to_owned();
    }

    /// The custom characters, in the order they were added.
    pub fn pua_chars(&self) -> &[CustomCharacterRecord] {
        &self.pua_chars
    }

    /// The custom character at `cp`.
    pub fn pua_char(&self, cp: u32) -> Option<&CustomCharacterRecord> {
        self.pua_chars.iter().find(|r| r.code_value() == cp)
    }

    /// Adds a custom character. Returns `false`, changing nothing, if one is
    /// already defined at the same codepoint.
    pub fn add_pua_char(&mut self, record: CustomCharacterRecord) -> bool {
        if self.pua_char(record.code_value()).is_some() {
            return false;
        }
        self.pua_chars.push(record);
        true
    }

    /// Removes the custom character at `cp`.
    pub fn remove_pua_char(&mut self, cp: u32) -> Option<CustomCharacterRecord> {
        let idx = self.pua_chars.iter().position(|r| r.code_value() == cp)?;
        Some(self.pua_chars.remove(idx))
    }

    /// The categories the custom characters override.
    pub fn category_overrides(&self) -> CategoryOverrides {
        CategoryOverrides::from_records(&self.pua_chars)
    }

    /// Brings the custom characters in line with `current_valid`.
    ///
    /// Records whose codepoint no longer occurs in any unit are dropped,
    /// except combining marks. Every codepoint that occurs and is in
    /// `discovered` but has no record yet gets one built from `provider`.
    /// Existing records are left as they are.
    pub fn update_pua_collection<P>(
        &mut self,
        current_valid: &[String],
        discovered: &CustomPuaSet,
        provider: &P,
    ) where
        P: UnicodePropertyProvider + ?Sized,
    {
        let present: BTreeSet<u32> = current_valid
            .iter()
            .flat_map(|unit| unit.chars())
            .map(|ch| ch as u32)
            .collect();
        self.pua_chars.retain(|r| {
            let keep =
                present.contains(&r.code_value()) || r.general_category_code().starts_with('M');
            if !keep {
                log::debug!("dropping custom character U+{}", r.codepoint());
            }
            keep
        });
        for cp in present.into_iter().filter(|&cp| discovered.contains(cp)) {
            if self.pua_char(cp).is_some() {
                continue;
            }
            if let Some(record) = CustomCharacterRecord::from_provider(cp, provider, true) {
                log::debug!("adding custom character U+{}", record.codepoint());
                self.pua_chars.push(record);
            }
        }
    }

    /// The space-separated valid characters.
    pub fn valid_chars(&self) -> &str {
        &self.valid_chars
    }

    /// Replaces the valid characters without checking them.
    pub fn set_valid_chars(&mut self, valid_chars: &str) {
        self.valid_chars = valid_chars.to_owned();
    }

    /// The valid characters as a list of units.
    pub fn valid_char_list<P>(&self, provider: &P) -> Vec<String>
    where
        P: UnicodePropertyProvider + ?Sized,
    {
        parse_delimited_character_list(
            &self.valid_chars,
            " ",
            &self.category_overrides(),
            provider,
        )
        .accepted
    }

    /// Replaces the valid characters with the valid units in `text`.
    ///
    /// The custom characters are updated to match and the rejected tokens
    /// are returned.
    pub fn apply_valid_characters<P>(
        &mut self,
        text: &str,
        delimiter: &str,
        discovered: &CustomPuaSet,
        provider: &P,
    ) -> Vec<String>
    where
        P: UnicodePropertyProvider + ?Sized,
    {
        let list = parse_delimited_character_list(
            text,
            delimiter,
            &self.category_overrides(),
            provider,
        );
        self.store_units(list, discovered, provider)
    }

    /// Adds the valid units found in free `sample` text to the valid
    /// characters and returns the clusters that were not valid units.
    pub fn add_valid_characters_from_text<P>(
        &mut self,
        sample: &str,
        discovered: &CustomPuaSet,
        provider: &P,
    ) -> Vec<String>
    where
        P: UnicodePropertyProvider + ?Sized,
    {
        let mut units = self.valid_char_list(provider);
        let found = segment_character_units(sample, &self.category_overrides(), provider);
        for unit in found.accepted {
            if !units.contains(&unit) {
                units.push(unit);
            }
        }
        let list = CharacterList {
            accepted: units,
            rejected: found.rejected,
        };
        self.store_units(list, discovered, provider)
    }

    fn store_units<P>(
        &mut self,
        list: CharacterList,
        discovered: &CustomPuaSet,
        provider: &P,
    ) -> Vec<String>
    where
        P: UnicodePropertyProvider + ?Sized,
    {
        self.valid_chars = list.accepted.join(" ");
        self.update_pua_collection(&list.accepted, discovered, provider);
        list.rejected
    }

    definition_fields! {
        /// Matched punctuation pairs.
        matched_pairs, set_matched_pairs: String;
        /// Punctuation patterns.
        punctuation_patterns, set_punctuation_patterns: String;
        /// Capitalization information.
        capitalization_info, set_capitalization_info: String;
        /// Quotation marks.
        quotation_marks, set_quotation_marks: String;
        /// Font names, default font first.
        fonts, set_fonts: Vec<String>;
        /// The keyboard to switch to.
        keyboard, set_keyboard: String;
        /// Collation rule sets.
        collations, set_collations: Vec<CollationRules>;
        /// The spell-check dictionary id.
        spell_check_dictionary, set_spell_check_dictionary: String;
        /// The legacy encoding converter name.
        legacy_mapping, set_legacy_mapping: String;
    }

    /// Whether text runs right to left.
    pub fn right_to_left(&self) -> bool {
        self.right_to_left
    }

    /// Sets the direction of text.
    pub fn set_right_to_left(&mut self, right_to_left: bool) {
        self.right_to_left = right_to_left;
    }

    /// The numeric (Windows) locale id.
    pub fn numeric_locale_id(&self) -> u32 {
        self.numeric_locale_id
    }

    /// Sets the numeric locale id.
    pub fn set_numeric_locale_id(&mut self, id: u32) {
        self.numeric_locale_id = id;
    }

    /// Copies this definition onto the persisted writing system stored under
    /// `original_locale_id`, then saves every dirty writing system in
    /// `store`.
    ///
    /// If nothing is stored under `original_locale_id`, a writing system is
    /// created for the current locale. Renaming onto a locale that is
    /// already stored fails with `Error::LocaleInUse` and changes nothing.
    /// Fields are only written where they differ. Returns whether the
    /// persisted writing system was dirty.
    pub fn save_to_store<S>(
        &self,
        store: &mut S,
        original_locale_id: &str,
        force_save: bool,
    ) -> Result<bool>
    where
        S: WritingSystemStore + ?Sized,
    {
        let locale = self.locale().unwrap_or(original_locale_id);
        let key = if store.get(original_locale_id).is_some() {
            if locale != original_locale_id && store.get(locale).is_some() {
                return Err(Error::LocaleInUse(locale.to_owned()));
            }
            original_locale_id
        } else {
            locale
        };
        let ws = store.create(key);
        ws.set_locale(locale.to_owned());
        ws.set_fonts(self.fonts.clone());
        ws.set_collations(self.collations.clone());
        ws.set_valid_chars(self.valid_chars.clone());
        ws.set_matched_pairs(self.matched_pairs.clone());
        ws.set_punctuation_patterns(self.punctuation_patterns.clone());
        ws.set_capitalization_info(self.capitalization_info.clone());
        ws.set_quotation_marks(self.quotation_marks.clone());
        ws.set_right_to_left(self.right_to_left);
        ws.set_numeric_locale_id(self.numeric_locale_id);
        ws.set_keyboard(self.keyboard.clone());
        ws.set_spell_check_dictionary(self.spell_check_dictionary.clone());
        ws.set_legacy_mapping(self.legacy_mapping.clone());
        ws.set_name(&self.ui_locale, self.display_name());
        if !self.abbreviation.is_empty() {
            ws.set_abbreviation(&self.ui_locale, &self.abbreviation);
        }
        if force_save {
            ws.mark_dirty();
        }
        let changed = ws.is_dirty();
        store.save_all_dirty()?;
        Ok(changed)
    }

    /// The definition as JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reads a definition written by [`to_json`](Self::to_json).
    pub fn from_json(json: &str) -> Result<Self> {
        let mut def: Self = serde_json::from_str(json)?;
        if def.locale.is_some() {
            def.state = InitState::Ready;
        }
        Ok(def)
    }
}
