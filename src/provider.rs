//! The Unicode property provider seam.
//!
//! Everything the writing-system core needs to know about a codepoint or a
//! locale string comes through `UnicodePropertyProvider`. The real system
//! binds it to a native Unicode library which must not be entered from two
//! threads at once; `SerializedProvider` enforces that.

use crate::error::Result;
use crate::ucd_property::{BidiClass, DecompositionType, GeneralCategory, NumericType};
use std::sync::{Mutex, MutexGuard};

/// A Unicode normalization form.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NormalizationForm {
    /// Canonical decomposition.
    Nfd,
    /// Canonical decomposition followed by canonical composition.
    Nfc,
    /// Compatibility decomposition.
    Nfkd,
    /// Compatibility decomposition followed by canonical composition.
    Nfkc,
}

/// The decomposition mapping of a codepoint.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Decomposition {
    /// Canonical, one of the compatibility tags, or none.
    pub kind: DecompositionType,
    /// The codepoints the character decomposes to.
    pub mapping: Vec<u32>,
}

/// The numeric properties of a codepoint.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NumericValue {
    /// Which numeric field the value belongs in.
    pub kind: NumericType,
    /// The value as written in `UnicodeData.txt`, e.g. `7` or `1/2`.
    pub value: String,
}

/// Per-codepoint properties, locale decomposition and normalization.
pub trait UnicodePropertyProvider {
    /// The character name, `None` if the codepoint has none.
    fn char_name(&self, cp: u32) -> Result<Option<String>>;
    /// The general category.
    fn general_category(&self, cp: u32) -> Result<GeneralCategory>;
    /// The canonical combining class.
    fn combining_class(&self, cp: u32) -> Result<u8>;
    /// The bidirectional class.
    fn bidi_class(&self, cp: u32) -> Result<BidiClass>;
    /// The decomposition type and mapping.
    fn decomposition(&self, cp: u32) -> Result<Decomposition>;
    /// The numeric type and value.
    fn numeric_value(&self, cp: u32) -> Result<NumericValue>;
    /// Whether the character is mirrored in right-to-left text.
    fn is_mirrored(&self, cp: u32) -> Result<bool>;
    /// The Unicode 1.0 name, empty if none.
    fn unicode1_name(&self, cp: u32) -> Result<String>;
    /// The ISO 10646 comment, empty if none.
    fn iso_comment(&self, cp: u32) -> Result<String>;
    /// The simple uppercase mapping.
    fn uppercase_mapping(&self, cp: u32) -> Result<Option<u32>>;
    /// The simple lowercase mapping.
    fn lowercase_mapping(&self, cp: u32) -> Result<Option<u32>>;
    /// The simple titlecase mapping.
    fn titlecase_mapping(&self, cp: u32) -> Result<Option<u32>>;

    /// The language part of a locale string.
    fn locale_language(&self, locale: &str) -> String;
    /// The script part of a locale string.
    fn locale_script(&self, locale: &str) -> String;
    /// The region part of a locale string.
    fn locale_region(&self, locale: &str) -> String;
    /// The variant part of a locale string.
    fn locale_variant(&self, locale: &str) -> String;
    /// Maps a language code to the one the provider uses, e.g. a deprecated
    /// code to its replacement.
    fn canonical_language(&self, language: &str) -> String;

    /// The name of a language code, displayed in `ui_locale`.
    fn language_display_name(&self, language: &str, ui_locale: &str) -> Result<String>;
    /// The name of a script code, displayed in `ui_locale`.
    fn script_display_name(&self, script: &str, ui_locale: &str) -> Result<String>;
    /// The name of a region code, displayed in `ui_locale`.
    fn region_display_name(&self, region: &str, ui_locale: &str) -> Result<String>;
    /// The name of a variant, displayed in `ui_locale`.
    fn variant_display_name(&self, variant: &str, ui_locale: &str) -> Result<String>;

    /// Normalizes `text` to `form`.
    fn normalize(&self, text: &str, form: NormalizationForm) -> Result<String>;

    /// Whether the codepoint is a letter (`L*`).
    fn is_letter(&self, cp: u32) -> bool {
        self.general_category(cp).map_or(false, GeneralCategory::is_letter)
    }

    /// Whether the codepoint is a number (`N*`).
    fn is_number(&self, cp: u32) -> bool {
        self.general_category(cp).map_or(false, GeneralCategory::is_number)
    }

    /// Whether the codepoint is punctuation (`P*`).
    fn is_punctuation(&self, cp: u32) -> bool {
        self.general_category(cp).map_or(false, GeneralCategory::is_punctuation)
    }

    /// Whether the codepoint is a symbol (`S*`).
    fn is_symbol(&self, cp: u32) -> bool {
        self.general_category(cp).map_or(false, GeneralCategory::is_symbol)
    }

    /// Whether the codepoint is a combining mark (`M*`).
    fn is_mark(&self, cp: u32) -> bool {
        self.general_category(cp).map_or(false, GeneralCategory::is_mark)
    }

    /// Whether the codepoint is assigned at all.
    fn is_defined(&self, cp: u32) -> bool {
        self.general_category(cp)
            .map_or(false, |gc| gc != GeneralCategory::Unassigned)
    }
}

/// Guards a provider so that only one call is in flight at a time.
///
/// The lock is held for exactly one provider call.
#[derive(Debug, Default)]
pub struct SerializedProvider<P> {
    inner: Mutex<P>,
}

impl<P> SerializedProvider<P> {
    /// Wraps `provider`.
    pub fn new(provider: P) -> Self {
        SerializedProvider {
            inner: Mutex::new(provider),
        }
    }

    /// Unwraps the provider.
    pub fn into_inner(self) -> P {
        self.inner.into_inner().unwrap_or_else(|e| e.into_inner())
    }

    fn lock(&self) -> MutexGuard<'_, P> {
        // A panic inside a provider call cannot leave it half-updated: every
        // call is a read.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl<P: UnicodePropertyProvider> UnicodePropertyProvider for SerializedProvider<P> {
    fn char_name(&self, cp: u32) -> Result<Option<String>> {
        self.lock().char_name(cp)
    }
    fn general_category(&self, cp: u32) -> Result<GeneralCategory> {
        self.lock().general_category(cp)
    }
    fn combining_class(&self, cp: u32) -> Result<u8> {
        self.lock().combining_class(cp)
    }
    fn bidi_class(&self, cp: u32) -> Result<BidiClass> {
        self.lock().bidi_class(cp)
    }
    fn decomposition(&self, cp: u32) -> Result<Decomposition> {
        self.lock().decomposition(cp)
    }
    fn numeric_value(&self, cp: u32) -> Result<NumericValue> {
        self.lock().numeric_value(cp)
    }
    fn is_mirrored(&self, cp: u32) -> Result<bool> {
        self.lock().is_mirrored(cp)
    }
    fn unicode1_name(&self, cp: u32) -> Result<String> {
        self.lock().unicode1_name(cp)
    }
    fn iso_comment(&self, cp: u32) -> Result<String> {
        self.lock().iso_comment(cp)
    }
    fn uppercase_mapping(&self, cp: u32) -> Result<Option<u32>> {
        self.lock().uppercase_mapping(cp)
    }
    fn lowercase_mapping(&self, cp: u32) -> Result<Option<u32>> {
        self.lock().lowercase_mapping(cp)
    }
    fn titlecase_mapping(&self, cp: u32) -> Result<Option<u32>> {
        self.lock().titlecase_mapping(cp)
    }
    fn locale_language(&self, locale: &str) -> String {
        self.lock().locale_language(locale)
    }
    fn locale_script(&self, locale: &str) -> String {
        self.lock().locale_script(locale)
    }
    fn locale_region(&self, locale: &str) -> String {
        self.lock().locale_region(locale)
    }
    fn locale_variant(&self, locale: &str) -> String {
        self.lock().locale_variant(locale)
    }
    fn canonical_language(&self, language: &str) -> String {
        self.lock().canonical_language(language)
    }
    fn language_display_name(&self, language: &str, ui_locale: &str) -> Result<String> {
        self.lock().language_display_name(language, ui_locale)
    }
    fn script_display_name(&self, script: &str, ui_locale: &str) -> Result<String> {
        self.lock().script_display_name(script, ui_locale)
    }
    fn region_display_name(&self, region: &str, ui_locale: &str) -> Result<String> {
        self.lock().region_display_name(region, ui_locale)
    }
    fn variant_display_name(&self, variant: &str, ui_locale: &str) -> Result<String> {
        self.lock().variant_display_name(variant, ui_locale)
    }
    fn normalize(&self, text: &str, form: NormalizationForm) -> Result<String> {
        self.lock().normalize(text, form)
    }
    // The predicates are forwarded too so that each takes the lock once.
    fn is_letter(&self, cp: u32) -> bool {
        self.lock().is_letter(cp)
    }
    fn is_number(&self, cp: u32) -> bool {
        self.lock().is_number(cp)
    }
    fn is_punctuation(&self, cp: u32) -> bool {
        self.lock().is_punctuation(cp)
    }
    fn is_symbol(&self, cp: u32) -> bool {
        self.lock().is_symbol(cp)
    }
    fn is_mark(&self, cp: u32) -> bool {
        self.lock().is_mark(cp)
    }
    fn is_defined(&self, cp: u32) -> bool {
        self.lock().is_defined(cp)
    }
}
