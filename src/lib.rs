#![deny(missing_docs, missing_debug_implementations)]
//! Writing-system definitions and their valid characters.
//!
//! A writing system is identified by an ICU-style locale string,
//! `language[_Script][_REGION][_Variant]`. [`LocaleIdentifier`] splits such a
//! string into its four parts and rebuilds it when one part changes.
//!
//! The characters a writing system uses are kept as a list of *character
//! units*: one base character followed by the combining marks that belong to
//! it. [`extract_leading_unit`] and [`is_valid_single_unit`] decide what a
//! unit is, and [`parse_delimited_character_list`] sorts a user's list into
//! accepted units and rejects.
//!
//! Characters a user defines in the Private Use Area are described by
//! [`CustomCharacterRecord`]s, one `UnicodeData.txt` line each. Their general
//! category takes precedence over what the [`UnicodePropertyProvider`]
//! reports.
//!
//! [`WritingSystemDefinition`] ties it together and saves into a
//! [`WritingSystemStore`].
//!
//! # Unit rules
//!
//! * A single line separator, space separator or format character is a unit
//!   on its own.
//! * Otherwise a unit starts at the first letter, number, private-use
//!   character, punctuation or symbol.
//! * Combining marks after the base belong to it. A zero-width joiner or
//!   non-joiner belongs to it only between two marks.
//! * If the whole input composes (NFKC) to a single character, that
//!   character is the unit.

pub(crate) mod error;

pub(crate) mod ucd_property;

pub(crate) mod codepoint;

pub(crate) mod native;

pub(crate) mod provider;

pub(crate) mod pua_char_ty;

pub(crate) mod ucd_table_provider;

pub(crate) mod locale_id;

pub(crate) mod char_unit;

pub(crate) mod custom_pua;

pub(crate) mod ws_store;

pub(crate) mod ws_definition;

pub use error::{Error, Result};

pub use ucd_property::{
    combining_class_name, BidiClass, DecompositionType, GeneralCategory, NumericType,
};

pub use codepoint::{
    compare_hex, format_codepoint, in_range, in_ranges, is_custom_pua, is_private_use,
    is_surrogate, is_valid_codepoint, normalize_codepoint, parse_codepoint, HexRange,
    CUSTOM_PUA_RANGES, PRIVATE_USE_RANGES, SURROGATE_RANGES, VALID_CODEPOINT_RANGE,
};

pub use native::{copy_utf16_out, read_utf16_with_retry, NativeStatus};

pub use provider::{
    Decomposition, NormalizationForm, NumericValue, SerializedProvider, UnicodePropertyProvider,
};

pub use pua_char_ty::{CustomCharacterRecord, UCD_FIELD_COUNT};

pub use ucd_table_provider::UcdTableProvider;

pub use locale_id::{title_case_script, LocaleIdentifier, LocalePart};

pub use char_unit::{
    extract_leading_unit, is_valid_single_unit, parse_delimited_character_list,
    segment_character_units, CategoryOverrides, CharacterList, DEFAULT_DELIMITER,
};

pub use custom_pua::CustomPuaSet;

pub use ws_store::{
    CollationRules, InMemoryStore, JsonFileStore, PersistedWritingSystem, WritingSystemStore,
};

pub use ws_definition::{InitState, WritingSystemDefinition};
