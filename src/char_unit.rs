//! Character units: one base character followed by the combining marks that
//! belong to it.
//!
//! A writing system's list of valid characters is a list of such units. The
//! functions here pick the leading unit out of a string, decide whether a
//! string is exactly one unit, and sort a delimited list into accepted and
//! rejected tokens. Custom PUA definitions can override the general category
//! the provider would report for a codepoint.

use crate::provider::{NormalizationForm, UnicodePropertyProvider};
use crate::pua_char_ty::CustomCharacterRecord;
use crate::ucd_property::GeneralCategory;
use std::collections::HashMap;
use std::iter::FromIterator;
use unicode_segmentation::UnicodeSegmentation;

pub(crate) type UnitCharVec = smallvec::SmallVec<[char; 8]>;

/// The delimiter of a valid-characters list when none is given.
pub const DEFAULT_DELIMITER: &str = " ";

const ZERO_WIDTH_NON_JOINER: char = '\u{200C}';
const ZERO_WIDTH_JOINER: char = '\u{200D}';

/// General categories that take precedence over what the provider reports.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CategoryOverrides(HashMap<u32, GeneralCategory>);

impl CategoryOverrides {
    /// No overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// The categories declared by a set of custom character records. Records
    /// with an unknown category code are left out.
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a CustomCharacterRecord>,
    {
        records
            .into_iter()
            .filter_map(|r| r.general_category().map(|gc| (r.code_value(), gc)))
            .collect()
    }

    /// Overrides the category of `cp`.
    pub fn insert(&mut self, cp: u32, category: GeneralCategory) {
        self.0.insert(cp, category);
    }

    /// The overriding category of `cp`, if any.
    pub fn get(&self, cp: u32) -> Option<GeneralCategory> {
        self.0.get(&cp).copied()
    }

    /// The number of overridden codepoints.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing is overridden.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(u32, GeneralCategory)> for CategoryOverrides {
    fn from_iter<T: IntoIterator<Item = (u32, GeneralCategory)>>(iter: T) -> Self {
        CategoryOverrides(iter.into_iter().collect())
    }
}

/// The result of sorting a list of candidate units.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CharacterList {
    /// Valid units, first occurrence order, no duplicates.
    pub accepted: Vec<String>,
    /// Tokens that are not exactly one valid unit.
    pub rejected: Vec<String>,
}

struct Classifier<'a, P: ?Sized> {
    overrides: &'a CategoryOverrides,
    provider: &'a P,
}

impl<'a, P> Classifier<'a, P>
where
    P: UnicodePropertyProvider + ?Sized,
{
    fn category(&self, ch: char) -> Option<GeneralCategory> {
        let cp = ch as u32;
        self.overrides
            .get(cp)
            .or_else(|| self.provider.general_category(cp).ok())
    }

    // Line separators, spaces and format characters are only valid on their own.
    fn is_valid_in_isolation(&self, ch: char) -> bool {
        matches!(
            self.category(ch),
            Some(
                GeneralCategory::LineSeparator
                    | GeneralCategory::SpaceSeparator
                    | GeneralCategory::Format
            )
        )
    }

    fn is_base(&self, ch: char) -> bool {
        let cp = ch as u32;
        match self.overrides.get(cp) {
            Some(gc) => {
                gc.is_letter()
                    || gc.is_number()
                    || gc == GeneralCategory::PrivateUse
                    || gc.is_punctuation()
                    || gc.is_symbol()
            }
            None => {
                self.provider.is_letter(cp)
                    || self.provider.is_number(cp)
                    || self.provider.is_punctuation(cp)
                    || self.provider.is_symbol(cp)
                    || matches!(
                        self.provider.general_category(cp),
                        Ok(GeneralCategory::PrivateUse)
                    )
            }
        }
    }

    fn is_mark(&self, ch: char) -> bool {
        match self.overrides.get(ch as u32) {
            Some(gc) => gc.is_mark(),
            None => self.provider.is_mark(ch as u32),
        }
    }
}

// Some scripts build one base character out of several letters (Hangul jamo
// compose to a syllable). If the whole input compatibility-composes to a
// single codepoint, that codepoint is the unit.
fn compose_to_single<P>(input: &str, provider: &P) -> Option<String>
where
    P: UnicodePropertyProvider + ?Sized,
{
    let composed = provider.normalize(input, NormalizationForm::Nfkc).ok()?;
    let mut chars = composed.chars();
    match (chars.next(), chars.next()) {
        (Some(_), None) => Some(composed),
        _ => None,
    }
}

/// Returns the leading character unit of `input`: the first base character
/// and the combining marks that follow it.
///
/// Anything before the first base character is skipped. Zero-width
/// (non-)joiners are kept only between two marks. The result is empty if
/// there is no base character.
pub fn extract_leading_unit<P>(input: &str, overrides: &CategoryOverrides, provider: &P) -> String
where
    P: UnicodePropertyProvider + ?Sized,
{
    let classifier = Classifier {
        overrides,
        provider,
    };
    let chars = input.chars().collect::<UnitCharVec>();
    if let [only] = chars[..] {
        if classifier.is_valid_in_isolation(only) {
            return input.to_owned();
        }
    }

    let mut unit = UnitCharVec::new();
    let mut prev_was_mark = false;
    for (idx, &ch) in chars.iter().enumerate() {
        if unit.is_empty() {
            if classifier.is_base(ch) {
                unit.push(ch);
            }
            continue;
        }
        if classifier.is_mark(ch) {
            unit.push(ch);
            prev_was_mark = true;
            continue;
        }
        let is_joiner = ch == ZERO_WIDTH_NON_JOINER || ch == ZERO_WIDTH_JOINER;
        let next_is_mark = chars
            .get(idx + 1)
            .map_or(false, |&next| classifier.is_mark(next));
        if is_joiner && prev_was_mark && next_is_mark {
            unit.push(ch);
            prev_was_mark = false;
            continue;
        }
        if let Some(composed) = compose_to_single(input, provider) {
            return composed;
        }
        break;
    }
    unit.into_iter().collect()
}

/// Whether `candidate` is exactly one character unit, compared in NFD.
pub fn is_valid_single_unit<P>(candidate: &str, overrides: &CategoryOverrides, provider: &P) -> bool
where
    P: UnicodePropertyProvider + ?Sized,
{
    let unit = extract_leading_unit(candidate, overrides, provider);
    if unit.is_empty() {
        return false;
    }
    match (
        provider.normalize(&unit, NormalizationForm::Nfd),
        provider.normalize(candidate, NormalizationForm::Nfd),
    ) {
        (Ok(unit), Ok(candidate)) => unit == candidate,
        _ => false,
    }
}

fn classify<'t, I, P>(tokens: I, overrides: &CategoryOverrides, provider: &P) -> CharacterList
where
    I: IntoIterator<Item = &'t str>,
    P: UnicodePropertyProvider + ?Sized,
{
    let mut list = CharacterList::default();
    for token in tokens {
        if is_valid_single_unit(token, overrides, provider) {
            if !list.accepted.iter().any(|seen| seen == token) {
                list.accepted.push(token.to_owned());
            }
        } else {
            log::trace!("rejected character token {:?}", token);
            list.rejected.push(token.to_owned());
        }
    }
    list
}

/// Splits `text` on `delimiter` and sorts the tokens into valid units and
/// rejects.
///
/// Empty tokens are dropped. With the space delimiter, a leading space in
/// `text` is itself kept as the first accepted unit.
pub fn parse_delimited_character_list<P>(
    text: &str,
    delimiter: &str,
    overrides: &CategoryOverrides,
    provider: &P,
) -> CharacterList
where
    P: UnicodePropertyProvider + ?Sized,
{
    let delimiter = if delimiter.is_empty() {
        DEFAULT_DELIMITER
    } else {
        delimiter
    };
    let tokens = text.split(delimiter).filter(|token| !token.is_empty());
    let mut list = classify(tokens, overrides, provider);
    if delimiter == " " && text.starts_with(' ') && !list.accepted.iter().any(|u| u == " ") {
        list.accepted.insert(0, " ".to_owned());
    }
    list
}

/// Splits free text into extended grapheme clusters and sorts them the way
/// `parse_delimited_character_list` sorts tokens.
pub fn segment_character_units<P>(
    text: &str,
    overrides: &CategoryOverrides,
    provider: &P,
) -> CharacterList
where
    P: UnicodePropertyProvider + ?Sized,
{
    classify(text.graphemes(true), overrides, provider)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ucd_table_provider::UcdTableProvider;

    fn extract(s: &str) -> String {
        extract_leading_unit(s, &CategoryOverrides::new(), &UcdTableProvider::new())
    }

    fn is_unit(s: &str) -> bool {
        is_valid_single_unit(s, &CategoryOverrides::new(), &UcdTableProvider::new())
    }

    #[test]
    fn test_leading_unit() {
        assert_eq!("a\u{301}\u{302}", extract("a\u{301}\u{302}b"));
        assert_eq!("a", extract("\u{301}ab"));
        assert_eq!("", extract("\u{301}\u{302}"));
        assert_eq!("", extract(""));
    }

    #[test]
    fn test_isolated_characters() {
        for s in [" ", "\u{2028}", "\u{200D}", "\u{00AD}"] {
            assert_eq!(s, extract(s));
            assert!(is_unit(s), "{:?}", s);
        }
        assert!(!is_unit("\u{2029}"));
        assert!(!is_unit("  "));
    }

    #[test]
    fn test_marks() {
        assert!(is_unit("a\u{301}\u{302}\u{303}"));
        assert!(!is_unit("a\u{301}b"));
        assert!(is_unit("\u{e1}"));
        assert!(is_unit("7"));
        assert!(is_unit("!"));
    }

    #[test]
    fn test_joiners_only_between_marks() {
        assert!(is_unit("a\u{301}\u{200D}\u{302}"));
        assert!(is_unit("a\u{301}\u{200C}\u{302}"));
        assert!(!is_unit("a\u{301}\u{200D}b"));
        assert!(!is_unit("a\u{200D}\u{301}"));
        assert!(!is_unit("a\u{301}\u{200D}"));
    }

    #[test]
    fn test_composing_letters() {
        assert_eq!("\u{ac00}", extract("\u{1100}\u{1161}"));
        assert!(is_unit("\u{1100}\u{1161}"));
        assert!(!is_unit("ab"));
    }

    #[test]
    fn test_idempotence() {
        for s in ["a\u{301}\u{200D}\u{302}x", "\u{1100}\u{1161}", "\u{301}b\u{302}", " ", "xyz"] {
            let once = extract(s);
            assert_eq!(once, extract(&once), "{:?}", s);
        }
    }

    #[test]
    fn test_overrides() {
        let provider = UcdTableProvider::new();
        let mut overrides = CategoryOverrides::new();
        // A private-use codepoint declared to be a combining mark.
        overrides.insert(0xE001, GeneralCategory::NonSpacingMark);
        assert!(is_valid_single_unit("a\u{E001}", &overrides, &provider));
        assert!(!is_valid_single_unit("a\u{E001}", &CategoryOverrides::new(), &provider));
        // And a letter demoted to a control character.
        overrides.insert('q' as u32, GeneralCategory::Control);
        assert!(!is_valid_single_unit("q", &overrides, &provider));
    }

    #[test]
    fn test_delimited_list() {
        let provider = UcdTableProvider::new();
        let none = CategoryOverrides::new();
        let list = parse_delimited_character_list("a b a c", " ", &none, &provider);
        assert_eq!(vec!["a", "b", "c"], list.accepted);
        assert!(list.rejected.is_empty());

        let list = parse_delimited_character_list(" a b", " ", &none, &provider);
        assert_eq!(vec![" ", "a", "b"], list.accepted);

        let list = parse_delimited_character_list("a,\u{301},bc,,e\u{301}", ",", &none, &provider);
        assert_eq!(vec!["a", "e\u{301}"], list.accepted);
        assert_eq!(vec!["\u{301}", "bc"], list.rejected);
    }

    #[test]
    fn test_segment_free_text() {
        let provider = UcdTableProvider::new();
        let none = CategoryOverrides::new();
        let list = segment_character_units("ca\u{301}fe\u{301}\n", &none, &provider);
        assert_eq!(vec!["c", "a\u{301}", "f", "e\u{301}"], list.accepted);
        assert_eq!(vec!["\n"], list.rejected);
    }

    #[test]
    fn test_punctuation_and_symbols_beyond_ascii() {
        let punctuation = ["\u{bf}", "\u{a1}", "\u{ab}", "\u{bb}", "\u{2014}", "\u{201c}"];
        let symbols = ["\u{20ac}", "\u{a9}", "\u{d7}"];
        for s in punctuation.iter().chain(&symbols) {
            assert!(is_unit(s), "{:?}", s);
        }
        let provider = UcdTableProvider::new();
        let none = CategoryOverrides::new();
        let text = "a \u{bf} \u{ab} \u{20ac}";
        let list = parse_delimited_character_list(text, " ", &none, &provider);
        assert_eq!(vec!["a", "\u{bf}", "\u{ab}", "\u{20ac}"], list.accepted);
        assert!(list.rejected.is_empty());
    }
}
