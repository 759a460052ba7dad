//! A Unicode property provider backed by `UnicodeData.txt` records.
//!
//! Codepoints missing from the table fall back to the compiled ICU property
//! data for general category and mirroring, to `unicode-bidi` for the bidi
//! class, and to the `unicode-normalization` tables for combining classes and
//! decompositions. Records in the table always win.

use crate::codepoint::{format_codepoint, parse_codepoint};
use crate::error::Result;
use crate::native::{copy_utf16_out, read_utf16_with_retry};
use crate::provider::{Decomposition, NormalizationForm, NumericValue, UnicodePropertyProvider};
use crate::pua_char_ty::CustomCharacterRecord;
use crate::ucd_property::{BidiClass, DecompositionType, GeneralCategory, NumericType};
use icu_properties::props::BidiMirrored;
use icu_properties::{CodePointMapData, CodePointSetData};
use std::collections::{BTreeMap, HashMap};
use unicode_normalization::char::{
    canonical_combining_class, decompose_canonical, decompose_compatible,
};
use unicode_normalization::UnicodeNormalization;

const NAME_BUFFER_LEN: usize = 32;

const DEPRECATED_LANGUAGES: &[(&str, &str)] = &[
    ("in", "id"),
    ("iw", "he"),
    ("ji", "yi"),
    ("jw", "jv"),
    ("mo", "ro"),
];

const LANGUAGE_NAMES: &[(&str, &str)] = &[
    ("ar", "Arabic"),
    ("de", "German"),
    ("en", "English"),
    ("es", "Spanish"),
    ("fr", "French"),
    ("he", "Hebrew"),
    ("hi", "Hindi"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("pt", "Portuguese"),
    ("ru", "Russian"),
    ("th", "Thai"),
    ("zh", "Chinese"),
];

const SCRIPT_NAMES: &[(&str, &str)] = &[
    ("Arab", "Arabic"),
    ("Cyrl", "Cyrillic"),
    ("Deva", "Devanagari"),
    ("Grek", "Greek"),
    ("Hang", "Hangul"),
    ("Hans", "Simplified Han"),
    ("Hant", "Traditional Han"),
    ("Hebr", "Hebrew"),
    ("Latn", "Latin"),
    ("Thai", "Thai"),
];

const REGION_NAMES: &[(&str, &str)] = &[
    ("BR", "Brazil"),
    ("CN", "China"),
    ("DE", "Germany"),
    ("ES", "Spain"),
    ("FR", "France"),
    ("GB", "United Kingdom"),
    ("IL", "Israel"),
    ("IN", "India"),
    ("JP", "Japan"),
    ("KR", "South Korea"),
    ("MX", "Mexico"),
    ("PT", "Portugal"),
    ("RU", "Russia"),
    ("TW", "Taiwan"),
    ("US", "United States"),
];

const VARIANT_NAMES: &[(&str, &str)] = &[("POSIX", "Computer")];

fn name_table(entries: &[(&str, &str)]) -> HashMap<String, String> {
    entries
        .iter()
        .map(|&(code, name)| (code.to_owned(), name.to_owned()))
        .collect()
}

/// The four parts of an ICU-style locale string.
///
/// `en_Latn_US_X`, `en__X` (region absent) and `en_US` all decompose; the
/// language is lower-cased, the region upper-cased, anything after `@` is
/// ignored.
fn split_locale(locale: &str) -> [String; 4] {
    let base = locale.split('@').next().unwrap_or_default();
    let mut segments = base.split('_').peekable();
    let language = segments.next().unwrap_or_default().to_ascii_lowercase();

    let mut script = String::new();
    if let Some(seg) = segments.peek() {
        if seg.len() == 4 && seg.chars().all(|c| c.is_ascii_alphabetic()) {
            script = seg.to_string();
            segments.next();
        }
    }

    let mut region = String::new();
    if let Some(seg) = segments.peek() {
        if (2..=3).contains(&seg.len()) && seg.chars().all(|c| c.is_ascii_alphanumeric()) {
            region = seg.to_ascii_uppercase();
            segments.next();
        } else if seg.is_empty() {
            segments.next();
        }
    }

    let variant = segments.collect::<Vec<_>>().join("_");
    [language, script, region, variant]
}

fn fallback_category(cp: u32) -> GeneralCategory {
    use icu_properties::props::GeneralCategory as Gc;
    match CodePointMapData::<Gc>::new().get32(cp) {
        Gc::Unassigned => GeneralCategory::Unassigned,
        Gc::UppercaseLetter => GeneralCategory::UppercaseLetter,
        Gc::LowercaseLetter => GeneralCategory::LowercaseLetter,
        Gc::TitlecaseLetter => GeneralCategory::TitlecaseLetter,
        Gc::ModifierLetter => GeneralCategory::ModifierLetter,
        Gc::OtherLetter => GeneralCategory::OtherLetter,
        Gc::NonspacingMark => GeneralCategory::NonSpacingMark,
        Gc::SpacingMark => GeneralCategory::SpacingMark,
        Gc::EnclosingMark => GeneralCategory::EnclosingMark,
        Gc::DecimalNumber => GeneralCategory::DecimalNumber,
        Gc::LetterNumber => GeneralCategory::LetterNumber,
        Gc::OtherNumber => GeneralCategory::OtherNumber,
        Gc::SpaceSeparator => GeneralCategory::SpaceSeparator,
        Gc::LineSeparator => GeneralCategory::LineSeparator,
        Gc::ParagraphSeparator => GeneralCategory::ParagraphSeparator,
        Gc::Control => GeneralCategory::Control,
        Gc::Format => GeneralCategory::Format,
        Gc::PrivateUse => GeneralCategory::PrivateUse,
        Gc::Surrogate => GeneralCategory::Surrogate,
        Gc::DashPunctuation => GeneralCategory::DashPunctuation,
        Gc::OpenPunctuation => GeneralCategory::OpenPunctuation,
        Gc::ClosePunctuation => GeneralCategory::ClosePunctuation,
        Gc::ConnectorPunctuation => GeneralCategory::ConnectorPunctuation,
        Gc::InitialPunctuation => GeneralCategory::InitialPunctuation,
        Gc::FinalPunctuation => GeneralCategory::FinalPunctuation,
        Gc::OtherPunctuation => GeneralCategory::OtherPunctuation,
        Gc::MathSymbol => GeneralCategory::MathSymbol,
        Gc::CurrencySymbol => GeneralCategory::CurrencySymbol,
        Gc::ModifierSymbol => GeneralCategory::ModifierSymbol,
        Gc::OtherSymbol => GeneralCategory::OtherSymbol,
    }
}

fn fallback_bidi_class(cp: u32) -> BidiClass {
    use unicode_bidi::BidiClass as Bc;
    // Surrogates are not chars; UnicodeData.txt gives them L.
    let ch = match char::from_u32(cp) {
        Some(ch) => ch,
        None => return BidiClass::LeftToRight,
    };
    #[allow(unreachable_patterns)]
    match unicode_bidi::bidi_class(ch) {
        Bc::L => BidiClass::LeftToRight,
        Bc::R => BidiClass::RightToLeft,
        Bc::AL => BidiClass::ArabicLetter,
        Bc::EN => BidiClass::EuropeanNumber,
        Bc::ES => BidiClass::EuropeanSeparator,
        Bc::ET => BidiClass::EuropeanTerminator,
        Bc::AN => BidiClass::ArabicNumber,
        Bc::CS => BidiClass::CommonSeparator,
        Bc::NSM => BidiClass::NonSpacingMark,
        Bc::BN => BidiClass::BoundaryNeutral,
        Bc::B => BidiClass::ParagraphSeparator,
        Bc::S => BidiClass::SegmentSeparator,
        Bc::WS => BidiClass::WhiteSpace,
        Bc::ON => BidiClass::OtherNeutral,
        Bc::LRE => BidiClass::LeftToRightEmbedding,
        Bc::LRO => BidiClass::LeftToRightOverride,
        Bc::RLE => BidiClass::RightToLeftEmbedding,
        Bc::RLO => BidiClass::RightToLeftOverride,
        Bc::PDF => BidiClass::PopDirectionalFormat,
        Bc::LRI => BidiClass::LeftToRightIsolate,
        Bc::RLI => BidiClass::RightToLeftIsolate,
        Bc::FSI => BidiClass::FirstStrongIsolate,
        Bc::PDI => BidiClass::PopDirectionalIsolate,
        _ => BidiClass::OtherNeutral,
    }
}

fn single_char_mapping<I: Iterator<Item = char>>(ch: char, mut mapped: I) -> Option<u32> {
    match (mapped.next(), mapped.next()) {
        (Some(m), None) if m != ch => Some(m as u32),
        _ => None,
    }
}

/// A `UnicodePropertyProvider` over `UnicodeData.txt`-format records.
#[derive(Clone, Debug)]
pub struct UcdTableProvider {
    records: BTreeMap<u32, CustomCharacterRecord>,
    ranges: Vec<(u32, u32, CustomCharacterRecord)>,
    language_names: HashMap<String, String>,
    script_names: HashMap<String, String>,
    region_names: HashMap<String, String>,
    variant_names: HashMap<String, String>,
}

impl Default for UcdTableProvider {
    fn default() -> Self {
        UcdTableProvider {
            records: BTreeMap::new(),
            ranges: Vec::new(),
            language_names: name_table(LANGUAGE_NAMES),
            script_names: name_table(SCRIPT_NAMES),
            region_names: name_table(REGION_NAMES),
            variant_names: name_table(VARIANT_NAMES),
        }
    }
}

impl UcdTableProvider {
    /// A provider with an empty table, answering from the fallback only.
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider loaded from `UnicodeData.txt`-format text.
    ///
    /// Blank lines and `#` comments are skipped. `<…, First>` / `<…, Last>`
    /// pairs describe a whole range.
    pub fn from_ucd_data(text: &str) -> Result<Self> {
        let mut provider = Self::default();
        provider.load_ucd_data(text)?;
        Ok(provider)
    }

    /// Adds the records in `text`, replacing existing ones.
    pub fn load_ucd_data(&mut self, text: &str) -> Result<()> {
        let mut range_start: Option<CustomCharacterRecord> = None;
        for line in text.lines() {
            let line = line.split('#').next().unwrap_or_default().trim();
            if line.is_empty() {
                continue;
            }
            let record: CustomCharacterRecord = line.parse()?;
            if record.name().ends_with(", First>") {
                range_start = Some(record);
            } else if record.name().ends_with(", Last>") {
                if let Some(first) = range_start.take() {
                    self.ranges.push((first.code_value(), record.code_value(), first));
                }
            } else {
                self.insert(record);
            }
        }
        Ok(())
    }

    /// Adds or replaces one record.
    pub fn insert(&mut self, record: CustomCharacterRecord) {
        self.records.insert(record.code_value(), record);
    }

    /// Registers the display name of a language code.
    pub fn with_language_name(mut self, code: &str, name: &str) -> Self {
        self.language_names.insert(code.to_owned(), name.to_owned());
        self
    }

    /// Registers the display name of a script code.
    pub fn with_script_name(mut self, code: &str, name: &str) -> Self {
        self.script_names.insert(code.to_owned(), name.to_owned());
        self
    }

    /// Registers the display name of a region code.
    pub fn with_region_name(mut self, code: &str, name: &str) -> Self {
        self.region_names.insert(code.to_owned(), name.to_owned());
        self
    }

    /// The record for `cp`, if the table has one.
    pub fn record(&self, cp: u32) -> Option<&CustomCharacterRecord> {
        self.records.get(&cp).or_else(|| {
            self.ranges
                .iter()
                .find(|(first, last, _)| (*first..=*last).contains(&cp))
                .map(|(_, _, record)| record)
        })
    }

    fn range_template(&self, cp: u32) -> Option<&CustomCharacterRecord> {
        if self.records.contains_key(&cp) {
            return None;
        }
        self.ranges
            .iter()
            .find(|(first, last, _)| (*first..=*last).contains(&cp))
            .map(|(_, _, record)| record)
    }

    fn mapping_of(field: &str) -> Option<u32> {
        if field.is_empty() {
            None
        } else {
            parse_codepoint(field).ok()
        }
    }
}

impl UnicodePropertyProvider for UcdTableProvider {
    fn char_name(&self, cp: u32) -> Result<Option<String>> {
        if let Some(template) = self.range_template(cp) {
            if template.name().starts_with("<CJK Ideograph") {
                return Ok(Some(format!("CJK UNIFIED IDEOGRAPH-{}", format_codepoint(cp))));
            }
            return Ok(None);
        }
        match self.records.get(&cp) {
            Some(record) if !record.name().starts_with('<') => {
                read_utf16_with_retry(NAME_BUFFER_LEN, |buf| copy_utf16_out(record.name(), buf))
                    .map(Some)
            }
            _ => Ok(None),
        }
    }

    fn general_category(&self, cp: u32) -> Result<GeneralCategory> {
        Ok(self
            .record(cp)
            .and_then(CustomCharacterRecord::general_category)
            .unwrap_or_else(|| fallback_category(cp)))
    }

    fn combining_class(&self, cp: u32) -> Result<u8> {
        if let Some(class) = self.record(cp).and_then(CustomCharacterRecord::combining_class) {
            return Ok(class);
        }
        Ok(char::from_u32(cp).map_or(0, canonical_combining_class))
    }

    fn bidi_class(&self, cp: u32) -> Result<BidiClass> {
        Ok(self
            .record(cp)
            .and_then(CustomCharacterRecord::bidi_class)
            .unwrap_or_else(|| fallback_bidi_class(cp)))
    }

    fn decomposition(&self, cp: u32) -> Result<Decomposition> {
        if let Some(record) = self.record(cp) {
            let mapping = record
                .decomposition()
                .split_whitespace()
                .map(parse_codepoint)
                .collect::<Result<Vec<_>>>()?;
            return Ok(Decomposition {
                kind: record.decomposition_type(),
                mapping,
            });
        }
        let ch = match char::from_u32(cp) {
            Some(ch) => ch,
            None => return Ok(Decomposition::default()),
        };
        let mut canonical = Vec::new();
        decompose_canonical(ch, |c| canonical.push(c as u32));
        if canonical != [cp] {
            return Ok(Decomposition {
                kind: DecompositionType::Canonical,
                mapping: canonical,
            });
        }
        let mut compatible = Vec::new();
        decompose_compatible(ch, |c| compatible.push(c as u32));
        if compatible != [cp] {
            return Ok(Decomposition {
                kind: DecompositionType::Compat,
                mapping: compatible,
            });
        }
        Ok(Decomposition::default())
    }

    fn numeric_value(&self, cp: u32) -> Result<NumericValue> {
        if let Some(record) = self.record(cp) {
            return Ok(NumericValue {
                kind: record.numeric_type(),
                value: record.numeric_value().to_owned(),
            });
        }
        Ok(match char::from_u32(cp).and_then(|ch| ch.to_digit(10)) {
            Some(digit) => NumericValue {
                kind: NumericType::Decimal,
                value: digit.to_string(),
            },
            None => NumericValue::default(),
        })
    }

    fn is_mirrored(&self, cp: u32) -> Result<bool> {
        if let Some(record) = self.record(cp) {
            return Ok(record.bidi_mirrored());
        }
        Ok(CodePointSetData::new::<BidiMirrored>().contains32(cp))
    }

    fn unicode1_name(&self, cp: u32) -> Result<String> {
        Ok(self
            .record(cp)
            .map(|r| r.unicode1_name().to_owned())
            .unwrap_or_default())
    }

    fn iso_comment(&self, cp: u32) -> Result<String> {
        Ok(self
            .record(cp)
            .map(|r| r.iso_comment().to_owned())
            .unwrap_or_default())
    }

    fn uppercase_mapping(&self, cp: u32) -> Result<Option<u32>> {
        if let Some(record) = self.record(cp) {
            return Ok(Self::mapping_of(record.uppercase()));
        }
        Ok(char::from_u32(cp).and_then(|ch| single_char_mapping(ch, ch.to_uppercase())))
    }

    fn lowercase_mapping(&self, cp: u32) -> Result<Option<u32>> {
        if let Some(record) = self.record(cp) {
            return Ok(Self::mapping_of(record.lowercase()));
        }
        Ok(char::from_u32(cp).and_then(|ch| single_char_mapping(ch, ch.to_lowercase())))
    }

    fn titlecase_mapping(&self, cp: u32) -> Result<Option<u32>> {
        if let Some(record) = self.record(cp) {
            return Ok(Self::mapping_of(record.titlecase()));
        }
        self.uppercase_mapping(cp)
    }

    fn locale_language(&self, locale: &str) -> String {
        let [language, ..] = split_locale(locale);
        language
    }

    fn locale_script(&self, locale: &str) -> String {
        let [_, script, ..] = split_locale(locale);
        script
    }

    fn locale_region(&self, locale: &str) -> String {
        let [_, _, region, _] = split_locale(locale);
        region
    }

    fn locale_variant(&self, locale: &str) -> String {
        let [.., variant] = split_locale(locale);
        variant
    }

    fn canonical_language(&self, language: &str) -> String {
        let language = language.to_ascii_lowercase();
        DEPRECATED_LANGUAGES
            .iter()
            .find(|&&(old, _)| old == language)
            .map(|&(_, new)| new.to_owned())
            .unwrap_or(language)
    }

    fn language_display_name(&self, language: &str, _ui_locale: &str) -> Result<String> {
        let language = self.canonical_language(language);
        Ok(self.language_names.get(&language).cloned().unwrap_or(language))
    }

    fn script_display_name(&self, script: &str, _ui_locale: &str) -> Result<String> {
        Ok(self
            .script_names
            .get(script)
            .cloned()
            .unwrap_or_else(|| script.to_owned()))
    }

    fn region_display_name(&self, region: &str, _ui_locale: &str) -> Result<String> {
        Ok(self
            .region_names
            .get(region)
            .cloned()
            .unwrap_or_else(|| region.to_owned()))
    }

    fn variant_display_name(&self, variant: &str, _ui_locale: &str) -> Result<String> {
        Ok(self
            .variant_names
            .get(variant)
            .cloned()
            .unwrap_or_else(|| variant.to_owned()))
    }

    fn normalize(&self, text: &str, form: NormalizationForm) -> Result<String> {
        Ok(match form {
            NormalizationForm::Nfd => text.nfd().collect(),
            NormalizationForm::Nfc => text.nfc().collect(),
            NormalizationForm::Nfkd => text.nfkd().collect(),
            NormalizationForm::Nfkc => text.nfkc().collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATA: &str = "\
0041;LATIN CAPITAL LETTER A;Lu;0;L;;;;;N;;;;0061;
0301;COMBINING ACUTE ACCENT;Mn;230;NSM;;;;;N;NON-SPACING ACUTE;;;;
4E00;<CJK Ideograph, First>;Lo;0;L;;;;;N;;;;;
9FFF;<CJK Ideograph, Last>;Lo;0;L;;;;;N;;;;;
# a comment line
E000;MY PRIVATE LETTER;Lo;0;L;;;;;N;;;;; # User Added
";

    #[test]
    fn test_table_lookup() {
        let provider = UcdTableProvider::from_ucd_data(DATA).unwrap();
        assert_eq!(
            Some("LATIN CAPITAL LETTER A".to_owned()),
            provider.char_name(0x41).unwrap()
        );
        assert_eq!(Some(0x61), provider.lowercase_mapping(0x41).unwrap());
        assert_eq!(230, provider.combining_class(0x301).unwrap());
        assert!(provider.is_mark(0x301));
        assert_eq!(
            GeneralCategory::OtherLetter,
            provider.general_category(0xE000).unwrap()
        );
        assert_eq!("NON-SPACING ACUTE", provider.unicode1_name(0x301).unwrap());
    }

    #[test]
    fn test_range_records() {
        let provider = UcdTableProvider::from_ucd_data(DATA).unwrap();
        assert_eq!(
            Some("CJK UNIFIED IDEOGRAPH-4E2D".to_owned()),
            provider.char_name(0x4E2D).unwrap()
        );
        assert!(provider.is_letter(0x4E2D));
    }

    #[test]
    fn test_fallback_properties() {
        let provider = UcdTableProvider::new();
        assert!(provider.is_letter('b' as u32));
        assert!(provider.is_mark(0x0308));
        assert!(provider.is_number('7' as u32));
        assert!(provider.is_punctuation('!' as u32));
        assert!(provider.is_symbol('+' as u32));
        assert_eq!(GeneralCategory::Format, provider.general_category(0x200D).unwrap());
        assert_eq!(
            GeneralCategory::PrivateUse,
            provider.general_category(0xF000).unwrap()
        );
        assert_eq!(None, provider.char_name(0x62).unwrap());
        let decomposition = provider.decomposition(0xE1).unwrap();
        assert_eq!(DecompositionType::Canonical, decomposition.kind);
        assert_eq!(vec![0x61, 0x301], decomposition.mapping);
        assert_eq!(BidiClass::RightToLeft, provider.bidi_class(0x05D0).unwrap());
    }

    #[test]
    fn test_fallback_beyond_ascii() {
        let provider = UcdTableProvider::new();
        let category = |cp| provider.general_category(cp).unwrap();
        assert_eq!(GeneralCategory::OtherPunctuation, category(0xBF));
        assert_eq!(GeneralCategory::InitialPunctuation, category(0xAB));
        assert_eq!(GeneralCategory::FinalPunctuation, category(0xBB));
        assert_eq!(GeneralCategory::DashPunctuation, category(0x2014));
        assert_eq!(GeneralCategory::CurrencySymbol, category(0x20AC));
        assert_eq!(GeneralCategory::OtherSymbol, category(0xA9));
        assert_eq!(GeneralCategory::MathSymbol, category(0xD7));
        assert_eq!(GeneralCategory::Unassigned, category(0x0378));
        assert_eq!(GeneralCategory::Surrogate, category(0xD800));

        assert!(provider.is_mirrored(0x2264).unwrap());
        assert!(provider.is_mirrored('(' as u32).unwrap());
        assert!(!provider.is_mirrored('a' as u32).unwrap());
        assert_eq!(BidiClass::ArabicNumber, provider.bidi_class(0x0660).unwrap());
        assert_eq!(BidiClass::ArabicLetter, provider.bidi_class(0x0627).unwrap());
        assert_eq!(BidiClass::NonSpacingMark, provider.bidi_class(0x0301).unwrap());
        assert_eq!(BidiClass::LeftToRight, provider.bidi_class(0xD800).unwrap());
    }

    #[test]
    fn test_table_overrides_fallback() {
        let mut provider = UcdTableProvider::new();
        provider.insert("00BF;MY MARK;Mn;230;NSM;;;;;N;;;;;".parse().unwrap());
        assert_eq!(GeneralCategory::NonSpacingMark, provider.general_category(0xBF).unwrap());
        assert_eq!(BidiClass::NonSpacingMark, provider.bidi_class(0xBF).unwrap());
    }

    #[test]
    fn test_locale_decomposition() {
        let provider = UcdTableProvider::new();
        assert_eq!(
            ["en", "Latn", "US", "X"].map(str::to_owned),
            split_locale("en_Latn_US_X")
        );
        assert_eq!(["en", "", "", "POSIX"].map(str::to_owned), split_locale("en__POSIX"));
        assert_eq!(["zh", "Hant", "", ""].map(str::to_owned), split_locale("zh_Hant"));
        assert_eq!("TW", provider.locale_region("zh_Hant_tw@collation=stroke"));
        assert_eq!("he", provider.canonical_language("iw"));
        assert_eq!("Hebrew", provider.language_display_name("iw", "en").unwrap());
        assert_eq!("xkal", provider.language_display_name("xkal", "en").unwrap());
    }

    #[test]
    fn test_normalization_forms() {
        let provider = UcdTableProvider::new();
        assert_eq!("a\u{301}", provider.normalize("\u{e1}", NormalizationForm::Nfd).unwrap());
        assert_eq!("\u{e1}", provider.normalize("a\u{301}", NormalizationForm::Nfc).unwrap());
        assert_eq!(
            "\u{ac00}",
            provider.normalize("\u{1100}\u{1161}", NormalizationForm::Nfkc).unwrap()
        );
    }
}
