use crate::codepoint::{format_codepoint, is_valid_codepoint, normalize_codepoint, parse_codepoint};
use crate::error::{Error, Result};
use crate::provider::UnicodePropertyProvider;
use crate::ucd_property::{BidiClass, DecompositionType, GeneralCategory, NumericType};
use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fmt, str::FromStr};

/// The number of fields that follow the codepoint in a `UnicodeData.txt` line.
pub const UCD_FIELD_COUNT: usize = 14;

/// One user-defined character, described by a full `UnicodeData.txt` record.
///
/// A record is parsed and validated once; afterwards its fields are only read
/// through named accessors. Serialized, it is its `UnicodeData.txt` line.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CustomCharacterRecord {
    cp: u32,
    name: String,
    general_category: String,
    combining_class: String,
    bidi_class: String,
    decomposition_type: DecompositionType,
    decomposition: String,
    numeric_type: NumericType,
    numeric_value: String,
    bidi_mirrored: bool,
    unicode1_name: String,
    iso_comment: String,
    uppercase: String,
    lowercase: String,
    titlecase: String,
}

fn parse_decomposition(field: &str) -> Result<(DecompositionType, String)> {
    let field = field.trim();
    if field.is_empty() {
        return Ok((DecompositionType::None, String::new()));
    }
    let malformed = || Error::Parse(field.to_owned());
    match field.strip_prefix('<') {
        Some(rest) => {
            let end = rest.find('>').ok_or_else(malformed)?;
            let (tag, mapping) = (&rest[..end], rest[end + 1..].trim());
            if tag.contains('<') || mapping.contains(&['<', '>'][..]) {
                return Err(malformed());
            }
            let kind = DecompositionType::from_code(tag)
                .filter(|kind| kind.is_compatibility())
                .ok_or_else(malformed)?;
            Ok((kind, mapping.to_owned()))
        }
        None if field.contains(&['<', '>'][..]) => Err(malformed()),
        None => Ok((DecompositionType::Canonical, field.to_owned())),
    }
}

fn hex_list(cps: &[u32]) -> String {
    cps.iter()
        .copied()
        .map(format_codepoint)
        .collect::<Vec<_>>()
        .join(" ")
}

impl CustomCharacterRecord {
    /// Builds a record from a codepoint and the 14 semicolon-separated fields
    /// that follow it in a `UnicodeData.txt` line.
    pub fn from_ucd_line(codepoint: &str, fields: &str) -> Result<Self> {
        let cp = parse_codepoint(codepoint)?;
        let f = fields.split(';').collect::<Vec<_>>();
        if f.len() != UCD_FIELD_COUNT {
            return Err(Error::Format {
                codepoint: format_codepoint(cp),
                found: f.len(),
            });
        }
        let (decomposition_type, decomposition) = parse_decomposition(f[4])?;
        let (decimal, digit, numeric) = (f[5], f[6], f[7]);
        let numeric_type = if !decimal.is_empty() {
            NumericType::Decimal
        } else if !digit.is_empty() {
            NumericType::Digit
        } else if !numeric.is_empty() {
            NumericType::Numeric
        } else {
            NumericType::None
        };
        let numeric_value = [numeric, digit, decimal]
            .into_iter()
            .find(|v| !v.is_empty())
            .unwrap_or_default();
        Ok(CustomCharacterRecord {
            cp,
            name: f[0].to_owned(),
            general_category: f[1].to_owned(),
            combining_class: f[2].to_owned(),
            bidi_class: f[3].to_owned(),
            decomposition_type,
            decomposition,
            numeric_type,
            numeric_value: numeric_value.to_owned(),
            bidi_mirrored: f[8] == "Y",
            unicode1_name: f[9].to_owned(),
            iso_comment: f[10].to_owned(),
            uppercase: f[11].to_owned(),
            lowercase: f[12].to_owned(),
            titlecase: f[13].to_owned(),
        })
    }

    /// Builds a record by asking `provider` about `cp`.
    ///
    /// Returns `None` under the same conditions `refresh_from_provider`
    /// returns `false`.
    pub fn from_provider<P>(cp: u32, provider: &P, allow_blank_names: bool) -> Option<Self>
    where
        P: UnicodePropertyProvider + ?Sized,
    {
        let mut record = CustomCharacterRecord::blank(cp);
        if record.refresh_from_provider(provider, allow_blank_names) {
            Some(record)
        } else {
            None
        }
    }

    fn blank(cp: u32) -> Self {
        CustomCharacterRecord {
            cp,
            name: String::new(),
            general_category: String::new(),
            combining_class: String::new(),
            bidi_class: String::new(),
            decomposition_type: DecompositionType::None,
            decomposition: String::new(),
            numeric_type: NumericType::None,
            numeric_value: String::new(),
            bidi_mirrored: false,
            unicode1_name: String::new(),
            iso_comment: String::new(),
            uppercase: String::new(),
            lowercase: String::new(),
            titlecase: String::new(),
        }
    }

    /// Re-populates every field from `provider`.
    ///
    /// Leaves the record untouched and returns `false` when the codepoint is
    /// outside `0000..=10FFFD`, when the provider has no name for it and
    /// `allow_blank_names` is not set, or when the provider fails.
    pub fn refresh_from_provider<P>(&mut self, provider: &P, allow_blank_names: bool) -> bool
    where
        P: UnicodePropertyProvider + ?Sized,
    {
        if !is_valid_codepoint(&self.codepoint()) {
            return false;
        }
        match self.query(provider, allow_blank_names) {
            Ok(Some(record)) => {
                *self = record;
                true
            }
            Ok(None) => false,
            Err(e) => {
                log::debug!("provider lookup of U+{} failed: {}", self.codepoint(), e);
                false
            }
        }
    }

    fn query<P>(&self, provider: &P, allow_blank_names: bool) -> Result<Option<Self>>
    where
        P: UnicodePropertyProvider + ?Sized,
    {
        let cp = self.cp;
        let name = match provider.char_name(cp)? {
            Some(name) if !name.is_empty() => name,
            _ if allow_blank_names => String::new(),
            _ => return Ok(None),
        };
        let decomposition = provider.decomposition(cp)?;
        let numeric = provider.numeric_value(cp)?;
        let mapping = |m: Option<u32>| m.map(format_codepoint).unwrap_or_default();
        Ok(Some(CustomCharacterRecord {
            cp,
            name,
            general_category: provider.general_category(cp)?.code().to_owned(),
            combining_class: provider.combining_class(cp)?.to_string(),
            bidi_class: provider.bidi_class(cp)?.code().to_owned(),
            decomposition_type: decomposition.kind,
            decomposition: hex_list(&decomposition.mapping),
            numeric_type: numeric.kind,
            numeric_value: numeric.value,
            bidi_mirrored: provider.is_mirrored(cp)?,
            unicode1_name: provider.unicode1_name(cp)?,
            iso_comment: provider.iso_comment(cp)?,
            uppercase: mapping(provider.uppercase_mapping(cp)?),
            lowercase: mapping(provider.lowercase_mapping(cp)?),
            titlecase: mapping(provider.titlecase_mapping(cp)?),
        }))
    }

    /// Serializes the 14 fields after the codepoint, semicolon-joined.
    pub fn to_ucd_line(&self) -> String {
        let decomposition = if self.decomposition_type.is_compatibility() {
            format!("<{}> {}", self.decomposition_type.code(), self.decomposition)
        } else {
            self.decomposition.clone()
        };
        let value_if = |set: bool| if set { self.numeric_value.as_str() } else { "" };
        let decimal = value_if(self.numeric_type == NumericType::Decimal);
        let digit = value_if(matches!(
            self.numeric_type,
            NumericType::Decimal | NumericType::Digit
        ));
        let numeric = value_if(self.numeric_type != NumericType::None);
        [
            self.name.as_str(),
            &self.general_category,
            &self.combining_class,
            &self.bidi_class,
            &decomposition,
            decimal,
            digit,
            numeric,
            if self.bidi_mirrored { "Y" } else { "N" },
            &self.unicode1_name,
            &self.iso_comment,
            &self.uppercase,
            &self.lowercase,
            &self.titlecase,
        ]
        .join(";")
    }

    /// The codepoint as upper-case hex, at least four digits.
    pub fn codepoint(&self) -> String {
        format_codepoint(self.cp)
    }

    /// The codepoint value.
    pub fn code_value(&self) -> u32 {
        self.cp
    }

    /// The character itself, if the codepoint is a Unicode scalar value.
    pub fn as_char(&self) -> Option<char> {
        char::from_u32(self.cp)
    }

    /// The character name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The general category code, as written.
    pub fn general_category_code(&self) -> &str {
        &self.general_category
    }

    /// The general category, if the code is a known one.
    pub fn general_category(&self) -> Option<GeneralCategory> {
        GeneralCategory::from_code(&self.general_category)
    }

    /// The canonical combining class, if the field holds a number.
    pub fn combining_class(&self) -> Option<u8> {
        self.combining_class.parse().ok()
    }

    /// The bidirectional class, if the code is a known one.
    pub fn bidi_class(&self) -> Option<BidiClass> {
        BidiClass::from_code(&self.bidi_class)
    }

    /// The decomposition type.
    pub fn decomposition_type(&self) -> DecompositionType {
        self.decomposition_type
    }

    /// The decomposition mapping without its `<tag>`.
    pub fn decomposition(&self) -> &str {
        &self.decomposition
    }

    /// Which numeric field the value lives in.
    pub fn numeric_type(&self) -> NumericType {
        self.numeric_type
    }

    /// The numeric value, empty when the type is `None`.
    pub fn numeric_value(&self) -> &str {
        &self.numeric_value
    }

    /// Whether the character mirrors in right-to-left text.
    pub fn bidi_mirrored(&self) -> bool {
        self.bidi_mirrored
    }

    /// The Unicode 1.0 name.
    pub fn unicode1_name(&self) -> &str {
        &self.unicode1_name
    }

    /// The ISO 10646 comment.
    pub fn iso_comment(&self) -> &str {
        &self.iso_comment
    }

    /// The simple uppercase mapping, as hex.
    pub fn uppercase(&self) -> &str {
        &self.uppercase
    }

    /// The simple lowercase mapping, as hex.
    pub fn lowercase(&self) -> &str {
        &self.lowercase
    }

    /// The simple titlecase mapping, as hex.
    pub fn titlecase(&self) -> &str {
        &self.titlecase
    }
}

impl fmt::Display for CustomCharacterRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};{}", self.codepoint(), self.to_ucd_line())
    }
}

impl FromStr for CustomCharacterRecord {
    type Err = Error;

    /// Parses a full `CODE;…` line.
    fn from_str(line: &str) -> Result<Self> {
        match line.split_once(';') {
            Some((code, fields)) => CustomCharacterRecord::from_ucd_line(code, fields),
            None => Err(Error::Format {
                codepoint: normalize_codepoint(line).unwrap_or_else(|_| line.to_owned()),
                found: 0,
            }),
        }
    }
}

impl TryFrom<String> for CustomCharacterRecord {
    type Error = Error;

    fn try_from(line: String) -> Result<Self> {
        line.parse()
    }
}

impl From<CustomCharacterRecord> for String {
    fn from(record: CustomCharacterRecord) -> String {
        record.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LATIN_A: &str = "LATIN CAPITAL LETTER A;Lu;0;L;;;;;N;;;;0061;";
    const DIGIT_SEVEN: &str = "DIGIT SEVEN;Nd;0;EN;;7;7;7;N;;;;;";
    const FRACTION: &str =
        "VULGAR FRACTION ONE HALF;No;0;ON;<fraction> 0031 2044 0032;;;1/2;N;FRACTION ONE HALF;;;;";

    #[test]
    fn test_round_trip() {
        for (code, line) in [("0041", LATIN_A), ("0037", DIGIT_SEVEN), ("00BD", FRACTION)] {
            let record = CustomCharacterRecord::from_ucd_line(code, line).unwrap();
            assert_eq!(line, record.to_ucd_line());
        }
    }

    #[test]
    fn test_field_count_is_checked() {
        let err = CustomCharacterRecord::from_ucd_line("E000", "NAME;Lo;0;L").unwrap_err();
        assert!(matches!(err, Error::Format { found: 4, .. }));
        let too_many = format!("{};extra", LATIN_A);
        assert!(CustomCharacterRecord::from_ucd_line("0041", &too_many).is_err());
    }

    #[test]
    fn test_decomposition_fields() {
        let record = CustomCharacterRecord::from_ucd_line("00BD", FRACTION).unwrap();
        assert_eq!(DecompositionType::Fraction, record.decomposition_type());
        assert_eq!("0031 2044 0032", record.decomposition());
        assert_eq!(NumericType::Numeric, record.numeric_type());
        assert_eq!("1/2", record.numeric_value());

        let acute = CustomCharacterRecord::from_ucd_line(
            "00E1",
            "LATIN SMALL LETTER A WITH ACUTE;Ll;0;L;0061 0301;;;;N;;;00C1;;00C1",
        )
        .unwrap();
        assert_eq!(DecompositionType::Canonical, acute.decomposition_type());
        assert_eq!("0061 0301", acute.decomposition());
    }

    #[test]
    fn test_unbalanced_decomposition_is_a_parse_error() {
        for bad in ["<compat 0020", "0020> 0301", "<compat> <0020"] {
            let line = format!("X;So;0;ON;{};;;;N;;;;;", bad);
            let err = CustomCharacterRecord::from_ucd_line("E000", &line).unwrap_err();
            assert!(matches!(err, Error::Parse(_)), "{}", bad);
        }
    }

    #[test]
    fn test_digit_type() {
        let record =
            CustomCharacterRecord::from_ucd_line("E001", "MY DIGIT;No;0;L;;;4;4;N;;;;;").unwrap();
        assert_eq!(NumericType::Digit, record.numeric_type());
        assert_eq!("MY DIGIT;No;0;L;;;4;4;N;;;;;", record.to_ucd_line());
    }

    #[test]
    fn test_full_line_and_ordering() {
        let line = format!("e000;{}", "MY LETTER;Lo;0;L;;;;;N;;;;;");
        let record: CustomCharacterRecord = line.parse().unwrap();
        assert_eq!("E000", record.codepoint());
        assert_eq!("E000;MY LETTER;Lo;0;L;;;;;N;;;;;", record.to_string());
        let other: CustomCharacterRecord = format!("0041;{}", LATIN_A).parse().unwrap();
        assert!(other < record);
        assert_ne!(other, record);
    }

    use crate::native::NativeStatus;
    use crate::provider::{Decomposition, NormalizationForm, NumericValue};

    // Knows a name (or not) and fails every other lookup.
    struct BrokenProvider {
        name: Option<&'static str>,
        name_fails: bool,
    }

    fn missing<T>() -> Result<T> {
        Err(Error::NativeLibrary(NativeStatus::MISSING_RESOURCE.0))
    }

    impl UnicodePropertyProvider for BrokenProvider {
        fn char_name(&self, _: u32) -> Result<Option<String>> {
            if self.name_fails {
                return missing();
            }
            Ok(self.name.map(str::to_owned))
        }
        fn general_category(&self, _: u32) -> Result<GeneralCategory> {
            missing()
        }
        fn combining_class(&self, _: u32) -> Result<u8> {
            missing()
        }
        fn bidi_class(&self, _: u32) -> Result<BidiClass> {
            missing()
        }
        fn decomposition(&self, _: u32) -> Result<Decomposition> {
            missing()
        }
        fn numeric_value(&self, _: u32) -> Result<NumericValue> {
            missing()
        }
        fn is_mirrored(&self, _: u32) -> Result<bool> {
            missing()
        }
        fn unicode1_name(&self, _: u32) -> Result<String> {
            missing()
        }
        fn iso_comment(&self, _: u32) -> Result<String> {
            missing()
        }
        fn uppercase_mapping(&self, _: u32) -> Result<Option<u32>> {
            missing()
        }
        fn lowercase_mapping(&self, _: u32) -> Result<Option<u32>> {
            missing()
        }
        fn titlecase_mapping(&self, _: u32) -> Result<Option<u32>> {
            missing()
        }
        fn locale_language(&self, _: &str) -> String {
            String::new()
        }
        fn locale_script(&self, _: &str) -> String {
            String::new()
        }
        fn locale_region(&self, _: &str) -> String {
            String::new()
        }
        fn locale_variant(&self, _: &str) -> String {
            String::new()
        }
        fn canonical_language(&self, language: &str) -> String {
            language.to_owned()
        }
        fn language_display_name(&self, _: &str, _: &str) -> Result<String> {
            missing()
        }
        fn script_display_name(&self, _: &str, _: &str) -> Result<String> {
            missing()
        }
        fn region_display_name(&self, _: &str, _: &str) -> Result<String> {
            missing()
        }
        fn variant_display_name(&self, _: &str, _: &str) -> Result<String> {
            missing()
        }
        fn normalize(&self, _: &str, _: NormalizationForm) -> Result<String> {
            missing()
        }
    }

    fn my_mark() -> CustomCharacterRecord {
        CustomCharacterRecord::from_ucd_line("E101", "MY MARK;Mn;230;NSM;;;;;N;;;;;").unwrap()
    }

    #[test]
    fn test_refresh_without_name_changes_nothing() {
        let nameless = BrokenProvider {
            name: None,
            name_fails: false,
        };
        let mut record = my_mark();
        assert!(!record.refresh_from_provider(&nameless, false));
        assert_eq!(my_mark(), record);
        assert!(CustomCharacterRecord::from_provider(0xE101, &nameless, false).is_none());
    }

    #[test]
    fn test_refresh_failure_changes_nothing() {
        let mut record = my_mark();
        for provider in [
            BrokenProvider {
                name: Some("OTHER"),
                name_fails: false,
            },
            BrokenProvider {
                name: None,
                name_fails: true,
            },
        ] {
            assert!(!record.refresh_from_provider(&provider, true));
            assert_eq!(my_mark(), record);
        }
    }

    #[test]
    fn test_refresh_outside_codepoint_range() {
        let provider = crate::ucd_table_provider::UcdTableProvider::new();
        let mut record =
            CustomCharacterRecord::from_ucd_line("110000", "TOO HIGH;Co;0;L;;;;;N;;;;;").unwrap();
        let before = record.clone();
        assert!(!record.refresh_from_provider(&provider, true));
        assert_eq!(before, record);
    }
}
