use crate::provider::UnicodePropertyProvider;
use std::fmt;

/// One of the four parts of a locale identifier, in string order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LocalePart {
    /// The language code, e.g. `en`.
    Language = 0,
    /// The four-letter script code, e.g. `Latn`.
    Script = 1,
    /// The two- or three-character region code, e.g. `US`.
    Region = 2,
    /// Everything after the region.
    Variant = 3,
}

impl LocalePart {
    /// The part at `index` (0 through 3).
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(LocalePart::Language),
            1 => Some(LocalePart::Script),
            2 => Some(LocalePart::Region),
            3 => Some(LocalePart::Variant),
            _ => None,
        }
    }
}

/// An ICU-style locale identifier: `language[_Script][_REGION][_Variant]`.
///
/// When the region is empty the variant is preceded by a double underscore,
/// so `en__POSIX` is English with variant `POSIX`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct LocaleIdentifier {
    /// The language code.
    pub language: String,
    /// The script code, four letters or empty.
    pub script: String,
    /// The region code, two or three characters or empty.
    pub region: String,
    /// The variant, free-form.
    pub variant: String,
}

impl LocaleIdentifier {
    /// Builds an identifier from its parts as given.
    pub fn new(language: &str, script: &str, region: &str, variant: &str) -> Self {
        LocaleIdentifier {
            language: language.to_owned(),
            script: script.to_owned(),
            region: region.to_owned(),
            variant: variant.to_owned(),
        }
    }

    /// Decomposes `locale` with the help of `provider`. Absent parts are empty.
    pub fn parts<P>(locale: &str, provider: &P) -> Self
    where
        P: UnicodePropertyProvider + ?Sized,
    {
        LocaleIdentifier {
            language: provider.locale_language(locale),
            script: provider.locale_script(locale),
            region: provider.locale_region(locale),
            variant: provider.locale_variant(locale),
        }
    }

    /// Replaces one part of `locale` and rebuilds the string.
    ///
    /// A script that is not four ASCII letters, or a region that is not two
    /// or three ASCII letters and digits, is ignored: `locale` comes back
    /// unchanged.
    pub fn with_part<P>(locale: &str, part: LocalePart, value: &str, provider: &P) -> String
    where
        P: UnicodePropertyProvider + ?Sized,
    {
        let mut id = Self::parts(locale, provider);
        if id.set_part(part, value, provider) {
            id.to_string()
        } else {
            locale.to_owned()
        }
    }

    /// Whether `value` is acceptable for `part`.
    ///
    /// A script is empty or four ASCII letters; a region is empty or two or
    /// three ASCII letters and digits. Anything else would not parse back
    /// into the same part.
    pub fn accepts(part: LocalePart, value: &str) -> bool {
        match part {
            LocalePart::Language | LocalePart::Variant => true,
            LocalePart::Script => {
                value.is_empty()
                    || (value.len() == 4 && value.bytes().all(|b| b.is_ascii_alphabetic()))
            }
            LocalePart::Region => {
                value.is_empty()
                    || ((2..=3).contains(&value.len())
                        && value.bytes().all(|b| b.is_ascii_alphanumeric()))
            }
        }
    }

    /// Sets one part, returning whether the value was accepted.
    ///
    /// The language is canonicalised by `provider` and the region upper-cased.
    pub fn set_part<P>(&mut self, part: LocalePart, value: &str, provider: &P) -> bool
    where
        P: UnicodePropertyProvider + ?Sized,
    {
        if !Self::accepts(part, value) {
            return false;
        }
        match part {
            LocalePart::Language => self.language = provider.canonical_language(value),
            LocalePart::Script => self.script = value.to_owned(),
            LocalePart::Region => self.region = value.to_uppercase(),
            LocalePart::Variant => self.variant = value.to_owned(),
        }
        true
    }

    /// The value of one part.
    pub fn part(&self, part: LocalePart) -> &str {
        match part {
            LocalePart::Language => &self.language,
            LocalePart::Script => &self.script,
            LocalePart::Region => &self.region,
            LocalePart::Variant => &self.variant,
        }
    }
}

impl fmt::Display for LocaleIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.language)?;
        if !self.script.is_empty() {
            write!(f, "_{}", self.script)?;
        }
        if !self.region.is_empty() {
            write!(f, "_{}", self.region)?;
        }
        if !self.variant.is_empty() {
            let sep = if self.region.is_empty() { "__" } else { "_" };
            write!(f, "{}{}", sep, self.variant)?;
        }
        Ok(())
    }
}

/// Title-cases a script code: `latn` becomes `Latn`.
pub fn title_case_script(script: &str) -> String {
    let mut chars = script.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
