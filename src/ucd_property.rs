//! Property value tables of the Unicode Character Database.
//!
//! Each table maps the short code used in `UnicodeData.txt` to a typed value
//! and a human readable description. The reverse lookup maps are built once,
//! on first use, and are read-only afterwards.

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

macro_rules! ucd_property_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $lookup:ident {
            $($(#[$vmeta:meta])* $variant:ident => ($code:expr, $desc:expr),)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($(#[$vmeta])* $variant,)*
        }

        static $lookup: OnceLock<HashMap<&'static str, $name>> = OnceLock::new();

        impl $name {
            /// Every value of this property, in table order.
            pub const ALL: &'static [$name] = &[$($name::$variant,)*];

            /// The code used for this value in `UnicodeData.txt`.
            pub fn code(self) -> &'static str {
                match self {
                    $($name::$variant => $code,)*
                }
            }

            /// A human readable description of this value.
            pub fn description(self) -> &'static str {
                match self {
                    $($name::$variant => $desc,)*
                }
            }

            /// Looks a value up by its `UnicodeData.txt` code.
            pub fn from_code(code: &str) -> Option<Self> {
                $lookup
                    .get_or_init(|| Self::ALL.iter().map(|v| (v.code(), *v)).collect())
                    .get(code)
                    .copied()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.code())
            }
        }
    };
}

ucd_property_enum! {
    /// The general category of a codepoint.
    GeneralCategory, GENERAL_CATEGORY_BY_CODE {
        /// Lu
        UppercaseLetter => ("Lu", "Letter, Uppercase"),
        /// Ll
        LowercaseLetter => ("Ll", "Letter, Lowercase"),
        /// Lt
        TitlecaseLetter => ("Lt", "Letter, Titlecase"),
        /// Lm
        ModifierLetter => ("Lm", "Letter, Modifier"),
        /// Lo
        OtherLetter => ("Lo", "Letter, Other"),
        /// Mn
        NonSpacingMark => ("Mn", "Mark, Non-Spacing"),
        /// Mc
        SpacingMark => ("Mc", "Mark, Spacing Combining"),
        /// Me
        EnclosingMark => ("Me", "Mark, Enclosing"),
        /// Nd
        DecimalNumber => ("Nd", "Number, Decimal Digit"),
        /// Nl
        LetterNumber => ("Nl", "Number, Letter"),
        /// No
        OtherNumber => ("No", "Number, Other"),
        /// Pc
        ConnectorPunctuation => ("Pc", "Punctuation, Connector"),
        /// Pd
        DashPunctuation => ("Pd", "Punctuation, Dash"),
        /// Ps
        OpenPunctuation => ("Ps", "Punctuation, Open"),
        /// Pe
        ClosePunctuation => ("Pe", "Punctuation, Close"),
        /// Pi
        InitialPunctuation => ("Pi", "Punctuation, Initial quote"),
        /// Pf
        FinalPunctuation => ("Pf", "Punctuation, Final quote"),
        /// Po
        OtherPunctuation => ("Po", "Punctuation, Other"),
        /// Sm
        MathSymbol => ("Sm", "Symbol, Math"),
        /// Sc
        CurrencySymbol => ("Sc", "Symbol, Currency"),
        /// Sk
        ModifierSymbol => ("Sk", "Symbol, Modifier"),
        /// So
        OtherSymbol => ("So", "Symbol, Other"),
        /// Zs
        SpaceSeparator => ("Zs", "Separator, Space"),
        /// Zl
        LineSeparator => ("Zl", "Separator, Line"),
        /// Zp
        ParagraphSeparator => ("Zp", "Separator, Paragraph"),
        /// Cc
        Control => ("Cc", "Other, Control"),
        /// Cf
        Format => ("Cf", "Other, Format"),
        /// Cs
        Surrogate => ("Cs", "Other, Surrogate"),
        /// Co
        PrivateUse => ("Co", "Other, Private Use"),
        /// Cn
        Unassigned => ("Cn", "Other, Not Assigned"),
    }
}

impl GeneralCategory {
    /// The first letter of the category code (`L`, `M`, `N`, `P`, `S`, `Z` or `C`).
    pub fn major_class(self) -> char {
        self.code().chars().next().unwrap_or('C')
    }

    /// Whether this is one of the `L*` categories.
    pub fn is_letter(self) -> bool {
        self.major_class() == 'L'
    }

    /// Whether this is one of the `M*` categories.
    pub fn is_mark(self) -> bool {
        self.major_class() == 'M'
    }

    /// Whether this is one of the `N*` categories.
    pub fn is_number(self) -> bool {
        self.major_class() == 'N'
    }

    /// Whether this is one of the `P*` categories.
    pub fn is_punctuation(self) -> bool {
        self.major_class() == 'P'
    }

    /// Whether this is one of the `S*` categories.
    pub fn is_symbol(self) -> bool {
        self.major_class() == 'S'
    }

    /// Whether this is one of the `Z*` categories.
    pub fn is_separator(self) -> bool {
        self.major_class() == 'Z'
    }
}

ucd_property_enum! {
    /// The bidirectional class of a codepoint.
    BidiClass, BIDI_CLASS_BY_CODE {
        /// L
        LeftToRight => ("L", "Left-to-Right"),
        /// R
        RightToLeft => ("R", "Right-to-Left"),
        /// AL
        ArabicLetter => ("AL", "Right-to-Left Arabic"),
        /// EN
        EuropeanNumber => ("EN", "European Number"),
        /// ES
        EuropeanSeparator => ("ES", "European Number Separator"),
        /// ET
        EuropeanTerminator => ("ET", "European Number Terminator"),
        /// AN
        ArabicNumber => ("AN", "Arabic Number"),
        /// CS
        CommonSeparator => ("CS", "Common Number Separator"),
        /// NSM
        NonSpacingMark => ("NSM", "Non-Spacing Mark"),
        /// BN
        BoundaryNeutral => ("BN", "Boundary Neutral"),
        /// B
        ParagraphSeparator => ("B", "Paragraph Separator"),
        /// S
        SegmentSeparator => ("S", "Segment Separator"),
        /// WS
        WhiteSpace => ("WS", "Whitespace"),
        /// ON
        OtherNeutral => ("ON", "Other Neutrals"),
        /// LRE
        LeftToRightEmbedding => ("LRE", "Left-to-Right Embedding"),
        /// LRO
        LeftToRightOverride => ("LRO", "Left-to-Right Override"),
        /// RLE
        RightToLeftEmbedding => ("RLE", "Right-to-Left Embedding"),
        /// RLO
        RightToLeftOverride => ("RLO", "Right-to-Left Override"),
        /// PDF
        PopDirectionalFormat => ("PDF", "Pop Directional Format"),
        /// LRI
        LeftToRightIsolate => ("LRI", "Left-to-Right Isolate"),
        /// RLI
        RightToLeftIsolate => ("RLI", "Right-to-Left Isolate"),
        /// FSI
        FirstStrongIsolate => ("FSI", "First Strong Isolate"),
        /// PDI
        PopDirectionalIsolate => ("PDI", "Pop Directional Isolate"),
    }
}

ucd_property_enum! {
    /// The kind of decomposition mapping a codepoint carries.
    ///
    /// `None` and `Canonical` have no tag in `UnicodeData.txt`; every other
    /// value is written as `<tag>` in front of the mapping.
    DecompositionType, DECOMPOSITION_TYPE_BY_CODE {
        /// No decomposition mapping.
        None => ("", "None"),
        /// Canonical decomposition, written without a tag.
        Canonical => ("canonical", "Canonical"),
        /// `<font>`
        Font => ("font", "Font variant"),
        /// `<noBreak>`
        NoBreak => ("noBreak", "No-break version of a space or hyphen"),
        /// `<initial>`
        Initial => ("initial", "Initial presentation form (Arabic)"),
        /// `<medial>`
        Medial => ("medial", "Medial presentation form (Arabic)"),
        /// `<final>`
        Final => ("final", "Final presentation form (Arabic)"),
        /// `<isolated>`
        Isolated => ("isolated", "Isolated presentation form (Arabic)"),
        /// `<circle>`
        Circle => ("circle", "Encircled form"),
        /// `<super>`
        Super => ("super", "Superscript form"),
        /// `<sub>`
        Sub => ("sub", "Subscript form"),
        /// `<vertical>`
        Vertical => ("vertical", "Vertical layout presentation form"),
        /// `<wide>`
        Wide => ("wide", "Wide (or zenkaku) compatibility character"),
        /// `<narrow>`
        Narrow => ("narrow", "Narrow (or hankaku) compatibility character"),
        /// `<small>`
        Small => ("small", "Small variant form (CNS compatibility)"),
        /// `<square>`
        Square => ("square", "CJK squared font variant"),
        /// `<fraction>`
        Fraction => ("fraction", "Vulgar fraction form"),
        /// `<compat>`
        Compat => ("compat", "Otherwise unspecified compatibility character"),
    }
}

impl DecompositionType {
    /// Whether this type is written as a `<tag>` prefix.
    pub fn is_compatibility(self) -> bool {
        !matches!(self, DecompositionType::None | DecompositionType::Canonical)
    }
}

impl Default for DecompositionType {
    fn default() -> Self {
        DecompositionType::None
    }
}

ucd_property_enum! {
    /// Which of the three numeric fields a codepoint's value lives in.
    NumericType, NUMERIC_TYPE_BY_CODE {
        /// Not numeric.
        None => ("", "None"),
        /// Decimal digit (fields 6, 7 and 8 set).
        Decimal => ("decimal", "Decimal"),
        /// Digit (fields 7 and 8 set).
        Digit => ("digit", "Digit"),
        /// Numeric (field 8 only).
        Numeric => ("numeric", "Numeric"),
    }
}

impl Default for NumericType {
    fn default() -> Self {
        NumericType::None
    }
}

const COMBINING_CLASS_NAMES: &[(u8, &str)] = &[
    (0, "Not Reordered"),
    (1, "Overlay"),
    (6, "Han Reading"),
    (7, "Nukta"),
    (8, "Kana Voicing"),
    (9, "Virama"),
    (200, "Attached Below Left"),
    (202, "Attached Below"),
    (214, "Attached Above"),
    (216, "Attached Above Right"),
    (218, "Below Left"),
    (220, "Below"),
    (222, "Below Right"),
    (224, "Left"),
    (226, "Right"),
    (228, "Above Left"),
    (230, "Above"),
    (232, "Above Right"),
    (233, "Double Below"),
    (234, "Double Above"),
    (240, "Iota Subscript"),
];

/// The descriptive name of a canonical combining class.
///
/// Classes 10 through 199 are the fixed-position classes and are named
/// `Fixed Position N`.
pub fn combining_class_name(class: u8) -> Option<String> {
    if let Ok(idx) = COMBINING_CLASS_NAMES.binary_search_by_key(&class, |&(c, _)| c) {
        return Some(COMBINING_CLASS_NAMES[idx].1.to_owned());
    }
    if (10..=199).contains(&class) {
        return Some(format!("Fixed Position {}", class));
    }
    None
}
