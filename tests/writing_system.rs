use std::io::Write;
use std::sync::Arc;
use std::thread;
use wsdef::{
    is_custom_pua, is_private_use, is_surrogate, is_valid_single_unit,
    parse_delimited_character_list, CategoryOverrides, CustomCharacterRecord, CustomPuaSet, Error,
    GeneralCategory, JsonFileStore, LocaleIdentifier, LocalePart, SerializedProvider,
    UcdTableProvider, UnicodePropertyProvider, WritingSystemDefinition, WritingSystemStore,
};

const UNICODE_DATA: &str = "\
0041;LATIN CAPITAL LETTER A;Lu;0;L;;;;;N;;;;0061;
0031;DIGIT ONE;Nd;0;EN;;1;1;1;N;;;;;
00BD;VULGAR FRACTION ONE HALF;No;0;ON;<fraction> 0031 2044 0032;;;1/2;N;FRACTION ONE HALF;;;;
00C1;LATIN CAPITAL LETTER A WITH ACUTE;Lu;0;L;0041 0301;;;;N;LATIN CAPITAL LETTER A ACUTE;;;00E1;
0028;LEFT PARENTHESIS;Ps;0;ON;;;;;Y;OPENING PARENTHESIS;;;;
0301;COMBINING ACUTE ACCENT;Mn;230;NSM;;;;;N;NON-SPACING ACUTE;;;;
2160;ROMAN NUMERAL ONE;Nl;0;L;<compat> 0049;;;1;N;;;;2170;
# Private use
E000;<Private Use, First>;Co;0;L;;;;;N;;;;;
F8FF;<Private Use, Last>;Co;0;L;;;;;N;;;;;
";

const CUSTOM_PUA_FILE: &str = "\
E100;TONE BAR LOW;Lo;0;L;;;;;N;;;;; # User Added
E101;COMBINING DOUBLE TILDE;Mn;230;NSM;;;;;N;;;;; # User Added
E102;UNUSED LETTER;Lo;0;L;;;;;N;;;;;
";

fn provider() -> UcdTableProvider {
    let mut provider = UcdTableProvider::from_ucd_data(UNICODE_DATA).unwrap();
    provider.load_ucd_data(CUSTOM_PUA_FILE).unwrap();
    provider
}

#[test]
fn locale_parts_round_trip() {
    let provider = provider();
    for script in ["", "Latn", "Cyrl"] {
        for region in ["", "RU", "150"] {
            for variant in ["", "IPA", "x_etic"] {
                let id = LocaleIdentifier::new("ru", script, region, variant);
                assert_eq!(id, LocaleIdentifier::parts(&id.to_string(), &provider));
            }
        }
    }
    let loc = "sr_Cyrl_RS";
    assert_eq!(loc, LocaleIdentifier::with_part(loc, LocalePart::Script, "abc", &provider));
    assert_eq!(loc, LocaleIdentifier::with_part(loc, LocalePart::Region, "abcd", &provider));
    assert_eq!(
        "id_Cyrl_RS",
        LocaleIdentifier::with_part(loc, LocalePart::Language, "in", &provider)
    );
}

#[test]
fn ucd_lines_round_trip() {
    for line in UNICODE_DATA.lines().filter(|l| !l.starts_with('#')) {
        let record: CustomCharacterRecord = line.parse().unwrap();
        assert_eq!(line, record.to_string());
    }
    let record: CustomCharacterRecord = UNICODE_DATA.lines().nth(2).unwrap().parse().unwrap();
    assert_eq!("0031 2044 0032", record.decomposition());
    assert_eq!("1/2", record.numeric_value());
    assert!(matches!(
        "0041;TOO;FEW".parse::<CustomCharacterRecord>(),
        Err(Error::Format { found: 2, .. })
    ));
}

#[test]
fn provider_answers_from_its_table() {
    let provider = provider();
    let record = CustomCharacterRecord::from_provider(0xBD, &provider, false).unwrap();
    assert_eq!(UNICODE_DATA.lines().nth(2).unwrap(), record.to_string());
    assert_eq!(Ok(GeneralCategory::PrivateUse), provider.general_category(0xE050).map_err(|_| ()));
    assert!(CustomCharacterRecord::from_provider(0x11_0000, &provider, true).is_none());
}

#[test]
fn codepoint_ranges() {
    assert!(is_private_use("E000"));
    assert!(is_private_use("F8FF"));
    assert!(!is_private_use("F900"));
    assert!(is_custom_pua("EFFF"));
    assert!(!is_custom_pua("F000"));
    for code in ["D800", "DBFF", "DC00", "DFFF"] {
        assert!(is_surrogate(code));
        assert!(!is_private_use(code));
        assert!(!is_custom_pua(code));
    }
}

#[test]
fn character_list_rules() {
    let provider = provider();
    let none = CategoryOverrides::new();
    let list = parse_delimited_character_list(" a b a c \u{2028}", " ", &none, &provider);
    assert_eq!(vec![" ", "a", "b", "c", "\u{2028}"], list.accepted);

    assert!(is_valid_single_unit("A\u{301}\u{301}\u{301}", &none, &provider));
    assert!(!is_valid_single_unit("A\u{301}A", &none, &provider));
    assert!(is_valid_single_unit("A\u{301}\u{200D}\u{301}", &none, &provider));
    assert!(!is_valid_single_unit("A\u{301}\u{200D}A", &none, &provider));
}

#[test]
fn serialized_provider_is_shared_between_threads() {
    let shared = Arc::new(SerializedProvider::new(provider()));
    let handles = (0..4)
        .map(|_| {
            let shared = Arc::clone(&shared);
            thread::spawn(move || {
                let none = CategoryOverrides::new();
                (0..50).all(|_| {
                    is_valid_single_unit("A\u{301}", &none, &*shared)
                        && shared.general_category(0x41).ok()
                            == Some(GeneralCategory::UppercaseLetter)
                })
            })
        })
        .collect::<Vec<_>>();
    for handle in handles {
        assert!(handle.join().unwrap());
    }
    let provider = Arc::try_unwrap(shared).unwrap().into_inner();
    assert_eq!(Some("LATIN CAPITAL LETTER A"), provider.record(0x41).map(|r| r.name()));
}

#[test]
fn edit_and_save_through_json_store() {
    let provider = provider();
    let dir = tempfile::tempdir().unwrap();
    let mut pua_file = tempfile::NamedTempFile::new_in(dir.path()).unwrap();
    pua_file.write_all(CUSTOM_PUA_FILE.as_bytes()).unwrap();
    let discovered = CustomPuaSet::load(pua_file.path()).unwrap();
    assert_eq!(vec![0xE100, 0xE101], discovered.iter().collect::<Vec<_>>());

    let store_path = dir.path().join("writing-systems.json");
    let mut store = JsonFileStore::open(&store_path).unwrap();

    let mut def = WritingSystemDefinition::new();
    def.set_language("fr", &provider);
    def.set_region("fr", &provider);
    def.refresh_display_names(&provider, "en").unwrap();
    assert_eq!("French (France)", def.display_name());
    def.set_fonts(vec!["Charis SIL".to_owned(), "Doulos SIL".to_owned()]);

    let rejected = def.apply_valid_characters(
        "a \u{E100} \u{E101} \u{E102} A\u{301} ab",
        " ",
        &discovered,
        &provider,
    );
    assert_eq!(vec!["\u{E101}", "ab"], rejected);
    assert_eq!("a \u{E100} \u{E102} A\u{301}", def.valid_chars());
    assert_eq!(1, def.pua_chars().len());
    assert_eq!("TONE BAR LOW", def.pua_char(0xE100).unwrap().name());

    assert!(def.save_to_store(&mut store, "fr_FR", false).unwrap());
    assert!(store_path.exists());

    let store = JsonFileStore::open(&store_path).unwrap();
    let ws = store.get("fr_FR").unwrap();
    assert_eq!(Some("French (France)"), ws.name("en"));
    assert_eq!("Charis SIL", ws.fonts()[0]);

    let loaded = WritingSystemDefinition::from_store(&store, "fr_FR", "en", &provider).unwrap();
    assert_eq!(def.valid_chars(), loaded.valid_chars());
    assert_eq!("French (France)", loaded.display_name());
    assert!(!loaded.has_pending_rename());
}

#[test]
fn definition_survives_json() {
    let provider = provider();
    let mut def = WritingSystemDefinition::new();
    def.set_locale("en_US");
    def.add_pua_char(CustomCharacterRecord::from_provider(0xE101, &provider, false).unwrap());
    def.set_right_to_left(true);
    let json = def.to_json().unwrap();
    let back = WritingSystemDefinition::from_json(&json).unwrap();
    assert_eq!(def, back);
    assert_eq!(
        Some(GeneralCategory::NonSpacingMark),
        back.category_overrides().get(0xE101)
    );
}
