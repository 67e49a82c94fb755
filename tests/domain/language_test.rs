use papyrus::domain::{InvalidLanguage, Language};

#[test]
fn given_single_code_when_parsing_then_succeeds() {
    let language = Language::parse("eng").unwrap();
    assert_eq!(language.as_str(), "eng");
}

#[test]
fn given_combined_codes_when_parsing_then_succeeds() {
    let language = Language::parse("eng+deu+chi_sim").unwrap();
    assert_eq!(language.to_string(), "eng+deu+chi_sim");
}

#[test]
fn given_surrounding_whitespace_when_parsing_then_code_is_trimmed() {
    assert_eq!(Language::parse("  fra \n").unwrap().as_str(), "fra");
}

#[test]
fn given_malformed_codes_when_parsing_then_returns_invalid_language() {
    for raw in ["", "   ", "eng+", "+eng", "eng++deu", "-l eng", "eng;rm -rf", "../eng"] {
        assert_eq!(
            Language::parse(raw),
            Err(InvalidLanguage(raw.to_string())),
            "{raw:?} should be rejected"
        );
    }
}
