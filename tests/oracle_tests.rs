use quick_apply::oracle::client::{Answer, Oracle, ScriptedOracle, first_numeric_token};

// =========================================================================
// first_numeric_token extraction
// =========================================================================

#[test]
fn numeric_token_plain_digits() {
    assert_eq!(
        first_numeric_token("I would say 5 years of experience"),
        Some("5".into()),
        "Bare digit surrounded by prose"
    );
    assert_eq!(
        first_numeric_token("around 42."),
        Some("42".into()),
        "Trailing punctuation is not part of the token"
    );
}

#[test]
fn numeric_token_thousands_separators() {
    assert_eq!(
        first_numeric_token("My expected salary is 100,000 per year"),
        Some("100,000".into()),
        "Comma groups of three digits extend the token"
    );
    assert_eq!(
        first_numeric_token("roughly 1,23,456 rupees"),
        Some("1,23,456".into()),
        "Two-digit separator groups are accepted too"
    );
}

#[test]
fn numeric_token_malformed_group_stops() {
    assert_eq!(
        first_numeric_token("12,3x"),
        Some("12".into()),
        "A one-digit comma group ends the token before the comma"
    );
    assert_eq!(
        first_numeric_token("7,1234"),
        Some("7".into()),
        "A four-digit comma group ends the token before the comma"
    );
}

#[test]
fn numeric_token_takes_first_of_several() {
    assert_eq!(
        first_numeric_token("between 3 and 5 years"),
        Some("3".into()),
        "Only the first maximal token is taken"
    );
}

#[test]
fn numeric_token_absent() {
    assert_eq!(first_numeric_token(""), None, "Empty response");
    assert_eq!(
        first_numeric_token("I have no idea, sorry"),
        None,
        "Prose without digits"
    );
}

// =========================================================================
// Answer sentinel
// =========================================================================

#[test]
fn unknown_answer_renders_as_literal_text() {
    let answer = Answer::Unknown;
    assert!(answer.is_unknown());
    assert_eq!(
        answer.as_text(),
        "N/A",
        "The sentinel still produces typeable input"
    );
}

#[test]
fn text_answer_passes_through() {
    let answer = Answer::Text("7".into());
    assert!(!answer.is_unknown());
    assert_eq!(answer.as_text(), "7");
}

// =========================================================================
// Scripted oracle
// =========================================================================

#[test]
fn scripted_oracle_unknown_everywhere() {
    let oracle = ScriptedOracle::unknown();
    assert!(oracle.ask_open("How many years?").is_unknown());
    assert!(
        oracle
            .ask_choice("Authorized to work?", &["Yes".into(), "No".into()])
            .is_unknown()
    );
}

#[test]
fn scripted_oracle_canned_replies() {
    let oracle = ScriptedOracle::with_replies("3", "Yes");
    assert_eq!(oracle.ask_open("Years of experience?").as_text(), "3");
    assert_eq!(
        oracle
            .ask_choice("Authorized?", &["Yes".into(), "No".into()])
            .as_text(),
        "Yes"
    );
}
