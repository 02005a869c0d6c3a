use quick_apply::browser::page::RawWidget;
use quick_apply::form::field::{Field, classify, option_matches, pick_closed_option};
use quick_apply::form::filler::fill_screen;
use quick_apply::oracle::client::ScriptedOracle;
use quick_apply::pacing::pacer::Pacer;

use crate::common::fake_page::{FakePage, FakeScreen};
use crate::common::utils::{choice_widget, select_widget, text_widget};

mod common;

// =========================================================================
// Classification
// =========================================================================

#[test]
fn classify_covers_all_three_kinds() {
    let widgets = vec![
        text_widget("f1", "Years of experience"),
        choice_widget("f2", "Are you authorized to work?", &["Yes", "No"]),
        select_widget("f3", &["Select an option", "Yes", "No"]),
    ];

    let fields = classify(&widgets);
    assert_eq!(fields.len(), 3, "Every recognized widget becomes a field");

    assert!(
        matches!(&fields[0], Field::Text { label, .. } if label == "Years of experience"),
        "Input widget classifies as Text"
    );
    assert!(
        matches!(&fields[1], Field::ChoiceGroup { options, .. } if options.len() == 2),
        "Fieldset widget classifies as ChoiceGroup"
    );
    assert!(
        matches!(&fields[2], Field::ClosedList { options, .. } if options.len() == 3),
        "Select widget classifies as ClosedList"
    );
}

#[test]
fn classify_drops_incomplete_widgets() {
    let widgets = vec![
        RawWidget {
            tag: "input".into(),
            field_id: "f1".into(),
            label: None,
            options: vec![],
        },
        RawWidget {
            tag: "fieldset".into(),
            field_id: "f2".into(),
            label: Some("Question without options".into()),
            options: vec![],
        },
        RawWidget {
            tag: "fieldset".into(),
            field_id: "f3".into(),
            label: Some("   ".into()),
            options: vec!["Yes".into()],
        },
        RawWidget {
            tag: "select".into(),
            field_id: "f4".into(),
            label: None,
            options: vec![],
        },
        RawWidget {
            tag: "div".into(),
            field_id: "f5".into(),
            label: Some("Decoration".into()),
            options: vec![],
        },
    ];

    assert!(
        classify(&widgets).is_empty(),
        "Unlabeled, optionless and unrecognized widgets are dropped"
    );
}

#[test]
fn textarea_classifies_as_text() {
    let widgets = vec![RawWidget {
        tag: "textarea".into(),
        field_id: "cover".into(),
        label: Some("Why do you want this role?".into()),
        options: vec![],
    }];
    assert!(matches!(&classify(&widgets)[0], Field::Text { .. }));
}

// =========================================================================
// Option matching
// =========================================================================

#[test]
fn option_matching_is_case_and_space_insensitive() {
    assert!(option_matches("Yes", " yes "));
    assert!(option_matches("No ", "no"));
    assert!(!option_matches("Yes", "No"));
    assert!(!option_matches("Yes", "Yes, absolutely"));
}

// =========================================================================
// Closed-list policy
// =========================================================================

#[test]
fn closed_list_prefers_yes() {
    let options: Vec<String> = vec!["Select an option".into(), "No".into(), "Yes".into()];
    assert_eq!(
        pick_closed_option(&options),
        Some("Yes"),
        "A 'yes' option wins regardless of position"
    );
}

#[test]
fn closed_list_falls_back_to_first_real_option() {
    let options: Vec<String> = vec!["Select an option".into(), "Maybe".into()];
    assert_eq!(
        pick_closed_option(&options),
        Some("Maybe"),
        "Without 'yes', the first non-placeholder option is taken"
    );
}

#[test]
fn closed_list_all_placeholders_selects_nothing() {
    let options: Vec<String> = vec!["Select an option".into()];
    assert_eq!(pick_closed_option(&options), None);
}

#[test]
fn closed_list_yes_matching_ignores_case() {
    let options: Vec<String> = vec!["select an option".into(), "YES".into()];
    assert_eq!(pick_closed_option(&options), Some("YES"));
}

// =========================================================================
// fill_screen
// =========================================================================

#[test]
fn fill_screen_runs_one_strategy_per_field() {
    let mut page = FakePage::with_screens(vec![FakeScreen::review_screen(vec![
        text_widget("f1", "Years of experience"),
        choice_widget("f2", "Are you authorized to work?", &["Yes", "No "]),
        select_widget("f3", &["Select an option", "Remote", "On-site"]),
    ])]);
    let oracle = ScriptedOracle::with_replies("5", " yes ");
    let pacer = Pacer::instant();

    fill_screen(&mut page, &oracle, &pacer);

    assert_eq!(
        page.typed.get("f1").map(String::as_str),
        Some("5"),
        "Text field receives the open answer, typed in full"
    );
    assert_eq!(
        page.chosen,
        vec![
            ("f2".to_string(), "Yes".to_string()),
            ("f3".to_string(), "Remote".to_string()),
        ],
        "Choice group matches case/space-insensitively; closed list picks deterministically"
    );
}

#[test]
fn fill_screen_unknown_oracle_still_types_sentinel() {
    let mut page = FakePage::with_screens(vec![FakeScreen::review_screen(vec![
        text_widget("f1", "Expected salary"),
        choice_widget("f2", "Willing to relocate?", &["Yes", "No"]),
    ])]);
    let oracle = ScriptedOracle::unknown();
    let pacer = Pacer::instant();

    fill_screen(&mut page, &oracle, &pacer);

    assert_eq!(
        page.typed.get("f1").map(String::as_str),
        Some("N/A"),
        "An unknown answer is typed verbatim rather than left empty"
    );
    assert!(
        page.chosen.is_empty(),
        "An unknown choice answer leaves the group unselected"
    );
}

#[test]
fn fill_screen_unmatched_choice_is_soft_failure() {
    let mut page = FakePage::with_screens(vec![FakeScreen::review_screen(vec![choice_widget(
        "f1",
        "Notice period?",
        &["One month", "Two months"],
    )])]);
    let oracle = ScriptedOracle::with_replies("", "Three months");
    let pacer = Pacer::instant();

    fill_screen(&mut page, &oracle, &pacer);

    assert!(
        page.chosen.is_empty(),
        "An answer matching no option leaves the group unselected"
    );
}
