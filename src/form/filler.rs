use crate::browser::page::Page;
use crate::error::DriveError;
use crate::flow::recovery::recover;
use crate::form::field::{Field, classify, option_matches, pick_closed_option};
use crate::oracle::client::Oracle;
use crate::pacing::pacer::Pacer;

/// Fill every field of the currently rendered form screen.
///
/// Never fails the caller: each field's strategy runs in its own scope, and
/// any error is logged, answered with one interstitial-recovery attempt (an
/// unexpected popup is the usual culprit) and skipped. The screen is re-read
/// on every call since the document can mutate between cycles.
pub fn fill_screen(page: &mut dyn Page, oracle: &dyn Oracle, pacer: &Pacer) {
    let widgets = match page.read_form() {
        Ok(w) => w,
        Err(e) => {
            eprintln!("form: could not read screen: {}", e);
            recover(page, pacer);
            return;
        }
    };

    let fields = classify(&widgets);
    for field in &fields {
        let outcome = match field {
            Field::Text { field_id, label } => fill_text(page, oracle, pacer, field_id, label),
            Field::ChoiceGroup {
                field_id,
                question,
                options,
            } => fill_choice(page, oracle, pacer, field_id, question, options),
            Field::ClosedList { field_id, options } => {
                fill_closed(page, pacer, field_id, options)
            }
        };

        if let Err(e) = outcome {
            eprintln!("form: field skipped: {}", e);
            recover(page, pacer);
        }
    }

    // Emulate a human reading the completed screen
    pacer.pause(2.0, 5.0);
}

/// Ask the oracle the label's question and type the answer.
///
/// An unknown answer is still typed verbatim ("N/A") so the field always
/// receives some input. Typing is per-character with randomized gaps.
fn fill_text(
    page: &mut dyn Page,
    oracle: &dyn Oracle,
    pacer: &Pacer,
    field_id: &str,
    label: &str,
) -> Result<(), DriveError> {
    let answer = oracle.ask_open(label);
    println!("form: '{}' -> '{}'", label, answer.as_text());

    page.clear(field_id)?;
    for ch in answer.as_text().chars() {
        page.type_char(field_id, ch)?;
        pacer.keystroke_gap();
    }
    pacer.pause(1.0, 3.0);
    Ok(())
}

/// Ask the oracle to pick among the group's options and click the match.
///
/// No matching option is a soft failure: the group is left unselected and
/// the step continues.
fn fill_choice(
    page: &mut dyn Page,
    oracle: &dyn Oracle,
    pacer: &Pacer,
    field_id: &str,
    question: &str,
    options: &[String],
) -> Result<(), DriveError> {
    let answer = oracle.ask_choice(question, options);
    if answer.is_unknown() {
        println!("form: no answer for '{}', leaving group unselected", question);
        return Ok(());
    }

    match options.iter().find(|o| option_matches(o, answer.as_text())) {
        Some(option) => {
            page.choose(field_id, option)?;
            println!("form: selected '{}' for '{}'", option, question);
            pacer.pause(1.0, 3.0);
        }
        None => {
            println!(
                "form: no option matching '{}' for '{}'",
                answer.as_text(),
                question
            );
        }
    }
    Ok(())
}

/// Closed lists are filled without the oracle.
fn fill_closed(
    page: &mut dyn Page,
    pacer: &Pacer,
    field_id: &str,
    options: &[String],
) -> Result<(), DriveError> {
    match pick_closed_option(options) {
        Some(option) => {
            page.choose(field_id, option)?;
            pacer.pause(1.0, 3.0);
        }
        None => {
            println!("form: every option is a placeholder, leaving list unset");
        }
    }
    Ok(())
}
