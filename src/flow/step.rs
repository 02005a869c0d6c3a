use crate::browser::page::{Control, Page};
use crate::error::DriveError;
use crate::flow::recovery::recover;
use crate::form::filler::fill_screen;
use crate::oracle::client::Oracle;
use crate::pacing::pacer::Pacer;
use crate::record::log::{ApplicationLog, ApplicationRecord};
use crate::trace::{logger::TraceLog, trace::SessionEvent};

/// Ceiling on fill→advance cycles for one form. A form that never stops
/// producing next-step screens is abandoned instead of looped.
pub const MAX_FORM_STEPS: u32 = 25;

const SUBMIT_WAIT_MS: u64 = 5_000;

/// States of one form instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepState {
    Filling,
    Review,
    Submitted,
    Abandoned,
}

/// Result of one fill→advance cycle.
#[derive(Debug, PartialEq, Eq)]
pub enum StepAdvance {
    /// More screens remain; the caller re-invokes.
    Continue,
    /// The form reached a terminal state.
    Finished(StepState),
}

/// Everything one item's form run needs besides the page.
pub struct FormContext<'a> {
    pub oracle: &'a dyn Oracle,
    pub pacer: &'a Pacer,
    pub log: &'a mut ApplicationLog,
    pub trace: &'a TraceLog,
    pub page_no: u32,
    pub item_id: &'a str,
    /// Display text captured when the item was opened; the first lines
    /// become the record on submission.
    pub item_text: &'a str,
}

/// One fill→advance cycle of the open form.
///
/// Fills the current screen, then probes in order, first match wins: a
/// next-step control keeps the machine in Filling; a review control moves it
/// through Review toward Submitted; neither present means the screen cannot
/// be advanced and the item is abandoned after a recovery attempt.
pub fn advance_step(page: &mut dyn Page, ctx: &mut FormContext) -> StepAdvance {
    ctx.pacer.pause(2.0, 4.0);
    fill_screen(page, ctx.oracle, ctx.pacer);

    match probe_and_click(page, Control::NextStep) {
        Ok(true) => {
            ctx.pacer.pause(2.0, 5.0);
            ctx.trace.record(
                &SessionEvent::new(ctx.page_no, "step_advanced")
                    .with_item(ctx.item_id)
                    .with_state(StepState::Filling),
            );
            return StepAdvance::Continue;
        }
        Ok(false) => {}
        Err(e) => {
            eprintln!("step: next-step probe failed: {}", e);
            recover(page, ctx.pacer);
            return finish(ctx, StepState::Abandoned);
        }
    }

    match probe_and_click(page, Control::Review) {
        Ok(true) => {
            ctx.pacer.pause(2.0, 5.0);
            let state = review_and_submit(page, ctx);
            return finish(ctx, state);
        }
        Ok(false) => {}
        Err(e) => {
            eprintln!("step: review probe failed: {}", e);
        }
    }

    println!("step: no advance control on this screen, abandoning item");
    recover(page, ctx.pacer);
    finish(ctx, StepState::Abandoned)
}

/// Drive one opened form to a terminal state.
pub fn drive_form(page: &mut dyn Page, ctx: &mut FormContext) -> StepState {
    for _ in 0..MAX_FORM_STEPS {
        match advance_step(page, ctx) {
            StepAdvance::Continue => {}
            StepAdvance::Finished(state) => return state,
        }
    }

    eprintln!("step: form exceeded {} screens, abandoning", MAX_FORM_STEPS);
    recover(page, ctx.pacer);
    StepState::Abandoned
}

/// Immediate presence probe followed by a click.
fn probe_and_click(page: &mut dyn Page, control: Control) -> Result<bool, DriveError> {
    if !page.try_locate(control, 0)? {
        return Ok(false);
    }
    page.click(control)?;
    Ok(true)
}

/// Review screen: wait for submit, drop the follow preference, submit,
/// record, and clear any post-submission dialog.
fn review_and_submit(page: &mut dyn Page, ctx: &mut FormContext) -> StepState {
    match page.try_locate(Control::Submit, SUBMIT_WAIT_MS) {
        Ok(true) => {}
        Ok(false) => {
            eprintln!("step: submit never became clickable");
            recover(page, ctx.pacer);
            return StepState::Abandoned;
        }
        Err(e) => {
            eprintln!("step: submit probe failed: {}", e);
            recover(page, ctx.pacer);
            return StepState::Abandoned;
        }
    }

    uncheck_follow_toggle(page);
    ctx.pacer.pause(5.0, 10.0);

    if let Err(e) = page.click(Control::Submit) {
        eprintln!("step: submit click failed: {}", e);
        recover(page, ctx.pacer);
        return StepState::Abandoned;
    }
    println!("step: application submitted");

    let record = ApplicationRecord::from_item_text(ctx.item_text);
    if let Err(e) = ctx.log.append(&record) {
        // The submission already happened; losing the record must not end the run
        eprintln!("records: {}", e);
    }

    ctx.pacer.pause(15.0, 20.0);
    // Post-submission confirmation dialogs are common
    recover(page, ctx.pacer);
    StepState::Submitted
}

/// Best-effort: failure here never blocks submission.
fn uncheck_follow_toggle(page: &mut dyn Page) {
    match page.is_checked(Control::FollowToggle) {
        Ok(true) => match page.click(Control::FollowToggle) {
            Ok(()) => println!("step: unchecked follow toggle"),
            Err(e) => eprintln!("step: could not uncheck follow toggle: {}", e),
        },
        Ok(false) => {}
        Err(e) => eprintln!("step: follow toggle unavailable: {}", e),
    }
}

fn finish(ctx: &FormContext, state: StepState) -> StepAdvance {
    ctx.trace.record(
        &SessionEvent::new(ctx.page_no, "step_terminal")
            .with_item(ctx.item_id)
            .with_state(state),
    );
    StepAdvance::Finished(state)
}
