use std::collections::HashSet;

use crate::browser::page::{Control, ItemCard, Page};
use crate::flow::recovery::recover;
use crate::flow::step::{FormContext, StepState, drive_form};
use crate::oracle::client::Oracle;
use crate::pacing::pacer::Pacer;
use crate::record::log::ApplicationLog;
use crate::trace::{logger::TraceLog, trace::SessionEvent};

const OPEN_WAIT_MS: u64 = 5_000;

/// Counters from one walk of the rendered listing.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassOutcome {
    /// Whether this pass found any item it had not seen before.
    pub new_found: bool,
    pub submitted: u32,
    pub abandoned: u32,
}

/// Stable identity for a card: its persistent key when the page provides
/// one, else a fingerprint of the visible text snapshot.
pub fn item_identity(card: &ItemCard) -> String {
    match &card.key {
        Some(key) if !key.is_empty() => key.clone(),
        _ => text_fingerprint(&card.text),
    }
}

pub fn text_fingerprint(text: &str) -> String {
    use sha1::{Digest, Sha1};

    let mut hasher = Sha1::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Walk the currently rendered cards once.
///
/// Cards are re-enumerated fresh on every pass (the rendered set shifts as
/// the listing scrolls). Visited and ineligible cards are skipped; an
/// identity is marked visited *before* its card is opened so a crash
/// mid-open can never retry the same item. Every per-item failure is logged
/// and skipped, never escalated.
pub fn scan_page(
    page: &mut dyn Page,
    oracle: &dyn Oracle,
    pacer: &Pacer,
    log: &mut ApplicationLog,
    trace: &TraceLog,
    visited: &mut HashSet<String>,
    marker: &str,
    page_no: u32,
) -> PassOutcome {
    let mut outcome = PassOutcome::default();

    let cards = match page.read_cards() {
        Ok(cards) => cards,
        Err(e) => {
            eprintln!("walker: could not enumerate cards: {}", e);
            recover(page, pacer);
            return outcome;
        }
    };

    for card in &cards {
        let id = item_identity(card);
        if visited.contains(&id) || !card.text.contains(marker) {
            continue;
        }
        visited.insert(id.clone());
        outcome.new_found = true;

        if let Err(e) = page.open_card(card) {
            eprintln!("walker: could not open card {}: {}", id, e);
            continue;
        }
        println!("walker: opened card {}", id);
        pacer.pause(3.0, 6.0);

        match page.try_locate(Control::QuickApply, OPEN_WAIT_MS) {
            Ok(true) => {}
            Ok(false) => {
                println!("walker: card {} has no apply control, skipping", id);
                continue;
            }
            Err(e) => {
                eprintln!("walker: apply probe failed for {}: {}", id, e);
                recover(page, pacer);
                continue;
            }
        }

        pacer.pause(2.0, 4.0);
        if let Err(e) = page.click(Control::QuickApply) {
            eprintln!("walker: could not open the form for {}: {}", id, e);
            recover(page, pacer);
            continue;
        }
        // Allow the form dialog to load
        pacer.pause(2.0, 5.0);
        trace.record(&SessionEvent::new(page_no, "form_opened").with_item(&id));

        let mut ctx = FormContext {
            oracle,
            pacer,
            log: &mut *log,
            trace,
            page_no,
            item_id: &id,
            item_text: &card.text,
        };
        match drive_form(page, &mut ctx) {
            StepState::Submitted => outcome.submitted += 1,
            _ => outcome.abandoned += 1,
        }
    }

    outcome
}
