use crate::browser::page::{Control, Page};
use crate::pacing::pacer::Pacer;

const DISMISS_WAIT_MS: u64 = 5_000;
const DISCARD_WAIT_MS: u64 = 3_000;

/// Detect and dismiss an unsolicited interstitial dialog.
///
/// Returns whether one was found and dismissed. Absence within the bound is
/// the common case, not an error, and leaves the page untouched. At most one
/// dismiss attempt plus one secondary confirmation attempt; this routine is
/// re-entrant and never recurses.
pub fn recover(page: &mut dyn Page, pacer: &Pacer) -> bool {
    match page.try_locate(Control::Dismiss, DISMISS_WAIT_MS) {
        Ok(true) => {}
        Ok(false) => return false,
        Err(e) => {
            eprintln!("recovery: dismiss probe failed: {}", e);
            return false;
        }
    }

    if let Err(e) = page.click(Control::Dismiss) {
        eprintln!("recovery: could not click dismiss: {}", e);
        return false;
    }
    println!("recovery: dismissed interstitial dialog");
    pacer.pause(5.0, 10.0);

    // Dismissal itself can raise a "discard changes" confirmation
    if let Ok(true) = page.try_locate(Control::Discard, DISCARD_WAIT_MS) {
        if page.click(Control::Discard).is_ok() {
            println!("recovery: confirmed discard");
            pacer.pause(1.0, 5.0);
        }
    }

    true
}
