use std::collections::HashSet;

use crate::{
    browser::page::{Control, Page},
    flow::{recovery::recover, walker::scan_page},
    oracle::client::Oracle,
    pacing::pacer::{Cooldown, Pacer},
    record::log::ApplicationLog,
    trace::{logger::TraceLog, trace::SessionEvent},
};

pub mod browser;
pub mod cli;
pub mod error;
pub mod flow;
pub mod form;
pub mod oracle;
pub mod pacing;
pub mod record;
pub mod trace;

const CARDS_WAIT_MS: u64 = 15_000;
const NEXT_PAGE_WAIT_MS: u64 = 5_000;
const SCROLL_STEP_PX: i64 = 2_000;

/// Bounds and knobs for one run.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Display-text marker an item must carry to be eligible.
    pub marker: String,
    /// Stop after this many listing pages (None walks to the last page).
    pub max_pages: Option<u32>,
    /// CSV file submissions are appended to.
    pub records_path: String,
    /// JSONL trace file; None disables tracing.
    pub trace_path: Option<String>,
    /// Multiplier on every randomized pause.
    pub pace_scale: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            marker: "Easy Apply".to_string(),
            max_pages: None,
            records_path: "applied_jobs.csv".to_string(),
            trace_path: Some("apply_trace.jsonl".to_string()),
            pace_scale: 1.0,
        }
    }
}

/// Totals reported when a run ends.
#[derive(Debug, Default, Clone, Copy)]
pub struct SessionSummary {
    pub pages: u32,
    pub submitted: u32,
    pub abandoned: u32,
}

/// Walk the listing page by page until no next-page control remains.
///
/// Owns the run state: the visited set (lent to the walker each pass) and
/// the record log. A page where no card renders within the bound is skipped,
/// not fatal; absence of the next-page control is the sole normal
/// termination. A long cooldown fires every 2..=6 pages to keep the pacing
/// human.
pub fn run_session(
    page: &mut dyn Page,
    oracle: &dyn Oracle,
    config: &SessionConfig,
) -> Result<SessionSummary, error::DriveError> {
    let pacer = Pacer::scaled(config.pace_scale);
    let trace = TraceLog::open(config.trace_path.as_deref());
    let mut log = ApplicationLog::open(&config.records_path)?;

    let mut visited: HashSet<String> = HashSet::new();
    let mut cooldown = Cooldown::new();
    let mut summary = SessionSummary::default();
    let mut page_no: u32 = 1;

    loop {
        println!("=== Page {} ===", page_no);
        trace.record(&SessionEvent::new(page_no, "page_start"));

        if let Err(e) = page.wait_for_cards(CARDS_WAIT_MS) {
            // A page that never renders is skipped, not fatal to the run
            eprintln!("driver: no cards rendered on page {}: {}", page_no, e);
            trace.record(&SessionEvent::new(page_no, "page_empty").with_detail(e.to_string()));
            if !advance_page(page, &pacer) {
                break;
            }
            page_no += 1;
            continue;
        }

        // Drain the page: re-walk until a pass finds nothing new
        loop {
            let pass = scan_page(
                page,
                oracle,
                &pacer,
                &mut log,
                &trace,
                &mut visited,
                &config.marker,
                page_no,
            );
            summary.submitted += pass.submitted;
            summary.abandoned += pass.abandoned;

            if let Err(e) = page.scroll_by(SCROLL_STEP_PX) {
                eprintln!("driver: scroll failed: {}", e);
            }
            pacer.pause(2.0, 6.0);

            if !pass.new_found {
                break;
            }
        }

        summary.pages += 1;
        if let Some(max) = config.max_pages {
            if summary.pages >= max {
                println!("driver: reached the page limit ({})", max);
                break;
            }
        }

        if !advance_page(page, &pacer) {
            break;
        }
        page_no += 1;

        if cooldown.tick() {
            println!(
                "driver: cooling down ({} submitted so far)",
                summary.submitted
            );
            pacer.long_pause();
        }
    }

    println!(
        "driver: run complete: {} page(s), {} submitted, {} abandoned",
        summary.pages, summary.submitted, summary.abandoned
    );
    trace.record(
        &SessionEvent::new(page_no, "run_end").with_detail(format!(
            "pages={} submitted={} abandoned={}",
            summary.pages, summary.submitted, summary.abandoned
        )),
    );
    Ok(summary)
}

/// Click through to the next listing page. Returns false when there is no
/// next page, which is the run's normal end.
fn advance_page(page: &mut dyn Page, pacer: &Pacer) -> bool {
    match page.try_locate(Control::NextPage, NEXT_PAGE_WAIT_MS) {
        Ok(true) => {}
        Ok(false) => {
            println!("driver: no next-page control, ending run");
            return false;
        }
        Err(e) => {
            eprintln!("driver: next-page probe failed: {}", e);
            recover(page, pacer);
            return false;
        }
    }

    if let Err(e) = page.click(Control::NextPage) {
        eprintln!("driver: could not click next page: {}", e);
        recover(page, pacer);
        return false;
    }
    pacer.pause(5.0, 10.0);
    true
}
