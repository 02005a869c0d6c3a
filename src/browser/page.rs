use serde::{Deserialize, Serialize};

use crate::error::DriveError;

/// The named controls the session interacts with.
///
/// Everything the flow layer clicks or probes is one of these; the concrete
/// selector behind each name lives in the `Page` implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    /// Form-opening affordance on an eligible card.
    QuickApply,
    /// Advances a multi-step form to its next screen.
    NextStep,
    /// Moves the form to its final review screen.
    Review,
    /// Submits the reviewed application.
    Submit,
    /// Dismisses an unsolicited interstitial dialog.
    Dismiss,
    /// Confirms the "discard changes" dialog a dismissal can raise.
    Discard,
    /// "Follow the organization" preference toggle on the review screen.
    FollowToggle,
    /// Pagination control for the next listing page.
    NextPage,
}

/// One widget of the currently rendered form screen, as reported by the page.
#[derive(Debug, Clone, Deserialize)]
pub struct RawWidget {
    /// Structural tag: "input"/"textarea" (free text), "fieldset" (choice
    /// group), "select" (closed list).
    pub tag: String,
    #[serde(rename = "fieldId")]
    pub field_id: String,
    /// Label or legend text attached to the widget.
    #[serde(default)]
    pub label: Option<String>,
    /// Option texts for grouped widgets, in rendered order.
    #[serde(default)]
    pub options: Vec<String>,
}

/// One listing card currently rendered.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemCard {
    /// Persistent element key, when the page provides one.
    #[serde(default)]
    pub key: Option<String>,
    /// Visible text snapshot at enumeration time.
    pub text: String,
}

/// Selector hints used by the driver script to locate elements.
#[derive(Debug, Clone, Serialize)]
pub struct SelectorHint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>, // ARIA role, e.g. "button"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>, // accessible name (aria-label or visible text)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>, // element id, when the control has a stable one
}

/// The document/view collaborator.
///
/// This is the whole surface the core depends on: enumerate cards, re-read
/// the current form screen, probe/click named controls with bounded waits,
/// inject keystrokes, choose options, and scroll. How elements are rendered
/// or located is the implementation's business.
pub trait Page {
    /// Block until at least one listing card is rendered.
    fn wait_for_cards(&mut self, timeout_ms: u64) -> Result<(), DriveError>;

    /// Enumerate the currently rendered listing cards, in rendered order.
    fn read_cards(&mut self) -> Result<Vec<ItemCard>, DriveError>;

    /// Scroll a card into view and pointer-click it.
    fn open_card(&mut self, card: &ItemCard) -> Result<(), DriveError>;

    /// Re-read the widgets of the currently open form screen.
    ///
    /// Called every cycle: the underlying document can mutate between reads.
    fn read_form(&mut self) -> Result<Vec<RawWidget>, DriveError>;

    /// Wait up to `timeout_ms` for a control to become clickable.
    /// `Ok(false)` means the control never appeared; that is not an error.
    fn try_locate(&mut self, control: Control, timeout_ms: u64) -> Result<bool, DriveError>;

    /// Scroll a control into view and click it.
    fn click(&mut self, control: Control) -> Result<(), DriveError>;

    /// Send one keystroke into a form field.
    fn type_char(&mut self, field_id: &str, ch: char) -> Result<(), DriveError>;

    /// Clear a text field.
    fn clear(&mut self, field_id: &str) -> Result<(), DriveError>;

    /// Select the option of a grouped field whose text matches `option`.
    fn choose(&mut self, field_id: &str, option: &str) -> Result<(), DriveError>;

    /// Whether a toggle control is currently checked.
    fn is_checked(&mut self, control: Control) -> Result<bool, DriveError>;

    /// Scroll the listing pane down by `dy` pixels.
    fn scroll_by(&mut self, dy: i64) -> Result<(), DriveError>;
}
