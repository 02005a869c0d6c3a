use std::collections::HashMap;

use quick_apply::browser::page::{Control, ItemCard, Page, RawWidget};
use quick_apply::error::DriveError;

/// One scripted form screen: its widgets and which advance controls it shows.
#[derive(Debug, Clone, Default)]
pub struct FakeScreen {
    pub widgets: Vec<RawWidget>,
    pub has_next: bool,
    pub has_review: bool,
}

impl FakeScreen {
    pub fn next_screen(widgets: Vec<RawWidget>) -> Self {
        Self {
            widgets,
            has_next: true,
            has_review: false,
        }
    }

    pub fn review_screen(widgets: Vec<RawWidget>) -> Self {
        Self {
            widgets,
            has_next: false,
            has_review: true,
        }
    }

    pub fn dead_screen() -> Self {
        Self::default()
    }
}

/// Scripted `Page` for the flow tests. Records every interaction so tests
/// can assert on clicks, keystrokes and option choices.
#[derive(Debug, Default)]
pub struct FakePage {
    pub cards: Vec<ItemCard>,
    pub screens: Vec<FakeScreen>,
    pub cursor: usize,
    pub in_review: bool,
    pub submit_clickable: bool,
    pub follow_checked: bool,
    pub has_next_page: bool,
    pub fail_open: bool,
    pub dismiss_present: bool,
    pub discard_present: bool,

    pub opened: Vec<String>,
    pub clicks: Vec<Control>,
    pub typed: HashMap<String, String>,
    pub chosen: Vec<(String, String)>,
    pub submissions: u32,
}

impl FakePage {
    pub fn with_screens(screens: Vec<FakeScreen>) -> Self {
        Self {
            screens,
            submit_clickable: true,
            ..Default::default()
        }
    }

    pub fn click_count(&self, control: Control) -> usize {
        self.clicks.iter().filter(|c| **c == control).count()
    }

    fn screen(&self) -> Option<&FakeScreen> {
        self.screens.get(self.cursor)
    }
}

impl Page for FakePage {
    fn wait_for_cards(&mut self, timeout_ms: u64) -> Result<(), DriveError> {
        if self.cards.is_empty() {
            Err(DriveError::WaitTimeout {
                what: "listing cards".into(),
                timeout_ms,
            })
        } else {
            Ok(())
        }
    }

    fn read_cards(&mut self) -> Result<Vec<ItemCard>, DriveError> {
        Ok(self.cards.clone())
    }

    fn open_card(&mut self, card: &ItemCard) -> Result<(), DriveError> {
        if self.fail_open {
            return Err(DriveError::Protocol {
                command: "open_card".into(),
                error: "card vanished".into(),
            });
        }
        self.opened.push(card.text.clone());
        // Opening a card presents a fresh form
        self.cursor = 0;
        self.in_review = false;
        Ok(())
    }

    fn read_form(&mut self) -> Result<Vec<RawWidget>, DriveError> {
        Ok(self.screen().map(|s| s.widgets.clone()).unwrap_or_default())
    }

    fn try_locate(&mut self, control: Control, _timeout_ms: u64) -> Result<bool, DriveError> {
        let present = match control {
            Control::QuickApply => !self.screens.is_empty(),
            Control::NextStep => {
                !self.in_review && self.screen().map(|s| s.has_next).unwrap_or(false)
            }
            Control::Review => {
                !self.in_review && self.screen().map(|s| s.has_review).unwrap_or(false)
            }
            Control::Submit => self.in_review && self.submit_clickable,
            Control::Dismiss => self.dismiss_present,
            Control::Discard => self.discard_present,
            Control::FollowToggle => true,
            Control::NextPage => self.has_next_page,
        };
        Ok(present)
    }

    fn click(&mut self, control: Control) -> Result<(), DriveError> {
        self.clicks.push(control);
        match control {
            Control::NextStep => self.cursor += 1,
            Control::Review => self.in_review = true,
            Control::Submit => self.submissions += 1,
            Control::Dismiss => self.dismiss_present = false,
            Control::Discard => self.discard_present = false,
            Control::FollowToggle => self.follow_checked = !self.follow_checked,
            _ => {}
        }
        Ok(())
    }

    fn type_char(&mut self, field_id: &str, ch: char) -> Result<(), DriveError> {
        self.typed.entry(field_id.to_string()).or_default().push(ch);
        Ok(())
    }

    fn clear(&mut self, field_id: &str) -> Result<(), DriveError> {
        self.typed.insert(field_id.to_string(), String::new());
        Ok(())
    }

    fn choose(&mut self, field_id: &str, option: &str) -> Result<(), DriveError> {
        self.chosen
            .push((field_id.to_string(), option.to_string()));
        Ok(())
    }

    fn is_checked(&mut self, control: Control) -> Result<bool, DriveError> {
        if control == Control::FollowToggle {
            Ok(self.follow_checked)
        } else {
            Ok(false)
        }
    }

    fn scroll_by(&mut self, _dy: i64) -> Result<(), DriveError> {
        Ok(())
    }
}
