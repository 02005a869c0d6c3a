use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

/// One line of the session trace: what happened, on which page, to which item.
#[derive(Debug, Serialize)]
pub struct SessionEvent {
    pub timestamp_ms: u128,
    pub page: u32,
    pub event: String,

    pub item: Option<String>,
    pub state: Option<String>,
    pub control: Option<String>,
    pub detail: Option<String>,
}

impl SessionEvent {
    pub fn new(page: u32, event: impl ToString) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or(0),
            page,
            event: event.to_string(),
            item: None,
            state: None,
            control: None,
            detail: None,
        }
    }

    pub fn with_item(mut self, identity: &str) -> Self {
        self.item = Some(identity.to_string());
        self
    }

    pub fn with_state(mut self, state: impl std::fmt::Debug) -> Self {
        self.state = Some(format!("{:?}", state));
        self
    }

    pub fn with_control(mut self, control: impl std::fmt::Debug) -> Self {
        self.control = Some(format!("{:?}", control));
        self
    }

    pub fn with_detail(mut self, detail: impl ToString) -> Self {
        self.detail = Some(detail.to_string());
        self
    }
}
