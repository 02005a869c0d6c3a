use std::io::{BufRead, BufReader, Write};
use std::process::{Child, Command, Stdio};

use serde::{Deserialize, Serialize};

use crate::browser::page::{Control, ItemCard, Page, RawWidget, SelectorHint};
use crate::error::DriveError;

/// Request sent to the driver script over stdin (one JSON line).
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum DriverRequest {
    WaitCards {
        cmd: &'static str,
        timeout_ms: u64,
    },
    ReadCards {
        cmd: &'static str,
    },
    ReadForm {
        cmd: &'static str,
    },
    OpenCard {
        cmd: &'static str,
        #[serde(skip_serializing_if = "Option::is_none")]
        key: Option<String>,
        text: String,
    },
    Locate {
        cmd: &'static str,
        selector: SelectorHint,
        timeout_ms: u64,
    },
    Click {
        cmd: &'static str,
        selector: SelectorHint,
    },
    Type {
        cmd: &'static str,
        field_id: String,
        text: String,
    },
    Clear {
        cmd: &'static str,
        field_id: String,
    },
    Choose {
        cmd: &'static str,
        field_id: String,
        option: String,
    },
    Checked {
        cmd: &'static str,
        selector: SelectorHint,
    },
    Scroll {
        cmd: &'static str,
        dy: i64,
    },
    Quit {
        cmd: &'static str,
    },
}

impl DriverRequest {
    pub fn wait_cards(timeout_ms: u64) -> Self {
        DriverRequest::WaitCards {
            cmd: "wait_cards",
            timeout_ms,
        }
    }

    pub fn read_cards() -> Self {
        DriverRequest::ReadCards { cmd: "read_cards" }
    }

    pub fn read_form() -> Self {
        DriverRequest::ReadForm { cmd: "read_form" }
    }

    pub fn open_card(card: &ItemCard) -> Self {
        DriverRequest::OpenCard {
            cmd: "open_card",
            key: card.key.clone(),
            text: card.text.clone(),
        }
    }

    pub fn locate(selector: SelectorHint, timeout_ms: u64) -> Self {
        DriverRequest::Locate {
            cmd: "locate",
            selector,
            timeout_ms,
        }
    }

    pub fn click(selector: SelectorHint) -> Self {
        DriverRequest::Click {
            cmd: "click",
            selector,
        }
    }

    pub fn type_text(field_id: &str, text: &str) -> Self {
        DriverRequest::Type {
            cmd: "type",
            field_id: field_id.to_string(),
            text: text.to_string(),
        }
    }

    pub fn clear(field_id: &str) -> Self {
        DriverRequest::Clear {
            cmd: "clear",
            field_id: field_id.to_string(),
        }
    }

    pub fn choose(field_id: &str, option: &str) -> Self {
        DriverRequest::Choose {
            cmd: "choose",
            field_id: field_id.to_string(),
            option: option.to_string(),
        }
    }

    pub fn checked(selector: SelectorHint) -> Self {
        DriverRequest::Checked {
            cmd: "checked",
            selector,
        }
    }

    pub fn scroll(dy: i64) -> Self {
        DriverRequest::Scroll { cmd: "scroll", dy }
    }

    pub fn quit() -> Self {
        DriverRequest::Quit { cmd: "quit" }
    }
}

/// Response received from the driver script over stdout (one JSON line).
#[derive(Debug, Deserialize)]
pub struct DriverResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub ready: Option<bool>,
    #[serde(default)]
    pub found: Option<bool>,
    #[serde(default)]
    pub checked: Option<bool>,
    #[serde(default)]
    pub cards: Option<Vec<ItemCard>>,
    #[serde(default)]
    pub widgets: Option<Vec<RawWidget>>,
}

/// Selector behind each named control.
///
/// Labels are the accessible names the listing site renders; the quick-apply
/// button and the follow toggle carry stable element ids instead.
pub fn hint_for(control: Control) -> SelectorHint {
    let (role, name, id) = match control {
        Control::QuickApply => (None, None, Some("jobs-apply-button-id")),
        Control::NextStep => (Some("button"), Some("Continue to next step"), None),
        Control::Review => (Some("button"), Some("Review your application"), None),
        Control::Submit => (Some("button"), Some("Submit application"), None),
        Control::Dismiss => (Some("button"), Some("Dismiss"), None),
        Control::Discard => (Some("button"), Some("Discard"), None),
        Control::FollowToggle => (None, None, Some("follow-company-checkbox")),
        Control::NextPage => (Some("button"), Some("View next page"), None),
    };
    SelectorHint {
        role: role.map(|s: &str| s.to_string()),
        name: name.map(|s: &str| s.to_string()),
        id: id.map(|s: &str| s.to_string()),
    }
}

/// A persistent browser session backed by a Node.js driver script.
///
/// The script attaches to an already-authenticated browser (session
/// bootstrap happens before this process starts) and keeps it open for the
/// whole run. Commands are sent as NDJSON over stdin, responses read from
/// stdout. Scroll-into-view before click and pointer-move clicks on cards
/// are the script's responsibility.
pub struct BrowserSession {
    child: Child,
    stdin: std::process::ChildStdin,
    reader: BufReader<std::process::ChildStdout>,
}

impl BrowserSession {
    /// Launch a session by spawning the driver script.
    pub fn launch(script: &str) -> Result<Self, DriveError> {
        let mut child = Command::new("node")
            .arg(script)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| DriveError::SubprocessSpawn {
                script: script.to_string(),
                source: e,
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| DriveError::SessionIo("Failed to capture driver stdin".into()))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| DriveError::SessionIo("Failed to capture driver stdout".into()))?;

        let mut reader = BufReader::new(stdout);

        // Wait for the ready signal
        let mut line = String::new();
        reader
            .read_line(&mut line)
            .map_err(|e| DriveError::SessionIo(format!("Failed to read ready signal: {}", e)))?;

        let response: DriverResponse =
            serde_json::from_str(line.trim()).map_err(|e| DriveError::JsonParse {
                context: "driver ready signal".into(),
                source: e,
            })?;

        if !response.ok || response.ready != Some(true) {
            return Err(DriveError::Protocol {
                command: "launch".into(),
                error: "Did not receive ready signal from driver".into(),
            });
        }

        Ok(BrowserSession {
            child,
            stdin,
            reader,
        })
    }

    /// Send a request and read the response.
    fn send(&mut self, request: &DriverRequest) -> Result<DriverResponse, DriveError> {
        let json = serde_json::to_string(request).map_err(|e| DriveError::JsonSerialize {
            context: "DriverRequest".into(),
            source: e,
        })?;

        writeln!(self.stdin, "{}", json)
            .map_err(|e| DriveError::SessionIo(format!("Failed to write to driver stdin: {}", e)))?;

        self.stdin
            .flush()
            .map_err(|e| DriveError::SessionIo(format!("Failed to flush driver stdin: {}", e)))?;

        let mut line = String::new();
        self.reader
            .read_line(&mut line)
            .map_err(|e| DriveError::SessionIo(format!("Failed to read from driver stdout: {}", e)))?;

        if line.trim().is_empty() {
            return Err(DriveError::SessionIo(
                "Empty response from driver (process may have died)".into(),
            ));
        }

        let response: DriverResponse =
            serde_json::from_str(line.trim()).map_err(|e| DriveError::JsonParse {
                context: "driver response".into(),
                source: e,
            })?;

        Ok(response)
    }

    /// Send a request and verify it succeeded.
    fn send_ok(
        &mut self,
        request: &DriverRequest,
        command_name: &str,
    ) -> Result<DriverResponse, DriveError> {
        let response = self.send(request)?;
        if !response.ok {
            return Err(DriveError::Protocol {
                command: command_name.into(),
                error: response.error.unwrap_or_else(|| "Unknown error".into()),
            });
        }
        Ok(response)
    }

    /// Quit the driver.
    pub fn quit(&mut self) -> Result<(), DriveError> {
        let request = DriverRequest::quit();
        // Best-effort quit; the process may already be gone
        let _ = self.send(&request);
        let _ = self.child.wait();
        Ok(())
    }
}

impl Page for BrowserSession {
    fn wait_for_cards(&mut self, timeout_ms: u64) -> Result<(), DriveError> {
        let request = DriverRequest::wait_cards(timeout_ms);
        let response = self.send_ok(&request, "wait_cards")?;
        if response.found == Some(true) {
            Ok(())
        } else {
            Err(DriveError::WaitTimeout {
                what: "listing cards".into(),
                timeout_ms,
            })
        }
    }

    fn read_cards(&mut self) -> Result<Vec<ItemCard>, DriveError> {
        let request = DriverRequest::read_cards();
        let response = self.send_ok(&request, "read_cards")?;
        Ok(response.cards.unwrap_or_default())
    }

    fn open_card(&mut self, card: &ItemCard) -> Result<(), DriveError> {
        let request = DriverRequest::open_card(card);
        self.send_ok(&request, "open_card")?;
        Ok(())
    }

    fn read_form(&mut self) -> Result<Vec<RawWidget>, DriveError> {
        let request = DriverRequest::read_form();
        let response = self.send_ok(&request, "read_form")?;
        Ok(response.widgets.unwrap_or_default())
    }

    fn try_locate(&mut self, control: Control, timeout_ms: u64) -> Result<bool, DriveError> {
        let request = DriverRequest::locate(hint_for(control), timeout_ms);
        let response = self.send_ok(&request, "locate")?;
        Ok(response.found.unwrap_or(false))
    }

    fn click(&mut self, control: Control) -> Result<(), DriveError> {
        let request = DriverRequest::click(hint_for(control));
        self.send_ok(&request, "click")?;
        Ok(())
    }

    fn type_char(&mut self, field_id: &str, ch: char) -> Result<(), DriveError> {
        let request = DriverRequest::type_text(field_id, &ch.to_string());
        self.send_ok(&request, "type")?;
        Ok(())
    }

    fn clear(&mut self, field_id: &str) -> Result<(), DriveError> {
        let request = DriverRequest::clear(field_id);
        self.send_ok(&request, "clear")?;
        Ok(())
    }

    fn choose(&mut self, field_id: &str, option: &str) -> Result<(), DriveError> {
        let request = DriverRequest::choose(field_id, option);
        self.send_ok(&request, "choose")?;
        Ok(())
    }

    fn is_checked(&mut self, control: Control) -> Result<bool, DriveError> {
        let request = DriverRequest::checked(hint_for(control));
        let response = self.send_ok(&request, "checked")?;
        Ok(response.checked.unwrap_or(false))
    }

    fn scroll_by(&mut self, dy: i64) -> Result<(), DriveError> {
        let request = DriverRequest::scroll(dy);
        self.send_ok(&request, "scroll")?;
        Ok(())
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        // Best-effort cleanup
        let _ = self.quit();
    }
}
