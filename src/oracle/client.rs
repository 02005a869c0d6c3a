use std::io::{Read, Write};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::oracle::error::OracleError;

/// Hard per-call bound on the external oracle.
pub const ORACLE_TIMEOUT_SECS: u64 = 120;

/// Answer to one form question.
///
/// `Unknown` is the degraded result of any oracle failure. It must never
/// abort a run: text fields still receive its literal rendering, choice
/// fields are left unselected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Text(String),
    Unknown,
}

impl Answer {
    /// Literal text typed into a field when the oracle could not answer.
    pub const UNKNOWN_TEXT: &'static str = "N/A";

    pub fn as_text(&self) -> &str {
        match self {
            Answer::Text(t) => t,
            Answer::Unknown => Self::UNKNOWN_TEXT,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Answer::Unknown)
    }
}

/// The external decision oracle consulted per form question.
///
/// Implementations hold no state between calls; every failure degrades to
/// `Answer::Unknown` rather than escalating.
pub trait Oracle {
    /// Free-text question. The response is reduced to its first numeric token.
    fn ask_open(&self, question: &str) -> Answer;

    /// Question with a closed set of candidate answers. The response is
    /// returned verbatim (trimmed) for the caller to match against options.
    fn ask_choice(&self, question: &str, options: &[String]) -> Answer;
}

fn open_prompt(question: &str) -> String {
    format!(
        "Answer this job application question briefly and clearly:\n{}",
        question
    )
}

fn choice_prompt(question: &str, options: &[String]) -> String {
    format!(
        "You are helping fill out a job application form.\n\
         Question: \"{}\"\n\
         Options: {:?}\n\
         Which is the most appropriate answer? Just return the text of the most suitable option.\n",
        question, options
    )
}

/// Extract the first maximal numeric token: a digit run, optionally extended
/// by comma-separated groups of two or three digits (thousands separators).
pub fn first_numeric_token(text: &str) -> Option<String> {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if !bytes[i].is_ascii_digit() {
            i += 1;
            continue;
        }
        let start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        // Extend across well-formed separator groups only
        while i < bytes.len() && bytes[i] == b',' {
            let mut j = i + 1;
            while j < bytes.len() && bytes[j].is_ascii_digit() {
                j += 1;
            }
            let group_len = j - (i + 1);
            if group_len == 2 || group_len == 3 {
                i = j;
            } else {
                break;
            }
        }
        return Some(text[start..i].to_string());
    }
    None
}

/// Reduce a raw open-question response to an `Answer`.
fn open_answer(raw: Result<String, OracleError>) -> Answer {
    let outcome = raw.and_then(|response| {
        first_numeric_token(&response).ok_or(OracleError::NoNumericToken { response })
    });
    match outcome {
        Ok(token) => Answer::Text(token),
        Err(e) => {
            eprintln!("oracle: {}", e);
            Answer::Unknown
        }
    }
}

/// Reduce a raw choice-question response to an `Answer`.
fn choice_answer(raw: Result<String, OracleError>) -> Answer {
    match raw {
        Ok(response) => {
            let trimmed = response.trim();
            if trimmed.is_empty() {
                Answer::Unknown
            } else {
                Answer::Text(trimmed.to_string())
            }
        }
        Err(e) => {
            eprintln!("oracle: {}", e);
            Answer::Unknown
        }
    }
}

// ============================================================================
// Subprocess backend (ollama run <model>)
// ============================================================================

/// Oracle invoked as a one-shot subprocess per question: prompt on stdin,
/// answer on stdout, hard 120s timeout.
pub struct OllamaProcessOracle {
    pub program: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for OllamaProcessOracle {
    fn default() -> Self {
        Self {
            program: "ollama".to_string(),
            model: "qwen2.5:1.5b".to_string(),
            timeout: Duration::from_secs(ORACLE_TIMEOUT_SECS),
        }
    }
}

impl OllamaProcessOracle {
    pub fn new(model: &str) -> Self {
        Self {
            model: model.to_string(),
            ..Self::default()
        }
    }

    fn invoke(&self, prompt: &str) -> Result<String, OracleError> {
        let mut child = Command::new(&self.program)
            .arg("run")
            .arg(&self.model)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| OracleError::Spawn {
                program: self.program.clone(),
                source: e,
            })?;

        {
            let mut stdin = child
                .stdin
                .take()
                .ok_or_else(|| OracleError::Io("Failed to capture oracle stdin".into()))?;
            if let Err(e) = stdin.write_all(prompt.as_bytes()) {
                let _ = child.kill();
                let _ = child.wait();
                return Err(OracleError::Io(format!("Failed to write prompt: {}", e)));
            }
            // Dropping stdin closes the pipe and lets the model start answering
        }

        // Drain both pipes off-thread so a chatty oracle can't block on a
        // full pipe while we enforce the deadline.
        let mut stdout_pipe = child
            .stdout
            .take()
            .ok_or_else(|| OracleError::Io("Failed to capture oracle stdout".into()))?;
        let mut stderr_pipe = child
            .stderr
            .take()
            .ok_or_else(|| OracleError::Io("Failed to capture oracle stderr".into()))?;

        let stdout_reader = thread::spawn(move || {
            let mut buf = String::new();
            let _ = stdout_pipe.read_to_string(&mut buf);
            buf
        });
        let stderr_reader = thread::spawn(move || {
            let mut buf = String::new();
            let _ = stderr_pipe.read_to_string(&mut buf);
            buf
        });

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {
                    if Instant::now() >= deadline {
                        let _ = child.kill();
                        let _ = child.wait();
                        return Err(OracleError::Timeout {
                            secs: self.timeout.as_secs(),
                        });
                    }
                    thread::sleep(Duration::from_millis(100));
                }
                Err(e) => {
                    let _ = child.kill();
                    return Err(OracleError::Io(format!("Failed to poll oracle: {}", e)));
                }
            }
        };

        let stdout = stdout_reader.join().unwrap_or_default();
        let stderr = stderr_reader.join().unwrap_or_default();

        if !status.success() {
            return Err(OracleError::NonZeroExit {
                status,
                stderr: stderr.trim().to_string(),
            });
        }
        Ok(stdout)
    }
}

impl Oracle for OllamaProcessOracle {
    fn ask_open(&self, question: &str) -> Answer {
        open_answer(self.invoke(&open_prompt(question)))
    }

    fn ask_choice(&self, question: &str, options: &[String]) -> Answer {
        choice_answer(self.invoke(&choice_prompt(question, options)))
    }
}

// ============================================================================
// HTTP backend (Ollama /api/generate)
// ============================================================================

#[derive(Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Oracle backed by a running Ollama server.
pub struct OllamaHttpOracle {
    pub endpoint: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for OllamaHttpOracle {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:11434/api/generate".to_string(),
            model: "qwen2.5:1.5b".to_string(),
            timeout: Duration::from_secs(ORACLE_TIMEOUT_SECS),
        }
    }
}

impl OllamaHttpOracle {
    pub fn new(endpoint: &str, model: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            model: model.to_string(),
            ..Self::default()
        }
    }

    fn invoke(&self, prompt: &str) -> Result<String, OracleError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(OracleError::Http)?;

        let request = GenerateRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
        };

        let response = client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .map_err(OracleError::Http)?;

        let body: GenerateResponse = response.json().map_err(OracleError::Http)?;
        Ok(body.response)
    }
}

impl Oracle for OllamaHttpOracle {
    fn ask_open(&self, question: &str) -> Answer {
        open_answer(self.invoke(&open_prompt(question)))
    }

    fn ask_choice(&self, question: &str, options: &[String]) -> Answer {
        choice_answer(self.invoke(&choice_prompt(question, options)))
    }
}

// ============================================================================
// Scripted backend (tests, dry runs)
// ============================================================================

/// Canned oracle: fixed replies, no external process.
#[derive(Debug, Default)]
pub struct ScriptedOracle {
    pub open_reply: Option<String>,
    pub choice_reply: Option<String>,
}

impl ScriptedOracle {
    /// Oracle that answers every question with `Unknown`.
    pub fn unknown() -> Self {
        Self::default()
    }

    pub fn with_replies(open: &str, choice: &str) -> Self {
        Self {
            open_reply: Some(open.to_string()),
            choice_reply: Some(choice.to_string()),
        }
    }
}

impl Oracle for ScriptedOracle {
    fn ask_open(&self, _question: &str) -> Answer {
        match &self.open_reply {
            Some(reply) => Answer::Text(reply.clone()),
            None => Answer::Unknown,
        }
    }

    fn ask_choice(&self, _question: &str, _options: &[String]) -> Answer {
        match &self.choice_reply {
            Some(reply) => Answer::Text(reply.clone()),
            None => Answer::Unknown,
        }
    }
}
