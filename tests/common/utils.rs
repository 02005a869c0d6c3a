use std::sync::atomic::{AtomicU32, Ordering};

use quick_apply::browser::page::{ItemCard, RawWidget};

static COUNTER: AtomicU32 = AtomicU32::new(0);

/// Unique temp-file path for one test's record log. The file is removed
/// first so each test starts from an empty log.
pub fn temp_records(name: &str) -> String {
    let n = COUNTER.fetch_add(1, Ordering::SeqCst);
    let path = std::env::temp_dir().join(format!(
        "quick_apply_{}_{}_{}.csv",
        name,
        std::process::id(),
        n
    ));
    let path = path.to_string_lossy().into_owned();
    let _ = std::fs::remove_file(&path);
    path
}

/// Non-empty lines of the record file ("" if it does not exist).
pub fn record_lines(path: &str) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(|l| l.to_string())
        .collect()
}

pub fn card(key: &str, text: &str) -> ItemCard {
    ItemCard {
        key: Some(key.to_string()),
        text: text.to_string(),
    }
}

pub fn text_widget(field_id: &str, label: &str) -> RawWidget {
    RawWidget {
        tag: "input".to_string(),
        field_id: field_id.to_string(),
        label: Some(label.to_string()),
        options: vec![],
    }
}

pub fn choice_widget(field_id: &str, question: &str, options: &[&str]) -> RawWidget {
    RawWidget {
        tag: "fieldset".to_string(),
        field_id: field_id.to_string(),
        label: Some(question.to_string()),
        options: options.iter().map(|o| o.to_string()).collect(),
    }
}

pub fn select_widget(field_id: &str, options: &[&str]) -> RawWidget {
    RawWidget {
        tag: "select".to_string(),
        field_id: field_id.to_string(),
        label: None,
        options: options.iter().map(|o| o.to_string()).collect(),
    }
}
