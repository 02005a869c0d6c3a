use crate::browser::page::RawWidget;

/// Placeholder text a closed list uses for its unselected state.
pub const OPTION_PLACEHOLDER: &str = "select an option";

/// A form field classified by structural kind.
///
/// Every widget on a screen resolves to exactly one of these (or is dropped
/// as unfillable); the fill strategy is chosen by exhaustive match, never by
/// probing.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    /// Free-text input; the label is the question.
    Text { field_id: String, label: String },

    /// Radio-style group with a question and a closed option set.
    ChoiceGroup {
        field_id: String,
        question: String,
        options: Vec<String>,
    },

    /// Closed dropdown list; no question text is guaranteed.
    ClosedList {
        field_id: String,
        options: Vec<String>,
    },
}

/// Classify one screen's widgets into fields, in rendered order.
///
/// Incomplete widgets (a text input with no label, a group with no question
/// or no options) are dropped here rather than half-filled later.
pub fn classify(widgets: &[RawWidget]) -> Vec<Field> {
    widgets.iter().filter_map(classify_one).collect()
}

fn classify_one(widget: &RawWidget) -> Option<Field> {
    match widget.tag.as_str() {
        "input" | "textarea" => {
            let label = widget.label.as_deref().unwrap_or("").trim();
            if label.is_empty() {
                return None;
            }
            Some(Field::Text {
                field_id: widget.field_id.clone(),
                label: label.to_string(),
            })
        }

        "fieldset" => {
            let question = widget.label.as_deref().unwrap_or("").trim();
            if question.is_empty() || widget.options.is_empty() {
                return None;
            }
            Some(Field::ChoiceGroup {
                field_id: widget.field_id.clone(),
                question: question.to_string(),
                options: widget.options.clone(),
            })
        }

        "select" => {
            if widget.options.is_empty() {
                return None;
            }
            Some(Field::ClosedList {
                field_id: widget.field_id.clone(),
                options: widget.options.clone(),
            })
        }

        _ => None,
    }
}

/// Trimmed, case-insensitive option comparison.
pub fn option_matches(option: &str, answer: &str) -> bool {
    option.trim().to_lowercase() == answer.trim().to_lowercase()
}

/// Deterministic closed-list policy: "yes" wins, else the first
/// non-placeholder option, else nothing.
pub fn pick_closed_option(options: &[String]) -> Option<&str> {
    if let Some(yes) = options.iter().find(|o| o.trim().to_lowercase() == "yes") {
        return Some(yes.as_str());
    }
    options
        .iter()
        .find(|o| !o.to_lowercase().contains(OPTION_PLACEHOLDER))
        .map(|o| o.as_str())
}
