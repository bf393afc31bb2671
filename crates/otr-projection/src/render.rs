//! Plain-text rendering of projected changes.

use otr_types::{Document, Operation};

use crate::projector::ProjectedChange;

/// Placeholder shown for list or map payloads when they are not expanded.
pub const COLLAPSED_PLACEHOLDER: &str = "too much data, use --details";

/// Options controlling how payloads are printed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Pretty-print list and map payloads instead of the placeholder.
    pub expand_structured: bool,
}

impl ProjectedChange {
    /// One-line description without the timestamp:
    /// `+ {label}: {value}`, `- {label}: {old}` or `{label}: {old} -> {new}`.
    pub fn describe(&self, options: &RenderOptions) -> String {
        match self.operation {
            Operation::Added => format!(
                "+ {}: {}",
                self.key,
                format_payload(self.value.as_ref(), options)
            ),
            Operation::Removed => format!(
                "- {}: {}",
                self.key,
                format_payload(self.old_value.as_ref(), options)
            ),
            Operation::Changed => format!(
                "{}: {} -> {}",
                self.key,
                format_payload(self.old_value.as_ref(), options),
                format_payload(self.value.as_ref(), options)
            ),
        }
    }

    /// Description prefixed with the entry date: `- {timestamp}: {description}`.
    pub fn render_line(&self, options: &RenderOptions) -> String {
        format!("- {}: {}", self.timestamp, self.describe(options))
    }
}

/// Render one payload for display.
pub fn format_payload(payload: Option<&Document>, options: &RenderOptions) -> String {
    match payload {
        None | Some(Document::Null) => "none".to_string(),
        Some(Document::String(s)) => s.clone(),
        Some(structured @ (Document::Array(_) | Document::Object(_))) => {
            if options.expand_structured {
                let pretty = serde_json::to_string_pretty(structured)
                    .unwrap_or_else(|_| structured.to_string());
                format!("\n{pretty}")
            } else {
                COLLAPSED_PLACEHOLDER.to_string()
            }
        }
        Some(scalar) => scalar.to_string(),
    }
}
