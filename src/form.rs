//! Submitted form state for one action invocation.
//!
//! The host collects the user's form input (comment text, per-action inputs
//! such as the cross-reference ticket number) and hands it to the engine.
//! The `preview` flag is explicit state here rather than a magic form key:
//! when any operation defers the submission, the engine flips it so the
//! primary ticket is not persisted that round.

use std::collections::HashMap;

/// Form key holding the comment the user typed for the primary ticket.
pub const COMMENT_KEY: &str = "comment";

/// Form key for an action's cross-reference input.
pub fn xref_key(action: &str) -> String {
    format!("action_{}_xref", action)
}

/// Submitted form values plus the preview flag.
#[derive(Debug, Clone, Default)]
pub struct FormValues {
    values: HashMap<String, String>,
    /// True when the submission must not be persisted this round.
    pub preview: bool,
}

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style value insertion.
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }

    /// Mark this submission as preview-only.
    pub fn with_preview(mut self) -> Self {
        self.preview = true;
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    /// The submitted comment, empty when absent.
    pub fn comment(&self) -> &str {
        self.get(COMMENT_KEY).unwrap_or("")
    }

    pub fn set_comment(&mut self, comment: &str) {
        self.set(COMMENT_KEY, comment);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xref_key_shape() {
        assert_eq!(xref_key("resolve"), "action_resolve_xref");
    }

    #[test]
    fn test_comment_defaults_empty() {
        let form = FormValues::new();
        assert_eq!(form.comment(), "");
        assert!(!form.preview);
    }
}
