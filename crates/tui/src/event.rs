//! Key dispatch status shared by the widgets.
//!
//! The app offers each key event to the focused widget first; the widget
//! reports whether it used the key so the app knows whether to apply its own
//! bindings.

/// Outcome of offering a key event to a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventStatus {
    /// The widget used the key. Stop dispatching.
    Consumed,
    /// The widget ignored the key. Fall through to the next handler.
    NotConsumed,
}

impl EventStatus {
    pub fn is_consumed(self) -> bool {
        self == EventStatus::Consumed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_consumed() {
        assert!(EventStatus::Consumed.is_consumed());
        assert!(!EventStatus::NotConsumed.is_consumed());
    }
}
