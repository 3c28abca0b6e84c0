//! Modal overlay showing a card's full text.

use serde::{Deserialize, Serialize};

/// Visibility and content of the detail overlay.
///
/// The content is a copy taken when the overlay opens; later edits to the
/// card do not show up until it is opened again.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayState {
    pub visible: bool,
    pub content: String,
}

/// The detail overlay.
#[derive(Debug, Clone, Default)]
pub struct DetailOverlay {
    state: OverlayState,
}

impl DetailOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &OverlayState {
        &self.state
    }

    pub fn is_visible(&self) -> bool {
        self.state.visible
    }

    /// Open the overlay with a snapshot of `content`.
    pub fn show(&mut self, content: impl Into<String>) {
        self.state = OverlayState {
            visible: true,
            content: content.into(),
        };
    }

    /// Hide the overlay. The last content is kept.
    pub fn close(&mut self) {
        self.state.visible = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_and_close() {
        let mut overlay = DetailOverlay::new();
        assert!(!overlay.is_visible());

        overlay.show("full text");
        assert_eq!(
            overlay.state(),
            &OverlayState {
                visible: true,
                content: "full text".to_string()
            }
        );

        overlay.close();
        assert!(!overlay.is_visible());
        assert_eq!(overlay.state().content, "full text");
    }

    #[test]
    fn test_show_replaces_content() {
        let mut overlay = DetailOverlay::new();
        overlay.show("first");
        overlay.show("second");
        assert_eq!(overlay.state().content, "second");
    }
}
