//! Interaction mode state machine: free manipulation vs. connect mode.

use crate::card::{CardId, CardStore};
use crate::connection::{ConnectError, Connection, ConnectionStore};
use serde::{Deserialize, Serialize};

/// The current interaction mode.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum InteractionMode {
    /// Card clicks perform normal card interactions.
    #[default]
    Free,
    /// Card clicks pick connection endpoints.
    Connecting {
        /// Source picked by the first click, if any.
        pending_source: Option<CardId>,
    },
}

impl InteractionMode {
    pub fn is_connecting(&self) -> bool {
        matches!(self, Self::Connecting { .. })
    }

    pub fn pending_source(&self) -> Option<&CardId> {
        match self {
            Self::Connecting { pending_source } => pending_source.as_ref(),
            Self::Free => None,
        }
    }
}

/// What a card click did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The click had no effect on the mode.
    Ignored,
    /// The clicked card became the pending connection source.
    SourceSelected(CardId),
    /// A connection was created and the mode returned to free.
    Connected(Connection),
    /// The connection store refused the link; the pending source is kept.
    Rejected(ConnectError),
}

/// Drives [`InteractionMode`] transitions.
#[derive(Debug, Clone, Default)]
pub struct ModeController {
    mode: InteractionMode,
}

impl ModeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> &InteractionMode {
        &self.mode
    }

    /// Enter connect mode. An already pending source survives.
    pub fn enable_connection_mode(&mut self) {
        if !self.mode.is_connecting() {
            log::debug!("Entering connect mode");
            self.mode = InteractionMode::Connecting {
                pending_source: None,
            };
        }
    }

    /// Return to free mode, dropping any pending source.
    pub fn disable_connection_mode(&mut self) {
        if self.mode.is_connecting() {
            log::debug!("Leaving connect mode");
        }
        self.mode = InteractionMode::Free;
    }

    /// Flip between the two modes, as the arrow tool button does.
    pub fn toggle_connection_mode(&mut self) {
        if self.mode.is_connecting() {
            self.disable_connection_mode();
        } else {
            self.enable_connection_mode();
        }
    }

    /// Handle a click on a card.
    ///
    /// In connect mode the first click picks the source and the second one,
    /// on a different card, creates the link and returns to free mode.
    pub fn on_card_clicked(
        &mut self,
        cards: &CardStore,
        connections: &mut ConnectionStore,
        id: &CardId,
    ) -> ClickOutcome {
        let InteractionMode::Connecting { pending_source } = &mut self.mode else {
            return ClickOutcome::Ignored;
        };

        let Some(source) = pending_source.as_ref() else {
            log::debug!("Connection source selected: {}", id);
            *pending_source = Some(id.clone());
            return ClickOutcome::SourceSelected(id.clone());
        };

        if source == id {
            return ClickOutcome::Ignored;
        }

        match connections.connect(cards, source, id) {
            Ok(connection) => {
                self.mode = InteractionMode::Free;
                ClickOutcome::Connected(connection)
            }
            Err(err) => {
                log::debug!("Connection {} -> {} rejected: {}", source, id, err);
                ClickOutcome::Rejected(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cards(n: usize) -> CardStore {
        let mut store = CardStore::new();
        for _ in 0..n {
            store.create_card();
        }
        store
    }

    #[test]
    fn test_starts_free() {
        let controller = ModeController::new();
        assert_eq!(controller.mode(), &InteractionMode::Free);
    }

    #[test]
    fn test_enable_and_disable() {
        let mut controller = ModeController::new();
        controller.enable_connection_mode();
        assert_eq!(
            controller.mode(),
            &InteractionMode::Connecting {
                pending_source: None
            }
        );

        controller.disable_connection_mode();
        assert_eq!(controller.mode(), &InteractionMode::Free);
        controller.disable_connection_mode();
        assert_eq!(controller.mode(), &InteractionMode::Free);
    }

    #[test]
    fn test_toggle() {
        let mut controller = ModeController::new();
        controller.toggle_connection_mode();
        assert!(controller.mode().is_connecting());
        controller.toggle_connection_mode();
        assert!(!controller.mode().is_connecting());
    }

    #[test]
    fn test_click_in_free_mode_is_ignored() {
        let store = cards(1);
        let mut links = ConnectionStore::new();
        let mut controller = ModeController::new();

        let outcome = controller.on_card_clicked(&store, &mut links, &CardId::from("card-1"));
        assert_eq!(outcome, ClickOutcome::Ignored);
        assert_eq!(controller.mode(), &InteractionMode::Free);
    }

    #[test]
    fn test_two_clicks_connect_and_return_to_free() {
        let store = cards(2);
        let mut links = ConnectionStore::new();
        let mut controller = ModeController::new();
        let (a, b) = (CardId::from("card-1"), CardId::from("card-2"));

        controller.enable_connection_mode();
        assert_eq!(
            controller.on_card_clicked(&store, &mut links, &a),
            ClickOutcome::SourceSelected(a.clone())
        );
        assert_eq!(controller.mode().pending_source(), Some(&a));

        let outcome = controller.on_card_clicked(&store, &mut links, &b);
        assert_eq!(
            outcome,
            ClickOutcome::Connected(Connection {
                source: a,
                target: b
            })
        );
        assert_eq!(links.len(), 1);
        assert_eq!(controller.mode(), &InteractionMode::Free);
    }

    #[test]
    fn test_same_card_click_keeps_pending() {
        let store = cards(2);
        let mut links = ConnectionStore::new();
        let mut controller = ModeController::new();
        let a = CardId::from("card-1");

        controller.enable_connection_mode();
        controller.on_card_clicked(&store, &mut links, &a);
        assert_eq!(controller.on_card_clicked(&store, &mut links, &a), ClickOutcome::Ignored);
        assert_eq!(controller.mode().pending_source(), Some(&a));
        assert!(links.is_empty());
    }

    #[test]
    fn test_rejected_target_keeps_pending_for_retry() {
        let store = cards(2);
        let mut links = ConnectionStore::new();
        let mut controller = ModeController::new();
        let a = CardId::from("card-1");
        let ghost = CardId::from("card-9");

        controller.enable_connection_mode();
        controller.on_card_clicked(&store, &mut links, &a);
        assert_eq!(
            controller.on_card_clicked(&store, &mut links, &ghost),
            ClickOutcome::Rejected(ConnectError::UnknownCard(ghost))
        );
        assert_eq!(controller.mode().pending_source(), Some(&a));

        let b = CardId::from("card-2");
        assert!(matches!(
            controller.on_card_clicked(&store, &mut links, &b),
            ClickOutcome::Connected(_)
        ));
    }

    #[test]
    fn test_enable_twice_keeps_pending() {
        let store = cards(1);
        let mut links = ConnectionStore::new();
        let mut controller = ModeController::new();
        let a = CardId::from("card-1");

        controller.enable_connection_mode();
        controller.on_card_clicked(&store, &mut links, &a);
        controller.enable_connection_mode();
        assert_eq!(controller.mode().pending_source(), Some(&a));
    }
}
