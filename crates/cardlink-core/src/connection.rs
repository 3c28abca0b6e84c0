//! Directed links between cards.

use crate::card::{CardId, CardStore};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a connection could not be created.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error("Cannot connect a card to itself")]
    SameCard,
    #[error("Unknown card: {0}")]
    UnknownCard(CardId),
}

/// A directed link from one card to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub source: CardId,
    pub target: CardId,
}

impl Connection {
    /// Whether the card is either end of this connection.
    pub fn touches(&self, id: &CardId) -> bool {
        &self.source == id || &self.target == id
    }
}

/// Append-only list of connections, referencing cards by id only.
#[derive(Debug, Clone, Default)]
pub struct ConnectionStore {
    connections: Vec<Connection>,
}

impl ConnectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Link `source` to `target`. Both must be distinct cards known to `cards`.
    pub fn connect(
        &mut self,
        cards: &CardStore,
        source: &CardId,
        target: &CardId,
    ) -> Result<Connection, ConnectError> {
        if source == target {
            return Err(ConnectError::SameCard);
        }
        for id in [source, target] {
            if !cards.contains(id) {
                return Err(ConnectError::UnknownCard(id.clone()));
            }
        }

        let connection = Connection {
            source: source.clone(),
            target: target.clone(),
        };
        log::debug!("Connected {} -> {}", source, target);
        self.connections.push(connection.clone());
        Ok(connection)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Connection> {
        self.connections.iter()
    }

    /// Connections with the card at either end.
    pub fn attached_to<'a>(&'a self, id: &'a CardId) -> impl Iterator<Item = &'a Connection> + 'a {
        self.connections.iter().filter(move |c| c.touches(id))
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}
