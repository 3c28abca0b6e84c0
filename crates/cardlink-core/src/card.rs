//! Cards and the store that owns them.

use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Stable identifier of a card, `card-N` by creation order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    /// Id of the card created at the given 1-based position.
    pub fn nth(n: usize) -> Self {
        Self(format!("card-{n}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CardId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for CardId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Card store errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CardError {
    #[error("Card not found: {0}")]
    NotFound(CardId),
}

/// A positioned, resizable, text-bearing box on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub(crate) id: CardId,
    /// Body text, editable inline.
    pub text: String,
    /// Left edge in canvas coordinates.
    pub x: f64,
    /// Top edge in canvas coordinates.
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Card {
    pub fn id(&self) -> &CardId {
        &self.id
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// The card's frame in canvas coordinates.
    pub fn frame(&self) -> Rect {
        Rect::from_origin_size(self.position(), self.size())
    }
}

/// Placement parameters for newly created cards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stagger {
    pub origin: f64,
    pub step: f64,
    pub size: Size,
}

impl Default for Stagger {
    fn default() -> Self {
        Self {
            origin: 100.0,
            step: 20.0,
            size: Size::new(200.0, 120.0),
        }
    }
}

/// Owns every card, in creation order.
#[derive(Debug, Clone, Default)]
pub struct CardStore {
    cards: HashMap<CardId, Card>,
    order: Vec<CardId>,
    stagger: Stagger,
}

impl CardStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stagger(stagger: Stagger) -> Self {
        Self {
            stagger,
            ..Self::default()
        }
    }

    /// Create the next card, offset diagonally from the previous one.
    pub fn create_card(&mut self) -> &Card {
        let index = self.order.len();
        let n = index + 1;
        let id = CardId::nth(n);
        let offset = self.stagger.origin + self.stagger.step * index as f64;
        let card = Card {
            id: id.clone(),
            text: placeholder_text(n),
            x: offset,
            y: offset,
            width: self.stagger.size.width,
            height: self.stagger.size.height,
        };
        log::debug!("Created {} at ({}, {})", id, card.x, card.y);
        self.order.push(id.clone());
        self.cards.entry(id).or_insert(card)
    }

    /// Replace a card's text, leaving its geometry untouched.
    pub fn update_text(&mut self, id: &CardId, text: impl Into<String>) -> Result<(), CardError> {
        let card = self.get_mut(id)?;
        card.text = text.into();
        Ok(())
    }

    /// Move a card's top-left corner. Negative coordinates are clamped to 0.
    pub fn update_position(&mut self, id: &CardId, x: f64, y: f64) -> Result<(), CardError> {
        let card = self.get_mut(id)?;
        card.x = x.max(0.0);
        card.y = y.max(0.0);
        Ok(())
    }

    /// Replace a card's size. Negative extents are clamped to 0.
    pub fn update_size(&mut self, id: &CardId, width: f64, height: f64) -> Result<(), CardError> {
        let card = self.get_mut(id)?;
        card.width = width.max(0.0);
        card.height = height.max(0.0);
        Ok(())
    }

    pub fn get(&self, id: &CardId) -> Option<&Card> {
        self.cards.get(id)
    }

    fn get_mut(&mut self, id: &CardId) -> Result<&mut Card, CardError> {
        self.cards
            .get_mut(id)
            .ok_or_else(|| CardError::NotFound(id.clone()))
    }

    pub fn contains(&self, id: &CardId) -> bool {
        self.cards.contains_key(id)
    }

    /// Cards in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.order.iter().filter_map(|id| self.cards.get(id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

fn placeholder_text(n: usize) -> String {
    format!(
        "This is some dummy text for card {n}. Here you can add more details that can be shown in the modal."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_follow_creation_order() {
        let mut store = CardStore::new();
        let ids: Vec<CardId> = (0..5).map(|_| store.create_card().id().clone()).collect();

        assert_eq!(ids[0].as_str(), "card-1");
        assert_eq!(ids[4].as_str(), "card-5");
        let numbers: Vec<usize> = ids
            .iter()
            .map(|id| id.as_str()["card-".len()..].parse().unwrap())
            .collect();
        assert!(numbers.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_staggered_positions() {
        let mut store = CardStore::new();
        for _ in 0..3 {
            store.create_card();
        }
        let positions: Vec<(f64, f64)> = store.iter().map(|c| (c.x, c.y)).collect();
        assert_eq!(positions, vec![(100.0, 100.0), (120.0, 120.0), (140.0, 140.0)]);
    }

    #[test]
    fn test_placeholder_text() {
        let mut store = CardStore::new();
        let card = store.create_card();
        assert!(card.text.starts_with("This is some dummy text for card 1."));
    }

    #[test]
    fn test_update_text_only_touches_text() {
        let mut store = CardStore::new();
        store.create_card();
        store.create_card();
        let id = CardId::from("card-1");
        let before = store.get(&id).unwrap().frame();

        store.update_text(&id, "hello").unwrap();

        let card = store.get(&id).unwrap();
        assert_eq!(card.text, "hello");
        assert_eq!(card.frame(), before);
        assert_ne!(store.get(&CardId::from("card-2")).unwrap().text, "hello");
    }

    #[test]
    fn test_update_missing_card() {
        let mut store = CardStore::new();
        let id = CardId::from("card-9");
        assert_eq!(store.update_text(&id, "x"), Err(CardError::NotFound(id.clone())));
        assert_eq!(store.update_position(&id, 1.0, 1.0), Err(CardError::NotFound(id)));
    }

    #[test]
    fn test_position_and_size_clamp_negative() {
        let mut store = CardStore::new();
        let id = store.create_card().id().clone();

        store.update_position(&id, -5.0, 30.0).unwrap();
        store.update_size(&id, 50.0, -1.0).unwrap();

        let card = store.get(&id).unwrap();
        assert_eq!((card.x, card.y), (0.0, 30.0));
        assert_eq!((card.width, card.height), (50.0, 0.0));
    }
}
