//! Boundary toward the gesture and connector-drawing collaborators.
//!
//! The core never talks to a drawing or pointer library directly. It goes
//! through two narrow capabilities, [`GestureSurface`] and
//! [`ConnectorSurface`], and the [`SurfaceAdapter`] is called explicitly
//! after every store mutation to keep them in sync.

use crate::card::{Card, CardId, CardStore};
use crate::connection::Connection;
use crate::style::{ConnectionStyle, ConnectorStyle, EndpointSpec};
use kurbo::Rect;
use std::cell::RefCell;
use std::collections::{BTreeSet, HashSet};
use std::rc::Rc;
use thiserror::Error;

/// Registration errors reported by a surface. These are transient: the
/// adapter retries on the next geometry-affecting event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdapterRegistrationError {
    #[error("Surface for {0} is not mounted")]
    NotMounted(CardId),
    #[error("No endpoints registered for {0}")]
    UnknownEndpoint(CardId),
}

/// Result type for surface calls.
pub type SurfaceResult<T> = Result<T, AdapterRegistrationError>;

/// A surface that can be dragged and resized by pointer gestures.
pub trait GestureSurface {
    /// Make the card draggable and resizable from all four edges.
    fn attach(&mut self, card: &CardId, frame: Rect) -> SurfaceResult<()>;

    /// Apply a new translation and size to an attached card.
    fn place(&mut self, card: &CardId, frame: Rect) -> SurfaceResult<()>;
}

/// A node that connectors can attach to.
pub trait ConnectorSurface {
    /// Set the styling used by every connector on this surface.
    fn configure(&mut self, style: &ConnectorStyle);

    /// Register endpoints on the card's sides.
    fn add_endpoints(&mut self, card: &CardId, endpoints: &[EndpointSpec]) -> SurfaceResult<()>;

    /// Repaint the connectors attached to a card whose geometry changed.
    fn revalidate(&mut self, card: &CardId) -> SurfaceResult<()>;

    /// Draw a connector between two registered cards.
    fn connect(&mut self, source: &CardId, target: &CardId, style: &ConnectionStyle) -> SurfaceResult<()>;
}

// A single host object often provides both capabilities; sharing it through
// `Rc<RefCell<_>>` lets the adapter own one handle per capability.
impl<T: GestureSurface + ?Sized> GestureSurface for Rc<RefCell<T>> {
    fn attach(&mut self, card: &CardId, frame: Rect) -> SurfaceResult<()> {
        self.borrow_mut().attach(card, frame)
    }

    fn place(&mut self, card: &CardId, frame: Rect) -> SurfaceResult<()> {
        self.borrow_mut().place(card, frame)
    }
}

impl<T: ConnectorSurface + ?Sized> ConnectorSurface for Rc<RefCell<T>> {
    fn configure(&mut self, style: &ConnectorStyle) {
        self.borrow_mut().configure(style);
    }

    fn add_endpoints(&mut self, card: &CardId, endpoints: &[EndpointSpec]) -> SurfaceResult<()> {
        self.borrow_mut().add_endpoints(card, endpoints)
    }

    fn revalidate(&mut self, card: &CardId) -> SurfaceResult<()> {
        self.borrow_mut().revalidate(card)
    }

    fn connect(&mut self, source: &CardId, target: &CardId, style: &ConnectionStyle) -> SurfaceResult<()> {
        self.borrow_mut().connect(source, target, style)
    }
}

/// Keeps the external surfaces in step with the stores.
#[derive(Debug)]
pub struct SurfaceAdapter<G, C> {
    gesture: G,
    connector: C,
    attached: HashSet<CardId>,
    with_endpoints: HashSet<CardId>,
    pending_cards: BTreeSet<CardId>,
    pending_links: Vec<(Connection, ConnectionStyle)>,
}

impl<G: GestureSurface, C: ConnectorSurface> SurfaceAdapter<G, C> {
    pub fn new(gesture: G, mut connector: C, style: &ConnectorStyle) -> Self {
        connector.configure(style);
        Self {
            gesture,
            connector,
            attached: HashSet::new(),
            with_endpoints: HashSet::new(),
            pending_cards: BTreeSet::new(),
            pending_links: Vec::new(),
        }
    }

    pub fn gesture(&self) -> &G {
        &self.gesture
    }

    pub fn gesture_mut(&mut self) -> &mut G {
        &mut self.gesture
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    pub fn connector_mut(&mut self) -> &mut C {
        &mut self.connector
    }

    /// Whether the card is fully registered with both surfaces.
    pub fn is_registered(&self, id: &CardId) -> bool {
        self.attached.contains(id) && self.with_endpoints.contains(id)
    }

    /// Number of cards and links waiting for a retry.
    pub fn pending_count(&self) -> usize {
        self.pending_cards.len() + self.pending_links.len()
    }

    /// Register a freshly created card. Failures are queued, never returned.
    pub fn card_created(&mut self, card: &Card) {
        if let Err(err) = self.register(card) {
            log::warn!("Deferring registration of {}: {}", card.id(), err);
            self.pending_cards.insert(card.id().clone());
        }
    }

    /// Push a card's new geometry to the surfaces and repaint its connectors.
    pub fn geometry_changed(&mut self, cards: &CardStore, id: &CardId) {
        self.retry_pending(cards);

        if !self.is_registered(id) {
            return;
        }
        let Some(card) = cards.get(id) else {
            return;
        };
        if let Err(err) = self.gesture.place(id, card.frame()) {
            log::warn!("Failed to place {}: {}", id, err);
        }
        if let Err(err) = self.connector.revalidate(id) {
            log::warn!("Failed to revalidate {}: {}", id, err);
        }
    }

    /// Draw a newly created connection, or queue it until both ends exist.
    pub fn connection_created(&mut self, connection: &Connection, style: &ConnectionStyle) {
        if let Err(err) = self.draw(connection, style) {
            log::warn!(
                "Deferring connector {} -> {}: {}",
                connection.source, connection.target, err
            );
            self.pending_links.push((connection.clone(), *style));
        }
    }

    /// Retry every deferred registration, then every deferred connector.
    pub fn retry_pending(&mut self, cards: &CardStore) {
        if self.pending_count() == 0 {
            return;
        }

        let waiting: Vec<CardId> = self.pending_cards.iter().cloned().collect();
        for id in waiting {
            let Some(card) = cards.get(&id) else {
                self.pending_cards.remove(&id);
                continue;
            };
            match self.register(card) {
                Ok(()) => {
                    log::debug!("Registered {} on retry", id);
                    self.pending_cards.remove(&id);
                }
                Err(err) => log::debug!("Registration of {} still deferred: {}", id, err),
            }
        }

        let links = std::mem::take(&mut self.pending_links);
        for (connection, style) in links {
            if self.draw(&connection, &style).is_err() {
                self.pending_links.push((connection, style));
            }
        }
    }

    fn register(&mut self, card: &Card) -> SurfaceResult<()> {
        let id = card.id();
        if !self.attached.contains(id) {
            self.gesture.attach(id, card.frame())?;
            self.attached.insert(id.clone());
        }
        if !self.with_endpoints.contains(id) {
            self.connector.add_endpoints(id, &EndpointSpec::four_sides())?;
            self.with_endpoints.insert(id.clone());
        }
        Ok(())
    }

    fn draw(&mut self, connection: &Connection, style: &ConnectionStyle) -> SurfaceResult<()> {
        for id in [&connection.source, &connection.target] {
            if !self.with_endpoints.contains(id) {
                return Err(AdapterRegistrationError::UnknownEndpoint(id.clone()));
            }
        }
        self.connector.connect(&connection.source, &connection.target, style)
    }
}
