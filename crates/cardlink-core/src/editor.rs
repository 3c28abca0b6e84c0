//! Editor façade wiring the stores, tracker, mode controller and surfaces.
//!
//! Every operation follows the same path: decide in the mode controller,
//! mutate a store, sync geometry, then notify the surface adapter before
//! returning.

use crate::card::{Card, CardError, CardId, CardStore, Stagger};
use crate::config::EditorConfig;
use crate::connection::{ConnectError, Connection, ConnectionStore};
use crate::geometry::{GeometryError, GeometryTracker, ResizeDelta};
use crate::mode::{ClickOutcome, InteractionMode, ModeController};
use crate::overlay::{DetailOverlay, OverlayState};
use crate::surface::{ConnectorSurface, GestureSurface, SurfaceAdapter};
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Editor errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    #[error(transparent)]
    Card(#[from] CardError),
    #[error(transparent)]
    Connect(#[from] ConnectError),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// An input event from the toolbar, the gesture source or a card's own UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EditorEvent {
    /// "Add Card" toolbar button.
    AddCard,
    /// "Arrow Tool" toolbar button.
    ToggleArrowTool,
    EnableConnectionMode,
    DisableConnectionMode,
    CardClicked {
        card: CardId,
    },
    /// A link dragged directly between two endpoints on the surface.
    Connect {
        source: CardId,
        target: CardId,
    },
    DragMove {
        card: CardId,
        dx: f64,
        dy: f64,
    },
    ResizeMove {
        card: CardId,
        delta_left: f64,
        delta_top: f64,
        width: f64,
        height: f64,
    },
    EditText {
        card: CardId,
        text: String,
    },
    /// "Show More" button on a card.
    ShowMore {
        card: CardId,
    },
    CloseOverlay,
}

/// What handling an event produced.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorResponse {
    CardCreated(CardId),
    ModeChanged(InteractionMode),
    Clicked(ClickOutcome),
    Connected(Connection),
    Moved(Point),
    Resized(Rect),
    TextUpdated,
    OverlayChanged(OverlayState),
}

/// Serializable view of the whole diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramSnapshot {
    pub cards: Vec<Card>,
    pub connections: Vec<Connection>,
    pub mode: InteractionMode,
    pub overlay: OverlayState,
}

/// The diagram interaction engine.
#[derive(Debug)]
pub struct Editor<G, C> {
    config: EditorConfig,
    cards: CardStore,
    connections: ConnectionStore,
    tracker: GeometryTracker,
    mode: ModeController,
    overlay: DetailOverlay,
    surfaces: SurfaceAdapter<G, C>,
}

impl<G: GestureSurface, C: ConnectorSurface> Editor<G, C> {
    pub fn new(config: EditorConfig, gesture: G, connector: C) -> Self {
        let stagger = Stagger {
            origin: config.stagger_origin,
            step: config.stagger_step,
            size: Size::new(config.card_width, config.card_height),
        };
        let surfaces = SurfaceAdapter::new(gesture, connector, &config.connector);
        Self {
            cards: CardStore::with_stagger(stagger),
            connections: ConnectionStore::new(),
            tracker: GeometryTracker::new(config.min_card_size, config.snap_grid),
            mode: ModeController::new(),
            overlay: DetailOverlay::new(),
            surfaces,
            config,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn cards(&self) -> &CardStore {
        &self.cards
    }

    pub fn connections(&self) -> &ConnectionStore {
        &self.connections
    }

    pub fn mode(&self) -> &InteractionMode {
        self.mode.mode()
    }

    pub fn overlay(&self) -> &OverlayState {
        self.overlay.state()
    }

    pub fn surfaces(&self) -> &SurfaceAdapter<G, C> {
        &self.surfaces
    }

    pub fn surfaces_mut(&mut self) -> &mut SurfaceAdapter<G, C> {
        &mut self.surfaces
    }

    /// Retry deferred surface registrations, e.g. once the host has mounted.
    pub fn sync_surfaces(&mut self) {
        self.surfaces.retry_pending(&self.cards);
    }

    /// Create a card and register it with the surfaces.
    pub fn add_card(&mut self) -> CardId {
        let card = self.cards.create_card();
        self.surfaces.card_created(card);
        card.id().clone()
    }

    pub fn toggle_arrow_tool(&mut self) -> &InteractionMode {
        self.mode.toggle_connection_mode();
        self.mode.mode()
    }

    pub fn enable_connection_mode(&mut self) {
        self.mode.enable_connection_mode();
    }

    pub fn disable_connection_mode(&mut self) {
        self.mode.disable_connection_mode();
    }

    /// Route a card click through the mode controller and draw any new link.
    pub fn click_card(&mut self, id: &CardId) -> ClickOutcome {
        let outcome = self
            .mode
            .on_card_clicked(&self.cards, &mut self.connections, id);
        if let ClickOutcome::Connected(connection) = &outcome {
            self.surfaces.connection_created(connection, &self.config.link);
        }
        outcome
    }

    /// Link two cards directly, independent of connect mode.
    pub fn connect_cards(&mut self, source: &CardId, target: &CardId) -> Result<Connection, EditorError> {
        let connection = self.connections.connect(&self.cards, source, target)?;
        self.surfaces.connection_created(&connection, &self.config.link);
        Ok(connection)
    }

    pub fn drag_card(&mut self, id: &CardId, dx: f64, dy: f64) -> Result<Point, EditorError> {
        let position = self.tracker.apply_drag_delta(&mut self.cards, id, dx, dy)?;
        self.surfaces.geometry_changed(&self.cards, id);
        Ok(position)
    }

    pub fn resize_card(&mut self, id: &CardId, delta: ResizeDelta) -> Result<Rect, EditorError> {
        let frame = self.tracker.apply_resize_delta(&mut self.cards, id, delta)?;
        self.surfaces.geometry_changed(&self.cards, id);
        Ok(frame)
    }

    pub fn edit_text(&mut self, id: &CardId, text: impl Into<String>) -> Result<(), EditorError> {
        self.cards.update_text(id, text)?;
        Ok(())
    }

    /// Open the detail overlay with a copy of the card's current text.
    pub fn show_more(&mut self, id: &CardId) -> Result<&OverlayState, EditorError> {
        let card = self
            .cards
            .get(id)
            .ok_or_else(|| CardError::NotFound(id.clone()))?;
        self.overlay.show(card.text.clone());
        Ok(self.overlay.state())
    }

    pub fn close_overlay(&mut self) {
        self.overlay.close();
    }

    /// Handle one event end to end.
    pub fn handle(&mut self, event: EditorEvent) -> Result<EditorResponse, EditorError> {
        log::trace!("Handling {:?}", event);
        let response = match event {
            EditorEvent::AddCard => EditorResponse::CardCreated(self.add_card()),
            EditorEvent::ToggleArrowTool => EditorResponse::ModeChanged(self.toggle_arrow_tool().clone()),
            EditorEvent::EnableConnectionMode => {
                self.enable_connection_mode();
                EditorResponse::ModeChanged(self.mode().clone())
            }
            EditorEvent::DisableConnectionMode => {
                self.disable_connection_mode();
                EditorResponse::ModeChanged(self.mode().clone())
            }
            EditorEvent::CardClicked { card } => EditorResponse::Clicked(self.click_card(&card)),
            EditorEvent::Connect { source, target } => {
                EditorResponse::Connected(self.connect_cards(&source, &target)?)
            }
            EditorEvent::DragMove { card, dx, dy } => EditorResponse::Moved(self.drag_card(&card, dx, dy)?),
            EditorEvent::ResizeMove {
                card,
                delta_left,
                delta_top,
                width,
                height,
            } => {
                let delta = ResizeDelta {
                    delta_left,
                    delta_top,
                    width,
                    height,
                };
                EditorResponse::Resized(self.resize_card(&card, delta)?)
            }
            EditorEvent::EditText { card, text } => {
                self.edit_text(&card, text)?;
                EditorResponse::TextUpdated
            }
            EditorEvent::ShowMore { card } => EditorResponse::OverlayChanged(self.show_more(&card)?.clone()),
            EditorEvent::CloseOverlay => {
                self.close_overlay();
                EditorResponse::OverlayChanged(self.overlay().clone())
            }
        };
        Ok(response)
    }

    pub fn snapshot(&self) -> DiagramSnapshot {
        DiagramSnapshot {
            cards: self.cards.iter().cloned().collect(),
            connections: self.connections.iter().cloned().collect(),
            mode: self.mode().clone(),
            overlay: self.overlay().clone(),
        }
    }
}
