//! Cardlink Core Library
//!
//! Platform-agnostic interaction engine for the Cardlink node-link diagram
//! editor: cards, connections, drag/resize geometry, connect mode, and the
//! adapter toward external drawing and gesture surfaces.

pub mod card;
pub mod config;
pub mod connection;
pub mod editor;
pub mod geometry;
pub mod mode;
pub mod overlay;
pub mod snap;
pub mod style;
pub mod surface;

pub use card::{Card, CardError, CardId, CardStore};
pub use config::{ConfigError, EditorConfig};
pub use connection::{ConnectError, Connection, ConnectionStore};
pub use editor::{DiagramSnapshot, Editor, EditorError, EditorEvent, EditorResponse};
pub use geometry::{GeometryError, GeometryTracker, ResizeDelta, MIN_CARD_SIZE};
pub use mode::{ClickOutcome, InteractionMode, ModeController};
pub use overlay::{DetailOverlay, OverlayState};
pub use snap::{snap_to_grid, SnapResult, GRID_SIZE};
pub use style::{Anchor, ConnectionStyle, ConnectorKind, ConnectorStyle, EndpointSpec, SerializableColor};
pub use surface::{AdapterRegistrationError, ConnectorSurface, GestureSurface, SurfaceAdapter, SurfaceResult};
