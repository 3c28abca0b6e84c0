//! Connector and endpoint styling handed to the diagram surface.

use peniko::Color;
use serde::{Deserialize, Serialize};

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn red() -> Self {
        Self::rgb(255, 0, 0)
    }

    /// Slate blue used for connector strokes and endpoint dots.
    pub const fn slate() -> Self {
        Self::rgb(0x44, 0x55, 0x66)
    }

    /// Teal used while hovering a connector.
    pub const fn teal() -> Self {
        Self::rgb(0x44, 0x99, 0x99)
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// One of the four attachment sides of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Anchor {
    Top,
    Bottom,
    Left,
    Right,
}

impl Anchor {
    /// All four sides, in registration order.
    pub const ALL: [Anchor; 4] = [Anchor::Top, Anchor::Bottom, Anchor::Left, Anchor::Right];

    /// Unit direction pointing out of the card on this side.
    pub fn outward(self) -> (f64, f64) {
        match self {
            Anchor::Top => (0.0, -1.0),
            Anchor::Bottom => (0.0, 1.0),
            Anchor::Left => (-1.0, 0.0),
            Anchor::Right => (1.0, 0.0),
        }
    }

    /// Whether connectors leave this side vertically.
    pub fn is_vertical(self) -> bool {
        matches!(self, Anchor::Top | Anchor::Bottom)
    }
}

/// An endpoint registered on a card side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointSpec {
    pub anchor: Anchor,
    /// Connections may start here.
    pub is_source: bool,
    /// Connections may end here.
    pub is_target: bool,
}

impl EndpointSpec {
    /// A bidirectional endpoint on the given side.
    pub fn both(anchor: Anchor) -> Self {
        Self {
            anchor,
            is_source: true,
            is_target: true,
        }
    }

    /// The four bidirectional endpoints every card carries.
    pub fn four_sides() -> [EndpointSpec; 4] {
        Anchor::ALL.map(Self::both)
    }
}

/// How a connector path is routed between two anchors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConnectorKind {
    /// Orthogonal segments with straight stubs leaving each endpoint.
    Flowchart {
        /// Stub length at the source and target ends.
        stub: (f64, f64),
        /// Gap between the endpoint and where the line starts.
        gap: f64,
    },
    /// A single straight segment.
    Straight,
}

impl Default for ConnectorKind {
    fn default() -> Self {
        ConnectorKind::Flowchart {
            stub: (30.0, 30.0),
            gap: 10.0,
        }
    }
}

/// Endpoint marker drawn at each anchor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EndpointMarker {
    pub radius: f64,
    pub fill: SerializableColor,
}

impl Default for EndpointMarker {
    fn default() -> Self {
        Self {
            radius: 5.0,
            fill: SerializableColor::slate(),
        }
    }
}

/// Stroke properties for a connector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeSpec {
    pub color: SerializableColor,
    pub width: f64,
}

/// Arrow head placed along the connector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArrowOverlay {
    pub width: f64,
    pub length: f64,
    /// Position along the path, 0.0 = source, 1.0 = target.
    pub location: f64,
}

impl Default for ArrowOverlay {
    fn default() -> Self {
        Self {
            width: 10.0,
            length: 10.0,
            location: 1.0,
        }
    }
}

/// Default styling for every connector drawn on the surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectorStyle {
    pub connector: ConnectorKind,
    pub endpoint: EndpointMarker,
    pub paint: StrokeSpec,
    pub hover: StrokeSpec,
    pub arrow: ArrowOverlay,
}

impl Default for ConnectorStyle {
    fn default() -> Self {
        Self {
            connector: ConnectorKind::default(),
            endpoint: EndpointMarker::default(),
            paint: StrokeSpec {
                color: SerializableColor::slate(),
                width: 2.0,
            },
            hover: StrokeSpec {
                color: SerializableColor::teal(),
                width: 4.0,
            },
            arrow: ArrowOverlay::default(),
        }
    }
}

/// Styling for a single link drawn by the connect tool.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionStyle {
    /// Source and target anchors.
    pub anchors: (Anchor, Anchor),
    pub connector: ConnectorKind,
    pub endpoint: EndpointMarker,
}

impl Default for ConnectionStyle {
    fn default() -> Self {
        Self {
            anchors: (Anchor::Bottom, Anchor::Top),
            connector: ConnectorKind::Flowchart {
                stub: (40.0, 60.0),
                gap: 10.0,
            },
            endpoint: EndpointMarker {
                radius: 5.0,
                fill: SerializableColor::red(),
            },
        }
    }
}
