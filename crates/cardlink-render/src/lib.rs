//! Cardlink Render Library
//!
//! A retained scene that implements the gesture and connector surfaces of
//! `cardlink-core`, with flowchart routing for connectors.

mod route;
mod scene;

pub use route::{Route, anchor_point, flowchart_points, point_along, route};
pub use scene::{DiagramScene, SceneConnector, SceneNode};
