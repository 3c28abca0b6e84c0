//! Retained scene implementing both surface capabilities.

use crate::route::{Route, anchor_point, route};
use cardlink_core::card::CardId;
use cardlink_core::style::{Anchor, ConnectionStyle, ConnectorStyle, EndpointSpec, StrokeSpec};
use cardlink_core::surface::{AdapterRegistrationError, ConnectorSurface, GestureSurface, SurfaceResult};
use kurbo::{Point, Rect};
use peniko::Color;
use std::collections::HashMap;

/// A card element mounted in the scene.
#[derive(Debug, Clone)]
pub struct SceneNode {
    /// Current frame in canvas coordinates.
    pub frame: Rect,
    /// Edges the gesture layer lets the user resize from.
    pub resize_edges: [Anchor; 4],
    /// Endpoints registered on this node.
    pub endpoints: Vec<EndpointSpec>,
}

/// A drawn connector.
#[derive(Debug, Clone)]
pub struct SceneConnector {
    pub source: CardId,
    pub target: CardId,
    pub style: ConnectionStyle,
    pub route: Route,
}

/// Card frames, endpoints and routed connectors.
///
/// Before [`DiagramScene::mount`] every registration is refused with
/// [`AdapterRegistrationError::NotMounted`], the way a surface whose host
/// element does not exist yet would behave.
#[derive(Debug, Clone, Default)]
pub struct DiagramScene {
    mounted: bool,
    style: ConnectorStyle,
    nodes: HashMap<CardId, SceneNode>,
    connectors: Vec<SceneConnector>,
    hovered: Option<usize>,
    /// Number of connector routes recomputed by revalidation so far.
    reroutes: usize,
}

impl DiagramScene {
    /// A scene that is ready to accept registrations.
    pub fn new() -> Self {
        Self {
            mounted: true,
            ..Self::default()
        }
    }

    /// A scene whose host is not mounted yet.
    pub fn unmounted() -> Self {
        Self::default()
    }

    pub fn mount(&mut self) {
        log::debug!("Diagram scene mounted");
        self.mounted = true;
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn style(&self) -> &ConnectorStyle {
        &self.style
    }

    pub fn node(&self, id: &CardId) -> Option<&SceneNode> {
        self.nodes.get(id)
    }

    pub fn connectors(&self) -> &[SceneConnector] {
        &self.connectors
    }

    pub fn reroutes(&self) -> usize {
        self.reroutes
    }

    /// Highlight a connector, or clear the highlight.
    pub fn set_hovered(&mut self, index: Option<usize>) {
        self.hovered = index.filter(|i| *i < self.connectors.len());
    }

    /// Stroke color and width for a connector, honoring hover.
    pub fn stroke(&self, index: usize) -> (Color, f64) {
        let StrokeSpec { color, width } = if self.hovered == Some(index) {
            self.style.hover
        } else {
            self.style.paint
        };
        (color.into(), width)
    }

    /// Positions of the endpoint markers drawn on a card.
    pub fn endpoint_positions(&self, id: &CardId) -> Vec<(Anchor, Point)> {
        self.nodes
            .get(id)
            .map(|node| {
                node.endpoints
                    .iter()
                    .map(|e| (e.anchor, anchor_point(node.frame, e.anchor)))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn ensure_mounted(&self, id: &CardId) -> SurfaceResult<()> {
        if self.mounted {
            Ok(())
        } else {
            Err(AdapterRegistrationError::NotMounted(id.clone()))
        }
    }

    fn route_between(&self, source: &CardId, target: &CardId, style: &ConnectionStyle) -> SurfaceResult<Route> {
        let (from_anchor, to_anchor) = style.anchors;
        let from = self.endpoint_frame(source, from_anchor, |e| e.is_source)?;
        let to = self.endpoint_frame(target, to_anchor, |e| e.is_target)?;
        Ok(route(from, from_anchor, to, to_anchor, style.connector, &self.style.arrow))
    }

    fn endpoint_frame(
        &self,
        id: &CardId,
        anchor: Anchor,
        accepts: impl Fn(&EndpointSpec) -> bool,
    ) -> SurfaceResult<Rect> {
        let node = self
            .nodes
            .get(id)
            .ok_or_else(|| AdapterRegistrationError::UnknownEndpoint(id.clone()))?;
        if node.endpoints.iter().any(|e| e.anchor == anchor && accepts(e)) {
            Ok(node.frame)
        } else {
            Err(AdapterRegistrationError::UnknownEndpoint(id.clone()))
        }
    }
}

impl GestureSurface for DiagramScene {
    fn attach(&mut self, card: &CardId, frame: Rect) -> SurfaceResult<()> {
        self.ensure_mounted(card)?;
        let node = self.nodes.entry(card.clone()).or_insert_with(|| SceneNode {
            frame,
            resize_edges: Anchor::ALL,
            endpoints: Vec::new(),
        });
        node.frame = frame;
        Ok(())
    }

    fn place(&mut self, card: &CardId, frame: Rect) -> SurfaceResult<()> {
        self.ensure_mounted(card)?;
        let node = self
            .nodes
            .get_mut(card)
            .ok_or_else(|| AdapterRegistrationError::NotMounted(card.clone()))?;
        node.frame = frame;
        Ok(())
    }
}

impl ConnectorSurface for DiagramScene {
    fn configure(&mut self, style: &ConnectorStyle) {
        self.style = style.clone();
    }

    fn add_endpoints(&mut self, card: &CardId, endpoints: &[EndpointSpec]) -> SurfaceResult<()> {
        self.ensure_mounted(card)?;
        let node = self
            .nodes
            .get_mut(card)
            .ok_or_else(|| AdapterRegistrationError::NotMounted(card.clone()))?;
        for endpoint in endpoints {
            if !node.endpoints.contains(endpoint) {
                node.endpoints.push(*endpoint);
            }
        }
        Ok(())
    }

    fn revalidate(&mut self, card: &CardId) -> SurfaceResult<()> {
        self.ensure_mounted(card)?;
        let attached: Vec<usize> = self
            .connectors
            .iter()
            .enumerate()
            .filter(|(_, c)| &c.source == card || &c.target == card)
            .map(|(i, _)| i)
            .collect();

        for i in attached {
            let connector = &self.connectors[i];
            match self.route_between(&connector.source, &connector.target, &connector.style) {
                Ok(route) => {
                    self.connectors[i].route = route;
                    self.reroutes += 1;
                }
                Err(err) => log::warn!("Failed to reroute connector {}: {}", i, err),
            }
        }
        Ok(())
    }

    fn connect(&mut self, source: &CardId, target: &CardId, style: &ConnectionStyle) -> SurfaceResult<()> {
        self.ensure_mounted(source)?;
        let route = self.route_between(source, target, style)?;
        log::debug!("Drawing connector {} -> {}", source, target);
        self.connectors.push(SceneConnector {
            source: source.clone(),
            target: target.clone(),
            style: *style,
            route,
        });
        Ok(())
    }
}
