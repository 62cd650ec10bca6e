//! Serializable description of a whole drawing.
//!
//! # Overview
//!
//! A [`DrawingDescription`] lists components, links and areas with every
//! vertex given as an anchor reference string (see `topolink_parser`). It
//! derives [`serde::Deserialize`], so a drawing can be written in TOML:
//!
//! ```toml
//! [[component]]
//! name = "router"
//! position = [100, 80]
//! size = [40, 40]
//! points = [{ name = "east", offset = [20, 0], direction = 0 }]
//!
//! [[link]]
//! name = "uplink"
//! vertices = ["router:east", "(300, 80)"]
//! ```
//!
//! [`Drawing::from_description`] builds the drawing in two passes: all
//! elements are created first with unset anchors, then the anchors are
//! resolved, bundles before other links, so references may point forward.
//! Interior positions of a self-loop link are relative to its head vertex.

use log::{debug, info};
use serde::Deserialize;

use topolink_core::{
    direction::Direction,
    geometry::{Bounds, Point, Size},
    identifier::Id,
};

use crate::{
    drawing::{Anchor, ConnectionPoint, Drawing, ElementId},
    error::{Result, TopolinkError},
};

/// Top-level drawing file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DrawingDescription {
    canvas: Option<CanvasDescription>,
    #[serde(rename = "component")]
    components: Vec<ComponentDescription>,
    #[serde(rename = "link")]
    links: Vec<LinkDescription>,
    #[serde(rename = "area")]
    areas: Vec<AreaDescription>,
}

impl DrawingDescription {
    pub fn canvas(&self) -> Option<&CanvasDescription> {
        self.canvas.as_ref()
    }

    pub fn components(&self) -> &[ComponentDescription] {
        &self.components
    }

    pub fn links(&self) -> &[LinkDescription] {
        &self.links
    }

    pub fn areas(&self) -> &[AreaDescription] {
        &self.areas
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CanvasDescription {
    #[serde(default)]
    origin: Point,
    size: Size,
}

impl CanvasDescription {
    pub fn bounds(&self) -> Bounds {
        Bounds::new_from_top_left(self.origin, self.size)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ComponentDescription {
    name: String,
    #[serde(default)]
    db_id: Option<u64>,
    position: Point,
    #[serde(default)]
    size: Size,
    #[serde(default)]
    points: Vec<PointDescription>,
    #[serde(default)]
    z_index: Option<i64>,
}

/// A connection point, placed relative to its component's center.
#[derive(Debug, Clone, Deserialize)]
pub struct PointDescription {
    name: String,
    #[serde(default)]
    offset: Point,
    /// Preferred direction in degrees.
    #[serde(default)]
    direction: Option<f32>,
    #[serde(default)]
    exclusive: bool,
}

impl PointDescription {
    fn to_point(&self) -> ConnectionPoint {
        let point = ConnectionPoint::new(Id::new(&self.name), self.offset)
            .with_exclusive(self.exclusive);
        match self.direction {
            Some(degrees) => point.with_direction(Direction::new(degrees)),
            None => point,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinkDescription {
    name: String,
    #[serde(default)]
    db_id: Option<u64>,
    #[serde(default)]
    bundle: bool,
    vertices: Vec<String>,
    #[serde(default)]
    z_index: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AreaDescription {
    name: String,
    #[serde(default)]
    db_id: Option<u64>,
    vertices: Vec<String>,
    #[serde(default)]
    z_index: Option<i64>,
}

/// An element waiting for its vertex anchors.
struct Pending<'a> {
    id: ElementId,
    name: Id,
    bundle: bool,
    vertices: &'a [String],
}

impl Drawing {
    /// Builds a drawing from its description.
    ///
    /// Without an explicit canvas, the canvas becomes the content bounds
    /// grown by `margin` on every side.
    ///
    /// # Errors
    ///
    /// Fails on the first invalid element or anchor; anchor errors carry the
    /// element name and vertex index.
    pub fn from_description(description: &DrawingDescription, margin: f32) -> Result<Self> {
        let mut drawing = match description.canvas() {
            Some(canvas) => Drawing::new(canvas.bounds()),
            None => Drawing::default(),
        };
        let mut stacking: Vec<(ElementId, i64)> = Vec::new();

        for component in &description.components {
            let id = drawing.add_component(
                Id::new(&component.name),
                component.position,
                component.size,
            )?;
            for point in &component.points {
                drawing.add_connection_point(id, point.to_point())?;
            }
            drawing.set_db_id(id, component.db_id)?;
            stacking.extend(component.z_index.map(|z| (id, z)));
        }

        let mut pending = Vec::new();
        for link in &description.links {
            let name = Id::new(&link.name);
            let id = drawing.add_link(name, link.bundle, vec![Anchor::Unset; link.vertices.len()])?;
            drawing.set_db_id(id, link.db_id)?;
            stacking.extend(link.z_index.map(|z| (id, z)));
            pending.push(Pending {
                id,
                name,
                bundle: link.bundle,
                vertices: &link.vertices,
            });
        }
        for area in &description.areas {
            let name = Id::new(&area.name);
            let id = drawing.add_area(name, vec![Anchor::Unset; area.vertices.len()])?;
            drawing.set_db_id(id, area.db_id)?;
            stacking.extend(area.z_index.map(|z| (id, z)));
            pending.push(Pending {
                id,
                name,
                bundle: false,
                vertices: &area.vertices,
            });
        }

        pending.sort_by_key(|element| !element.bundle);
        for element in &pending {
            drawing.resolve_pending(element)?;
        }

        for (id, z_index) in stacking {
            drawing.z_order_mut().remove(id);
            drawing.z_order_mut().add(id, Some(z_index));
        }

        if description.canvas().is_none() {
            if let Some(content) = drawing.content_bounds() {
                drawing.set_canvas(content.expand(margin));
            }
        }

        info!(
            elements = drawing.elements().count(),
            vertices = drawing.vertices().count();
            "Drawing loaded"
        );
        Ok(drawing)
    }

    /// Endpoints go first, so interior positions of a self-loop are read as
    /// relative to its head, the way [`Drawing::anchor_ref`] writes them.
    fn resolve_pending(&mut self, element: &Pending<'_>) -> Result<()> {
        let sequence = self.element(element.id)?.vertices().to_vec();
        let last = sequence.len().saturating_sub(1);
        let order = [0, last]
            .into_iter()
            .chain(1..last)
            .take(sequence.len());

        for index in order {
            let (Some(vertex), Some(source)) = (sequence.get(index), element.vertices.get(index))
            else {
                continue;
            };
            let in_vertex = |source: TopolinkError| TopolinkError::InVertex {
                element: element.name,
                index,
                source: Box::new(source),
            };
            let anchor = self.parse_anchor_ref(source).map_err(in_vertex)?;
            self.set_anchor(*vertex, anchor).map_err(in_vertex)?;
            debug!(element:% = element.name, index, anchor = source.as_str(); "Vertex resolved");
        }
        Ok(())
    }
}
