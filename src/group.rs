use log::{debug, trace};

use crate::primitives::{Node, Primitive};
use crate::spacial::{rotate_point, Coordinate, ToCoordinate, ToPosition, ToVector, Vector};

/// Accumulated rotation and translation of the groups enclosing a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// degrees
    pub angle: f64,
    /// board units, kept in floating point so nesting does not accumulate rounding
    pub offset: Vector,
}

impl Default for Frame {
    fn default() -> Self {
        Self {
            angle: 0.0,
            offset: Vector::zeros(),
        }
    }
}

impl Frame {
    fn apply(&self, coordinate: Coordinate) -> Coordinate {
        rotate_point(coordinate.to_position(), self.angle, self.offset).to_coordinate()
    }

    fn rotate(&self, coordinate: Coordinate) -> Coordinate {
        rotate_point(coordinate.to_position(), self.angle, Vector::zeros()).to_coordinate()
    }

    /// The frame a group's children are resolved in.
    pub fn enter(&self, location: Coordinate, angle: f64) -> Self {
        let offset = rotate_point(location.to_position(), self.angle, self.offset).to_vector();
        Self {
            angle: self.angle + angle,
            offset,
        }
    }

    /// Returns an independent copy of `primitive` in absolute coordinates.
    pub fn resolve(&self, primitive: &Primitive) -> Primitive {
        let mut primitive = primitive.clone();
        match &mut primitive {
            Primitive::Line(line) => {
                line.start = self.apply(line.start);
                line.end = self.apply(line.end);
            }
            Primitive::Arc(arc) => {
                arc.location = self.apply(arc.location);
                arc.start_angle += self.angle;
                arc.end_angle += self.angle;
            }
            Primitive::Circle(circle) => {
                circle.location = self.apply(circle.location);
            }
            Primitive::Polygon(polygon) => {
                polygon.location = self.apply(polygon.location);
                // points stay relative to the location, so they only rotate
                for point in polygon.points.iter_mut() {
                    *point = self.rotate(*point);
                }
            }
            Primitive::Text(text) => {
                text.location = self.apply(text.location);
                text.angle += self.angle;
            }
        }
        primitive
    }
}

/// Resolves every group in the tree, returning the primitives in absolute coordinates, pre-order.
///
/// The tree is only borrowed, so a subtree shared by several groups is resolved once per placement.
#[profiling::function]
pub fn flatten(nodes: &[Node]) -> Vec<Primitive> {
    let mut primitives = Vec::new();
    resolve(nodes, Frame::default(), &mut primitives);
    debug!("flattened primitives: {}", primitives.len());
    primitives
}

fn resolve(nodes: &[Node], frame: Frame, primitives: &mut Vec<Primitive>) {
    for node in nodes {
        match node {
            Node::Group(group) => {
                let group_frame = frame.enter(group.location, group.angle);
                trace!("entering group. frame: {:?}", group_frame);
                resolve(&group.children, group_frame, primitives);
            }
            Node::Primitive(primitive) => primitives.push(frame.resolve(primitive)),
        }
    }
}
