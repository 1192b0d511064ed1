//! Board primitives and the group tree they are composed into.
//!
//! All coordinates are integer board units (see [`crate::spacial::UNITS_PER_MM`]), all physical sizes
//! (thickness, clearance) are floating point millimetres.

use crate::spacial::Coordinate;
use crate::types::{LineShape, Winding};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DesignRules {
    /// Stroke thickness in mm, drives the aperture size.
    pub thickness: f64,
    /// Carried through unchanged, nothing consumes it yet.
    pub clearance: Option<f64>,
}

impl DesignRules {
    pub fn new(thickness: f64) -> Self {
        Self {
            thickness,
            clearance: None,
        }
    }

    pub fn with_clearance(mut self, clearance: f64) -> Self {
        self.clearance = Some(clearance);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Line {
    pub start: Coordinate,
    pub end: Coordinate,
    pub shape: LineShape,
    pub design_rules: DesignRules,
}

impl Line {
    pub fn new(start: Coordinate, end: Coordinate, shape: LineShape, design_rules: DesignRules) -> Self {
        Self {
            start,
            end,
            shape,
            design_rules,
        }
    }
}

/// Elliptical arc, drawn counter-clockwise from `start_angle` to `end_angle`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Arc {
    pub location: Coordinate,
    /// board units
    pub radius: i64,
    /// 0.0..=1.0
    pub x_scale: f64,
    /// 0.0..=1.0
    pub y_scale: f64,
    /// degrees, 0.0..=360.0
    pub start_angle: f64,
    /// degrees, 0.0..=360.0
    pub end_angle: f64,
    pub shape: LineShape,
    pub design_rules: DesignRules,
}

impl Arc {
    pub fn new(
        location: Coordinate,
        radius: i64,
        start_angle: f64,
        end_angle: f64,
        shape: LineShape,
        design_rules: DesignRules,
    ) -> Self {
        Self {
            location,
            radius,
            x_scale: 1.0,
            y_scale: 1.0,
            start_angle,
            end_angle,
            shape,
            design_rules,
        }
    }

    pub fn with_scale(mut self, x_scale: f64, y_scale: f64) -> Self {
        self.x_scale = x_scale;
        self.y_scale = y_scale;
        self
    }
}

/// A filled dot, the diameter is the design rule thickness.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Circle {
    pub location: Coordinate,
    pub design_rules: DesignRules,
}

impl Circle {
    pub fn new(location: Coordinate, design_rules: DesignRules) -> Self {
        Self {
            location,
            design_rules,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Polygon {
    pub location: Coordinate,
    pub winding: Winding,
    /// Relative to `location`
    pub points: Vec<Coordinate>,
    /// Conventionally a zero thickness, polygons are filled and never stroked.
    pub design_rules: DesignRules,
}

impl Polygon {
    /// The winding is derived from `points` with [`Winding::from_vertices`], see [`Polygon::with_winding`].
    pub fn new(location: Coordinate, points: Vec<Coordinate>) -> Self {
        let winding = Winding::from_vertices(&points);
        Self {
            location,
            winding,
            points,
            design_rules: DesignRules::default(),
        }
    }

    /// Overrides the derived winding, the points are left as they are.
    pub fn with_winding(mut self, winding: Winding) -> Self {
        self.winding = winding;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Text {
    pub location: Coordinate,
    pub text: String,
    /// Scale factor applied to the stroke font's 1mm cell.
    pub height: f64,
    /// degrees, counter-clockwise
    pub angle: f64,
    pub design_rules: DesignRules,
}

impl Text {
    pub fn new(location: Coordinate, text: impl Into<String>, height: f64, angle: f64, design_rules: DesignRules) -> Self {
        Self {
            location,
            text: text.into(),
            height,
            angle,
            design_rules,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Primitive {
    Line(Line),
    Arc(Arc),
    Circle(Circle),
    Polygon(Polygon),
    Text(Text),
}

impl Primitive {
    pub fn design_rules(&self) -> &DesignRules {
        match self {
            Primitive::Line(line) => &line.design_rules,
            Primitive::Arc(arc) => &arc.design_rules,
            Primitive::Circle(circle) => &circle.design_rules,
            Primitive::Polygon(polygon) => &polygon.design_rules,
            Primitive::Text(text) => &text.design_rules,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Primitive::Line(_) => "line",
            Primitive::Arc(_) => "arc",
            Primitive::Circle(_) => "circle",
            Primitive::Polygon(_) => "polygon",
            Primitive::Text(_) => "text",
        }
    }
}

macro_rules! impl_from_primitive {
    ($($name:ident),*) => {
        $(
            impl From<$name> for Primitive {
                fn from(value: $name) -> Self {
                    Primitive::$name(value)
                }
            }

            impl From<$name> for Node {
                fn from(value: $name) -> Self {
                    Node::Primitive(Primitive::$name(value))
                }
            }
        )*
    };
}

impl_from_primitive!(Line, Arc, Circle, Polygon, Text);

/// Rotates its children by `angle` degrees, then translates them by `location`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Group {
    pub location: Coordinate,
    pub angle: f64,
    pub children: Vec<Node>,
}

impl Group {
    pub fn new(location: Coordinate, angle: f64, children: Vec<Node>) -> Self {
        Self {
            location,
            angle,
            children,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Node {
    Primitive(Primitive),
    Group(Group),
}

impl From<Primitive> for Node {
    fn from(value: Primitive) -> Self {
        Node::Primitive(value)
    }
}

impl From<Group> for Node {
    fn from(value: Group) -> Self {
        Node::Group(value)
    }
}
