use std::io::BufWriter;

use gerber_types::{Command, GerberCode};

pub fn dump_gerber_source(commands: &Vec<Command>) {
    let gerber_source = gerber_commands_to_source(commands);

    println!("Gerber source:\n{}", gerber_source);
}

pub fn gerber_commands_to_source(commands: &Vec<Command>) -> String {
    let mut buf = BufWriter::new(Vec::new());
    commands
        .serialize(&mut buf)
        .expect("Could not generate Gerber code");
    let bytes = buf.into_inner().unwrap();
    String::from_utf8(bytes).unwrap()
}

/// Scenes used by the tests, the benchmark and the demo.
pub mod scenes {
    use crate::primitives::{Arc, Circle, DesignRules, Group, Line, Node, Polygon, Text};
    use crate::spacial::Coordinate;
    use crate::types::LineShape;

    const SMALL: i64 = 1_000_000;
    const DIST: i64 = 10_000_000;
    const LARGE: i64 = 60_000_000;

    /// One of each primitive kind around the group origin.
    pub fn group_primitives() -> Vec<Node> {
        vec![
            Line::new(
                Coordinate::new(0, SMALL * 2),
                Coordinate::new(0, -SMALL),
                LineShape::Circle,
                DesignRules::new(0.25),
            )
            .into(),
            Circle::new(Coordinate::new(SMALL, 0), DesignRules::new(0.25)).into(),
            Text::new(Coordinate::new(0, -SMALL * 2), "Group", 0.75, 0.0, DesignRules::new(0.05)).into(),
            Polygon::new(Coordinate::new(-SMALL, 0), vec![
                Coordinate::new(-SMALL, -SMALL / 2),
                Coordinate::new(-SMALL, SMALL / 2),
                Coordinate::new(SMALL, 0),
            ])
            .into(),
            Arc::new(Coordinate::new(SMALL, 0), SMALL, 45.0, 315.0, LineShape::Rectangle, DesignRules::new(0.25)).into(),
        ]
    }

    /// Copies of [`group_primitives`] placed around a ring, each rotated differently.
    pub fn ring() -> Vec<Node> {
        let children = group_primitives();
        let group = |x: i64, y: i64, angle: f64| -> Node { Group::new(Coordinate::new(x, y), angle, children.clone()).into() };

        vec![
            group(0, 0, 0.0),
            group(DIST, 0, 0.0),
            group(DIST, DIST, 45.0),
            group(0, DIST, 90.0),
            group(-DIST, DIST, 135.0),
            group(-DIST, 0, 180.0),
            group(-DIST, -DIST, 215.0),
            group(0, -DIST, 270.0),
            group(DIST, -DIST, 315.0),
        ]
    }

    /// The ring offset and rotated, then repeated around the origin. Three levels of nesting.
    pub fn rosette() -> Vec<Node> {
        let offset: Vec<Node> = vec![Group::new(Coordinate::new(LARGE, 0), 22.4, ring()).into()];
        let group = |x: i64, angle: f64| -> Node { Group::new(Coordinate::new(x, 0), angle, offset.clone()).into() };

        let mut nodes = vec![group(-LARGE, 0.0)];
        nodes.extend(
            [0.0, 45.0, 90.0, 135.0, 180.0, 215.0, 270.0, 315.0]
                .into_iter()
                .map(|angle| group(0, angle)),
        );
        nodes
    }

    /// Ungrouped primitives exercising arc scaling, both line shapes, regions and text.
    pub fn primitive_sheet() -> Vec<Node> {
        let rules = DesignRules::new;
        let arc = |x: i64, y: i64, radius: i64, x_scale: f64, y_scale: f64, start: f64, end: f64| -> Node {
            Arc::new(Coordinate::new(x, y), radius, start, end, LineShape::Circle, rules(0.1))
                .with_scale(x_scale, y_scale)
                .into()
        };
        let line = |start: (i64, i64), end: (i64, i64), shape: LineShape, thickness: f64| -> Node {
            Line::new(Coordinate::new(start.0, start.1), Coordinate::new(end.0, end.1), shape, rules(thickness)).into()
        };

        vec![
            arc(-2_000_000, 0, 500_000, 1.0, 1.0, 270.0, 315.0),
            arc(-2_000_000, 0, 500_000, 1.0, 1.0, 135.0, 225.0),
            arc(-2_000_000, 0, 500_000, 1.0, 1.0, 0.0, 90.0),
            arc(-2_000_000, 1_000_000, 1_000_000, 0.5, 1.0, 0.0, 180.0),
            arc(-2_000_000, 1_000_000, 1_000_000, 0.3, 0.6, 0.0, 180.0),
            arc(-2_000_000, 3_500_000, 1_000_000, 1.0, 0.75, 30.0, 330.0),
            arc(-2_000_000, 3_500_000, 1_000_000, 0.66, 0.5, 30.0, 330.0),
            line((1_000_000, 1_000_000), (2_000_000, 2_000_000), LineShape::Circle, 0.25),
            line((1_000_000, 2_000_000), (2_000_000, 3_000_000), LineShape::Rectangle, 0.5),
            line((1_000_000, 3_500_000), (2_000_000, 3_500_000), LineShape::Circle, 0.25),
            line((1_000_000, 4_000_000), (2_000_000, 4_000_000), LineShape::Rectangle, 0.25),
            line((2_500_000, 1_000_000), (2_500_000, 1_000_000), LineShape::Rectangle, 1.0),
            Circle::new(Coordinate::new(0, 0), rules(0.5)).into(),
            Circle::new(Coordinate::new(0, 2_000_000), rules(0.5)).into(),
            Circle::new(Coordinate::new(3_500_000, 3_000_000), rules(1.25)).into(),
            Polygon::new(Coordinate::new(1_000_000, 0), vec![
                Coordinate::new(3_000_000, 0),
                Coordinate::new(4_000_000, 0),
                Coordinate::new(4_000_000, 1_500_000),
                Coordinate::new(2_500_000, 1_500_000),
                Coordinate::new(3_000_000, 1_000_000),
            ])
            .into(),
            Text::new(Coordinate::new(0, -1_500_000), "Hello", 1.0, 0.0, rules(0.075)).into(),
            Text::new(Coordinate::new(0, -3_500_000), "There!", 2.0, 0.0, rules(0.15)).into(),
            Text::new(Coordinate::new(6_000_000, -1_000_000), "Any Angle Text", 0.5, 45.0, rules(0.04)).into(),
        ]
    }

}
