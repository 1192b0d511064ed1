//! Reads an existing RS274X command stream back into primitives.
//!
//! Only the subset this crate writes, plus flashes of standard circle and rectangle apertures, is understood.
//! The result is a flat list of nodes, it can be wrapped in a [`crate::Group`] to place it on a board.

use std::collections::{HashMap, HashSet};

use gerber_types::{
    Aperture as GerberAperture, ApertureDefinition, Command, Coordinates, DCode, ExtendedCode, FunctionCode, GCode,
    InterpolationMode, Operation, Unit,
};
use log::{debug, trace, warn};

use crate::error::PlotError;
use crate::primitives::{Circle, DesignRules, Line, Node, Polygon};
use crate::spacial::{mm_to_units, Coordinate, Position};
use crate::types::LineShape;

/// Stroke thickness used for lines drawn with an aperture that has no line equivalent, mm.
pub const FALLBACK_THICKNESS: f64 = 0.1;

const MM_PER_INCH: f64 = 25.4;

#[derive(Debug, Clone, PartialEq)]
pub enum ImportDiagnostic {
    /// Reported once per aperture code.
    UnsupportedAperture { code: i32, fallback_thickness: f64 },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Imported {
    pub nodes: Vec<Node>,
    pub diagnostics: Vec<ImportDiagnostic>,
}

#[derive(Debug)]
struct ImportState {
    /// mm per file unit
    scale: f64,
    apertures: HashMap<i32, GerberAperture>,
    current_aperture: Option<i32>,
    /// mm
    position: Position,
    interpolation_mode: InterpolationMode,
    /// Vertices of the open contour, `None` outside G36/G37.
    contour: Option<Vec<Position>>,
    reported_apertures: HashSet<i32>,
    imported: Imported,
}

impl Default for ImportState {
    fn default() -> Self {
        Self {
            scale: 1.0,
            apertures: HashMap::new(),
            current_aperture: None,
            position: Position::origin(),
            interpolation_mode: InterpolationMode::Linear,
            contour: None,
            reported_apertures: HashSet::new(),
            imported: Imported::default(),
        }
    }
}

fn to_units(position: Position) -> Coordinate {
    Coordinate::new(mm_to_units(position.x), mm_to_units(position.y))
}

impl ImportState {
    fn update_position(&mut self, coords: &Coordinates) {
        let x = coords
            .x
            .map(|value| value.into())
            .map(|value: f64| value * self.scale)
            .unwrap_or(self.position.x);
        let y = coords
            .y
            .map(|value| value.into())
            .map(|value: f64| value * self.scale)
            .unwrap_or(self.position.y);

        self.position = Position::new(x, y);
    }

    fn selected_aperture(&self, operation: &str) -> Result<(i32, GerberAperture), PlotError> {
        let code = self
            .current_aperture
            .ok_or_else(|| PlotError::UnsupportedPrimitive(format!("{} without a selected aperture", operation)))?;
        let aperture = self
            .apertures
            .get(&code)
            .ok_or_else(|| PlotError::UnsupportedPrimitive(format!("{} with undefined aperture D{}", operation, code)))?;

        Ok((code, aperture.clone()))
    }

    fn apply(&mut self, command: &Command) -> Result<(), PlotError> {
        match command {
            Command::ExtendedCode(ExtendedCode::Unit(unit)) => {
                self.scale = match unit {
                    Unit::Millimeters => 1.0,
                    Unit::Inches => MM_PER_INCH,
                };
            }
            Command::ExtendedCode(ExtendedCode::ApertureDefinition(ApertureDefinition {
                code,
                aperture,
            })) => {
                trace!("aperture definition. code: {}", code);
                self.apertures
                    .insert(*code, aperture.clone());
            }
            Command::FunctionCode(FunctionCode::GCode(GCode::InterpolationMode(mode))) => {
                self.interpolation_mode = *mode;
            }
            Command::FunctionCode(FunctionCode::GCode(GCode::RegionMode(enabled))) => {
                self.close_contour();
                self.contour = match enabled {
                    true => Some(Vec::new()),
                    false => None,
                };
            }
            Command::FunctionCode(FunctionCode::DCode(DCode::SelectAperture(code))) => {
                self.current_aperture = Some(*code);
            }
            Command::FunctionCode(FunctionCode::DCode(DCode::Operation(operation))) => self.operate(operation)?,
            _ => {
                trace!("ignored command: {:?}", command);
            }
        }

        Ok(())
    }

    fn operate(&mut self, operation: &Operation) -> Result<(), PlotError> {
        match operation {
            Operation::Move(coords) => {
                if self.contour.is_some() {
                    self.close_contour();
                    self.contour = Some(Vec::new());
                }
                self.update_position(coords);
            }
            Operation::Interpolate(coords, _) => {
                if !matches!(self.interpolation_mode, InterpolationMode::Linear) {
                    return Err(PlotError::UnsupportedPrimitive("circular interpolation".to_string()));
                }

                let start = self.position;
                self.update_position(coords);
                let end = self.position;

                if let Some(contour) = self.contour.as_mut() {
                    if contour.is_empty() {
                        contour.push(start);
                    }
                    contour.push(end);
                    return Ok(());
                }

                self.stroke(start, end)?;
            }
            Operation::Flash(coords, ..) => {
                if self.contour.is_some() {
                    return Err(PlotError::UnsupportedPrimitive("flash inside a region".to_string()));
                }
                self.update_position(coords);
                self.flash()?;
            }
        }

        Ok(())
    }

    fn stroke(&mut self, start: Position, end: Position) -> Result<(), PlotError> {
        let (code, aperture) = self.selected_aperture("stroke")?;

        let (shape, thickness) = match aperture {
            GerberAperture::Circle(circle) => (LineShape::Circle, circle.diameter * self.scale),
            GerberAperture::Rectangle(rect) => (LineShape::Rectangle, rect.x.max(rect.y) * self.scale),
            _ => {
                if self.reported_apertures.insert(code) {
                    warn!(
                        "Unsupported aperture for strokes, using a {}mm circle. code: D{}",
                        FALLBACK_THICKNESS, code
                    );
                    self.imported
                        .diagnostics
                        .push(ImportDiagnostic::UnsupportedAperture {
                            code,
                            fallback_thickness: FALLBACK_THICKNESS,
                        });
                }
                (LineShape::Circle, FALLBACK_THICKNESS)
            }
        };

        self.imported
            .nodes
            .push(Line::new(to_units(start), to_units(end), shape, DesignRules::new(thickness)).into());

        Ok(())
    }

    fn flash(&mut self) -> Result<(), PlotError> {
        let (code, aperture) = self.selected_aperture("flash")?;

        let node: Node = match aperture {
            GerberAperture::Circle(circle) => {
                Circle::new(to_units(self.position), DesignRules::new(circle.diameter * self.scale)).into()
            }
            GerberAperture::Rectangle(rect) => {
                let width = mm_to_units(rect.x * self.scale);
                let height = mm_to_units(rect.y * self.scale);
                let corner = to_units(self.position) - Coordinate::new(width / 2, height / 2).coords;

                Polygon::new(corner, vec![
                    Coordinate::new(0, 0),
                    Coordinate::new(width, 0),
                    Coordinate::new(width, height),
                    Coordinate::new(0, height),
                ])
                .into()
            }
            _ => {
                return Err(PlotError::UnsupportedPrimitive(format!(
                    "flash of a non standard aperture, code: D{}",
                    code
                )))
            }
        };

        self.imported.nodes.push(node);
        Ok(())
    }

    /// Turns the open contour into a polygon anchored at its first vertex.
    fn close_contour(&mut self) {
        let Some(mut contour) = self.contour.take() else {
            return;
        };

        if contour.len() > 1 && contour.first() == contour.last() {
            contour.pop();
        }

        if contour.len() < 3 {
            if !contour.is_empty() {
                warn!("Degenerate region contour ignored. vertices: {}", contour.len());
            }
            return;
        }

        let vertices = contour
            .into_iter()
            .map(to_units)
            .collect::<Vec<_>>();
        let anchor = vertices[0];
        let points = vertices
            .iter()
            .map(|vertex| Coordinate::from(*vertex - anchor))
            .collect::<Vec<_>>();

        self.imported
            .nodes
            .push(Polygon::new(anchor, points).into());
    }
}

/// Converts linear strokes, regions and standard aperture flashes into nodes.
#[profiling::function]
pub fn import_commands(commands: &[Command]) -> Result<Imported, PlotError> {
    let mut state = ImportState::default();
    for command in commands {
        state.apply(command)?;
    }
    state.close_contour();

    debug!(
        "imported commands: {}, nodes: {}, diagnostics: {}",
        commands.len(),
        state.imported.nodes.len(),
        state.imported.diagnostics.len()
    );

    Ok(state.imported)
}

#[cfg(feature = "parser")]
pub fn import_reader<R: std::io::Read>(reader: R) -> Result<Imported, PlotError> {
    let document = gerber_parser::parse(std::io::BufReader::new(reader))
        .map_err(|error| PlotError::Parse(format!("{:?}", error)))?;

    import_commands(&document.into_commands())
}

#[cfg(test)]
mod tests {
    use gerber_types::{
        Circle as GerberCircle, CoordinateFormat, CoordinateNumber, Polygon as GerberPolygon, Rectangular,
    };
    use rstest::rstest;

    use super::*;
    use crate::primitives::Primitive;
    use crate::types::Winding;
    use crate::writer::GerberWriter;

    const MM: i64 = 1_000_000;

    fn coordinates(x: f64, y: f64) -> Coordinates {
        Coordinates::new(
            CoordinateNumber::try_from(x).unwrap(),
            CoordinateNumber::try_from(y).unwrap(),
            CoordinateFormat::new(4, 6),
        )
    }

    fn header(unit: Unit, apertures: Vec<(i32, GerberAperture)>) -> Vec<Command> {
        let mut commands = vec![
            Command::ExtendedCode(ExtendedCode::CoordinateFormat(CoordinateFormat::new(4, 6))),
            Command::ExtendedCode(ExtendedCode::Unit(unit)),
            GCode::InterpolationMode(InterpolationMode::Linear).into(),
        ];
        for (code, aperture) in apertures {
            commands.push(Command::ExtendedCode(ExtendedCode::ApertureDefinition(ApertureDefinition::new(
                code, aperture,
            ))));
        }
        commands
    }

    #[test]
    fn test_lines_from_circle_and_rectangle_apertures() {
        // given
        let mut commands = header(Unit::Millimeters, vec![
            (10, GerberAperture::Circle(GerberCircle::new(0.25))),
            (11, GerberAperture::Rectangle(Rectangular::new(0.2, 0.4))),
        ]);
        commands.push(DCode::SelectAperture(10).into());
        commands.push(DCode::Operation(Operation::Move(coordinates(0.0, 0.0))).into());
        commands.push(DCode::Operation(Operation::Interpolate(coordinates(1.0, 0.0), None)).into());
        commands.push(DCode::SelectAperture(11).into());
        commands.push(DCode::Operation(Operation::Interpolate(coordinates(1.0, 2.0), None)).into());

        // when
        let imported = import_commands(&commands).unwrap();

        // then
        assert!(imported.diagnostics.is_empty());
        assert_eq!(imported.nodes, vec![
            Line::new(Coordinate::new(0, 0), Coordinate::new(MM, 0), LineShape::Circle, DesignRules::new(0.25)).into(),
            Line::new(Coordinate::new(MM, 0), Coordinate::new(MM, 2 * MM), LineShape::Rectangle, DesignRules::new(0.4))
                .into(),
        ]);
    }

    #[test]
    fn test_inch_coordinates_are_scaled() {
        // given
        let mut commands = header(Unit::Inches, vec![(10, GerberAperture::Circle(GerberCircle::new(0.01)))]);
        commands.push(DCode::SelectAperture(10).into());
        commands.push(DCode::Operation(Operation::Flash(coordinates(1.0, 0.5))).into());

        // when
        let imported = import_commands(&commands).unwrap();

        // then
        let Node::Primitive(Primitive::Circle(circle)) = &imported.nodes[0] else {
            panic!("expected a circle, got {:?}", imported.nodes[0]);
        };
        assert_eq!(circle.location, Coordinate::new(25_400_000, 12_700_000));
        assert!((circle.design_rules.thickness - 0.254).abs() < 1e-9);
    }

    #[test]
    fn test_rectangle_flash_becomes_a_polygon() {
        // given
        let mut commands = header(Unit::Millimeters, vec![(10, GerberAperture::Rectangle(Rectangular::new(2.0, 1.0)))]);
        commands.push(DCode::SelectAperture(10).into());
        commands.push(DCode::Operation(Operation::Flash(coordinates(5.0, 5.0))).into());

        // when
        let imported = import_commands(&commands).unwrap();

        // then
        assert_eq!(imported.nodes, vec![Polygon::new(Coordinate::new(4 * MM, 4 * MM + MM / 2), vec![
            Coordinate::new(0, 0),
            Coordinate::new(2 * MM, 0),
            Coordinate::new(2 * MM, MM),
            Coordinate::new(0, MM),
        ])
        .into()]);
    }

    #[test]
    fn test_region_becomes_a_polygon_at_its_first_vertex() {
        // given
        let mut commands = header(Unit::Millimeters, vec![]);
        commands.push(GCode::RegionMode(true).into());
        commands.push(DCode::Operation(Operation::Move(coordinates(1.0, 1.0))).into());
        commands.push(DCode::Operation(Operation::Interpolate(coordinates(3.0, 1.0), None)).into());
        commands.push(DCode::Operation(Operation::Interpolate(coordinates(3.0, 2.0), None)).into());
        commands.push(DCode::Operation(Operation::Interpolate(coordinates(1.0, 1.0), None)).into());
        commands.push(GCode::RegionMode(false).into());

        // when
        let imported = import_commands(&commands).unwrap();

        // then
        let Node::Primitive(Primitive::Polygon(polygon)) = &imported.nodes[0] else {
            panic!("expected a polygon, got {:?}", imported.nodes[0]);
        };
        assert_eq!(polygon.location, Coordinate::new(MM, MM));
        assert_eq!(polygon.points, vec![
            Coordinate::new(0, 0),
            Coordinate::new(2 * MM, 0),
            Coordinate::new(2 * MM, MM)
        ]);
        assert_eq!(polygon.winding, Winding::from_vertices(&polygon.points));
    }

    #[test]
    fn test_unsupported_aperture_falls_back_once() {
        // given
        let mut commands = header(Unit::Millimeters, vec![(12, GerberAperture::Polygon(GerberPolygon::new(1.0, 6)))]);
        commands.push(DCode::SelectAperture(12).into());
        commands.push(DCode::Operation(Operation::Move(coordinates(0.0, 0.0))).into());
        commands.push(DCode::Operation(Operation::Interpolate(coordinates(1.0, 0.0), None)).into());
        commands.push(DCode::Operation(Operation::Interpolate(coordinates(2.0, 0.0), None)).into());

        // when
        let imported = import_commands(&commands).unwrap();

        // then
        assert_eq!(imported.nodes.len(), 2);
        assert_eq!(imported.diagnostics, vec![ImportDiagnostic::UnsupportedAperture {
            code: 12,
            fallback_thickness: FALLBACK_THICKNESS,
        }]);
        let Node::Primitive(Primitive::Line(line)) = &imported.nodes[1] else {
            panic!("expected a line, got {:?}", imported.nodes[1]);
        };
        assert_eq!(line.shape, LineShape::Circle);
        assert_eq!(line.design_rules.thickness, FALLBACK_THICKNESS);
    }

    #[rstest]
    #[case::circular(vec![
        DCode::SelectAperture(10).into(),
        GCode::InterpolationMode(InterpolationMode::CounterclockwiseCircular).into(),
        DCode::Operation(Operation::Interpolate(coordinates(1.0, 0.0), None)).into(),
    ])]
    #[case::undefined_aperture(vec![
        DCode::SelectAperture(99).into(),
        DCode::Operation(Operation::Interpolate(coordinates(1.0, 0.0), None)).into(),
    ])]
    #[case::no_aperture(vec![
        DCode::Operation(Operation::Flash(coordinates(1.0, 0.0))).into(),
    ])]
    #[case::polygon_flash(vec![
        DCode::SelectAperture(12).into(),
        DCode::Operation(Operation::Flash(coordinates(1.0, 0.0))).into(),
    ])]
    fn test_unsupported_commands(#[case] body: Vec<Command>) {
        // given
        let mut commands = header(Unit::Millimeters, vec![
            (10, GerberAperture::Circle(GerberCircle::new(0.1))),
            (12, GerberAperture::Polygon(GerberPolygon::new(1.0, 6))),
        ]);
        commands.extend(body);

        // when
        let result = import_commands(&commands);

        // then
        assert!(matches!(result, Err(PlotError::UnsupportedPrimitive(_))), "{:?}", result);
    }

    #[test]
    fn test_writer_output_imports_back() {
        // given
        let nodes: Vec<Node> = vec![
            Line::new(Coordinate::new(0, 0), Coordinate::new(3 * MM, MM), LineShape::Circle, DesignRules::new(0.25)).into(),
            Circle::new(Coordinate::new(MM, MM), DesignRules::new(0.5)).into(),
        ];
        let commands = GerberWriter::default()
            .plot(&nodes)
            .unwrap()
            .to_commands()
            .unwrap();

        // when
        let imported = import_commands(&commands).unwrap();

        // then
        assert_eq!(imported.nodes, vec![
            nodes[0].clone(),
            Line::new(Coordinate::new(MM, MM), Coordinate::new(MM, MM), LineShape::Circle, DesignRules::new(0.5)).into(),
        ]);
    }

    #[cfg(feature = "parser")]
    #[test]
    fn test_import_reader() {
        // given
        let source = "%FSLAX46Y46*%\n%MOMM*%\n%ADD10C,0.25*%\nG01*\nD10*\nX0Y0D02*\nX1000000Y0D01*\nM02*\n";

        // when
        let imported = import_reader(source.as_bytes()).unwrap();

        // then
        assert_eq!(imported.nodes, vec![Line::new(
            Coordinate::new(0, 0),
            Coordinate::new(MM, 0),
            LineShape::Circle,
            DesignRules::new(0.25)
        )
        .into()]);
    }
}
