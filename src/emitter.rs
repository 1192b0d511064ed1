use std::io::Write;

use gerber_types::{
    Aperture as GerberAperture, ApertureDefinition, Circle as GerberCircle, Command, CoordinateFormat, CoordinateNumber,
    Coordinates, DCode, ExtendedCode, FunctionCode, GCode, GerberCode, InterpolationMode, MCode, Operation, Polarity,
    Rectangular, Unit,
};
use log::trace;

use crate::aperture::{Aperture, ApertureIndex, ApertureShape};
use crate::error::PlotError;
use crate::spacial::{units_to_mm, Coordinate};

/// D00-D09 are reserved, aperture numbering starts at D10.
pub const FIRST_D_CODE: i32 = 10;

/// Builds an RS274X command stream, millimetres, positive polarity.
#[derive(Debug)]
pub struct GerberEmitter {
    format: CoordinateFormat,
    /// mm, exclusive, the largest magnitude the integer digits can hold
    coordinate_limit: f64,
    first_d_code: i32,
    commands: Vec<Command>,
    current_aperture: Option<ApertureIndex>,
}

impl Default for GerberEmitter {
    fn default() -> Self {
        Self::new(4, 6)
    }
}

impl GerberEmitter {
    pub fn new(integer_digits: u8, decimal_digits: u8) -> Self {
        Self {
            format: CoordinateFormat::new(integer_digits, decimal_digits),
            coordinate_limit: 10f64.powi(integer_digits as i32),
            first_d_code: FIRST_D_CODE,
            commands: Vec::new(),
            current_aperture: None,
        }
    }

    pub fn with_first_d_code(mut self, first_d_code: i32) -> Self {
        self.first_d_code = first_d_code;
        self
    }

    pub fn d_code(&self, index: ApertureIndex) -> i32 {
        self.first_d_code + index as i32
    }

    pub fn write_start(&mut self) {
        self.commands
            .push(Command::ExtendedCode(ExtendedCode::CoordinateFormat(self.format)));
        self.commands
            .push(Command::ExtendedCode(ExtendedCode::Unit(Unit::Millimeters)));
        self.commands
            .push(Command::ExtendedCode(ExtendedCode::LoadPolarity(Polarity::Dark)));
        self.commands
            .push(GCode::InterpolationMode(InterpolationMode::Linear).into());
    }

    /// One definition per aperture, in list order.
    pub fn write_apertures(&mut self, apertures: &[Aperture]) {
        for (index, aperture) in apertures.iter().enumerate() {
            let gerber_aperture = match aperture.shape {
                ApertureShape::Circle => GerberAperture::Circle(GerberCircle::new(aperture.size)),
                ApertureShape::Rectangle => GerberAperture::Rectangle(Rectangular::new(aperture.size, aperture.size)),
            };
            let code = self.d_code(index);
            trace!("aperture definition. code: {}, aperture: {}", code, aperture);

            self.commands
                .push(Command::ExtendedCode(ExtendedCode::ApertureDefinition(ApertureDefinition::new(
                    code,
                    gerber_aperture,
                ))));
        }
    }

    /// Selects the aperture when it changed, then moves to `start` and strokes to `end`.
    pub fn write_line(&mut self, aperture: ApertureIndex, start: Coordinate, end: Coordinate) -> Result<(), PlotError> {
        let start = self.coordinates(start)?;
        let end = self.coordinates(end)?;

        if self.current_aperture != Some(aperture) {
            self.commands
                .push(DCode::SelectAperture(self.d_code(aperture)).into());
            self.current_aperture = Some(aperture);
        }

        self.commands
            .push(DCode::Operation(Operation::Move(start)).into());
        self.commands
            .push(DCode::Operation(Operation::Interpolate(end, None)).into());

        Ok(())
    }

    /// A filled region through `origin + point` for every point, closed back to the first one.
    pub fn write_polygon(&mut self, origin: Coordinate, points: &[Coordinate]) -> Result<(), PlotError> {
        let Some(first) = points.first() else {
            return Ok(());
        };

        let vertices = points
            .iter()
            .chain(std::iter::once(first))
            .map(|point| self.coordinates(origin + point.coords))
            .collect::<Result<Vec<_>, _>>()?;

        self.commands
            .push(GCode::RegionMode(true).into());
        let mut vertices = vertices.into_iter();
        if let Some(start) = vertices.next() {
            self.commands
                .push(DCode::Operation(Operation::Move(start)).into());
        }
        for vertex in vertices {
            self.commands
                .push(DCode::Operation(Operation::Interpolate(vertex, None)).into());
        }
        self.commands
            .push(GCode::RegionMode(false).into());

        Ok(())
    }

    pub fn write_end(&mut self) {
        self.commands
            .push(Command::FunctionCode(FunctionCode::MCode(MCode::EndOfFile)));
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<Command> {
        self.commands
    }

    pub fn serialize<W: Write>(&self, writer: &mut W) -> Result<(), PlotError> {
        self.commands
            .serialize(writer)
            .map_err(|error| PlotError::Serialize(format!("{:?}", error)))
    }

    fn coordinates(&self, point: Coordinate) -> Result<Coordinates, PlotError> {
        let number = |units: i64| {
            let mm = units_to_mm(units);
            if mm.abs() >= self.coordinate_limit {
                return Err(PlotError::CoordinateOutOfRange(mm));
            }
            CoordinateNumber::try_from(mm).map_err(|_| PlotError::CoordinateOutOfRange(mm))
        };

        Ok(Coordinates::new(number(point.x)?, number(point.y)?, self.format))
    }
}
