use std::f64::consts::PI;

use log::{debug, trace};

use crate::aperture::{AllocatedPrimitive, ApertureIndex};
use crate::error::PlotError;
use crate::font::StrokeFont;
use crate::primitives::{Arc, Circle, Line, Polygon, Primitive, Text};
use crate::spacial::{rotate_point, Coordinate, Position, ToCoordinate, ToVector, UNITS_PER_MM};

/// Everything the emitter understands.
#[derive(Debug, Clone, PartialEq)]
pub enum PlotCommand {
    Stroke {
        aperture: ApertureIndex,
        start: Coordinate,
        end: Coordinate,
    },
    Region {
        origin: Coordinate,
        /// Relative to `origin`
        points: Vec<Coordinate>,
    },
}

impl PlotCommand {
    pub fn stroke(aperture: ApertureIndex, start: Coordinate, end: Coordinate) -> Self {
        PlotCommand::Stroke {
            aperture,
            start,
            end,
        }
    }
}

/// Chords per millimetre of arc length.
pub const DEFAULT_ARC_SEGMENTS_PER_MM: f64 = 10.0;

impl Arc {
    /// Start and end angles, clamped to 0..=360 and ordered so the start is never after the end.
    pub fn normalized_angles(&self) -> (f64, f64) {
        let start_angle = self.start_angle.clamp(0.0, 360.0);
        let end_angle = self.end_angle.clamp(0.0, 360.0);

        match start_angle > end_angle {
            true => (end_angle, start_angle),
            false => (start_angle, end_angle),
        }
    }

    /// Arc length of the circle of `radius`, in mm.
    pub fn length(&self) -> f64 {
        let (start_angle, end_angle) = self.normalized_angles();
        let delta = end_angle - start_angle;

        (delta / 360.0) * 2.0 * PI * self.radius as f64 / UNITS_PER_MM
    }

    /// Never less than one.
    pub fn segment_count(&self, segments_per_mm: f64) -> usize {
        let segments = (self.length() * segments_per_mm).round();
        match segments > 0.0 {
            true => (segments as usize).saturating_add(1),
            false => 1,
        }
    }

    /// Chord end points, `segment_count + 1` of them.
    pub fn generate_points(&self, segments_per_mm: f64) -> Vec<Coordinate> {
        let (start_angle, end_angle) = self.normalized_angles();
        let x_scale = self.x_scale.clamp(0.0, 1.0);
        let y_scale = self.y_scale.clamp(0.0, 1.0);

        let segments = self.segment_count(segments_per_mm);
        let step = (end_angle - start_angle) / segments as f64;
        let radius = self.radius as f64;

        (0..=segments)
            .map(|index| {
                let (sin_theta, cos_theta) = (start_angle + step * index as f64)
                    .to_radians()
                    .sin_cos();
                Coordinate::new(
                    self.location.x + (x_scale * cos_theta * radius).round() as i64,
                    self.location.y + (y_scale * sin_theta * radius).round() as i64,
                )
            })
            .collect()
    }
}

pub struct Rasterizer<'font, F: StrokeFont> {
    font: &'font F,
    segments_per_mm: f64,
}

impl<'font, F: StrokeFont> Rasterizer<'font, F> {
    pub fn new(font: &'font F) -> Self {
        Self {
            font,
            segments_per_mm: DEFAULT_ARC_SEGMENTS_PER_MM,
        }
    }

    pub fn with_segments_per_mm(mut self, segments_per_mm: f64) -> Self {
        self.segments_per_mm = segments_per_mm;
        self
    }

    /// Expands every primitive, keeping the primitive order.
    #[profiling::function]
    pub fn rasterize_all(&self, primitives: &[AllocatedPrimitive]) -> Result<Vec<PlotCommand>, PlotError> {
        let mut commands = Vec::with_capacity(primitives.len());
        for primitive in primitives {
            self.rasterize(primitive, &mut commands)?;
        }

        debug!("rasterized primitives: {}, commands: {}", primitives.len(), commands.len());
        Ok(commands)
    }

    pub fn rasterize(&self, allocated: &AllocatedPrimitive, commands: &mut Vec<PlotCommand>) -> Result<(), PlotError> {
        let AllocatedPrimitive {
            primitive,
            aperture,
        } = allocated;

        let context = RasterContext {
            font: self.font,
            segments_per_mm: self.segments_per_mm,
        };
        let stroke_aperture = || aperture.ok_or(PlotError::MissingAperture(primitive.kind()));

        match primitive {
            Primitive::Polygon(polygon) => {
                commands.push(polygon.to_region());
                Ok(())
            }
            Primitive::Line(line) => line.rasterize(stroke_aperture()?, &context, commands),
            Primitive::Arc(arc) => arc.rasterize(stroke_aperture()?, &context, commands),
            Primitive::Circle(circle) => circle.rasterize(stroke_aperture()?, &context, commands),
            Primitive::Text(text) => text.rasterize(stroke_aperture()?, &context, commands),
        }
    }
}

struct RasterContext<'font, F: StrokeFont> {
    font: &'font F,
    segments_per_mm: f64,
}

trait Rasterize {
    fn rasterize<F: StrokeFont>(
        &self,
        aperture: ApertureIndex,
        context: &RasterContext<F>,
        commands: &mut Vec<PlotCommand>,
    ) -> Result<(), PlotError>;
}

impl Rasterize for Line {
    fn rasterize<F: StrokeFont>(
        &self,
        aperture: ApertureIndex,
        _context: &RasterContext<F>,
        commands: &mut Vec<PlotCommand>,
    ) -> Result<(), PlotError> {
        commands.push(PlotCommand::stroke(aperture, self.start, self.end));
        Ok(())
    }
}

impl Rasterize for Circle {
    fn rasterize<F: StrokeFont>(
        &self,
        aperture: ApertureIndex,
        _context: &RasterContext<F>,
        commands: &mut Vec<PlotCommand>,
    ) -> Result<(), PlotError> {
        // zero length stroke, plots a dot the size of the aperture
        commands.push(PlotCommand::stroke(aperture, self.location, self.location));
        Ok(())
    }
}

impl Rasterize for Arc {
    fn rasterize<F: StrokeFont>(
        &self,
        aperture: ApertureIndex,
        context: &RasterContext<F>,
        commands: &mut Vec<PlotCommand>,
    ) -> Result<(), PlotError> {
        let points = self.generate_points(context.segments_per_mm);
        trace!("arc chords: {}, arc: {:?}", points.len() - 1, self);

        commands.extend(
            points
                .windows(2)
                .map(|pair| PlotCommand::stroke(aperture, pair[0], pair[1])),
        );
        Ok(())
    }
}

impl Rasterize for Text {
    fn rasterize<F: StrokeFont>(
        &self,
        aperture: ApertureIndex,
        context: &RasterContext<F>,
        commands: &mut Vec<PlotCommand>,
    ) -> Result<(), PlotError> {
        let Self {
            location,
            text,
            height,
            angle,
            ..
        } = self;

        let center = location.to_vector();
        let place = |point: Position, pen: f64| {
            let local = Position::new((pen + point.x * height) * UNITS_PER_MM, point.y * height * UNITS_PER_MM);
            rotate_point(local, *angle, center).to_coordinate()
        };

        let mut pen = 0.0;
        for character in text.chars() {
            let glyph = context
                .font
                .glyph(character)
                .ok_or_else(|| PlotError::UnsupportedGlyph {
                    character,
                    text: text.clone(),
                })?;

            for (start, end) in &glyph.segments {
                commands.push(PlotCommand::stroke(aperture, place(*start, pen), place(*end, pen)));
            }

            pen += glyph.advance * height;
        }

        Ok(())
    }
}

impl Polygon {
    pub fn to_region(&self) -> PlotCommand {
        PlotCommand::Region {
            origin: self.location,
            points: self.points.clone(),
        }
    }
}
