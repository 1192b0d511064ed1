//! The full pipeline, from a tree of groups and primitives to an RS274X file.

use std::io::Write;
use std::path::{Path, PathBuf};

use gerber_types::Command;
use log::{debug, info};
use tempfile::NamedTempFile;

use crate::aperture::{allocate, ApertureList};
use crate::emitter::{GerberEmitter, FIRST_D_CODE};
use crate::error::PlotError;
use crate::font::{BuiltinFont, StrokeFont};
use crate::group::flatten;
use crate::primitives::Node;
use crate::rasterizer::{PlotCommand, Rasterizer, DEFAULT_ARC_SEGMENTS_PER_MM};

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlotSettings {
    /// Integer digits of the coordinate format.
    pub integer_digits: u8,
    /// Decimal digits of the coordinate format, 6 keeps full board unit resolution.
    pub decimal_digits: u8,
    pub arc_segments_per_mm: f64,
    pub first_d_code: i32,
}

impl Default for PlotSettings {
    fn default() -> Self {
        Self {
            integer_digits: 4,
            decimal_digits: 6,
            arc_segments_per_mm: DEFAULT_ARC_SEGMENTS_PER_MM,
            first_d_code: FIRST_D_CODE,
        }
    }
}

impl PlotSettings {
    pub fn validate(&self) -> Result<(), PlotError> {
        if !(self.arc_segments_per_mm.is_finite() && self.arc_segments_per_mm > 0.0) {
            return Err(PlotError::InvalidSetting {
                name: "arc_segments_per_mm",
                value: self.arc_segments_per_mm,
            });
        }

        Ok(())
    }
}

/// A fully resolved plot, nothing left to fail except serialization and IO.
#[derive(Debug, Clone, PartialEq)]
pub struct Plot {
    pub apertures: ApertureList,
    pub commands: Vec<PlotCommand>,
    settings: PlotSettings,
}

impl Plot {
    pub fn to_emitter(&self) -> Result<GerberEmitter, PlotError> {
        let mut emitter = GerberEmitter::new(self.settings.integer_digits, self.settings.decimal_digits)
            .with_first_d_code(self.settings.first_d_code);

        emitter.write_start();
        emitter.write_apertures(self.apertures.as_slice());
        for command in &self.commands {
            match command {
                PlotCommand::Stroke {
                    aperture,
                    start,
                    end,
                } => {
                    if self.apertures.get(*aperture).is_none() {
                        return Err(PlotError::UnknownAperture(*aperture));
                    }
                    emitter.write_line(*aperture, *start, *end)?
                }
                PlotCommand::Region {
                    origin,
                    points,
                } => emitter.write_polygon(*origin, points)?,
            }
        }
        emitter.write_end();

        Ok(emitter)
    }

    pub fn to_commands(&self) -> Result<Vec<Command>, PlotError> {
        Ok(self.to_emitter()?.into_commands())
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), PlotError> {
        self.to_emitter()?.serialize(writer)
    }
}

pub struct GerberWriter<F: StrokeFont = BuiltinFont> {
    font: F,
    settings: PlotSettings,
}

impl Default for GerberWriter<BuiltinFont> {
    fn default() -> Self {
        Self::new(BuiltinFont)
    }
}

impl<F: StrokeFont> GerberWriter<F> {
    pub fn new(font: F) -> Self {
        Self {
            font,
            settings: PlotSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: PlotSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Flattens, allocates apertures and rasterizes `nodes`, in that order.
    #[profiling::function]
    pub fn plot(&self, nodes: &[Node]) -> Result<Plot, PlotError> {
        self.settings.validate()?;

        let primitives = flatten(nodes);
        debug!("flattened nodes: {}, primitives: {}", nodes.len(), primitives.len());

        let allocation = allocate(primitives);
        let commands = Rasterizer::new(&self.font)
            .with_segments_per_mm(self.settings.arc_segments_per_mm)
            .rasterize_all(&allocation.primitives)?;

        Ok(Plot {
            apertures: allocation.apertures,
            commands,
            settings: self.settings.clone(),
        })
    }

    pub fn write<W: Write>(&self, nodes: &[Node], writer: &mut W) -> Result<(), PlotError> {
        self.plot(nodes)?.write_to(writer)
    }

    /// The file only appears at `path` once the complete document, trailer included, has been written.
    /// On failure any partial output is removed and an existing file at `path` is left untouched.
    pub fn write_file(&self, path: impl AsRef<Path>, nodes: &[Node]) -> Result<(), PlotError> {
        let path = path.as_ref();

        let mut buffer = Vec::new();
        let plot = self.plot(nodes)?;
        plot.write_to(&mut buffer)?;

        let directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut file = NamedTempFile::new_in(&directory)?;
        file.write_all(&buffer)?;
        file.flush()?;
        file.persist(path)
            .map_err(|error| PlotError::Io(error.error))?;

        info!(
            "wrote gerber file. path: {:?}, apertures: {}, commands: {}, bytes: {}",
            path,
            plot.apertures.len(),
            plot.commands.len(),
            buffer.len()
        );

        Ok(())
    }
}
