use thiserror::Error;

use crate::aperture::ApertureIndex;

#[derive(Error, Debug)]
pub enum PlotError {
    #[error("Unsupported primitive: {0}")]
    UnsupportedPrimitive(String),

    #[error("No glyph for character {character:?} in text {text:?}")]
    UnsupportedGlyph { character: char, text: String },

    #[error("Primitive has no aperture. primitive: {0}")]
    MissingAperture(&'static str),

    #[error("Aperture index out of range. index: {0}")]
    UnknownAperture(ApertureIndex),

    #[error("Invalid setting. name: {name}, value: {value}")]
    InvalidSetting { name: &'static str, value: f64 },

    #[error("Coordinate out of range for the output format. value: {0}mm")]
    CoordinateOutOfRange(f64),

    #[error("Gerber serialization failed: {0}")]
    Serialize(String),

    #[error("Gerber parsing failed: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
