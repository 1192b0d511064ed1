//! Composes board artwork from nested, rotated groups of primitives and writes it as RS274X Gerber.
//!
//! The pipeline is [`flatten`] -> [`allocate`] -> [`Rasterizer`] -> [`GerberEmitter`], [`GerberWriter`] runs all of
//! it.

mod aperture;
mod emitter;
mod error;
mod font;
mod group;
mod import;
mod primitives;
mod rasterizer;
pub mod spacial;
mod types;
mod writer;

pub use aperture::*;
pub use emitter::*;
pub use error::*;
pub use font::*;
/// re-export 'gerber_parser' crate
#[cfg(feature = "parser")]
pub use gerber_parser;
/// re-export 'gerber_types' crate
#[cfg(feature = "types")]
pub use gerber_types;
pub use group::*;
pub use import::*;
pub use primitives::*;
pub use rasterizer::*;
pub use types::*;
pub use writer::*;

#[cfg(feature = "testing")]
pub mod testing;
