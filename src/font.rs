//! Single stroke font used to expand text into line segments.
//!
//! Glyph coordinates are millimetres for a 1mm cap height, the pen starts at the glyph's lower left.

use crate::spacial::Position;

#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub segments: Vec<(Position, Position)>,
    /// Horizontal pen advance after the glyph, mm.
    pub advance: f64,
}

pub trait StrokeFont {
    fn glyph(&self, character: char) -> Option<Glyph>;
}

/// Upper case, digits and common punctuation, lower case letters are drawn as small capitals.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinFont;

type Polyline = &'static [(i8, i8)];

/// grid units per mm, the cap height is 6 units
const GRID: f64 = 6.0;
const ADVANCE: f64 = 6.0;
const SMALL_CAPS_SCALE: f64 = 0.7;

#[rustfmt::skip]
static GLYPHS: &[(char, &[Polyline])] = &[
    (' ', &[]),
    ('A', &[&[(0, 0), (0, 4), (2, 6), (4, 4), (4, 0)], &[(0, 3), (4, 3)]]),
    ('B', &[&[(0, 0), (0, 6), (3, 6), (4, 5), (4, 4), (3, 3), (0, 3)], &[(3, 3), (4, 2), (4, 1), (3, 0), (0, 0)]]),
    ('C', &[&[(4, 5), (3, 6), (1, 6), (0, 5), (0, 1), (1, 0), (3, 0), (4, 1)]]),
    ('D', &[&[(0, 0), (0, 6), (3, 6), (4, 5), (4, 1), (3, 0), (0, 0)]]),
    ('E', &[&[(4, 6), (0, 6), (0, 0), (4, 0)], &[(0, 3), (3, 3)]]),
    ('F', &[&[(4, 6), (0, 6), (0, 0)], &[(0, 3), (3, 3)]]),
    ('G', &[&[(4, 5), (3, 6), (1, 6), (0, 5), (0, 1), (1, 0), (3, 0), (4, 1), (4, 3), (2, 3)]]),
    ('H', &[&[(0, 0), (0, 6)], &[(4, 0), (4, 6)], &[(0, 3), (4, 3)]]),
    ('I', &[&[(1, 6), (3, 6)], &[(2, 6), (2, 0)], &[(1, 0), (3, 0)]]),
    ('J', &[&[(4, 6), (4, 1), (3, 0), (1, 0), (0, 1)]]),
    ('K', &[&[(0, 0), (0, 6)], &[(4, 6), (0, 2)], &[(1, 3), (4, 0)]]),
    ('L', &[&[(0, 6), (0, 0), (4, 0)]]),
    ('M', &[&[(0, 0), (0, 6), (2, 3), (4, 6), (4, 0)]]),
    ('N', &[&[(0, 0), (0, 6), (4, 0), (4, 6)]]),
    ('O', &[&[(1, 0), (0, 1), (0, 5), (1, 6), (3, 6), (4, 5), (4, 1), (3, 0), (1, 0)]]),
    ('P', &[&[(0, 0), (0, 6), (3, 6), (4, 5), (4, 4), (3, 3), (0, 3)]]),
    ('Q', &[&[(1, 0), (0, 1), (0, 5), (1, 6), (3, 6), (4, 5), (4, 1), (3, 0), (1, 0)], &[(2, 2), (4, 0)]]),
    ('R', &[&[(0, 0), (0, 6), (3, 6), (4, 5), (4, 4), (3, 3), (0, 3)], &[(2, 3), (4, 0)]]),
    ('S', &[&[(4, 5), (3, 6), (1, 6), (0, 5), (0, 4), (1, 3), (3, 3), (4, 2), (4, 1), (3, 0), (1, 0), (0, 1)]]),
    ('T', &[&[(0, 6), (4, 6)], &[(2, 6), (2, 0)]]),
    ('U', &[&[(0, 6), (0, 1), (1, 0), (3, 0), (4, 1), (4, 6)]]),
    ('V', &[&[(0, 6), (2, 0), (4, 6)]]),
    ('W', &[&[(0, 6), (1, 0), (2, 3), (3, 0), (4, 6)]]),
    ('X', &[&[(0, 6), (4, 0)], &[(0, 0), (4, 6)]]),
    ('Y', &[&[(0, 6), (2, 3), (4, 6)], &[(2, 3), (2, 0)]]),
    ('Z', &[&[(0, 6), (4, 6), (0, 0), (4, 0)]]),
    ('0', &[&[(1, 0), (0, 1), (0, 5), (1, 6), (3, 6), (4, 5), (4, 1), (3, 0), (1, 0)], &[(0, 1), (4, 5)]]),
    ('1', &[&[(1, 5), (2, 6), (2, 0)], &[(1, 0), (3, 0)]]),
    ('2', &[&[(0, 5), (1, 6), (3, 6), (4, 5), (4, 4), (0, 0), (4, 0)]]),
    ('3', &[&[(0, 5), (1, 6), (3, 6), (4, 5), (4, 4), (3, 3), (1, 3)], &[(3, 3), (4, 2), (4, 1), (3, 0), (1, 0), (0, 1)]]),
    ('4', &[&[(3, 0), (3, 6), (0, 2), (4, 2)]]),
    ('5', &[&[(4, 6), (0, 6), (0, 3), (3, 3), (4, 2), (4, 1), (3, 0), (0, 0)]]),
    ('6', &[&[(4, 5), (3, 6), (1, 6), (0, 5), (0, 1), (1, 0), (3, 0), (4, 1), (4, 2), (3, 3), (0, 3)]]),
    ('7', &[&[(0, 6), (4, 6), (1, 0)]]),
    ('8', &[&[(1, 3), (0, 4), (0, 5), (1, 6), (3, 6), (4, 5), (4, 4), (3, 3), (1, 3), (0, 2), (0, 1), (1, 0), (3, 0), (4, 1), (4, 2), (3, 3)]]),
    ('9', &[&[(4, 3), (1, 3), (0, 4), (0, 5), (1, 6), (3, 6), (4, 5), (4, 1), (3, 0), (1, 0), (0, 1)]]),
    ('!', &[&[(2, 6), (2, 2)], &[(2, 0), (2, 0)]]),
    ('?', &[&[(0, 5), (1, 6), (3, 6), (4, 5), (4, 4), (2, 3), (2, 2)], &[(2, 0), (2, 0)]]),
    ('.', &[&[(2, 0), (2, 0)]]),
    (',', &[&[(2, 1), (1, -1)]]),
    (':', &[&[(2, 4), (2, 4)], &[(2, 1), (2, 1)]]),
    (';', &[&[(2, 4), (2, 4)], &[(2, 1), (1, -1)]]),
    ('\'', &[&[(2, 6), (2, 4)]]),
    ('"', &[&[(1, 6), (1, 4)], &[(3, 6), (3, 4)]]),
    ('-', &[&[(1, 3), (3, 3)]]),
    ('_', &[&[(0, 0), (4, 0)]]),
    ('+', &[&[(0, 3), (4, 3)], &[(2, 1), (2, 5)]]),
    ('=', &[&[(0, 2), (4, 2)], &[(0, 4), (4, 4)]]),
    ('*', &[&[(2, 1), (2, 5)], &[(0, 2), (4, 4)], &[(0, 4), (4, 2)]]),
    ('/', &[&[(0, 0), (4, 6)]]),
    ('\\', &[&[(0, 6), (4, 0)]]),
    ('<', &[&[(4, 5), (0, 3), (4, 1)]]),
    ('>', &[&[(0, 5), (4, 3), (0, 1)]]),
    ('(', &[&[(3, 6), (2, 5), (2, 1), (3, 0)]]),
    (')', &[&[(1, 6), (2, 5), (2, 1), (1, 0)]]),
    ('[', &[&[(3, 6), (2, 6), (2, 0), (3, 0)]]),
    (']', &[&[(1, 6), (2, 6), (2, 0), (1, 0)]]),
    ('#', &[&[(1, 0), (1, 6)], &[(3, 0), (3, 6)], &[(0, 2), (4, 2)], &[(0, 4), (4, 4)]]),
    ('%', &[&[(0, 0), (4, 6)], &[(0, 6), (1, 6), (1, 5), (0, 5), (0, 6)], &[(3, 1), (4, 1), (4, 0), (3, 0), (3, 1)]]),
];

fn outline(character: char) -> Option<&'static [Polyline]> {
    GLYPHS
        .iter()
        .find(|(candidate, _)| *candidate == character)
        .map(|(_, polylines)| *polylines)
}

fn build_glyph(polylines: &[Polyline], scale: f64) -> Glyph {
    let to_position = |(x, y): (i8, i8)| Position::new(x as f64 * scale / GRID, y as f64 * scale / GRID);

    let segments = polylines
        .iter()
        .flat_map(|polyline| {
            polyline
                .windows(2)
                .map(move |pair| (to_position(pair[0]), to_position(pair[1])))
        })
        .collect();

    Glyph {
        segments,
        advance: ADVANCE * scale / GRID,
    }
}

impl StrokeFont for BuiltinFont {
    fn glyph(&self, character: char) -> Option<Glyph> {
        if let Some(polylines) = outline(character) {
            return Some(build_glyph(polylines, 1.0));
        }

        if character.is_ascii_lowercase() {
            return outline(character.to_ascii_uppercase()).map(|polylines| build_glyph(polylines, SMALL_CAPS_SCALE));
        }

        None
    }
}
