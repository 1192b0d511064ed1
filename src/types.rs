use std::fmt;

use crate::spacial::{Coordinate, ToPosition};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Winding {
    /// Aka 'Positive' in Geometry
    Clockwise,
    /// Aka 'Negative' in Geometry
    CounterClockwise,
}

impl Winding {
    pub fn from_vertices(vertices: &[Coordinate]) -> Self {
        let mut sum = 0.0;
        for i in 0..vertices.len() {
            let j = (i + 1) % vertices.len();
            let (a, b) = (vertices[i].to_position(), vertices[j].to_position());
            sum += a.x * b.y - b.x * a.y;
        }
        if sum > 0.0 {
            Winding::Clockwise
        } else {
            Winding::CounterClockwise
        }
    }
}

/// Stroke end shape of a line, the letter is the Gerber standard aperture name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LineShape {
    #[default]
    Circle,
    Rectangle,
}

impl LineShape {
    pub fn letter(&self) -> char {
        match self {
            LineShape::Circle => 'C',
            LineShape::Rectangle => 'R',
        }
    }
}

impl TryFrom<char> for LineShape {
    type Error = char;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            'C' => Ok(LineShape::Circle),
            'R' => Ok(LineShape::Rectangle),
            other => Err(other),
        }
    }
}

impl fmt::Display for LineShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(vec![Coordinate::new(0, 0), Coordinate::new(10, 0), Coordinate::new(10, 10)], Winding::Clockwise)]
    #[case(vec![Coordinate::new(0, 0), Coordinate::new(10, 10), Coordinate::new(10, 0)], Winding::CounterClockwise)]
    fn test_winding_from_vertices(#[case] vertices: Vec<Coordinate>, #[case] expected: Winding) {
        assert_eq!(Winding::from_vertices(&vertices), expected);
    }

    #[test]
    fn test_line_shape_letters() {
        assert_eq!(LineShape::try_from('C'), Ok(LineShape::Circle));
        assert_eq!(LineShape::try_from('R'), Ok(LineShape::Rectangle));
        assert_eq!(LineShape::try_from('O'), Err('O'));
        assert_eq!(LineShape::Rectangle.to_string(), "R");
    }
}
