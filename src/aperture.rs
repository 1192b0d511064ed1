use std::fmt;

use log::{debug, trace};

use crate::primitives::Primitive;
use crate::types::LineShape;

/// Index into an [`ApertureList`], zero based, in insertion order.
pub type ApertureIndex = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ApertureShape {
    Circle,
    Rectangle,
}

impl From<LineShape> for ApertureShape {
    fn from(value: LineShape) -> Self {
        match value {
            LineShape::Circle => ApertureShape::Circle,
            LineShape::Rectangle => ApertureShape::Rectangle,
        }
    }
}

/// Equality is exact on both fields, there is no size tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aperture {
    pub shape: ApertureShape,
    /// mm, diameter for circles, side length for rectangles
    pub size: f64,
}

impl Aperture {
    pub fn new(shape: ApertureShape, size: f64) -> Self {
        Self {
            shape,
            size,
        }
    }

    /// The aperture a primitive is stroked with, polygons are filled and have none.
    pub fn for_primitive(primitive: &Primitive) -> Option<Self> {
        let thickness = primitive.design_rules().thickness;
        match primitive {
            Primitive::Polygon(_) => None,
            Primitive::Line(line) => Some(Aperture::new(line.shape.into(), thickness)),
            Primitive::Arc(_) | Primitive::Circle(_) | Primitive::Text(_) => {
                Some(Aperture::new(ApertureShape::Circle, thickness))
            }
        }
    }
}

impl fmt::Display for Aperture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self.shape {
            ApertureShape::Circle => 'C',
            ApertureShape::Rectangle => 'R',
        };
        write!(f, "{},{}", letter, self.size)
    }
}

/// Deduplicated apertures, an aperture keeps the index it was first seen at.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApertureList {
    apertures: Vec<Aperture>,
}

impl ApertureList {
    pub fn position(&self, aperture: &Aperture) -> Option<ApertureIndex> {
        self.apertures
            .iter()
            .position(|candidate| candidate == aperture)
    }

    pub fn insert(&mut self, aperture: Aperture) -> ApertureIndex {
        if let Some(index) = self.position(&aperture) {
            return index;
        }

        self.apertures.push(aperture);
        let index = self.apertures.len() - 1;
        trace!("new aperture. index: {}, aperture: {}", index, aperture);
        index
    }

    pub fn get(&self, index: ApertureIndex) -> Option<&Aperture> {
        self.apertures.get(index)
    }

    pub fn len(&self) -> usize {
        self.apertures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apertures.is_empty()
    }

    pub fn as_slice(&self) -> &[Aperture] {
        &self.apertures
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AllocatedPrimitive {
    pub primitive: Primitive,
    /// `None` for polygons only
    pub aperture: Option<ApertureIndex>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Allocation {
    pub apertures: ApertureList,
    pub primitives: Vec<AllocatedPrimitive>,
}

/// Assigns every stroked primitive an aperture index, preserving primitive order.
#[profiling::function]
pub fn allocate(primitives: Vec<Primitive>) -> Allocation {
    let mut apertures = ApertureList::default();

    let primitives = primitives
        .into_iter()
        .map(|primitive| {
            let aperture = Aperture::for_primitive(&primitive).map(|aperture| apertures.insert(aperture));
            AllocatedPrimitive {
                primitive,
                aperture,
            }
        })
        .collect::<Vec<_>>();

    debug!("allocated apertures: {}, primitives: {}", apertures.len(), primitives.len());

    Allocation {
        apertures,
        primitives,
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::group::flatten;
    use crate::primitives::{Arc, Circle, DesignRules, Line, Node, Polygon, Text};
    use crate::spacial::Coordinate;

    fn line(shape: LineShape, thickness: f64) -> Primitive {
        Line::new(Coordinate::new(0, 0), Coordinate::new(1_000_000, 0), shape, DesignRules::new(thickness)).into()
    }

    #[test]
    fn test_identical_lines_share_an_aperture() {
        // given
        let nodes: Vec<Node> = vec![
            Line::new(Coordinate::new(0, 0), Coordinate::new(1, 1), LineShape::Circle, DesignRules::new(0.25)).into(),
            Line::new(Coordinate::new(2, 2), Coordinate::new(3, 3), LineShape::Circle, DesignRules::new(0.25)).into(),
        ];

        // when
        let allocation = allocate(flatten(&nodes));

        // then
        assert_eq!(allocation.apertures.as_slice(), &[Aperture::new(ApertureShape::Circle, 0.25)]);
        assert_eq!(allocation.primitives[0].aperture, Some(0));
        assert_eq!(allocation.primitives[1].aperture, Some(0));

        // and
        let nodes = [nodes, vec![Line::new(Coordinate::new(0, 0), Coordinate::new(1, 1), LineShape::Circle, DesignRules::new(0.5)).into()]].concat();
        let allocation = allocate(flatten(&nodes));
        assert_eq!(allocation.apertures.len(), 2);
        assert_eq!(allocation.apertures.get(1), Some(&Aperture::new(ApertureShape::Circle, 0.5)));
        assert_eq!(allocation.primitives[2].aperture, Some(1));
    }

    #[rstest]
    #[case(LineShape::Circle, 0.25, LineShape::Rectangle, 0.25, 2)]
    #[case(LineShape::Rectangle, 0.25, LineShape::Rectangle, 0.25, 1)]
    #[case(LineShape::Circle, 0.25, LineShape::Circle, 0.2500001, 2)]
    fn test_dedup_is_by_exact_shape_and_size(
        #[case] first_shape: LineShape,
        #[case] first_thickness: f64,
        #[case] second_shape: LineShape,
        #[case] second_thickness: f64,
        #[case] expected_count: usize,
    ) {
        // when
        let allocation = allocate(vec![line(first_shape, first_thickness), line(second_shape, second_thickness)]);

        // then
        assert_eq!(allocation.apertures.len(), expected_count);
    }

    #[test]
    fn test_non_line_primitives_use_circle_apertures() {
        // given
        let primitives: Vec<Primitive> = vec![
            Circle::new(Coordinate::new(0, 0), DesignRules::new(0.5)).into(),
            Arc::new(Coordinate::new(0, 0), 1_000_000, 0.0, 90.0, LineShape::Rectangle, DesignRules::new(0.5)).into(),
            Text::new(Coordinate::new(0, 0), "A", 1.0, 0.0, DesignRules::new(0.1)).into(),
        ];

        // when
        let allocation = allocate(primitives);

        // then
        assert_eq!(
            allocation.apertures.as_slice(),
            &[Aperture::new(ApertureShape::Circle, 0.5), Aperture::new(ApertureShape::Circle, 0.1)]
        );
        let indexes = allocation
            .primitives
            .iter()
            .map(|allocated| allocated.aperture)
            .collect::<Vec<_>>();
        assert_eq!(indexes, vec![Some(0), Some(0), Some(1)]);
    }

    #[test]
    fn test_polygons_never_get_an_aperture() {
        // given
        let polygon = Polygon::new(
            Coordinate::new(5, 5),
            vec![Coordinate::new(0, 0), Coordinate::new(10, 0), Coordinate::new(10, 10)],
        );
        let primitives = vec![line(LineShape::Circle, 0.1), polygon.clone().into(), line(LineShape::Circle, 0.2)];

        // when
        let allocation = allocate(primitives);

        // then
        assert_eq!(allocation.primitives[1].aperture, None);
        assert_eq!(allocation.primitives[1].primitive, Primitive::Polygon(polygon));
        assert_eq!(allocation.primitives[2].aperture, Some(1));
        assert_eq!(allocation.apertures.len(), 2);
    }

    #[test]
    fn test_apertures_are_at_most_one_per_primitive() {
        // given
        let primitives = (0..20)
            .map(|i| line(if i % 2 == 0 { LineShape::Circle } else { LineShape::Rectangle }, (i % 5) as f64 * 0.1))
            .collect::<Vec<_>>();

        // when
        let allocation = allocate(primitives);

        // then
        assert_eq!(allocation.apertures.len(), 10);
        for (i, first) in allocation.apertures.as_slice().iter().enumerate() {
            for second in &allocation.apertures.as_slice()[i + 1..] {
                assert_ne!(first, second);
            }
        }
    }
}
