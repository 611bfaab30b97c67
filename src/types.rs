use std::fmt::{Display, Formatter};

use crate::error::GerberError;

/// Fill polarity of a region, `%LPD*%` / `%LPC*%`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Polarity {
    /// Adds material, aka 'solid'
    Dark,
    /// Removes previously added material, aka 'hole'
    Clear,
}

impl Polarity {
    /// The single character used in a glyph's precomputed polarity string.
    pub fn mark(&self) -> char {
        match self {
            Polarity::Dark => 'd',
            Polarity::Clear => 'c',
        }
    }

    pub fn directive(&self) -> &'static str {
        match self {
            Polarity::Dark => "%LPD*%",
            Polarity::Clear => "%LPC*%",
        }
    }
}

impl TryFrom<char> for Polarity {
    type Error = GerberError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            'd' => Ok(Polarity::Dark),
            'c' => Ok(Polarity::Clear),
            other => Err(GerberError::InvalidPolarity(other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ApertureShape {
    Circle,
    Rectangle,
}

impl Display for ApertureShape {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ApertureShape::Circle => f.write_str("C"),
            ApertureShape::Rectangle => f.write_str("R"),
        }
    }
}

/// Horizontal anchor of a text run relative to its origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum XAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical anchor of a text run relative to its origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum YAlign {
    #[default]
    Bottom,
    Center,
    Top,
}

impl XAlign {
    /// Offset to add to every x coordinate so that the anchor lands on zero.
    pub(crate) fn offset(&self, min: f64, max: f64) -> f64 {
        match self {
            XAlign::Left => -min,
            XAlign::Center => -(min + max) / 2.0,
            XAlign::Right => -max,
        }
    }
}

impl YAlign {
    pub(crate) fn offset(&self, min: f64, max: f64) -> f64 {
        match self {
            YAlign::Bottom => -min,
            YAlign::Center => -(min + max) / 2.0,
            YAlign::Top => -max,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case('d', Polarity::Dark)]
    #[case('c', Polarity::Clear)]
    fn test_polarity_marks(#[case] mark: char, #[case] expected: Polarity) {
        let polarity = Polarity::try_from(mark).unwrap();
        assert_eq!(polarity, expected);
        assert_eq!(polarity.mark(), mark);
    }

    #[test]
    fn test_invalid_polarity_mark() {
        assert!(matches!(Polarity::try_from('x'), Err(GerberError::InvalidPolarity('x'))));
    }

    #[rstest]
    #[case(XAlign::Left, 2.0, 6.0, -2.0)]
    #[case(XAlign::Center, 2.0, 6.0, -4.0)]
    #[case(XAlign::Right, 2.0, 6.0, -6.0)]
    fn test_x_align_offset(#[case] align: XAlign, #[case] min: f64, #[case] max: f64, #[case] expected: f64) {
        assert_eq!(align.offset(min, max), expected);
    }
}
