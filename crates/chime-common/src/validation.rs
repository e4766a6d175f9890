//! Parameter validators used by widgets.
//!
//! Each `assert_*` function either returns the typed value or a
//! [`ValidationError`] naming the violated constraint. Nothing is silently
//! corrected.

use std::fmt;
use std::str::FromStr;

use crate::error::{ValidationError, ValidationResult};
use crate::value::Value;

/// Horizontal or vertical alignment of a widget inside its frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Alignment {
    /// Left edge.
    Left,
    /// Centered.
    Center,
    /// Right edge.
    Right,
    /// Top edge.
    Top,
    /// Bottom edge.
    Bottom,
}

impl Alignment {
    /// All alignments.
    pub const ALL: [Self; 5] = [
        Self::Left,
        Self::Center,
        Self::Right,
        Self::Top,
        Self::Bottom,
    ];

    /// Symbolic name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::Top => "top",
            Self::Bottom => "bottom",
        }
    }
}

impl FromStr for Alignment {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidAlignment(s.to_string()))
    }
}

/// Layout direction of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Left to right.
    Horizontal,
    /// Top to bottom.
    Vertical,
}

impl Orientation {
    /// Symbolic name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
        }
    }
}

impl FromStr for Orientation {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "horizontal" => Ok(Self::Horizontal),
            "vertical" => Ok(Self::Vertical),
            _ => Err(ValidationError::InvalidOrientation(s.to_string())),
        }
    }
}

/// Compass position used to anchor decorations and shadows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    /// West.
    West,
    /// South-west.
    Southwest,
    /// South.
    South,
    /// South-east.
    Southeast,
    /// East.
    East,
    /// North.
    North,
    /// North-west.
    Northwest,
    /// North-east.
    Northeast,
}

impl Position {
    /// All positions.
    pub const ALL: [Self; 8] = [
        Self::West,
        Self::Southwest,
        Self::South,
        Self::Southeast,
        Self::East,
        Self::North,
        Self::Northwest,
        Self::Northeast,
    ];

    /// Symbolic name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::West => "west",
            Self::Southwest => "southwest",
            Self::South => "south",
            Self::Southeast => "southeast",
            Self::East => "east",
            Self::North => "north",
            Self::Northwest => "northwest",
            Self::Northeast => "northeast",
        }
    }
}

impl FromStr for Position {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidPosition(s.to_string()))
    }
}

/// RGB color with optional alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel, if one was given.
    pub a: Option<u8>,
}

impl Color {
    /// Opaque RGB color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: None }
    }

    /// RGBA color.
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r,
            g,
            b,
            a: Some(a),
        }
    }

    /// Channels as RGBA, treating a missing alpha as opaque.
    #[must_use]
    pub const fn to_rgba(self) -> [u8; 4] {
        let a = match self.a {
            Some(a) => a,
            None => 255,
        };
        [self.r, self.g, self.b, a]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.a {
            Some(a) => write!(f, "({}, {}, {}, {a})", self.r, self.g, self.b),
            None => write!(f, "({}, {}, {})", self.r, self.g, self.b),
        }
    }
}

/// Two-component numeric vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector2 {
    /// First component.
    pub x: f64,
    /// Second component.
    pub y: f64,
}

/// Check that `value` is a known alignment.
pub fn assert_alignment(value: &str) -> ValidationResult<Alignment> {
    value.parse()
}

/// Check that `value` is a known orientation.
pub fn assert_orientation(value: &str) -> ValidationResult<Orientation> {
    value.parse()
}

/// Check that `value` is a known position.
pub fn assert_position(value: &str) -> ValidationResult<Position> {
    value.parse()
}

/// Check that `value` is a 3 or 4 element sequence of integers in `0..=255`.
pub fn assert_color(value: &Value) -> ValidationResult<Color> {
    let items = value
        .as_list()
        .ok_or_else(|| ValidationError::ColorNotSequence(value.to_string()))?;
    if !(3..=4).contains(&items.len()) {
        return Err(ValidationError::ColorArity { len: items.len() });
    }

    let mut channels = [0u8; 4];
    for (index, item) in items.iter().enumerate() {
        let raw = item
            .as_int()
            .ok_or_else(|| ValidationError::ColorChannelType {
                index,
                value: item.to_string(),
                color: value.to_string(),
            })?;
        channels[index] =
            u8::try_from(raw).map_err(|_| ValidationError::ColorChannelRange {
                index,
                value: raw,
                color: value.to_string(),
            })?;
    }

    let [r, g, b, a] = channels;
    Ok(if items.len() == 4 {
        Color::rgba(r, g, b, a)
    } else {
        Color::rgb(r, g, b)
    })
}

/// Check that `value` is a sequence of exactly two numbers.
pub fn assert_vector2(value: &Value) -> ValidationResult<Vector2> {
    let items = value
        .as_list()
        .ok_or_else(|| ValidationError::VectorNotSequence(value.to_string()))?;
    let [x, y] = items else {
        return Err(ValidationError::VectorArity {
            vector: value.to_string(),
        });
    };
    match (x.as_number(), y.as_number()) {
        (Some(x), Some(y)) => Ok(Vector2 { x, y }),
        _ => Err(ValidationError::VectorElementType {
            vector: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_alignment_members() {
        for name in ["left", "center", "right", "top", "bottom"] {
            let align = assert_alignment(name).expect("known alignment");
            assert_eq!(align.as_str(), name);
        }
        assert_eq!(
            assert_alignment("middle"),
            Err(ValidationError::InvalidAlignment("middle".into()))
        );
    }

    #[test]
    fn test_orientation_members() {
        assert_eq!(assert_orientation("horizontal"), Ok(Orientation::Horizontal));
        assert_eq!(assert_orientation("vertical"), Ok(Orientation::Vertical));
        assert!(assert_orientation("diagonal").is_err());
    }

    #[test]
    fn test_position_members() {
        for pos in Position::ALL {
            assert_eq!(assert_position(pos.as_str()), Ok(pos));
        }
        assert!(assert_position("center").is_err());
        assert!(assert_position("North").is_err());
    }

    #[test]
    fn test_color_channel_out_of_range() {
        let err = assert_color(&Value::from((10, 20, 300))).expect_err("should be rejected");
        assert!(matches!(
            err,
            ValidationError::ColorChannelRange {
                index: 2,
                value: 300,
                ..
            }
        ));
    }

    #[test]
    fn test_color_with_alpha() {
        let color = assert_color(&Value::from((10, 20, 30, 255))).expect("valid color");
        assert_eq!(color, Color::rgba(10, 20, 30, 255));
        assert_eq!(color.to_rgba(), [10, 20, 30, 255]);
    }

    #[test]
    fn test_color_arity() {
        assert_eq!(
            assert_color(&Value::from((1, 2))),
            Err(ValidationError::ColorArity { len: 2 })
        );
        assert_eq!(
            assert_color(&Value::from(vec![Value::Int(0); 5])),
            Err(ValidationError::ColorArity { len: 5 })
        );
    }

    #[test]
    fn test_color_rejects_non_integers() {
        assert!(matches!(
            assert_color(&Value::from((1, 2.0, 3))),
            Err(ValidationError::ColorChannelType { index: 1, .. })
        ));
        assert!(matches!(
            assert_color(&Value::from((1, 2, 3, "x"))),
            Err(ValidationError::ColorChannelType { index: 3, .. })
        ));
        assert!(matches!(
            assert_color(&Value::from("red")),
            Err(ValidationError::ColorNotSequence(_))
        ));
    }

    #[test]
    fn test_color_negative_alpha() {
        assert!(matches!(
            assert_color(&Value::from((1, 2, 3, -1))),
            Err(ValidationError::ColorChannelRange { index: 3, .. })
        ));
    }

    #[test]
    fn test_vector2() {
        let v = assert_vector2(&Value::from((1, 2.5))).expect("numeric vector");
        assert_eq!(v, Vector2 { x: 1.0, y: 2.5 });

        assert!(matches!(
            assert_vector2(&Value::from((1, "a"))),
            Err(ValidationError::VectorElementType { .. })
        ));
        assert!(matches!(
            assert_vector2(&Value::from((1, 2, 3))),
            Err(ValidationError::VectorArity { .. })
        ));
        assert!(matches!(
            assert_vector2(&Value::Int(1)),
            Err(ValidationError::VectorNotSequence(_))
        ));
    }

    #[test]
    fn test_error_messages_name_the_value() {
        let err = assert_vector2(&Value::from((1, "a"))).expect_err("should be rejected");
        assert!(err.to_string().contains("(1, \"a\")"));
    }

    proptest! {
        #[test]
        fn prop_in_range_colors_are_valid(
            r in 0i64..=255,
            g in 0i64..=255,
            b in 0i64..=255,
            a in proptest::option::of(0i64..=255)
        ) {
            let value = match a {
                Some(a) => Value::from((r, g, b, a)),
                None => Value::from((r, g, b)),
            };
            let color = assert_color(&value).expect("in-range color");
            prop_assert_eq!(i64::from(color.r), r);
            prop_assert_eq!(color.a.map(i64::from), a);
        }

        #[test]
        fn prop_out_of_range_channel_is_rejected(
            idx in 0usize..3,
            bad in prop_oneof![-1000i64..0, 256i64..1000]
        ) {
            let mut channels = vec![Value::Int(100); 3];
            channels[idx] = Value::Int(bad);
            let is_range_error = matches!(
                assert_color(&Value::List(channels)),
                Err(ValidationError::ColorChannelRange { .. })
            );
            prop_assert!(is_range_error);
        }
    }
}
