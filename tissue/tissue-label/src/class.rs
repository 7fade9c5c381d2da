//! The tissue class enum and its palette.

use std::fmt;
use std::str::FromStr;

use mesh_types::VertexColor;

use crate::error::LabelError;

/// Colour painted over resected tissue.
pub const REMOVED_COLOR: VertexColor = VertexColor::from_rgb(0.3, 0.3, 0.3);

/// Tissue class of a surface vertex.
///
/// The discriminant is the numeric label stored on vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[repr(u8)]
pub enum TissueClass {
    /// Skull and cerebrospinal fluid.
    #[cfg_attr(feature = "serde", serde(rename = "skull"))]
    SkullCsf = 0,
    /// White matter.
    WhiteMatter = 1,
    /// Grey matter.
    GreyMatter = 2,
    /// Tumor.
    Tumor = 3,
}

impl TissueClass {
    /// Every class in label order.
    pub const ALL: [Self; 4] = [
        Self::SkullCsf,
        Self::WhiteMatter,
        Self::GreyMatter,
        Self::Tumor,
    ];

    /// Numeric label.
    #[inline]
    #[must_use]
    pub const fn label(self) -> u8 {
        self as u8
    }

    /// Canonical name, as accepted by [`FromStr`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SkullCsf => "skull",
            Self::WhiteMatter => "white_matter",
            Self::GreyMatter => "grey_matter",
            Self::Tumor => "tumor",
        }
    }

    /// Display colour.
    #[must_use]
    pub const fn color(self) -> VertexColor {
        match self {
            Self::SkullCsf => VertexColor::from_rgb(0.9, 0.9, 0.9),
            Self::WhiteMatter => VertexColor::from_rgb(1.0, 0.95, 0.9),
            Self::GreyMatter => VertexColor::from_rgb(0.7, 0.7, 0.75),
            Self::Tumor => VertexColor::from_rgb(0.9, 0.2, 0.2),
        }
    }

    /// Skull vertices are rigid during simulation.
    #[inline]
    #[must_use]
    pub const fn is_rigid(self) -> bool {
        matches!(self, Self::SkullCsf)
    }
}

impl fmt::Display for TissueClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TissueClass {
    type Err = LabelError;

    /// Parse a class name. Case and surrounding whitespace are ignored, and
    /// `-` or a space may stand in for `_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match key.as_str() {
            "skull" | "csf" | "skull_csf" => Ok(Self::SkullCsf),
            "white_matter" => Ok(Self::WhiteMatter),
            "grey_matter" | "gray_matter" => Ok(Self::GreyMatter),
            "tumor" | "tumour" => Ok(Self::Tumor),
            _ => Err(LabelError::UnknownClass(s.to_string())),
        }
    }
}

impl TryFrom<u8> for TissueClass {
    type Error = LabelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(usize::from(value))
            .copied()
            .ok_or(LabelError::InvalidLabel(value))
    }
}

impl From<TissueClass> for u8 {
    fn from(class: TissueClass) -> Self {
        class.label()
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip() {
        for class in TissueClass::ALL {
            assert_eq!(TissueClass::try_from(class.label()).unwrap(), class);
            assert_eq!(class.name().parse::<TissueClass>().unwrap(), class);
        }
        assert!(matches!(TissueClass::try_from(4), Err(LabelError::InvalidLabel(4))));
    }

    #[test]
    fn parse_aliases() {
        assert_eq!(" Tumor ".parse::<TissueClass>().unwrap(), TissueClass::Tumor);
        assert_eq!("gray-matter".parse::<TissueClass>().unwrap(), TissueClass::GreyMatter);
        assert_eq!("White Matter".parse::<TissueClass>().unwrap(), TissueClass::WhiteMatter);
        assert!(matches!(
            "ventricle".parse::<TissueClass>(),
            Err(LabelError::UnknownClass(name)) if name == "ventricle"
        ));
    }

    #[test]
    fn palette() {
        assert_eq!(TissueClass::Tumor.color().to_array(), [0.9, 0.2, 0.2]);
        assert_eq!(TissueClass::SkullCsf.color().to_array(), [0.9, 0.9, 0.9]);
        assert_eq!(REMOVED_COLOR.to_array(), [0.3, 0.3, 0.3]);
        assert!(TissueClass::SkullCsf.is_rigid());
        assert!(!TissueClass::Tumor.is_rigid());
    }
}
