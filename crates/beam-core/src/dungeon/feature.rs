//! Terrain features and cloud kinds

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Terrain feature occupying a map cell
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum Feature {
    #[default]
    Floor = 0,
    ShallowWater = 1,
    DeepWater = 2,
    Lava = 3,
    OpenDoor = 4,

    // Everything from here on is solid
    ClosedDoor = 10,
    SecretDoor = 11,
    RockWall = 12,
    StoneWall = 13,
    MetalWall = 14,
    GreenCrystalWall = 15,
    WaxWall = 16,
    PermaRock = 17,
    Tree = 18,
    Grate = 19,
    Statue = 20,
    Idol = 21,
}

impl Feature {
    /// Bolts cannot pass through this feature
    pub const fn is_solid(&self) -> bool {
        (*self as u8) >= 10
    }

    /// Check if this is one of the wall materials
    pub const fn is_wall(&self) -> bool {
        matches!(
            self,
            Feature::SecretDoor
                | Feature::RockWall
                | Feature::StoneWall
                | Feature::MetalWall
                | Feature::GreenCrystalWall
                | Feature::WaxWall
                | Feature::PermaRock
        )
    }

    pub const fn is_door(&self) -> bool {
        matches!(self, Feature::ClosedDoor | Feature::SecretDoor | Feature::OpenDoor)
    }

    /// Statues and idols: solid, but explosions may be told to pass them
    pub const fn is_statuelike(&self) -> bool {
        matches!(self, Feature::Statue | Feature::Idol)
    }

    /// Features a digging bolt can tunnel through
    pub const fn is_diggable(&self) -> bool {
        matches!(self, Feature::RockWall | Feature::SecretDoor | Feature::Grate)
    }

    /// Features fire can set alight
    pub const fn is_flammable(&self) -> bool {
        matches!(self, Feature::Tree | Feature::WaxWall)
    }

    /// Never altered by any bolt
    pub const fn is_permanent(&self) -> bool {
        matches!(self, Feature::PermaRock)
    }

    /// Light passes even though bolts do not
    pub const fn is_transparent(&self) -> bool {
        !self.is_solid() || matches!(self, Feature::Grate | Feature::GreenCrystalWall)
    }

    /// Noun used in messages
    pub const fn name(&self) -> &'static str {
        match self {
            Feature::Floor => "floor",
            Feature::ShallowWater => "shallow water",
            Feature::DeepWater => "deep water",
            Feature::Lava => "lava",
            Feature::OpenDoor | Feature::ClosedDoor | Feature::SecretDoor => "door",
            Feature::RockWall => "rock wall",
            Feature::StoneWall => "stone wall",
            Feature::MetalWall => "metal wall",
            Feature::GreenCrystalWall => "crystal wall",
            Feature::WaxWall => "wax wall",
            Feature::PermaRock => "rock",
            Feature::Tree => "tree",
            Feature::Grate => "iron grate",
            Feature::Statue => "statue",
            Feature::Idol => "idol",
        }
    }

    /// Character used by the ASCII map format
    pub const fn glyph(&self) -> char {
        match self {
            Feature::Floor => '.',
            Feature::ShallowWater => '-',
            Feature::DeepWater => '~',
            Feature::Lava => 'L',
            Feature::OpenDoor => '\'',
            Feature::ClosedDoor => '+',
            Feature::SecretDoor => '#',
            Feature::RockWall => '#',
            Feature::StoneWall => '%',
            Feature::MetalWall => 'M',
            Feature::GreenCrystalWall => 'G',
            Feature::WaxWall => 'W',
            Feature::PermaRock => 'X',
            Feature::Tree => 'T',
            Feature::Grate => '=',
            Feature::Statue => 'S',
            Feature::Idol => 'I',
        }
    }

    /// Parse an ASCII map character; `None` for characters that are not terrain
    pub const fn from_glyph(c: char) -> Option<Feature> {
        Some(match c {
            '.' => Feature::Floor,
            '-' => Feature::ShallowWater,
            '~' => Feature::DeepWater,
            'L' => Feature::Lava,
            '\'' => Feature::OpenDoor,
            '+' => Feature::ClosedDoor,
            '#' => Feature::RockWall,
            '%' => Feature::StoneWall,
            'M' => Feature::MetalWall,
            'G' => Feature::GreenCrystalWall,
            'W' => Feature::WaxWall,
            'X' => Feature::PermaRock,
            'T' => Feature::Tree,
            '=' => Feature::Grate,
            'S' => Feature::Statue,
            'I' => Feature::Idol,
            _ => return None,
        })
    }
}

/// Kinds of cloud a bolt can leave behind
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum CloudKind {
    Fire,
    Cold,
    Poison,
    Steam,
    Miasma,
    Smoke,
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_solid_partition() {
        assert!(!Feature::Floor.is_solid());
        assert!(!Feature::Lava.is_solid());
        assert!(!Feature::OpenDoor.is_solid());
        assert!(Feature::ClosedDoor.is_solid());
        assert!(Feature::Tree.is_solid());
        assert!(Feature::Statue.is_solid());
    }

    #[test]
    fn test_walls_are_solid() {
        for f in Feature::iter().filter(|f| f.is_wall()) {
            assert!(f.is_solid(), "{f} is a wall but not solid");
        }
    }

    #[test]
    fn test_glyph_round_trip_for_unique_glyphs() {
        for f in Feature::iter().filter(|f| *f != Feature::SecretDoor) {
            assert_eq!(Feature::from_glyph(f.glyph()), Some(f));
        }
        assert_eq!(Feature::from_glyph('@'), None);
    }
}
