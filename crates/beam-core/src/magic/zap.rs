//! Zap registry
//!
//! Every named bolt effect (wands, spells, breaths) is a `ZapInfo` row.
//! `ZapRegistry::zap` looks a row up and writes its configuration onto a
//! `Bolt`, scaling damage and accuracy by power.

use std::sync::OnceLock;

use bitflags::bitflags;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, IntoEnumIterator};

use super::formula::{DamageFormula, HitFormula};
use super::zap_data::STANDARD_ZAPS;
use crate::beam::{Bolt, BoltFlags, Rider, Shape};
use crate::combat::{DiceDef, Flavor, ToHit};
use crate::consts::INACCURACY_PENALTY;
use crate::rng::GameRng;
use crate::world::{BeamError, config_bug};

/// Display colour of a bolt
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum Colour {
    Black = 0,
    Blue = 1,
    Green = 2,
    Cyan = 3,
    Red = 4,
    Magenta = 5,
    Brown = 6,
    LightGrey = 7,
    DarkGrey = 8,
    LightBlue = 9,
    LightGreen = 10,
    LightCyan = 11,
    LightRed = 12,
    LightMagenta = 13,
    Yellow = 14,
    #[default]
    White = 15,
}

/// Identifier of a registry row
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumCount,
)]
#[repr(u8)]
pub enum ZapId {
    Flame,
    Frost,
    Slowing,
    Hasting,
    MagicDarts,
    Healing,
    Paralysis,
    Fire,
    Cold,
    PrimalWave,
    Confusion,
    Invisibility,
    Digging,
    Fireball,
    Teleportation,
    Lightning,
    PolymorphOther,
    VenomBolt,
    NegativeEnergy,
    CrystalSpear,
    BeamOfEnergy,
    MysticBlast,
    Enslavement,
    Pain,
    StickyFlame,
    DispelUndead,
    BoneShards,
    Banishment,
    Degeneration,
    Sting,
    Hellfire,
    IronShot,
    Striking,
    StoneArrow,
    Electricity,
    OrbOfElectricity,
    SpitPoison,
    DebuggingRay,
    BreatheFire,
    BreatheFrost,
    BreatheAcid,
    BreathePoison,
    BreathePower,
    BreatheSteam,
    EnslaveUndead,
    Agony,
    Disintegration,
    ControlDemon,
    OrbOfFragmentation,
    ThrowIcicle,
    Corona,
    Hibernation,
    FlameTongue,
    Sandblast,
    SmallSandblast,
    Magma,
    PoisonArrow,
    Petrify,
    Porkalator,
    Sleep,
    Sunray,
    GoldenFlame,
    ChaosBolt,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct ZapFlags: u16 {
        const ENCHANTMENT = 0x0001;
        const ALWAYS_OBVIOUS = 0x0002;
        const CAN_BEAM = 0x0004;
        const EXPLOSION = 0x0008;
        /// Fills the area around the target with cloud
        const BIG_CLOUD = 0x0010;
        const BURNS_TREES = 0x0020;
    }
}

/// One row of the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ZapInfo {
    pub id: ZapId,
    pub name: &'static str,
    pub power_cap: i32,
    pub damage: Option<DamageFormula>,
    /// Accuracy for damaging zaps; effective power for enchantments
    pub to_hit: Option<HitFormula>,
    pub colour: Colour,
    pub flavor: Flavor,
    pub glyph: char,
    pub flags: ZapFlags,
    pub radius: i32,
    pub loudness: i32,
    pub rider: Option<Rider>,
}

impl ZapInfo {
    pub const fn is_enchantment(&self) -> bool {
        self.flags.contains(ZapFlags::ENCHANTMENT)
    }

    fn shape(&self) -> Shape {
        if self.flags.contains(ZapFlags::EXPLOSION) {
            Shape::Explosion {
                radius: self.radius,
            }
        } else if self.flags.contains(ZapFlags::BIG_CLOUD) {
            Shape::Cloud {
                radius: self.radius.max(1),
            }
        } else if self.flags.contains(ZapFlags::CAN_BEAM) {
            Shape::Beam
        } else {
            Shape::Bolt
        }
    }
}

/// Lookup table of zap effects
#[derive(Debug, Clone)]
pub struct ZapRegistry {
    entries: Vec<ZapInfo>,
    index: Vec<Option<usize>>,
    by_name: HashMap<String, usize>,
}

impl ZapRegistry {
    /// Build a registry from rows. Each id may appear at most once.
    pub fn new(entries: Vec<ZapInfo>) -> Self {
        let mut index = vec![None; ZapId::COUNT];
        let mut by_name = HashMap::with_capacity(entries.len() * 2);
        for (i, entry) in entries.iter().enumerate() {
            let slot = &mut index[entry.id as usize];
            if slot.is_some() {
                config_bug(&format!("zap {} registered twice", entry.id));
            }
            *slot = Some(i);
            by_name.insert(entry.name.to_lowercase(), i);
            by_name.insert(entry.id.to_string().to_lowercase(), i);
        }
        Self {
            entries,
            index,
            by_name,
        }
    }

    /// The built-in table
    pub fn standard() -> &'static ZapRegistry {
        static STANDARD: OnceLock<ZapRegistry> = OnceLock::new();
        STANDARD.get_or_init(|| ZapRegistry::new(STANDARD_ZAPS.to_vec()))
    }

    pub fn entries(&self) -> &[ZapInfo] {
        &self.entries
    }

    pub fn lookup(&self, id: ZapId) -> Option<&ZapInfo> {
        self.index
            .get(id as usize)
            .copied()
            .flatten()
            .map(|i| &self.entries[i])
    }

    /// Find a row by its bolt name or its id name, ignoring case and
    /// treating `-` and `_` as spaces
    pub fn find(&self, name: &str) -> Option<&ZapInfo> {
        let key = name.trim().to_lowercase();
        if let Some(&i) = self.by_name.get(&key) {
            return Some(&self.entries[i]);
        }
        let spaced = key.replace(['-', '_'], " ");
        if let Some(&i) = self.by_name.get(&spaced) {
            return Some(&self.entries[i]);
        }
        let joined = spaced.replace(' ', "");
        self.by_name.get(&joined).map(|&i| &self.entries[i])
    }

    /// Configure `bolt` as zap `id` at `power`.
    ///
    /// An unknown id is reported and leaves the bolt unchanged.
    pub fn zap(
        &self,
        id: ZapId,
        power: i32,
        bolt: &mut Bolt,
        inaccurate: bool,
        rng: &mut GameRng,
    ) -> Result<(), BeamError> {
        let Some(entry) = self.lookup(id) else {
            tracing::error!(target: "beam", zap = %id, "zap missing from registry");
            return Err(BeamError::UnknownZap(id.to_string()));
        };
        configure(entry, power, bolt, inaccurate, rng);
        Ok(())
    }
}

impl Default for ZapRegistry {
    fn default() -> Self {
        ZapRegistry::standard().clone()
    }
}

/// Write `entry` onto `bolt` at `power`, clamped to the row's cap
pub fn configure(entry: &ZapInfo, power: i32, bolt: &mut Bolt, inaccurate: bool, rng: &mut GameRng) {
    let power = power.clamp(0, entry.power_cap);

    bolt.zap = Some(entry.id);
    bolt.name = entry.name.to_string();
    bolt.glyph = entry.glyph;
    bolt.colour = entry.colour;
    bolt.flavor = entry.flavor;
    bolt.real_flavor = entry.flavor;
    bolt.shape = entry.shape();
    bolt.loudness = entry.loudness;
    bolt.rider = entry.rider;

    if entry.is_enchantment() != bolt.is_enchantment() {
        config_bug(&format!(
            "zap {} is misclassified: enchantment flag {} but flavor {}",
            entry.id,
            entry.is_enchantment(),
            entry.flavor
        ));
    }

    bolt.flags.set(
        BoltFlags::ALWAYS_OBVIOUS,
        entry.flags.contains(ZapFlags::ALWAYS_OBVIOUS),
    );
    let burns = entry.flags.contains(ZapFlags::BURNS_TREES);
    bolt.flags.set(BoltFlags::BURNS_TREES, burns);
    bolt.flags
        .set(BoltFlags::SUPERHOT, burns && power * 2 >= entry.power_cap);

    bolt.damage = entry
        .damage
        .map_or(DiceDef::default(), |d| d.evaluate(power, rng));

    if entry.is_enchantment() {
        bolt.ench_power = entry.to_hit.and_then(|f| f.value(power)).unwrap_or(power);
        bolt.to_hit = ToHit::Automatic;
    } else {
        bolt.ench_power = power;
        let to_hit = entry.to_hit.map_or(ToHit::Automatic, |f| f.evaluate(power));
        bolt.to_hit = if inaccurate {
            to_hit.penalized(INACCURACY_PENALTY)
        } else {
            to_hit
        };
    }

    tracing::trace!(
        target: "beam",
        zap = %entry.id,
        power,
        damage = %bolt.damage,
        "configured zap"
    );
}

/// Configure `bolt` from the built-in table
pub fn zap(
    id: ZapId,
    power: i32,
    bolt: &mut Bolt,
    inaccurate: bool,
    rng: &mut GameRng,
) -> Result<(), BeamError> {
    ZapRegistry::standard().zap(id, power, bolt, inaccurate, rng)
}

/// All ids, in table order
pub fn all_zaps() -> impl Iterator<Item = ZapId> {
    ZapId::iter()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_id_has_a_row() {
        let reg = ZapRegistry::standard();
        for id in ZapId::iter() {
            let entry = reg.lookup(id);
            assert!(entry.is_some(), "{id} has no row");
            assert_eq!(entry.map(|e| e.id), Some(id));
        }
    }

    #[test]
    fn test_classification_is_consistent() {
        for entry in ZapRegistry::standard().entries() {
            assert_eq!(
                entry.is_enchantment(),
                entry.flavor.is_enchantment(),
                "{}",
                entry.id
            );
        }
    }

    #[test]
    fn test_find_by_name() {
        let reg = ZapRegistry::standard();
        assert_eq!(reg.find("bolt of fire").map(|e| e.id), Some(ZapId::Fire));
        assert_eq!(reg.find("Fireball").map(|e| e.id), Some(ZapId::Fireball));
        assert_eq!(reg.find("orb-of-electricity").map(|e| e.id), Some(ZapId::OrbOfElectricity));
        assert!(reg.find("bolt of nonsense").is_none());
    }

    #[test]
    fn test_power_is_clamped_to_cap() {
        let mut rng = GameRng::new(5);
        let mut low = Bolt::default();
        let mut high = Bolt::default();
        zap(ZapId::MagicDarts, 25, &mut low, false, &mut rng).unwrap();
        zap(ZapId::MagicDarts, 5000, &mut high, false, &mut rng).unwrap();
        assert_eq!(low.damage, high.damage);
        assert_eq!(low.ench_power, 25);
        assert_eq!(high.ench_power, 25);
    }

    #[test]
    fn test_enchantment_power_formula() {
        let mut rng = GameRng::new(5);
        let mut bolt = Bolt::default();
        zap(ZapId::Pain, 40, &mut bolt, false, &mut rng).unwrap();
        assert!(bolt.is_enchantment());
        assert_eq!(bolt.ench_power, 40 * 7 / 2);
        assert_eq!(bolt.to_hit, ToHit::Automatic);

        zap(ZapId::Slowing, 40, &mut bolt, false, &mut rng).unwrap();
        assert_eq!(bolt.ench_power, 40);
    }

    #[test]
    fn test_inaccuracy_penalty() {
        let mut rng = GameRng::new(5);
        let mut sharp = Bolt::default();
        let mut wild = Bolt::default();
        zap(ZapId::Flame, 50, &mut sharp, false, &mut rng).unwrap();
        zap(ZapId::Flame, 50, &mut wild, true, &mut rng).unwrap();
        assert_eq!(sharp.to_hit, ToHit::Roll(13));
        assert_eq!(wild.to_hit, ToHit::Roll(13 - INACCURACY_PENALTY));
    }

    #[test]
    fn test_shapes_from_flags() {
        let mut rng = GameRng::new(5);
        let mut bolt = Bolt::default();
        zap(ZapId::Fireball, 100, &mut bolt, false, &mut rng).unwrap();
        assert_eq!(bolt.shape, Shape::Explosion { radius: 1 });
        zap(ZapId::Lightning, 100, &mut bolt, false, &mut rng).unwrap();
        assert_eq!(bolt.shape, Shape::Beam);
        zap(ZapId::BreathePoison, 30, &mut bolt, false, &mut rng).unwrap();
        assert!(bolt.is_big_cloud());
        zap(ZapId::StickyFlame, 30, &mut bolt, false, &mut rng).unwrap();
        assert_eq!(bolt.rider, Some(Rider::StickyFlame));
        zap(ZapId::Frost, 30, &mut bolt, false, &mut rng).unwrap();
        assert_eq!(bolt.rider, None);
    }

    #[test]
    fn test_unknown_zap_leaves_bolt_untouched() {
        let reg = ZapRegistry::new(vec![]);
        let mut rng = GameRng::new(5);
        let mut bolt = Bolt::default().with_name("arrow").with_flavor(Flavor::Missile);
        let result = reg.zap(ZapId::Fire, 50, &mut bolt, false, &mut rng);
        assert_eq!(result, Err(BeamError::UnknownZap("Fire".to_string())));
        assert_eq!(bolt.name, "arrow");
        assert_eq!(bolt.flavor, Flavor::Missile);
        assert!(bolt.zap.is_none());
    }

    #[test]
    #[should_panic(expected = "misclassified")]
    fn test_misclassified_row_is_a_configuration_bug() {
        let mut entry = *ZapRegistry::standard()
            .lookup(ZapId::Slowing)
            .unwrap();
        entry.flags.remove(ZapFlags::ENCHANTMENT);
        let mut rng = GameRng::new(5);
        configure(&entry, 10, &mut Bolt::default(), false, &mut rng);
    }

    #[test]
    #[should_panic(expected = "registered twice")]
    fn test_duplicate_rows_are_rejected() {
        let row = *ZapRegistry::standard().lookup(ZapId::Flame).unwrap();
        ZapRegistry::new(vec![row, row]);
    }
}
