//! Built-in zap table

use super::formula::{DamageFormula, HitFormula};
use super::zap::{Colour, ZapFlags, ZapId, ZapInfo};
use crate::beam::Rider;
use crate::combat::Flavor;

const fn bolt(
    id: ZapId,
    name: &'static str,
    power_cap: i32,
    damage: DamageFormula,
    to_hit: HitFormula,
    colour: Colour,
    flavor: Flavor,
    loudness: i32,
) -> ZapInfo {
    ZapInfo {
        id,
        name,
        power_cap,
        damage: Some(damage),
        to_hit: Some(to_hit),
        colour,
        flavor,
        glyph: '*',
        flags: ZapFlags::empty(),
        radius: 0,
        loudness,
        rider: None,
    }
}

const fn enchantment(
    id: ZapId,
    name: &'static str,
    power_cap: i32,
    colour: Colour,
    flavor: Flavor,
) -> ZapInfo {
    ZapInfo {
        id,
        name,
        power_cap,
        damage: None,
        to_hit: None,
        colour,
        flavor,
        glyph: '0',
        flags: ZapFlags::ENCHANTMENT,
        radius: 0,
        loudness: 0,
        rider: None,
    }
}

impl ZapInfo {
    const fn flags(mut self, flags: ZapFlags) -> Self {
        self.flags = self.flags.union(flags);
        self
    }

    const fn glyph(mut self, glyph: char) -> Self {
        self.glyph = glyph;
        self
    }

    const fn radius(mut self, radius: i32) -> Self {
        self.radius = radius;
        self
    }

    const fn rider(mut self, rider: Rider) -> Self {
        self.rider = Some(rider);
        self
    }

    const fn damage(mut self, damage: DamageFormula) -> Self {
        self.damage = Some(damage);
        self
    }

    /// Effective enchantment power as a function of raw power
    const fn power(mut self, power: HitFormula) -> Self {
        self.to_hit = Some(power);
        self
    }
}

use DamageFormula as D;
use HitFormula as H;

pub(super) static STANDARD_ZAPS: &[ZapInfo] = &[
    bolt(ZapId::Flame, "puff of flame", 50, D::dice(2, 4, 1, 10), H::affine(8, 1, 10), Colour::Red, Flavor::Fire, 2),
    bolt(ZapId::Frost, "puff of frost", 50, D::dice(2, 4, 1, 10), H::affine(8, 1, 10), Colour::White, Flavor::Cold, 2),
    enchantment(ZapId::Slowing, "slowing", 100, Colour::Black, Flavor::Slow),
    enchantment(ZapId::Hasting, "hasting", 100, Colour::Black, Flavor::Haste),
    bolt(ZapId::MagicDarts, "magic dart", 25, D::dice(1, 3, 1, 5), H::Automatic, Colour::LightMagenta, Flavor::MagicMissile, 1)
        .flags(ZapFlags::ALWAYS_OBVIOUS),
    enchantment(ZapId::Healing, "healing", 100, Colour::Black, Flavor::Healing).damage(D::dice(1, 7, 1, 3)),
    enchantment(ZapId::Paralysis, "paralysis", 100, Colour::Black, Flavor::Paralysis),
    bolt(ZapId::Fire, "bolt of fire", 200, D::calc(6, 18, 2, 3), H::affine(10, 1, 25), Colour::Red, Flavor::Fire, 6)
        .flags(ZapFlags::CAN_BEAM.union(ZapFlags::BURNS_TREES))
        .glyph('#'),
    bolt(ZapId::Cold, "bolt of cold", 200, D::calc(6, 18, 2, 3), H::affine(10, 1, 25), Colour::White, Flavor::Cold, 6)
        .flags(ZapFlags::CAN_BEAM)
        .glyph('#'),
    bolt(ZapId::PrimalWave, "great wave of water", 200, D::calc(4, 14, 3, 5), H::affine(10, 1, 25), Colour::LightBlue, Flavor::Water, 6),
    enchantment(ZapId::Confusion, "confusion", 100, Colour::Black, Flavor::Confusion),
    enchantment(ZapId::Invisibility, "invisibility", 100, Colour::Black, Flavor::Invisibility),
    enchantment(ZapId::Digging, "digging", 100, Colour::Black, Flavor::Digging).flags(ZapFlags::CAN_BEAM),
    bolt(ZapId::Fireball, "fireball", 200, D::calc(3, 10, 1, 2), H::flat(40), Colour::Red, Flavor::Fire, 0)
        .flags(ZapFlags::EXPLOSION.union(ZapFlags::BURNS_TREES))
        .radius(1)
        .glyph('0'),
    enchantment(ZapId::Teleportation, "teleportation", 150, Colour::Black, Flavor::Teleport),
    bolt(ZapId::Lightning, "bolt of lightning", 200, D::calc(1, 10, 3, 5), H::affine(7, 1, 40), Colour::LightCyan, Flavor::Electricity, 5)
        .flags(ZapFlags::CAN_BEAM.union(ZapFlags::BURNS_TREES))
        .glyph('#'),
    enchantment(ZapId::PolymorphOther, "polymorph other", 200, Colour::Black, Flavor::Polymorph),
    bolt(ZapId::VenomBolt, "bolt of poison", 200, D::calc(4, 15, 1, 2), H::affine(8, 1, 20), Colour::LightGreen, Flavor::Poison, 5)
        .flags(ZapFlags::CAN_BEAM)
        .glyph('#'),
    bolt(ZapId::NegativeEnergy, "bolt of negative energy", 200, D::calc(4, 15, 3, 5), H::affine(8, 1, 20), Colour::DarkGrey, Flavor::Negative, 0)
        .flags(ZapFlags::CAN_BEAM)
        .glyph('#'),
    bolt(ZapId::CrystalSpear, "crystal spear", 200, D::calc(10, 23, 1, 1), H::affine(10, 1, 15), Colour::White, Flavor::MagicMissile, 4)
        .glyph(')'),
    bolt(ZapId::BeamOfEnergy, "narrow beam of energy", 1000, D::calc(12, 40, 3, 2), H::flat(1), Colour::Yellow, Flavor::Energy, 3)
        .flags(ZapFlags::CAN_BEAM)
        .glyph('#'),
    bolt(ZapId::MysticBlast, "orb of energy", 100, D::calc(2, 15, 2, 5), H::affine(10, 1, 7), Colour::LightMagenta, Flavor::MagicMissile, 2),
    enchantment(ZapId::Enslavement, "enslavement", 100, Colour::Black, Flavor::Charm),
    enchantment(ZapId::Pain, "pain", 100, Colour::Black, Flavor::Pain)
        .damage(D::dice(1, 4, 1, 5))
        .power(H::affine(0, 7, 2)),
    bolt(ZapId::StickyFlame, "sticky flame", 100, D::dice(2, 3, 1, 12), H::affine(11, 1, 10), Colour::Red, Flavor::Fire, 1)
        .rider(Rider::StickyFlame),
    enchantment(ZapId::DispelUndead, "dispel undead", 100, Colour::Black, Flavor::DispelUndead)
        .damage(D::calc(3, 20, 3, 4))
        .power(H::affine(0, 3, 2)),
    bolt(ZapId::BoneShards, "spray of bone shards", 10000, D::dice(3, 2, 1, 250), H::affine(8, 1, 100), Colour::LightGrey, Flavor::Magic, 3)
        .flags(ZapFlags::CAN_BEAM),
    enchantment(ZapId::Banishment, "banishment", 150, Colour::Black, Flavor::Banish),
    enchantment(ZapId::Degeneration, "degeneration", 100, Colour::Black, Flavor::Degenerate),
    bolt(ZapId::Sting, "sting", 25, D::dice(1, 3, 1, 5), H::affine(8, 1, 5), Colour::Green, Flavor::Poison, 1),
    bolt(ZapId::Hellfire, "hellfire", 200, D::calc(3, 8, 3, 5), H::affine(20, 1, 10), Colour::Red, Flavor::Hellfire, 9)
        .flags(ZapFlags::EXPLOSION.union(ZapFlags::BURNS_TREES))
        .radius(1)
        .glyph('#'),
    bolt(ZapId::IronShot, "iron shot", 200, D::calc(9, 15, 3, 4), H::affine(7, 1, 15), Colour::Cyan, Flavor::Missile, 6)
        .glyph(')'),
    bolt(ZapId::Striking, "force bolt", 25, D::dice(1, 5, 0, 1), H::affine(8, 1, 10), Colour::Black, Flavor::MagicMissile, 1),
    bolt(ZapId::StoneArrow, "stone arrow", 50, D::dice(2, 5, 1, 7), H::affine(8, 1, 10), Colour::LightGrey, Flavor::Missile, 3)
        .glyph(')'),
    bolt(ZapId::Electricity, "zap", 25, D::dice(1, 3, 1, 4), H::affine(8, 1, 7), Colour::LightCyan, Flavor::Electricity, 1)
        .flags(ZapFlags::ALWAYS_OBVIOUS),
    bolt(ZapId::OrbOfElectricity, "orb of electricity", 200, D::calc(0, 15, 4, 5), H::flat(40), Colour::LightBlue, Flavor::Electricity, 6)
        .flags(ZapFlags::EXPLOSION)
        .radius(2)
        .glyph('0'),
    bolt(ZapId::SpitPoison, "splash of poison", 50, D::dice(1, 4, 1, 2), H::affine(5, 1, 6), Colour::Green, Flavor::Poison, 0),
    bolt(ZapId::DebuggingRay, "debugging ray", 10000, D::dice(1500, 1, 0, 1), H::Automatic, Colour::White, Flavor::MagicMissile, 0),
    bolt(ZapId::BreatheFire, "fiery breath", 50, D::dice(3, 4, 1, 3), H::affine(8, 1, 6), Colour::Red, Flavor::Fire, 7)
        .flags(ZapFlags::CAN_BEAM)
        .glyph('#'),
    bolt(ZapId::BreatheFrost, "freezing breath", 50, D::dice(3, 4, 1, 3), H::affine(8, 1, 6), Colour::White, Flavor::Cold, 6)
        .flags(ZapFlags::CAN_BEAM)
        .glyph('#'),
    bolt(ZapId::BreatheAcid, "acid", 50, D::dice(3, 3, 1, 3), H::affine(5, 1, 6), Colour::Yellow, Flavor::Acid, 6)
        .flags(ZapFlags::CAN_BEAM)
        .glyph('#'),
    bolt(ZapId::BreathePoison, "poison gas", 50, D::dice(3, 2, 1, 6), H::affine(6, 1, 6), Colour::Green, Flavor::Poison, 0)
        .flags(ZapFlags::BIG_CLOUD)
        .radius(1)
        .glyph('#'),
    bolt(ZapId::BreathePower, "bolt of energy", 50, D::dice(3, 3, 1, 3), H::affine(5, 1, 6), Colour::Blue, Flavor::MagicMissile, 6)
        .flags(ZapFlags::CAN_BEAM)
        .glyph('#'),
    bolt(ZapId::BreatheSteam, "ball of steam", 50, D::dice(3, 4, 1, 5), H::affine(10, 1, 10), Colour::LightGrey, Flavor::Steam, 0)
        .flags(ZapFlags::BIG_CLOUD)
        .radius(1)
        .glyph('#'),
    enchantment(ZapId::EnslaveUndead, "enslave undead", 100, Colour::Black, Flavor::EnslaveUndead),
    enchantment(ZapId::Agony, "agony", 100, Colour::Black, Flavor::Agony).power(H::affine(0, 5, 1)),
    enchantment(ZapId::Disintegration, "disintegration", 100, Colour::Black, Flavor::Disintegration)
        .damage(D::calc(3, 15, 3, 4))
        .power(H::affine(0, 5, 2))
        .flags(ZapFlags::CAN_BEAM),
    enchantment(ZapId::ControlDemon, "control demon", 100, Colour::Black, Flavor::EnslaveDemon)
        .power(H::affine(0, 3, 2)),
    bolt(ZapId::OrbOfFragmentation, "metal orb", 200, D::calc(3, 30, 3, 4), H::flat(20), Colour::Cyan, Flavor::Frag, 0)
        .flags(ZapFlags::EXPLOSION)
        .radius(1)
        .glyph('0'),
    bolt(ZapId::ThrowIcicle, "shard of ice", 100, D::calc(3, 10, 1, 2), H::affine(9, 1, 12), Colour::White, Flavor::Ice, 4)
        .glyph(')'),
    enchantment(ZapId::Corona, "corona", 100, Colour::Blue, Flavor::Corona),
    enchantment(ZapId::Hibernation, "hibernation", 50, Colour::LightCyan, Flavor::Hibernation),
    bolt(ZapId::FlameTongue, "tongue of flame", 25, D::dice(1, 8, 1, 4), H::affine(7, 1, 6), Colour::Red, Flavor::Fire, 1),
    bolt(ZapId::Sandblast, "rocky blast", 50, D::dice(2, 4, 1, 3), H::affine(13, 1, 10), Colour::Brown, Flavor::Frag, 3)
        .glyph(')'),
    bolt(ZapId::SmallSandblast, "blast of sand", 25, D::dice(1, 8, 0, 1), H::affine(8, 1, 5), Colour::Brown, Flavor::Frag, 1)
        .glyph(')'),
    bolt(ZapId::Magma, "bolt of magma", 200, D::calc(4, 10, 3, 5), H::affine(8, 1, 25), Colour::Red, Flavor::Lava, 5)
        .flags(ZapFlags::CAN_BEAM.union(ZapFlags::BURNS_TREES))
        .glyph('#'),
    bolt(ZapId::PoisonArrow, "poison arrow", 200, D::calc(4, 15, 1, 1), H::affine(5, 1, 10), Colour::LightGreen, Flavor::PoisonArrow, 6)
        .glyph(')'),
    enchantment(ZapId::Petrify, "petrify", 100, Colour::LightGrey, Flavor::Petrify),
    enchantment(ZapId::Porkalator, "porkalator", 100, Colour::Red, Flavor::Porkalator),
    enchantment(ZapId::Sleep, "sleep", 100, Colour::Black, Flavor::Sleep),
    bolt(ZapId::Sunray, "ray of light", 200, D::calc(4, 15, 1, 1), H::affine(10, 1, 25), Colour::White, Flavor::Light, 3)
        .flags(ZapFlags::CAN_BEAM)
        .glyph('#'),
    bolt(ZapId::GoldenFlame, "golden flame", 200, D::calc(3, 10, 1, 2), H::Automatic, Colour::Yellow, Flavor::Holy, 0)
        .flags(ZapFlags::EXPLOSION)
        .radius(2)
        .glyph('0'),
    bolt(ZapId::ChaosBolt, "bolt of chaos", 200, D::calc(3, 15, 1, 3), H::affine(10, 1, 25), Colour::Magenta, Flavor::Chaos, 5)
        .flags(ZapFlags::CAN_BEAM)
        .glyph('#'),
];
