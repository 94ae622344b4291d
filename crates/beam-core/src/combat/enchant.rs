//! Enchantment resolution
//!
//! An enchantment is first checked for applicability, then (unless it is
//! on the unresisted list) against the target's magic resistance, and only
//! then turned into concrete actions. The plan is pure: the caller commits
//! the actions to the world.

use crate::actor::{Actor, ActorTraits, Attitude, Condition, Duration, Holiness, MagicResistance};
use crate::rng::GameRng;
use crate::world::{PolymorphKind, Relocation};

use super::resist::ResolveMode;
use super::{DiceDef, Flavor};

/// Result class of one enchantment application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnchantVerdict {
    Applied,
    /// The target's magic resistance won by `margin` (always positive)
    Resisted { margin: i32 },
    /// Wrong kind of target, or immune to magic
    Inapplicable,
    /// Applicable, but nothing changed (already hasted, already asleep)
    Other,
}

/// A single change to commit to the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnchantAction {
    Add(Condition, Duration),
    Remove(Condition),
    Heal(i32),
    Damage(i32),
    Relocate(Relocation),
    Polymorph(PolymorphKind),
    SetAttitude(Attitude),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnchantPlan {
    pub verdict: EnchantVerdict,
    pub actions: Vec<EnchantAction>,
    pub message: Option<String>,
}

impl EnchantPlan {
    fn new(verdict: EnchantVerdict) -> Self {
        Self {
            verdict,
            actions: Vec::new(),
            message: None,
        }
    }

    fn applied(actions: Vec<EnchantAction>, message: String) -> Self {
        Self {
            verdict: EnchantVerdict::Applied,
            actions,
            message: Some(message),
        }
    }

    fn with_message(mut self, message: Option<String>) -> Self {
        self.message = message;
        self
    }
}

/// Everything the resolver needs to know about one application
#[derive(Debug, Clone, Copy)]
pub struct EnchantRequest<'a> {
    pub flavor: Flavor,
    pub target: &'a Actor,
    pub power: i32,
    pub damage: DiceDef,
    pub aimed_at_feet: bool,
}

/// Enchantments that skip the magic resistance check
pub const fn is_unresisted(flavor: Flavor, aimed_at_feet: bool) -> bool {
    match flavor {
        Flavor::Haste
        | Flavor::Healing
        | Flavor::Invisibility
        | Flavor::Digging
        | Flavor::DispelUndead
        | Flavor::Disintegration
        | Flavor::EnslaveDemon => true,
        Flavor::Teleport | Flavor::Blink => aimed_at_feet,
        _ => false,
    }
}

/// Category mismatch: the enchantment cannot act on this target at all
pub fn is_inapplicable(flavor: Flavor, target: &Actor) -> bool {
    let stationary = target.traits.contains(ActorTraits::STATIONARY);
    match flavor {
        Flavor::Digging => true,
        Flavor::Polymorph | Flavor::Porkalator => {
            target.traits.contains(ActorTraits::POLY_IMMUNE) || target.holiness != Holiness::Natural
        }
        Flavor::Degenerate => target.holiness != Holiness::Natural,
        Flavor::DispelUndead => target.holiness != Holiness::Undead,
        Flavor::EnslaveUndead => {
            target.holiness != Holiness::Undead || target.attitude == Attitude::Friendly
        }
        Flavor::EnslaveDemon => {
            target.holiness != Holiness::Demonic || target.attitude == Attitude::Friendly
        }
        Flavor::Charm => target.attitude == Attitude::Friendly,
        Flavor::Pain | Flavor::Agony => {
            target.resists.negative > 0
                || matches!(target.holiness, Holiness::Undead | Holiness::Nonliving)
        }
        Flavor::Sleep => target.holiness != Holiness::Natural || target.has(Condition::SleepWary),
        Flavor::Hibernation => {
            target.holiness != Holiness::Natural
                || target.has(Condition::SleepWary)
                || target.resists.cold > 0
        }
        Flavor::Petrify => {
            target.has(Condition::Petrified) || target.traits.contains(ActorTraits::STONE_IMMUNE)
        }
        Flavor::Slow | Flavor::Haste | Flavor::Teleport | Flavor::Blink => stationary,
        _ => false,
    }
}

/// Enchantment power after diminishing returns
const fn stepdown_power(power: i32) -> i32 {
    if power <= 40 { power } else { 40 + (power - 40) / 2 }
}

/// Roll magic resistance against an enchantment.
///
/// Returns the resistance margin; a positive margin means the target
/// resisted.
pub fn resist_margin(power: i32, magic_resistance: i32, rng: &mut GameRng) -> i32 {
    let chance = 100 + magic_resistance - stepdown_power(power);
    let roll = rng.random2(100) + rng.random2(101);
    chance - roll
}

fn say(target: &Actor, third: &str, second: &str) -> String {
    if target.is_player {
        format!("You {second}")
    } else {
        format!("{} {third}", target.subject())
    }
}

/// Message for a resisted enchantment, scaled by how easily it was resisted
pub fn resist_message(target: &Actor, margin: i32) -> String {
    if margin >= 60 {
        say(
            target,
            "resists with almost no effort.",
            "resist with almost no effort.",
        )
    } else if margin >= 30 {
        say(target, "easily resists.", "easily resist.")
    } else {
        say(target, "resists.", "resist.")
    }
}

pub fn unaffected_message(target: &Actor) -> String {
    say(target, "is unaffected.", "are unaffected.")
}

fn turns(base: i32, power: i32, rng: &mut GameRng) -> Duration {
    Duration::Turns(base + rng.random2(1 + power / 10))
}

/// Decide what an enchantment does to its target.
///
/// Predictions skip the resistance roll (an enchantment is counted at full
/// strength) and produce no actions or messages.
pub fn plan_enchantment(req: &EnchantRequest<'_>, mode: ResolveMode<'_>) -> EnchantPlan {
    let target = req.target;
    let predicting = mode.is_predict();
    let quiet = |m: String| if predicting { None } else { Some(m) };

    if is_inapplicable(req.flavor, target) {
        return EnchantPlan::new(EnchantVerdict::Inapplicable)
            .with_message(quiet(unaffected_message(target)));
    }

    let rng = match mode {
        ResolveMode::Predict => {
            if !is_unresisted(req.flavor, req.aimed_at_feet)
                && target.magic_resistance == MagicResistance::Immune
            {
                return EnchantPlan::new(EnchantVerdict::Inapplicable);
            }
            return EnchantPlan::new(EnchantVerdict::Applied);
        }
        ResolveMode::Apply(rng) => rng,
    };

    if !is_unresisted(req.flavor, req.aimed_at_feet) {
        match target.magic_resistance {
            MagicResistance::Immune => {
                return EnchantPlan::new(EnchantVerdict::Inapplicable)
                    .with_message(Some(unaffected_message(target)));
            }
            MagicResistance::Value(mr) => {
                let margin = resist_margin(req.power, mr, rng);
                if margin > 0 {
                    return EnchantPlan::new(EnchantVerdict::Resisted { margin })
                        .with_message(Some(resist_message(target, margin)));
                }
            }
        }
    }

    apply_plan(req, rng)
}

fn apply_plan(req: &EnchantRequest<'_>, rng: &mut GameRng) -> EnchantPlan {
    use EnchantAction::*;

    let t = req.target;
    let power = req.power;
    let other = EnchantPlan::new(EnchantVerdict::Other);

    match req.flavor {
        Flavor::Slow => {
            if t.has(Condition::Haste) {
                EnchantPlan::applied(
                    vec![Remove(Condition::Haste)],
                    say(t, "is no longer moving quickly.", "feel yourself slow down."),
                )
            } else if t.has(Condition::Slow) {
                other
            } else {
                EnchantPlan::applied(
                    vec![Add(Condition::Slow, turns(15, power, rng))],
                    say(t, "seems to slow down.", "feel yourself slow down."),
                )
            }
        }
        Flavor::Haste => {
            if t.has(Condition::Slow) {
                EnchantPlan::applied(
                    vec![Remove(Condition::Slow)],
                    say(t, "is no longer moving slowly.", "feel yourself speed up."),
                )
            } else if t.has(Condition::Haste) {
                other
            } else {
                EnchantPlan::applied(
                    vec![Add(Condition::Haste, turns(15, power, rng))],
                    say(t, "seems to speed up.", "feel yourself speed up."),
                )
            }
        }
        Flavor::Healing => {
            if t.hp >= t.max_hp {
                return other;
            }
            let amount = 5 + req.damage.roll(rng);
            let message = if t.hp + amount >= t.max_hp {
                let owner = t.possessive();
                let mut chars = owner.chars();
                let owner = match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => owner,
                };
                format!("{owner} wounds heal themselves!")
            } else {
                say(t, "is healed somewhat.", "feel better.")
            };
            EnchantPlan::applied(vec![Heal(amount)], message)
        }
        Flavor::Paralysis => {
            if t.has(Condition::Paralysed) {
                other
            } else {
                EnchantPlan::applied(
                    vec![Add(Condition::Paralysed, turns(8, power, rng))],
                    say(t, "suddenly stops moving!", "suddenly freeze!"),
                )
            }
        }
        Flavor::Confusion => EnchantPlan::applied(
            vec![Add(Condition::Confused, turns(10, power, rng))],
            say(t, "appears confused.", "feel confused."),
        ),
        Flavor::Invisibility => {
            if t.has(Condition::Invisible) {
                other
            } else {
                EnchantPlan::applied(
                    vec![Add(Condition::Invisible, turns(30, power, rng))],
                    say(t, "flickers and vanishes!", "fade into invisibility!"),
                )
            }
        }
        Flavor::Charm => EnchantPlan::applied(
            vec![Add(Condition::Charmed, turns(20, power, rng))],
            say(t, "is charmed.", "feel charmed."),
        ),
        Flavor::Teleport => EnchantPlan::applied(
            vec![Relocate(Relocation::Teleport)],
            say(t, "disappears!", "feel yourself yanked away!"),
        ),
        Flavor::Blink => EnchantPlan::applied(
            vec![Relocate(Relocation::Blink)],
            say(t, "blinks!", "blink."),
        ),
        Flavor::Banish => EnchantPlan::applied(
            vec![Relocate(Relocation::Banish)],
            say(t, "is banished!", "are banished!"),
        ),
        Flavor::Polymorph => EnchantPlan::applied(
            vec![Polymorph(PolymorphKind::Random)],
            say(t, "changes form!", "feel your body twist and change!"),
        ),
        Flavor::Degenerate => EnchantPlan::applied(
            vec![Polymorph(PolymorphKind::Lump)],
            say(
                t,
                "degenerates into a pulsating lump!",
                "degenerate into a pulsating lump!",
            ),
        ),
        Flavor::Porkalator => EnchantPlan::applied(
            vec![Polymorph(PolymorphKind::Hog)],
            say(t, "turns into a hog!", "turn into a hog!"),
        ),
        Flavor::EnslaveUndead => EnchantPlan::applied(
            vec![SetAttitude(Attitude::Friendly)],
            say(t, "is enslaved.", "are enslaved."),
        ),
        Flavor::EnslaveDemon => {
            let resist = t.traits.contains(ActorTraits::UNIQUE)
                || t.hit_dice * 11 / 2 >= rng.random2(power.max(1));
            if resist {
                let margin = (t.hit_dice * 11 / 2 - power / 2).max(1);
                EnchantPlan::new(EnchantVerdict::Resisted { margin })
                    .with_message(Some(resist_message(t, margin)))
            } else {
                EnchantPlan::applied(
                    vec![SetAttitude(Attitude::Friendly)],
                    say(t, "is enslaved.", "are enslaved."),
                )
            }
        }
        Flavor::Pain => EnchantPlan::applied(
            vec![Damage(req.damage.roll(rng))],
            say(t, "convulses in agony!", "writhe in agony!"),
        ),
        Flavor::Agony => {
            if t.hp <= 1 {
                return other;
            }
            let lost = t.hp - (t.hp / 2).max(1);
            EnchantPlan::applied(
                vec![Damage(lost)],
                say(t, "convulses!", "writhe in agony!"),
            )
        }
        Flavor::DispelUndead => EnchantPlan::applied(
            vec![Damage(req.damage.roll(rng))],
            say(t, "convulses!", "convulse!"),
        ),
        Flavor::Disintegration => EnchantPlan::applied(
            vec![Damage(req.damage.roll(rng))],
            say(t, "is blasted.", "are blasted."),
        ),
        Flavor::Sleep | Flavor::Hibernation => {
            if t.has(Condition::Asleep) {
                return other;
            }
            let mut actions = vec![Add(Condition::Asleep, turns(20, power, rng))];
            if req.flavor == Flavor::Hibernation {
                actions.push(Add(Condition::SleepWary, Duration::Turns(40)));
            }
            EnchantPlan::applied(actions, say(t, "looks drowsy...", "feel drowsy..."))
        }
        Flavor::Corona => {
            if t.has(Condition::Corona) {
                other
            } else {
                EnchantPlan::applied(
                    vec![Add(Condition::Corona, turns(20, power, rng))],
                    say(t, "is outlined in light.", "are outlined in light."),
                )
            }
        }
        Flavor::Petrify => {
            if t.has(Condition::Petrifying) {
                EnchantPlan::applied(
                    vec![
                        Remove(Condition::Petrifying),
                        Add(Condition::Petrified, Duration::Permanent),
                    ],
                    say(t, "turns to stone!", "turn to stone!"),
                )
            } else {
                EnchantPlan::applied(
                    vec![Add(Condition::Petrifying, turns(10, power, rng))],
                    say(t, "is moving more slowly.", "are slowing down."),
                )
            }
        }
        _ => other,
    }
}
