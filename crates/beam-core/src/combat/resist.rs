//! Flavor resistance for damaging bolts
//!
//! Turns post-armour damage into final damage for one target, and lists
//! the flavor's side effects. Side effects and messages are only produced
//! when the caller asks to apply the result; predictions get damage alone.

use crate::actor::{Actor, ActorTraits, Holiness};
use crate::rng::GameRng;

use super::Flavor;

/// Whether a resolution is a prediction or a real hit
pub enum ResolveMode<'r> {
    Predict,
    Apply(&'r mut GameRng),
}

impl ResolveMode<'_> {
    pub fn is_predict(&self) -> bool {
        matches!(self, ResolveMode::Predict)
    }
}

/// How the target's resistance changed the damage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResistVerdict {
    Normal,
    Partial,
    Immune,
    Vulnerable,
}

/// Third- and second-person forms of a resistance message tail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResistMessage {
    pub third: &'static str,
    pub second: &'static str,
}

impl ResistMessage {
    const fn new(third: &'static str, second: &'static str) -> Self {
        Self { third, second }
    }

    pub fn render(&self, target: &Actor) -> String {
        let tail = if target.is_player { self.second } else { self.third };
        format!("{} {}", target.subject(), tail)
    }
}

const COMPLETELY_RESISTS: ResistMessage =
    ResistMessage::new("completely resists.", "completely resist.");
const APPEARS_UNHARMED: ResistMessage =
    ResistMessage::new("appears unharmed.", "appear unharmed.");
const RESISTS: ResistMessage = ResistMessage::new("resists.", "resist.");
const PARTIALLY_RESISTS: ResistMessage =
    ResistMessage::new("partially resists.", "partially resist.");
const BURNED: ResistMessage = ResistMessage::new("is burned terribly!", "are burned terribly!");
const MELTS: ResistMessage = ResistMessage::new("melts!", "melt!");
const FROZEN: ResistMessage = ResistMessage::new("is frozen!", "are frozen!");
const SCALDED: ResistMessage = ResistMessage::new("is scalded terribly!", "are scalded terribly!");
const WRITHES: ResistMessage = ResistMessage::new("writhes in agony!", "writhe in agony!");
const DRAINED: ResistMessage = ResistMessage::new("is drained.", "feel drained.");
const SHOCKED: ResistMessage = ResistMessage::new("is electrocuted!", "are electrocuted!");

/// Consequence of a hit beyond hit point loss
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SideEffect {
    Poison { levels: i32 },
    Drain { hp: i32, level: bool },
    Corrode,
    Rot,
    Slow,
}

/// Outcome of resolving one hit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResistReport {
    pub damage: i32,
    pub verdict: ResistVerdict,
    pub message: Option<ResistMessage>,
    pub side_effects: Vec<SideEffect>,
}

impl ResistReport {
    fn normal(damage: i32) -> Self {
        Self {
            damage,
            verdict: ResistVerdict::Normal,
            message: None,
            side_effects: Vec::new(),
        }
    }

    fn with(damage: i32, verdict: ResistVerdict, message: ResistMessage) -> Self {
        Self {
            damage,
            verdict,
            message: Some(message),
            side_effects: Vec::new(),
        }
    }

    fn immune(message: ResistMessage) -> Self {
        Self::with(0, ResistVerdict::Immune, message)
    }

    fn effect(mut self, effect: SideEffect) -> Self {
        self.side_effects.push(effect);
        self
    }

    /// Message text for this report, if any
    pub fn describe(&self, target: &Actor) -> Option<String> {
        self.message.map(|m| m.render(target))
    }
}

/// Graded elemental resistance shared by fire, cold and acid
fn graded(damage: i32, level: i32, vulnerable: ResistMessage) -> ResistReport {
    match level {
        l if l >= 3 => ResistReport::immune(COMPLETELY_RESISTS),
        2 => ResistReport::with(damage / 4, ResistVerdict::Partial, RESISTS),
        1 => ResistReport::with(damage / 2, ResistVerdict::Partial, RESISTS),
        0 => ResistReport::normal(damage),
        _ => ResistReport::with(damage * 3 / 2, ResistVerdict::Vulnerable, vulnerable),
    }
}

/// Adjust `damage` (already reduced by armour) for `flavor` against `target`.
///
/// `level` is the target's resistance to the flavor as reported by the
/// actor model. In `Predict` mode no randomness is consumed and no side
/// effects are listed.
pub fn resolve_flavor(
    flavor: Flavor,
    damage: i32,
    target: &Actor,
    level: i32,
    mode: ResolveMode<'_>,
) -> ResistReport {
    let mut report = match flavor {
        Flavor::Fire if target.traits.contains(ActorTraits::ICY) && level <= 0 => {
            ResistReport::with(damage * 3 / 2, ResistVerdict::Vulnerable, MELTS)
        }
        Flavor::Fire => graded(damage, level, BURNED),
        Flavor::Steam => graded(damage, level, SCALDED),
        Flavor::Cold => graded(damage, level, FROZEN),
        Flavor::Acid => graded(damage, level, BURNED),

        Flavor::Electricity => match level {
            l if l > 0 => ResistReport::immune(APPEARS_UNHARMED),
            0 => ResistReport::normal(damage),
            _ => ResistReport::with(damage * 3 / 2, ResistVerdict::Vulnerable, SHOCKED),
        },

        Flavor::Poison => {
            if level > 0 {
                ResistReport::immune(COMPLETELY_RESISTS)
            } else {
                ResistReport::normal(damage)
            }
        }

        Flavor::PoisonArrow => {
            if level > 0 {
                ResistReport::with(damage / 2, ResistVerdict::Partial, PARTIALLY_RESISTS)
            } else {
                ResistReport::normal(damage)
            }
        }

        Flavor::Negative => {
            if level > 0 || !target.is_living() {
                ResistReport::immune(COMPLETELY_RESISTS)
            } else {
                ResistReport::with(damage, ResistVerdict::Normal, DRAINED)
            }
        }

        Flavor::Miasma => {
            if level >= 3 || !target.is_living() {
                ResistReport::immune(COMPLETELY_RESISTS)
            } else {
                ResistReport::normal(damage)
            }
        }

        Flavor::Holy => match target.holiness {
            h if h.is_unholy() => {
                ResistReport::with(damage * 3 / 2, ResistVerdict::Vulnerable, WRITHES)
            }
            Holiness::Holy => ResistReport::immune(APPEARS_UNHARMED),
            _ => ResistReport::normal(damage),
        },

        Flavor::Ice => {
            if level > 0 || target.traits.contains(ActorTraits::ICE_RESISTANT) {
                ResistReport::with(damage / 2, ResistVerdict::Partial, PARTIALLY_RESISTS)
            } else if level < 0 || target.traits.contains(ActorTraits::ICE_VULNERABLE) {
                ResistReport::with(damage * 13 / 10, ResistVerdict::Vulnerable, FROZEN)
            } else {
                ResistReport::normal(damage)
            }
        }

        Flavor::Lava => {
            if level < 0 || target.traits.contains(ActorTraits::LAVA_VULNERABLE) {
                ResistReport::with(damage * 12 / 10, ResistVerdict::Vulnerable, BURNED)
            } else if level > 0 || target.traits.contains(ActorTraits::LAVA_RESISTANT) {
                ResistReport::with(damage / 2, ResistVerdict::Partial, PARTIALLY_RESISTS)
            } else {
                ResistReport::normal(damage)
            }
        }

        Flavor::Hellfire => match level {
            l if l > 2 => ResistReport::immune(APPEARS_UNHARMED),
            l if l > 0 => ResistReport::with(damage / 2, ResistVerdict::Partial, PARTIALLY_RESISTS),
            l if l < 0 => ResistReport::with(damage * 12 / 10, ResistVerdict::Vulnerable, BURNED),
            _ => ResistReport::normal(damage),
        },

        _ => ResistReport::normal(damage),
    };

    let ResolveMode::Apply(rng) = mode else {
        report.message = None;
        return report;
    };

    if report.verdict == ResistVerdict::Immune {
        return report;
    }

    match flavor {
        Flavor::Poison if target.is_living() && !rng.one_in(3) => {
            report = report.effect(SideEffect::Poison { levels: 1 });
        }
        Flavor::PoisonArrow if target.is_living() => {
            let levels = if level > 0 { 2 } else { 4 };
            report = report.effect(SideEffect::Poison { levels });
        }
        Flavor::Negative => {
            let hp = 2 + rng.random2(3);
            let level_loss = rng.one_in(5);
            report = report.effect(SideEffect::Drain { hp, level: level_loss });
        }
        Flavor::Acid if level <= 0 && rng.one_in(3) => {
            report = report.effect(SideEffect::Corrode);
        }
        Flavor::Miasma => {
            if target.resists.poison <= 0 {
                report = report.effect(SideEffect::Poison { levels: 1 });
            }
            if rng.one_in((3 + 2 * level.max(0)) as u32) {
                report = report.effect(SideEffect::Rot);
            }
            if rng.one_in((3 + 2 * level.max(0)) as u32) {
                report = report.effect(SideEffect::Slow);
            }
        }
        _ => {}
    }

    report
}
