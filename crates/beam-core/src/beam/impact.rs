//! What happens when a bolt reaches an actor

use super::bolt::{BoltFlags, Rider, Thrower};
use super::los::ray_or_straight;
use super::outcome::{Conduct, Credit, Noise};
use super::pass::Pass;
use crate::actor::{Actor, ActorId, Condition, Duration, Holiness};
use crate::combat::{
    EnchantAction, EnchantRequest, EnchantVerdict, Flavor, ResolveMode, SideEffect, apply_armour,
    is_nasty_to, is_nice_to, plan_enchantment, predict_armour, resolve_flavor, test_beam_hit,
};
use crate::consts::HIT_CAP;
use crate::world::{Prompter, World};

const PROMPT_SELF: &str = "That beam is likely to hit you. Continue anyway?";

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl<W: World + ?Sized, P: Prompter + ?Sized> Pass<'_, W, P> {
    /// The bolt reaches actor `id`. Returns true if the bolt stops.
    pub(super) fn affect_actor(&mut self, id: ActorId) -> bool {
        let Some(actor) = self.world().actor(id).cloned() else {
            return false;
        };
        if !actor.is_alive() || self.bolt.real_flavor == Flavor::Digging {
            return false;
        }

        let hits = self.bolt.hits.entry(id).or_insert(0);
        if *hits >= self.options.hit_cap.min(HIT_CAP) {
            return false;
        }
        *hits += 1;

        if self.is_tracer() {
            self.predict_actor(&actor)
        } else {
            self.strike_actor(&actor)
        }
    }

    /// Bolts stop at the first actor they hit; beams and explosions don't
    fn stops_on_hit(&self) -> bool {
        !self.in_explosion && !self.bolt.is_beam()
    }

    fn sees(&self, actor: &Actor) -> bool {
        actor.is_player || self.world().is_visible_to_player(actor.pos)
    }

    /// Ask before a player's shot hits a friend. Returns false if the
    /// player backed out.
    fn confirm_friendly_fire(&mut self, actor: &Actor) -> bool {
        if self.prompted || self.bolt.thrower != Thrower::Player {
            return true;
        }
        self.prompted = true;
        let question = if actor.is_player {
            PROMPT_SELF.to_string()
        } else {
            format!("Really fire through {}?", actor.object())
        };
        if self.prompter.confirm(&question) {
            return true;
        }
        self.bolt.cancelled = true;
        tracing::warn!(target: "beam", actor = %actor.id, "friendly fire declined");
        false
    }

    fn predict_actor(&mut self, actor: &Actor) -> bool {
        if actor.is_invisible()
            && !actor.is_player
            && !self.bolt.flags.contains(BoltFlags::SEE_INVISIBLE)
        {
            return false;
        }

        let flavor = self.bolt.real_flavor;
        let friend = self.bolt.is_friend(actor);
        let nasty = is_nasty_to(flavor, actor);

        if nasty && friend && !self.confirm_friendly_fire(actor) {
            return true;
        }

        if flavor.is_enchantment() {
            let req = EnchantRequest {
                flavor,
                target: actor,
                power: self.bolt.ench_power,
                damage: self.bolt.damage,
                aimed_at_feet: self.bolt.aimed_at_feet,
            };
            let plan = plan_enchantment(&req, ResolveMode::Predict);
            if plan.verdict != EnchantVerdict::Inapplicable {
                let nice = is_nice_to(flavor, actor);
                self.bolt.stats.record(friend, actor.hit_dice, nasty, nice);
            }
        } else {
            // Predictions assume the best roll the dice can make
            let max_raw = self.bolt.damage.max();
            let armoured = predict_armour(max_raw, actor.ac, flavor);
            let level = self.world().resistance_level(actor.id, flavor);
            let report = resolve_flavor(flavor, armoured, actor, level, ResolveMode::Predict);
            let power = if max_raw > 0 {
                2 * report.damage * actor.hit_dice / max_raw
            } else {
                0
            };
            self.bolt
                .stats
                .record(friend, power, report.damage > 0, false);
        }
        self.stops_on_hit()
    }

    fn strike_actor(&mut self, actor: &Actor) -> bool {
        let real = self.bolt.real_flavor;
        let flavor = real.randomize(self.rng);
        self.bolt.flavor = flavor;
        let stop = if flavor.is_enchantment() {
            self.enchant_actor(actor, flavor)
        } else {
            self.damage_actor(actor, flavor)
        };
        self.bolt.flavor = real;
        stop
    }

    fn note_conducts(&mut self, actor: &Actor, flavor: Flavor) {
        if self.bolt.thrower != Thrower::Player || actor.is_player {
            return;
        }
        let amount = actor.hit_dice;
        let mut conducts = Vec::new();
        if self.bolt.is_friend(actor) {
            conducts.push(Conduct::AttackFriend);
        }
        if actor.holiness == Holiness::Holy {
            conducts.push(Conduct::AttackHoly);
        }
        if matches!(
            flavor,
            Flavor::Negative | Flavor::Miasma | Flavor::Pain | Flavor::Agony
        ) {
            conducts.push(Conduct::Necromancy);
        }
        if matches!(flavor, Flavor::Poison | Flavor::PoisonArrow)
            || matches!(self.bolt.rider, Some(Rider::Poisoned | Rider::Curare))
        {
            conducts.push(Conduct::Poison);
        }
        self.out.credits.extend(
            conducts
                .into_iter()
                .map(|conduct| Credit::Conduct { conduct, amount }),
        );
    }

    fn damage_actor(&mut self, actor: &Actor, flavor: Flavor) -> bool {
        let visible = self.sees(actor);
        let name = self.bolt.display_name().to_string();
        let friend = self.bolt.is_friend(actor);

        if !self.in_explosion && !self.bolt.to_hit.is_automatic() {
            let unseen =
                actor.is_invisible() && !self.bolt.flags.contains(BoltFlags::SEE_INVISIBLE);
            let to_hit = self.bolt.to_hit.penalized(self.to_hit_penalty);
            if !test_beam_hit(to_hit, actor.ev, unseen, self.rng) {
                if visible {
                    self.out
                        .message(format!("The {name} misses {}.", actor.object()));
                }
                return false;
            }
        }

        if !self.in_explosion && self.bolt.is_blockable() {
            if let Some(shield) = actor.shield {
                if self.rng.percent(shield.block) {
                    if shield.reflects
                        && self.bolt.is_reflectable()
                        && self.bolt.reflections < self.options.max_reflections
                    {
                        self.reflect(actor, visible);
                        return false;
                    }
                    if visible {
                        self.out
                            .message(format!("{} blocks the {name}.", actor.subject()));
                        self.bolt.obvious_effect = true;
                    }
                    return true;
                }
            }
        }

        if is_nasty_to(flavor, actor) {
            self.note_conducts(actor, flavor);
        }

        let raw = self.bolt.damage.roll(self.rng);
        let armoured = apply_armour(raw, actor.ac, flavor, self.rng);
        let level = self.world().resistance_level(actor.id, flavor);
        let mode = ResolveMode::Apply(&mut *self.rng);
        let report = resolve_flavor(flavor, armoured, actor, level, mode);
        tracing::debug!(
            target: "beam",
            actor = %actor.id,
            %flavor,
            raw,
            armoured,
            damage = report.damage,
            "hit"
        );

        if visible {
            self.out
                .message(format!("The {name} hits {}.", actor.object()));
            if let Some(text) = report.describe(actor) {
                self.out.message(text);
            }
            self.bolt.obvious_effect = true;
        } else if self.bolt.item.is_some() && self.world().can_player_hear(actor.pos) {
            self.out.message(format!("The {name} hits something."));
        }

        let agent = self.bolt.agent;
        let id = actor.id;
        let damage = report.damage;
        let killed = damage > 0
            && self
                .commit(|w| w.apply_damage(id, damage, flavor, agent))
                .unwrap_or(false);
        self.bolt
            .stats
            .record(friend, actor.hit_dice, damage > 0, false);

        if self.bolt.loudness > 0 {
            self.out.noises.push(Noise {
                pos: actor.pos,
                loudness: self.bolt.loudness,
            });
        }

        if killed {
            self.report_kill(actor, visible);
        } else if self.world().is_alive(id) {
            self.apply_side_effects(actor, &report.side_effects);
            if self.world().is_alive(id) {
                self.apply_rider(actor, damage, visible);
            }
        }

        if self.bolt.is_beam() && flavor == Flavor::Lava && !self.in_explosion {
            self.bolt.extra_range_used += 1;
        }
        self.stops_on_hit()
    }

    fn report_kill(&mut self, actor: &Actor, visible: bool) {
        self.out.killed.push(actor.id);
        if visible {
            let verb = if actor.is_player { "die..." } else { "is killed!" };
            self.out.message(format!("{} {verb}", actor.subject()));
        }
    }

    fn apply_side_effects(&mut self, actor: &Actor, effects: &[SideEffect]) {
        let id = actor.id;
        let agent = self.bolt.agent;
        for &effect in effects {
            if !self.world().is_alive(id) {
                break;
            }
            match effect {
                SideEffect::Poison { levels } => {
                    self.commit(|w| {
                        w.apply_condition(id, Condition::Poisoned, Duration::Turns(levels), agent)
                    });
                }
                SideEffect::Drain { hp, level } => {
                    self.commit(|w| w.drain(id, hp, level));
                }
                SideEffect::Corrode => {
                    self.commit(|w| {
                        w.apply_condition(id, Condition::Corroded, Duration::Turns(20), agent)
                    });
                }
                SideEffect::Rot => {
                    self.commit(|w| {
                        w.apply_condition(id, Condition::Rotting, Duration::Turns(10), agent)
                    });
                }
                SideEffect::Slow => {
                    self.commit(|w| {
                        w.apply_condition(id, Condition::Slow, Duration::Turns(10), agent)
                    });
                }
            }
        }
    }

    fn apply_rider(&mut self, actor: &Actor, damage: i32, visible: bool) {
        let Some(rider) = self.bolt.rider else {
            return;
        };
        let id = actor.id;
        let agent = self.bolt.agent;
        let poison_res = self.world().resistance_level(id, Flavor::Poison);

        match rider {
            Rider::StickyFlame => {
                if damage <= 0 || self.world().resistance_level(id, Flavor::Fire) > 0 {
                    return;
                }
                let levels = (1 + self.rng.random2(damage) / 2).min(4);
                self.commit(|w| {
                    w.apply_condition(id, Condition::StickyFlame, Duration::Turns(levels), agent)
                });
            }
            Rider::Poisoned => {
                if damage <= 0 || poison_res > 0 {
                    return;
                }
                let mut levels = 1;
                if damage > actor.ac {
                    levels += 1;
                }
                if self.rng.coinflip() {
                    levels += 1;
                }
                self.commit(|w| {
                    w.apply_condition(id, Condition::Poisoned, Duration::Turns(levels), agent)
                });
            }
            Rider::Curare => {
                if poison_res <= 0 {
                    self.commit(|w| {
                        w.apply_condition(id, Condition::Poisoned, Duration::Turns(2), agent)
                    });
                }
                let mut choke = self.rng.dice(2, 6) as i32;
                if poison_res > 0 {
                    choke /= 2;
                }
                if visible {
                    let verb = if actor.is_player { "struggle" } else { "struggles" };
                    self.out
                        .message(format!("{} {verb} to breathe.", actor.subject()));
                }
                let killed = self
                    .commit(|w| w.apply_damage(id, choke, Flavor::Poison, agent))
                    .unwrap_or(false);
                if killed {
                    self.report_kill(actor, visible);
                } else if self.world().is_alive(id) {
                    self.commit(|w| {
                        w.apply_condition(id, Condition::Slow, Duration::Turns(10), agent)
                    });
                }
            }
            Rider::Net => {
                self.commit(|w| w.apply_condition(id, Condition::Caught, Duration::Permanent, agent));
                if visible {
                    let verb = if actor.is_player { "are" } else { "is" };
                    self.out
                        .message(format!("{} {verb} caught in the net!", actor.subject()));
                }
            }
        }
    }

    fn enchant_actor(&mut self, actor: &Actor, flavor: Flavor) -> bool {
        let visible = self.sees(actor);
        let friend = self.bolt.is_friend(actor);
        let nasty = is_nasty_to(flavor, actor);
        let nice = is_nice_to(flavor, actor);

        let req = EnchantRequest {
            flavor,
            target: actor,
            power: self.bolt.ench_power,
            damage: self.bolt.damage,
            aimed_at_feet: self.bolt.aimed_at_feet,
        };
        let plan = plan_enchantment(&req, ResolveMode::Apply(&mut *self.rng));
        tracing::debug!(
            target: "beam",
            actor = %actor.id,
            %flavor,
            power = self.bolt.ench_power,
            verdict = ?plan.verdict,
            "enchantment"
        );

        if plan.verdict == EnchantVerdict::Applied && nasty {
            self.note_conducts(actor, flavor);
        }

        for &action in &plan.actions {
            if !self.world().is_alive(actor.id) {
                break;
            }
            self.commit_action(actor, flavor, action, visible);
        }

        if visible {
            if let Some(msg) = plan.message {
                self.out.message(msg);
            }
        }

        match plan.verdict {
            EnchantVerdict::Applied => {
                if visible {
                    self.bolt.obvious_effect = true;
                    self.out.credits.push(Credit::Effect {
                        target: actor.id,
                        flavor: self.bolt.real_flavor,
                    });
                }
                self.bolt.stats.record(friend, actor.hit_dice, nasty, nice);
            }
            EnchantVerdict::Resisted { .. } | EnchantVerdict::Other => {
                if visible {
                    self.bolt.obvious_effect = true;
                }
                self.bolt.stats.record(friend, actor.hit_dice, false, false);
            }
            EnchantVerdict::Inapplicable => {}
        }
        self.stops_on_hit()
    }

    fn commit_action(&mut self, actor: &Actor, flavor: Flavor, action: EnchantAction, visible: bool) {
        let id = actor.id;
        let agent = self.bolt.agent;
        match action {
            EnchantAction::Add(condition, duration) => {
                self.commit(|w| w.apply_condition(id, condition, duration, agent));
            }
            EnchantAction::Remove(condition) => {
                self.commit(|w| w.remove_condition(id, condition));
            }
            EnchantAction::Heal(amount) => {
                self.commit(|w| w.heal(id, amount));
            }
            EnchantAction::Damage(amount) => {
                let killed = self
                    .commit(|w| w.apply_damage(id, amount, flavor, agent))
                    .unwrap_or(false);
                if killed {
                    self.report_kill(actor, visible);
                }
            }
            EnchantAction::Relocate(how) => {
                self.commit(|w| w.relocate(id, how));
            }
            EnchantAction::Polymorph(into) => {
                self.commit(|w| w.polymorph(id, into));
            }
            EnchantAction::SetAttitude(attitude) => {
                self.commit(|w| w.set_attitude(id, attitude));
            }
        }
    }

    /// A shield of reflection sends the bolt back where it came from
    fn reflect(&mut self, reflector: &Actor, visible: bool) {
        self.bolt.reflections += 1;
        self.bolt.reflector = Some(reflector.id);

        let origin = self.bolt.source;
        self.bolt.source = reflector.pos;
        self.bolt.target = origin;
        self.bolt.pos = reflector.pos;
        self.ray = ray_or_straight(self.world(), reflector.pos, origin);

        tracing::trace!(
            target: "beam",
            reflector = %reflector.id,
            at = %reflector.pos,
            toward = %origin,
            reflections = self.bolt.reflections,
            "reflect"
        );
        if visible {
            let msg = format!(
                "{} shield reflects the {}!",
                capitalize(&reflector.possessive()),
                self.bolt.display_name()
            );
            self.out.message(msg);
            self.bolt.obvious_effect = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::capitalize;

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("the orc's"), "The orc's");
        assert_eq!(capitalize("your"), "Your");
        assert_eq!(capitalize(""), "");
    }
}
