//! Firing passes against the reference grid world
//!
//! Covers bouncing, reflection, friendly-fire prompts, resistance
//! messages, terrain destruction and crediting.

use beam_core::actor::{Actor, ActorId, Resistances};
use beam_core::beam::{
    BeamEngine, Bolt, Conduct, Credit, ItemHandle, Shape, fire, fire_tracer,
};
use beam_core::combat::{DiceDef, Element, Flavor, ResolveMode, ToHit, resolve_flavor};
use beam_core::dungeon::{CloudKind, Coord, Feature, GridWorld, WorldEvent};
use beam_core::magic::{ZapId, zap};
use beam_core::world::{Actors, AutoConfirm, BeamOptions, Clouds, Terrain};
use beam_core::GameRng;

// ============================================================================
// Helpers
// ============================================================================

fn world(map: &str) -> GridWorld {
    GridWorld::from_ascii(map).unwrap()
}

fn zapped(id: ZapId, power: i32, from: Coord, to: Coord) -> Bolt {
    let mut bolt = Bolt::new(from, to);
    zap(id, power, &mut bolt, false, &mut GameRng::new(1)).unwrap();
    bolt
}

fn player_bolt(world: &GridWorld, id: ZapId, power: i32, to: Coord) -> Bolt {
    let player = world.player().unwrap();
    let you = world.actor(player).unwrap();
    zapped(id, power, you.pos, to).fired_by(you)
}

fn damage_events(world: &GridWorld, id: ActorId) -> usize {
    world
        .events()
        .iter()
        .filter(|e| matches!(e, WorldEvent::Damaged { id: hit, .. } if *hit == id))
        .count()
}

fn has_message(messages: &[String], text: &str) -> bool {
    messages.iter().any(|m| m == text)
}

// ============================================================================
// Resistance
// ============================================================================

#[test]
fn test_fire_resistance_three_blocks_all_damage() {
    let mut world = world("@...o");
    let orc = world.actor_at(Coord::new(4, 0)).unwrap();
    world.actor_mut(orc).unwrap().resists = Resistances::default().with(Element::Fire, 3);

    let player = world.player().unwrap();
    let you = world.actor(player).unwrap().clone();
    let mut bolt = Bolt::new(you.pos, Coord::new(4, 0))
        .fired_by(&you)
        .with_flavor(Flavor::Fire)
        .with_damage(DiceDef::new(1, 20))
        .with_to_hit(ToHit::Automatic);

    let out = fire(&mut bolt, &mut world, &mut GameRng::new(3));
    assert!(has_message(&out.messages, "The flame hits the orc."));
    assert!(has_message(&out.messages, "The orc completely resists."));
    assert_eq!(damage_events(&world, orc), 0);
    assert_eq!(world.actor(orc).unwrap().hp, 15);
}

#[test]
fn test_resolver_table_is_deterministic() {
    let world = world("o");
    let orc = world.actor(ActorId(0)).unwrap().clone();
    let immune = resolve_flavor(Flavor::Fire, 20, &orc, 3, ResolveMode::Predict);
    assert_eq!(immune.damage, 0);
    let plain = resolve_flavor(Flavor::Fire, 20, &orc, 0, ResolveMode::Predict);
    assert_eq!(plain.damage, 20);

    let mut rng = GameRng::new(5);
    let report = resolve_flavor(Flavor::Fire, 20, &orc, 3, ResolveMode::Apply(&mut rng));
    assert_eq!(report.describe(&orc).as_deref(), Some("The orc completely resists."));
}

// ============================================================================
// Bounces
// ============================================================================

#[test]
fn test_lightning_bounces_off_rock() {
    let mut world = world(
        "
        #######
        #.....#
        #######
        ",
    );
    let mut bolt = zapped(ZapId::Lightning, 50, Coord::new(1, 1), Coord::new(5, 1));
    assert_eq!(bolt.shape, Shape::Beam);

    let out = fire(&mut bolt, &mut world, &mut GameRng::new(7));
    assert_eq!(bolt.bounces, 1);
    assert_eq!(bolt.bounce_pos, Some(Coord::new(6, 1)));
    assert_eq!(out.path.len(), 8);
    assert_eq!(out.path[3], Coord::new(5, 1));
    assert_eq!(out.path[4], Coord::new(4, 1));
    assert!(out.path.iter().all(|&p| !world.is_solid(p)));
    assert!(has_message(&out.messages, "The bolt of lightning bounces!"));
}

#[test]
fn test_lightning_stops_at_metal() {
    let world = world(
        "
        #######
        #.....M
        #######
        ",
    );
    let mut bolt = zapped(ZapId::Lightning, 50, Coord::new(1, 1), Coord::new(5, 1));
    fire_tracer(&mut bolt, &world);
    assert_eq!(bolt.bounces, 0);
    assert_eq!(bolt.path.last(), Some(&Coord::new(5, 1)));
    assert_eq!(bolt.pos, Coord::new(5, 1));
}

#[test]
fn test_fire_does_not_bounce_off_rock() {
    let world = world("@...#");
    let mut bolt = player_bolt(&world, ZapId::Fire, 50, Coord::new(4, 0));
    fire_tracer(&mut bolt, &world);
    assert_eq!(bolt.bounces, 0);
    assert_eq!(bolt.path, vec![Coord::new(1, 0), Coord::new(2, 0), Coord::new(3, 0)]);
}

// ============================================================================
// Friendly fire
// ============================================================================

#[test]
fn test_declined_prompt_aborts_without_a_turn() {
    let mut world = world("@.1.o...");
    let before = world.clone();
    let mut bolt = player_bolt(&world, ZapId::Lightning, 50, Coord::new(4, 0));

    let mut asked = Vec::new();
    let mut decline = |q: &str| {
        asked.push(q.to_string());
        false
    };
    let out = BeamEngine::default().aim_and_fire(
        &mut bolt,
        &mut world,
        &mut GameRng::new(1),
        &mut decline,
    );

    assert!(out.is_aborted());
    assert!(!out.turn_spent);
    assert_eq!(out.messages, vec!["Never mind.".to_string()]);
    assert_eq!(asked, vec!["Really fire through the orc?".to_string()]);
    assert_eq!(world, before);
}

#[test]
fn test_accepted_prompt_is_asked_once() {
    let world = world("@.1.o...");
    let mut bolt = player_bolt(&world, ZapId::Lightning, 50, Coord::new(4, 0));

    let mut asked = 0;
    let mut accept = |_: &str| {
        asked += 1;
        true
    };
    let out = BeamEngine::default().predict(&mut bolt, &world, &mut accept);

    assert_eq!(asked, 1);
    assert!(!out.is_aborted());
    assert_eq!(out.stats.fr_count, 1);
    assert_eq!(out.stats.foe_count, 1);
}

#[test]
fn test_monsters_are_never_prompted() {
    let world = world("o.k.@");
    let orc = world.actor(ActorId(0)).unwrap().clone();
    let mut bolt = zapped(ZapId::Lightning, 50, orc.pos, Coord::new(4, 0)).fired_by(&orc);

    let mut asked = 0;
    let mut count = |_: &str| {
        asked += 1;
        false
    };
    let out = BeamEngine::default().predict(&mut bolt, &world, &mut count);
    assert_eq!(asked, 0);
    assert!(!out.is_aborted());
    assert_eq!(out.stats.fr_count, 1);
    assert_eq!(out.stats.foe_count, 1);
}

#[test]
fn test_ai_fires_only_at_foes() {
    let world = world("o...@...");
    let orc = world.actor(ActorId(0)).unwrap().clone();
    let engine = BeamEngine::default();

    let mut at_player = zapped(ZapId::MagicDarts, 20, orc.pos, Coord::new(4, 0)).fired_by(&orc);
    assert!(engine.worth_firing(&mut at_player, &world));

    let mut at_nothing = zapped(ZapId::MagicDarts, 20, orc.pos, Coord::new(0, 0)).fired_by(&orc);
    assert!(!engine.worth_firing(&mut at_nothing, &world));
}

// ============================================================================
// Shields
// ============================================================================

fn shielded_world(reflects: bool) -> (GridWorld, ActorId) {
    let mut world = world("........");
    let orc = world.spawn(
        Actor::monster(ActorId(0), "orc", Coord::new(4, 0), 20)
            .with_shield(100, reflects),
    );
    (world, orc)
}

fn fire_bolt() -> Bolt {
    Bolt::new(Coord::new(0, 0), Coord::new(4, 0))
        .with_name("bolt of fire")
        .with_flavor(Flavor::Fire)
        .with_damage(DiceDef::new(3, 6))
        .with_to_hit(ToHit::Roll(30))
}

#[test]
fn test_reflection_swaps_source_and_target() {
    let (mut world, orc) = shielded_world(true);
    let mut bolt = fire_bolt();
    let out = fire(&mut bolt, &mut world, &mut GameRng::new(2));

    assert_eq!(bolt.reflections, 1);
    assert_eq!(bolt.reflector, Some(orc));
    assert_eq!(bolt.source, Coord::new(4, 0));
    assert_eq!(bolt.target, Coord::new(0, 0));
    assert!(has_message(&out.messages, "The orc's shield reflects the bolt of fire!"));
    assert_eq!(out.path[3], Coord::new(4, 0));
    assert_eq!(out.path.last(), Some(&Coord::new(0, 0)));
    assert_eq!(damage_events(&world, orc), 0);
}

#[test]
fn test_plain_shield_blocks() {
    let (mut world, orc) = shielded_world(false);
    let mut bolt = fire_bolt();
    let out = fire(&mut bolt, &mut world, &mut GameRng::new(2));

    assert_eq!(bolt.reflections, 0);
    assert!(has_message(&out.messages, "The orc blocks the bolt of fire."));
    assert_eq!(out.path.last(), Some(&Coord::new(4, 0)));
    assert_eq!(damage_events(&world, orc), 0);
}

#[test]
fn test_reflection_limit_turns_into_block() {
    let (mut world, _) = shielded_world(true);
    let engine = BeamEngine::new(BeamOptions {
        max_reflections: 0,
        ..BeamOptions::default()
    });
    let mut bolt = fire_bolt();
    let out = engine.fire(&mut bolt, &mut world, &mut GameRng::new(2));
    assert_eq!(bolt.reflections, 0);
    assert!(has_message(&out.messages, "The orc blocks the bolt of fire."));
}

#[test]
fn test_beams_ignore_shields() {
    let (mut world, orc) = shielded_world(true);
    let mut bolt = fire_bolt()
        .with_shape(Shape::Beam)
        .with_damage(DiceDef::new(1, 1))
        .with_to_hit(ToHit::Automatic);
    fire(&mut bolt, &mut world, &mut GameRng::new(2));
    assert_eq!(bolt.reflections, 0);
    assert_eq!(damage_events(&world, orc), 1);
}

// ============================================================================
// Terrain
// ============================================================================

#[test]
fn test_digging_opens_rock() {
    let mut world = world("@..#..");
    let mut bolt = player_bolt(&world, ZapId::Digging, 50, Coord::new(5, 0));
    let out = fire(&mut bolt, &mut world, &mut GameRng::new(1));

    assert_eq!(world.feature_at(Coord::new(3, 0)), Feature::Floor);
    assert_eq!(out.path.last(), Some(&Coord::new(3, 0)));
    assert!(out.obvious);
    assert!(!has_message(&out.messages, "Nothing happens."));
}

#[test]
fn test_superhot_fire_burns_trees() {
    let mut world = world("@..T..");
    let mut bolt = player_bolt(&world, ZapId::Fire, 200, Coord::new(5, 0));
    let out = fire(&mut bolt, &mut world, &mut GameRng::new(1));

    assert_eq!(world.feature_at(Coord::new(3, 0)), Feature::Floor);
    assert_eq!(world.cloud_at(Coord::new(3, 0)), Some(CloudKind::Fire));
    assert!(has_message(&out.messages, "The tree burns like a torch!"));
    assert!(out.credits.contains(&Credit::Conduct {
        conduct: Conduct::BurnTrees,
        amount: 1
    }));
}

#[test]
fn test_tracer_never_changes_terrain() {
    let world = world("@..T..");
    let before = world.clone();
    let mut bolt = player_bolt(&world, ZapId::Fire, 200, Coord::new(5, 0));
    fire_tracer(&mut bolt, &world);
    assert_eq!(bolt.path.last(), Some(&Coord::new(3, 0)));
    assert_eq!(world, before);
}

#[test]
fn test_thrown_item_lands_before_wall() {
    let mut world = world("@...#");
    let player = world.player().unwrap();
    let you = world.actor(player).unwrap().clone();
    let mut bolt = Bolt::new(you.pos, Coord::new(4, 0))
        .fired_by(&you)
        .with_name("dart")
        .with_flavor(Flavor::Missile)
        .with_damage(DiceDef::new(1, 4))
        .with_item(ItemHandle(9));
    let out = fire(&mut bolt, &mut world, &mut GameRng::new(1));
    assert_eq!(out.item_landing, Some(Coord::new(3, 0)));
}

// ============================================================================
// Enchantments and credit
// ============================================================================

#[test]
fn test_enchantment_into_nothing() {
    let mut world = world("@.........");
    let mut bolt = player_bolt(&world, ZapId::Slowing, 50, Coord::new(9, 0));
    let out = fire(&mut bolt, &mut world, &mut GameRng::new(1));
    assert_eq!(out.messages, vec!["Nothing happens.".to_string()]);
    assert!(!out.obvious);
}

#[test]
fn test_hasting_a_foe_is_credited_once() {
    let mut world = world("@...o");
    let orc = world.actor_at(Coord::new(4, 0)).unwrap();
    let mut bolt = player_bolt(&world, ZapId::Hasting, 50, Coord::new(4, 0));
    let out = fire(&mut bolt, &mut world, &mut GameRng::new(1));

    assert!(has_message(&out.messages, "The orc seems to speed up."));
    let effects: Vec<_> = out
        .credits
        .iter()
        .filter(|c| matches!(c, Credit::Effect { .. }))
        .collect();
    assert_eq!(
        effects,
        vec![&Credit::Effect {
            target: orc,
            flavor: Flavor::Haste
        }]
    );
    assert!(out.credits.contains(&Credit::Amusement));
}

#[test]
fn test_attacking_holy_is_a_conduct() {
    let mut world = world("@...a");
    let mut bolt = player_bolt(&world, ZapId::MagicDarts, 20, Coord::new(4, 0));
    let out = fire(&mut bolt, &mut world, &mut GameRng::new(1));
    assert!(has_message(&out.messages, "The magic dart hits the angel."));
    assert!(out.credits.contains(&Credit::Conduct {
        conduct: Conduct::AttackHoly,
        amount: 12
    }));
}

#[test]
fn test_kill_is_reported() {
    let mut world = world("@.r");
    let rat = world.actor_at(Coord::new(2, 0)).unwrap();
    let player = world.player().unwrap();
    let you = world.actor(player).unwrap().clone();
    let mut bolt = Bolt::new(you.pos, Coord::new(2, 0))
        .fired_by(&you)
        .with_name("force bolt")
        .with_flavor(Flavor::MagicMissile)
        .with_damage(DiceDef::new(10, 1))
        .with_to_hit(ToHit::Automatic);
    let out = fire(&mut bolt, &mut world, &mut GameRng::new(1));
    assert_eq!(out.killed, vec![rat]);
    assert!(has_message(&out.messages, "The rat is killed!"));
    assert!(!world.is_alive(rat));
}

#[test]
fn test_hit_cap_limits_repeat_hits() {
    let mut world = world(
        "
        #########
        #.......#
        #########
        ",
    );
    let yak = world.spawn(Actor::monster(
        ActorId(0),
        "yak",
        Coord::new(4, 1),
        500,
    ));
    let mut bolt = Bolt::new(Coord::new(1, 1), Coord::new(7, 1))
        .with_flavor(Flavor::Electricity)
        .with_shape(Shape::Beam)
        .with_damage(DiceDef::new(1, 1))
        .with_to_hit(ToHit::Automatic)
        .with_range(40);
    fire(&mut bolt, &mut world, &mut GameRng::new(1));
    assert!(bolt.bounces >= 2);
    assert_eq!(bolt.hits.get(&yak), Some(&2));
    assert_eq!(damage_events(&world, yak), 2);
}

#[test]
fn test_hit_cap_cannot_be_raised() {
    assert!(BeamOptions::from_json(r#"{ "hit_cap": 5 }"#).is_err());

    let mut world = world(
        "
        #########
        #.......#
        #########
        ",
    );
    let yak = world.spawn(Actor::monster(
        ActorId(0),
        "yak",
        Coord::new(4, 1),
        500,
    ));
    let engine = BeamEngine::new(BeamOptions {
        hit_cap: 5,
        ..BeamOptions::default()
    });
    let mut bolt = Bolt::new(Coord::new(1, 1), Coord::new(7, 1))
        .with_flavor(Flavor::Electricity)
        .with_shape(Shape::Beam)
        .with_damage(DiceDef::new(1, 1))
        .with_to_hit(ToHit::Automatic)
        .with_range(40);
    engine.fire(&mut bolt, &mut world, &mut GameRng::new(1));
    assert_eq!(bolt.hits.get(&yak), Some(&2));
    assert_eq!(damage_events(&world, yak), 2);
}

#[test]
fn test_predictions_use_their_own_generator() {
    let world = world("@...o...");
    let mut a = player_bolt(&world, ZapId::Fire, 100, Coord::new(4, 0));
    let mut b = a.clone();
    let first = BeamEngine::default().predict(&mut a, &world, &mut AutoConfirm);
    let second = BeamEngine::default().predict(&mut b, &world, &mut AutoConfirm);
    assert_eq!(first, second);
}
