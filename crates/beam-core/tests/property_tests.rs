//! Property tests for path tracing and explosion shapes

use beam_core::actor::{Actor, ActorId};
use beam_core::beam::{BeamEngine, Bolt, ExplosionOptions, Shape, explosion_map, fire, fire_tracer};
use beam_core::combat::{DiceDef, Flavor, ToHit};
use beam_core::dungeon::{Coord, Feature, GridWorld, WorldEvent};
use beam_core::magic::{ZapId, all_zaps, zap};
use beam_core::world::{AutoConfirm, Terrain};
use beam_core::GameRng;
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

/// A room with scattered rock, plus an open source and a distinct target
#[derive(Debug, Clone)]
struct Room {
    world: GridWorld,
    source: Coord,
    target: Coord,
}

fn room() -> impl Strategy<Value = Room> {
    (5..16i32, 5..16i32).prop_flat_map(|(w, h)| {
        let cell = (0..w, 0..h).prop_map(|(x, y)| Coord::new(x, y));
        (
            Just((w, h)),
            prop::collection::vec(cell.clone(), 0..20),
            cell.clone(),
            cell,
        )
            .prop_filter("target differs from source", |(_, _, s, t)| s != t)
            .prop_map(|((w, h), walls, source, target)| {
                let mut world = GridWorld::new(w, h);
                for wall in walls {
                    world.set_feature(wall, Feature::RockWall);
                }
                world.set_feature(source, Feature::Floor);
                Room {
                    world,
                    source,
                    target,
                }
            })
    })
}

fn flavor() -> impl Strategy<Value = Flavor> {
    prop_oneof![
        Just(Flavor::Fire),
        Just(Flavor::Electricity),
        Just(Flavor::Chaos),
        Just(Flavor::Magic),
    ]
}

fn zap_id() -> impl Strategy<Value = ZapId> {
    let ids: Vec<ZapId> = all_zaps().collect();
    prop::sample::select(ids)
}

fn beam(source: Coord, target: Coord, flavor: Flavor, range: i32) -> Bolt {
    Bolt::new(source, target)
        .with_flavor(flavor)
        .with_shape(Shape::Beam)
        .with_damage(DiceDef::new(1, 3))
        .with_to_hit(ToHit::Automatic)
        .with_range(range)
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_path_never_exceeds_range(
        room in room(),
        flavor in flavor(),
        range in 1..30i32,
    ) {
        let mut bolt = beam(room.source, room.target, flavor, range);
        fire_tracer(&mut bolt, &room.world);
        prop_assert_eq!(bolt.path.len() as i32, bolt.range_used());
        prop_assert!(bolt.range_used() <= range);
    }

    #[test]
    fn prop_bounced_beams_only_visit_open_cells(
        room in room(),
        range in 1..40i32,
    ) {
        let mut bolt = beam(room.source, room.target, Flavor::Electricity, range);
        fire_tracer(&mut bolt, &room.world);
        for &pos in &bolt.path {
            prop_assert!(room.world.in_bounds(pos));
            prop_assert!(!room.world.is_solid(pos), "{} is solid", pos);
        }
    }

    #[test]
    fn prop_predictions_never_touch_the_world(
        room in room(),
        id in zap_id(),
        power in 0..200i32,
    ) {
        let mut world = room.world.clone();
        world.set_feature(room.target, Feature::Floor);
        world.spawn(Actor::monster(ActorId(0), "orc", room.target, 30));
        let before = world.clone();

        let mut bolt = Bolt::new(room.source, room.target);
        zap(id, power, &mut bolt, false, &mut GameRng::new(1)).unwrap();
        BeamEngine::default().predict(&mut bolt, &world, &mut AutoConfirm);
        prop_assert_eq!(world, before);
    }

    #[test]
    fn prop_hit_cap_holds_for_bouncing_beams(range in 1..80i32, x in 1..8i32) {
        let mut world = GridWorld::from_ascii("#........#").unwrap();
        let yak = world.spawn(Actor::monster(ActorId(0), "yak", Coord::new(x, 0), 10_000));
        let mut bolt = beam(Coord::new(1, 0), Coord::new(8, 0), Flavor::Electricity, range);

        fire(&mut bolt, &mut world, &mut GameRng::new(range as u64));
        let hits = world
            .events()
            .iter()
            .filter(|e| matches!(e, WorldEvent::Damaged { id, .. } if *id == yak))
            .count();
        prop_assert!(hits <= 2, "hit {} times", hits);
    }

    #[test]
    fn prop_open_explosions_fill_the_disc(radius in 0..=4i32) {
        let world = GridWorld::new(21, 21);
        let bolt = Bolt::default().with_flavor(Flavor::Fire);
        let map = explosion_map(
            &world,
            &bolt,
            Coord::new(10, 10),
            radius,
            &ExplosionOptions::default(),
        );

        let bound = radius * (radius + 1);
        let expected = (-radius..=radius)
            .flat_map(|dy| (-radius..=radius).map(move |dx| dx * dx + dy * dy))
            .filter(|&d| d <= bound)
            .count();
        prop_assert_eq!(map.len(), expected);
    }
}
