//! Beam simulator
//!
//! Fires a named zap across an ASCII map and prints what happened.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use beam_core::GameRng;
use beam_core::beam::{BeamEngine, BeamOutcome, Bolt, BoltFlags, ExplosionOptions, Shape};
use beam_core::dungeon::{Coord, GridWorld};
use beam_core::magic::{ZapRegistry, configure};
use beam_core::world::{Actors, AutoConfirm, BeamError, BeamOptions};

const DEMO_MAP: &str = "
    ###############
    #.............#
    #..@....1..o..#
    #.......T.....#
    #....k....r...#
    ###############
";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Dry run: nothing in the world changes
    Tracer,
    /// Fire for real without asking
    Real,
    /// Trace first and ask before hitting friends
    Aim,
    /// Set the zap off as an explosion at the target
    Explode,
}

/// Fire a zap across an ASCII map
#[derive(Parser, Debug)]
#[command(name = "beam-sim")]
#[command(about = "Fire bolts, beams and explosions across an ASCII map", long_about = None)]
#[command(version)]
struct Args {
    /// Map file; a small demo room is used when omitted
    #[arg(long)]
    map: Option<PathBuf>,

    /// Zap name or id, e.g. "bolt of fire" or "fireball"
    #[arg(long, default_value = "bolt of fire")]
    zap: String,

    #[arg(long, default_value_t = 50)]
    power: i32,

    /// Source cell as X,Y; defaults to the player
    #[arg(long, value_parser = parse_coord)]
    from: Option<Coord>,

    /// Target cell as X,Y
    #[arg(long, value_parser = parse_coord)]
    to: Coord,

    #[arg(long, value_enum, default_value_t = Mode::Aim)]
    mode: Mode,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// JSON file of engine options
    #[arg(long)]
    options: Option<PathBuf>,

    /// Force the zap to pierce like a beam
    #[arg(long)]
    beam: bool,

    /// Stop at the target cell instead of flying past it
    #[arg(long)]
    spot: bool,

    /// Caster is inaccurate
    #[arg(long)]
    inaccurate: bool,
}

fn parse_coord(s: &str) -> Result<Coord, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got {s:?}"))?;
    let x = x.trim().parse().map_err(|e| format!("bad x in {s:?}: {e}"))?;
    let y = y.trim().parse().map_err(|e| format!("bad y in {s:?}: {e}"))?;
    Ok(Coord::new(x, y))
}

/// Ask on the terminal; anything but "y" declines
fn ask(prompt: &str) -> bool {
    confirm_on(prompt, &mut io::stdin().lock(), &mut io::stdout())
}

/// Write `prompt` to `output` and read the answer from `input`. Any I/O
/// error counts as a refusal.
fn confirm_on(prompt: &str, input: &mut impl BufRead, output: &mut impl Write) -> bool {
    if write!(output, "{prompt} (y/n) ").and_then(|()| output.flush()).is_err() {
        tracing::warn!(target: "beam", "cannot write prompt; declining");
        return false;
    }
    let mut line = String::new();
    if input.read_line(&mut line).is_err() {
        return false;
    }
    line.trim().eq_ignore_ascii_case("y")
}

fn load_world(args: &Args) -> Result<GridWorld, BeamError> {
    match &args.map {
        Some(path) => GridWorld::from_ascii(&std::fs::read_to_string(path)?),
        None => GridWorld::from_ascii(DEMO_MAP),
    }
}

fn build_bolt(args: &Args, world: &GridWorld, rng: &mut GameRng) -> Result<Bolt, BeamError> {
    let entry = ZapRegistry::standard()
        .find(&args.zap)
        .ok_or_else(|| BeamError::UnknownZap(args.zap.clone()))?;

    let shooter = match args.from {
        Some(pos) => world.actor_at(pos),
        None => world.player(),
    }
    .and_then(|id| world.actor(id));
    let source = match (args.from, shooter) {
        (Some(pos), _) => pos,
        (None, Some(actor)) => actor.pos,
        (None, None) => {
            return Err(BeamError::InvalidMap(
                "no player on the map; pass --from".to_string(),
            ));
        }
    };

    let mut bolt = Bolt::new(source, args.to);
    if let Some(actor) = shooter {
        bolt = bolt.fired_by(actor);
    }
    configure(entry, args.power, &mut bolt, args.inaccurate, rng);
    if args.beam {
        bolt.shape = Shape::Beam;
    }
    if args.spot {
        bolt.flags.insert(BoltFlags::AIMED_AT_SPOT);
    }
    Ok(bolt)
}

fn report(out: &BeamOutcome, world: &GridWorld) {
    for msg in &out.messages {
        println!("{msg}");
    }
    println!();
    println!("status: {:?}  turn spent: {}  obvious: {}", out.status, out.turn_spent, out.obvious);
    println!(
        "foes: {} (power {})  friends: {} (power {})",
        out.stats.foe_count, out.stats.foe_power, out.stats.fr_count, out.stats.fr_power
    );
    if !out.killed.is_empty() {
        println!("killed: {:?}", out.killed);
    }
    for credit in &out.credits {
        println!("credit: {credit:?}");
    }
    for noise in &out.noises {
        println!("noise {} at {}", noise.loudness, noise.pos);
    }
    if let Some(pos) = out.item_landing {
        println!("item lands at {pos}");
    }
    println!();
    let overlay: Vec<Coord> = if out.frames.is_empty() {
        out.path.clone()
    } else {
        out.frames.iter().flatten().copied().collect()
    };
    print!("{}", world.render(&overlay));
}

fn main() -> Result<(), BeamError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let options = match &args.options {
        Some(path) => BeamOptions::load_from_file(path)?,
        None => BeamOptions::default(),
    };
    let engine = BeamEngine::new(options);
    let mut world = load_world(&args)?;
    let mut rng = GameRng::new(args.seed);
    let mut bolt = build_bolt(&args, &world, &mut rng)?;
    tracing::info!(
        target: "beam",
        zap = %args.zap,
        power = args.power,
        mode = ?args.mode,
        "simulating"
    );

    let out = match args.mode {
        Mode::Tracer => engine.predict(&mut bolt, &world, &mut AutoConfirm),
        Mode::Real => engine.fire(&mut bolt, &mut world, &mut rng),
        Mode::Aim => engine.aim_and_fire(&mut bolt, &mut world, &mut rng, &mut ask),
        Mode::Explode => {
            engine.explode(&mut bolt, &mut world, &mut rng, ExplosionOptions::default())
        }
    };

    report(&out, &world);
    Ok(())
}
