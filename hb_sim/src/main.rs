//! Table scenario runner for Hold'em bots.
//!
//! Seats a table of bots, plays hands between them, and paces every
//! announcement through the bot action scheduler.

mod config;
mod table;

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::time::Duration;

use anyhow::Error;
use ctrlc::set_handler;
use env_logger::Env;
use holdem_bot::bot::{BotActionScheduler, BotDecisionMaker};
use log::{info, warn};
use pico_args::Arguments;
use rand::{SeedableRng, rngs::StdRng};

use config::{Overrides, SimConfig};
use table::SimTable;

const HELP: &str = "\
Play hands between Hold'em bots

USAGE:
  hb_sim [OPTIONS]

OPTIONS:
  --hands       N          Hands to play                  [default: env HB_SIM_HANDS or 10]
  --players     N          Bot seats (2-10)               [default: env HB_SIM_PLAYERS or 6]
  --delay-ms    MS         Delay between announcements    [default: env HB_SIM_ACTION_DELAY_MS or 1500]
  --seed        N          Seed for cards and bots        [default: env HB_SIM_SEED or random]
  --difficulty  LEVEL      easy, standard or tag          [default: env HB_SIM_DIFFICULTY or standard]
  --config      PATH       JSON bot decision config       [default: env HB_SIM_CONFIG]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  HB_SIM_STARTING_CHIPS    Starting stack per seat (default 2000)
  HB_SIM_SMALL_BLIND       Small blind (default 10)
  HB_SIM_BIG_BLIND         Big blind (default 20)
  RUST_LOG                 Log filter (default info)
  (A .env file is loaded when present)
";

/// How often the runner checks whether the scheduler has drained
const IDLE_POLL: Duration = Duration::from_millis(50);

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let overrides = Overrides {
        hands: pargs.opt_value_from_str("--hands")?,
        players: pargs.opt_value_from_str("--players")?,
        action_delay_ms: pargs.opt_value_from_str("--delay-ms")?,
        seed: pargs.opt_value_from_str("--seed")?,
        difficulty: pargs.opt_value_from_str("--difficulty")?,
        decision_config: pargs.opt_value_from_str("--config")?,
    };

    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_target(false)
        .init();

    let config = SimConfig::from_env(overrides)?;
    config.validate()?;
    let decision_config = config.decision()?;
    let seed = config.seed.unwrap_or_else(rand::random);

    // Catching signals for a graceful stop between hands.
    let stop = Arc::new(AtomicBool::new(false));
    let flag = stop.clone();
    set_handler(move || flag.store(true, Ordering::SeqCst))?;

    info!(
        "Seating {} {} bots with {} chips (blinds {}/{}, seed {})",
        config.players,
        config.difficulty,
        config.starting_chips,
        config.small_blind,
        config.big_blind,
        seed
    );

    let (scheduler, handle) = BotActionScheduler::new(config.scheduler());
    let scheduler_task = tokio::spawn(scheduler.run());

    let mut bots: Vec<BotDecisionMaker<StdRng>> = (0..config.players)
        .map(|seat| {
            BotDecisionMaker::with_rng(
                decision_config.clone(),
                StdRng::seed_from_u64(seed.wrapping_add(seat as u64 + 1)),
            )
        })
        .collect();
    let mut dealer_rng = StdRng::seed_from_u64(seed);
    let mut table = SimTable::new(
        config.players,
        config.starting_chips,
        config.small_blind,
        config.big_blind,
    );

    while table.hands_played() < config.hands {
        if stop.load(Ordering::SeqCst) {
            warn!("Interrupted, stopping after hand {}", table.hands_played());
            break;
        }
        if table.funded_seats() < 2 {
            info!("Only one seat has chips left");
            break;
        }

        let summary = table.play_hand(&mut bots, &mut dealer_rng);
        for event in summary.events {
            handle.enqueue(move || {
                info!("{event}");
                Ok(())
            })?;
        }

        while !handle.is_idle() && !stop.load(Ordering::SeqCst) {
            tokio::time::sleep(IDLE_POLL).await;
        }
    }

    for seat in &table.seats {
        info!(
            "{}: {} chips (VPIP {:.0}%, aggression {:.2})",
            seat.name,
            seat.chips,
            seat.stats.vpip_rate() * 100.0,
            seat.stats.aggression()
        );
    }

    handle.close()?;
    scheduler_task.await?;

    Ok(())
}
