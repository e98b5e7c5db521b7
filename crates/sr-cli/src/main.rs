//! SlotReel headless driver
//!
//! Usage:
//!   slotreel play --spins 10          - Play spins on a 60 fps clock, print each result
//!   slotreel play --hold --spins 25   - Keep turbo held until 25 spins completed
//!   slotreel simulate --spins 100000  - Run many spins, print session statistics
//!   slotreel config --format yaml     - Print the effective machine config
//!   slotreel evaluate '[[1,1,1,1,1],[2,3,2,4,2],[5,5,5,6,7]]'
//!
//! Logging is controlled with `RUST_LOG` (default `warn`).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use sr_engine::{
    FrameClock, MachineConfig, PayTable, ResultGrid, SessionState, SpinRequest, SpinSession,
    SymbolId, WinResult,
};
use sr_stage::TraceCollection;

/// Frame budget for a single spin before the driver gives up
const MAX_FRAMES_PER_SPIN: u32 = 60 * 60;

#[derive(Parser)]
#[command(name = "slotreel", about = "SlotReel spin engine driver", version)]
struct Cli {
    /// Machine config (.json, .yaml or .yml); defaults to the 5x3 reference machine
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play spins and print each outcome
    Play {
        /// Number of spins
        #[arg(short = 'n', long, default_value_t = 10)]
        spins: u32,
        /// Use the turbo profile
        #[arg(short, long)]
        turbo: bool,
        /// Hold turbo until all spins completed (auto re-issue)
        #[arg(long, conflicts_with = "turbo")]
        hold: bool,
        /// Bet per spin
        #[arg(short, long)]
        bet: Option<u32>,
        /// RNG seed for a reproducible session
        #[arg(short, long)]
        seed: Option<u64>,
        /// Write every spin trace as JSON
        #[arg(long)]
        trace_out: Option<PathBuf>,
    },
    /// Run many spins and print session statistics
    Simulate {
        /// Number of spins
        #[arg(short = 'n', long, default_value_t = 10_000)]
        spins: u32,
        /// Use the turbo profile
        #[arg(short, long)]
        turbo: bool,
        /// RNG seed for a reproducible session
        #[arg(short, long)]
        seed: Option<u64>,
    },
    /// Print the effective machine config
    Config {
        #[arg(short, long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
    /// Evaluate a grid given as JSON rows, e.g. [[1,1,1,1,1],[2,3,2,4,2],[5,5,5,6,7]]
    Evaluate {
        /// Grid JSON; read from --file when omitted
        grid: Option<String>,
        /// File containing the grid JSON
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Yaml,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    log::debug!("Using machine '{}'", config.name);

    match cli.command {
        Commands::Play {
            spins,
            turbo,
            hold,
            bet,
            seed,
            trace_out,
        } => play(config, spins, turbo, hold, bet, seed, trace_out.as_deref()),
        Commands::Simulate { spins, turbo, seed } => simulate(config, spins, turbo, seed),
        Commands::Config { format } => print_config(&config, format),
        Commands::Evaluate { grid, file } => evaluate(&config, grid, file.as_deref()),
    }
}

fn load_config(path: Option<&Path>) -> Result<MachineConfig> {
    match path {
        Some(path) => MachineConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(MachineConfig::standard()),
    }
}

fn new_session(config: MachineConfig, seed: Option<u64>) -> Result<SpinSession> {
    let session = match seed {
        Some(seed) => SpinSession::with_seed(config, seed),
        None => SpinSession::new(config),
    };
    session.context("Failed to create session")
}

// ═══════════════════════════════════════════════════════════════════════════
// PLAY
// ═══════════════════════════════════════════════════════════════════════════

fn play(
    config: MachineConfig,
    spins: u32,
    turbo: bool,
    hold: bool,
    bet: Option<u32>,
    seed: Option<u64>,
    trace_out: Option<&Path>,
) -> Result<()> {
    let mut session = new_session(config, seed)?;
    if let Some(bet) = bet {
        session.set_bet(bet);
    }
    println!(
        "🎰 {} | credit {:.2} | bet {}\n",
        session.config().name,
        session.credit(),
        session.bet()
    );

    let mut clock = FrameClock::default();
    let mut traces = TraceCollection::new();

    if hold {
        session.press_turbo_hold(clock.now_ms());
        let budget = MAX_FRAMES_PER_SPIN.saturating_mul(spins.max(1));
        for _ in 0..budget {
            session.tick(clock.tick());
            collect_finished(&mut session, &mut traces);
            if traces.len() as u32 >= spins {
                break;
            }
        }
        session.release_turbo_hold();
        run_until_idle(&mut session, &mut clock)?;
        collect_finished(&mut session, &mut traces);
    } else {
        for _ in 0..spins {
            if !session.request_spin(SpinRequest::new(turbo)) {
                bail!("Session refused a spin while idle");
            }
            run_until_idle(&mut session, &mut clock)?;
            collect_finished(&mut session, &mut traces);
        }
    }

    for trace in &traces.traces {
        let summary = trace.summary();
        println!(
            "{} {:>6.0}ms  win {:>6.2}  {}",
            summary.spin_id,
            summary.duration_ms,
            summary.total_win,
            if summary.turbo { "turbo" } else { "" }
        );
    }

    if let Some(win) = session.last_win() {
        println!("\nLast grid:");
        print_grid(session.last_grid(), win);
    }

    let stats = traces.stats();
    println!(
        "\n{} spins, {} winning, total won {:.2}, credit {:.2}",
        stats.trace_count,
        stats.winning_spins,
        stats.total_wins,
        session.credit()
    );

    if let Some(path) = trace_out {
        let json = serde_json::to_string_pretty(&traces).context("Failed to serialize traces")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write traces to {}", path.display()))?;
        println!("📝 Traces written to {}", path.display());
    }

    Ok(())
}

/// Move the trace of a just-finished spin into the collection
fn collect_finished(session: &mut SpinSession, traces: &mut TraceCollection) {
    let finished = session
        .drain_events()
        .iter()
        .any(|e| e.type_name() == "spin_end");
    if finished {
        if let Some(trace) = session.last_trace() {
            traces.push(trace.clone());
        }
    }
}

fn run_until_idle(session: &mut SpinSession, clock: &mut FrameClock) -> Result<()> {
    for _ in 0..MAX_FRAMES_PER_SPIN {
        if session.state() == SessionState::Idle && !session.has_pending_reissue() {
            return Ok(());
        }
        session.tick(clock.tick());
    }
    bail!("Spin did not finish within {MAX_FRAMES_PER_SPIN} frames")
}

fn print_grid(grid: &ResultGrid, win: &WinResult) {
    for row in 0..grid.rows() {
        let line: Vec<String> = (0..grid.reels())
            .map(|col| {
                let symbol = grid.get(row, col);
                if win.winning_cells.iter().any(|p| p.row == row && p.col == col) {
                    format!("[{symbol:>2}]")
                } else {
                    format!(" {symbol:>2} ")
                }
            })
            .collect();
        println!("  {}", line.join(""));
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// SIMULATE
// ═══════════════════════════════════════════════════════════════════════════

fn simulate(config: MachineConfig, spins: u32, turbo: bool, seed: Option<u64>) -> Result<()> {
    let mut session = new_session(config, seed)?;
    let mut clock = FrameClock::default();

    println!("🎲 Simulating {spins} spins...\n");
    for _ in 0..spins {
        session.request_spin(SpinRequest::new(turbo));
        run_until_idle(&mut session, &mut clock)?;
        session.drain_events();
    }

    let stats = session.stats();
    println!("Spins:            {}", stats.total_spins);
    println!("Turbo spins:      {}", stats.turbo_spins);
    println!("Total bet:        {:.2}", stats.total_bet);
    println!("Total win:        {:.2}", stats.total_win);
    println!("Wins / losses:    {} / {}", stats.wins, stats.losses);
    println!("Five-line wins:   {}", stats.five_line_wins);
    println!("Three-line wins:  {}", stats.three_line_wins);
    println!("Max win:          {:.2}", stats.max_win);
    println!("Hit rate:         {:.2}%", stats.hit_rate());
    println!("RTP:              {:.4}%", stats.rtp());
    println!("Final credit:     {:.2}", session.credit());
    println!("Simulated time:   {:.1}s", clock.now_ms() / 1000.0);

    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════
// CONFIG / EVALUATE
// ═══════════════════════════════════════════════════════════════════════════

fn print_config(config: &MachineConfig, format: Format) -> Result<()> {
    let text = match format {
        Format::Json => config.to_json(),
        Format::Yaml => config.to_yaml(),
    }
    .context("Failed to serialize config")?;
    println!("{text}");
    Ok(())
}

fn evaluate(config: &MachineConfig, grid: Option<String>, file: Option<&Path>) -> Result<()> {
    let json = match (grid, file) {
        (Some(grid), _) => grid,
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        (None, None) => bail!("Provide a grid argument or --file"),
    };
    let result = evaluate_json(&config.paytable, &json)?;
    println!(
        "{}",
        serde_json::to_string_pretty(&result).context("Failed to serialize result")?
    );
    Ok(())
}

fn evaluate_json(paytable: &PayTable, json: &str) -> Result<WinResult> {
    let rows: Vec<Vec<SymbolId>> =
        serde_json::from_str(json).context("Grid must be a JSON array of rows")?;
    let grid = ResultGrid::from_rows(rows).context("Invalid grid")?;
    Ok(paytable.evaluate(&grid))
}
