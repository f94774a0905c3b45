use std::fs::File;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use kioku_core::{Flow, GameSession, Notification};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing_subscriber::filter::LevelFilter;
use web_time::Instant;

mod input;
mod render;
mod settings;

use input::TerminalInput;
use render::{BoardLayout, TerminalRenderer};
use settings::Args;

const FRAME: Duration = Duration::from_millis(1000 / 30);

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    let config = args.game_config()?;
    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!("Seed: {}", seed);

    let layout = BoardLayout::new(config.size);
    let mut session = GameSession::new(config, SmallRng::seed_from_u64(seed))?;
    let mut renderer = TerminalRenderer::stdout(layout);
    renderer.enter().context("preparing terminal")?;

    let result = run(&mut session, &mut renderer, TerminalInput::new(layout));

    // restore the terminal even when the loop failed
    let _ = renderer.exit();
    result
}

fn run(
    session: &mut GameSession<SmallRng>,
    renderer: &mut TerminalRenderer<std::io::Stdout>,
    mut input: TerminalInput,
) -> anyhow::Result<()> {
    let mut last = Instant::now();
    loop {
        let now = Instant::now();
        let elapsed = u32::try_from(now.duration_since(last).as_millis()).unwrap_or(u32::MAX);
        last = now;

        let flow = session.tick(elapsed, &mut input, renderer)?;
        input.take_error().context("reading terminal input")?;
        renderer.take_error().context("drawing board")?;
        if flow == Flow::Quit {
            return Ok(());
        }
        if input.take_resized() {
            renderer.invalidate();
        }

        for notification in session.take_notifications() {
            match notification {
                Notification::RoundStarted { round } => {
                    log::info!("Round {} started", round);
                    renderer.message(&format!("Round {round}"));
                }
                Notification::RoundWon { final_score, round } => {
                    log::info!("Round {} won with {} points", round, final_score);
                    renderer.message(&format!("Round {round} cleared, score {final_score}!"));
                }
            }
        }

        thread::sleep(FRAME.saturating_sub(now.elapsed()));
    }
}

fn init_logging(args: &Args) -> anyhow::Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_max_level(level_filter(args.verbose.log_level_filter()))
        .with_ansi(args.log_file.is_none());
    match &args.log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            builder.with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

fn level_filter(filter: log::LevelFilter) -> LevelFilter {
    match filter {
        log::LevelFilter::Off => LevelFilter::OFF,
        log::LevelFilter::Error => LevelFilter::ERROR,
        log::LevelFilter::Warn => LevelFilter::WARN,
        log::LevelFilter::Info => LevelFilter::INFO,
        log::LevelFilter::Debug => LevelFilter::DEBUG,
        log::LevelFilter::Trace => LevelFilter::TRACE,
    }
}
