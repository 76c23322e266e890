//! Windowed Map CLI
//!
//! Runs the worked example or an interactive session against a windowed map.

use anyhow::{bail, Context};
use chrono::Duration;
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::thread;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use windowed_map::{
    repl::{Output, Session},
    Clock, Config, ManualClock, MonotonicClock, WindowedMap, VERSION,
};

#[derive(Parser)]
#[command(name = "windowed-map")]
#[command(version = VERSION)]
#[command(about = "Key-value store whose entries expire after a trailing window", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the one-hour worked example
    Demo {
        /// Sleep through a scaled-down timeline instead of using a simulated clock
        #[arg(long)]
        realtime: bool,

        /// Window for the scaled-down timeline, in milliseconds
        #[arg(long, default_value = "1000")]
        realtime_window_ms: i64,
    },

    /// Read commands from standard input
    Repl {
        /// Window size in milliseconds (defaults to the configured value)
        #[arg(long)]
        window_ms: Option<i64>,
    },

    /// Show configuration
    Config,

    /// Set and save the window size
    SetWindow {
        /// Window size in milliseconds
        window_ms: i64,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Demo {
            realtime,
            realtime_window_ms,
        } => cmd_demo(realtime, realtime_window_ms),
        Commands::Repl { window_ms } => cmd_repl(window_ms),
        Commands::Config => cmd_config(),
        Commands::SetWindow { window_ms } => cmd_set_window(window_ms),
    }
}

/// Steps of the worked example: minutes since start, then the action.
enum Step {
    Put(&'static str, i64),
    Check,
}

const TIMELINE: &[(i64, Step)] = &[
    (0, Step::Put("foo", 42)),
    (5, Step::Put("bar", 76)),
    (50, Step::Check),
    (62, Step::Check),
    (66, Step::Check),
];

fn cmd_demo(realtime: bool, realtime_window_ms: i64) -> anyhow::Result<()> {
    println!("Windowed Map v{VERSION} - worked example");
    println!();

    if realtime {
        // Scale the one-hour timeline down so a window lasts `realtime_window_ms`.
        let map = WindowedMap::new(realtime_window_ms)?;
        check_realtime_window(realtime_window_ms)?;
        // Every step is at most the last minute of the timeline, so this cannot overflow.
        let scale = |minutes: i64| Duration::milliseconds(minutes * realtime_window_ms / 60);
        println!("Window: {realtime_window_ms} ms (1 minute = {} ms)", scale(1).num_milliseconds());
        run_timeline(map, scale, |by| {
            if let Ok(by) = by.to_std() {
                thread::sleep(by);
            }
        });
    } else {
        let clock = ManualClock::at_epoch();
        let map = WindowedMap::with_clock(windowed_map::DEFAULT_WINDOW_SIZE_MS, clock.clone())?;
        println!("Window: 1 hour (simulated clock)");
        run_timeline(map, Duration::minutes, |by| clock.advance(by));
    }

    Ok(())
}

/// Reject windows too large to scale the whole timeline in milliseconds.
fn check_realtime_window(window_ms: i64) -> anyhow::Result<()> {
    let last_minute = TIMELINE.last().map_or(0, |(minute, _)| *minute);
    if window_ms.checked_mul(last_minute).is_none() {
        bail!("--realtime-window-ms {window_ms} is too large to scale the demo timeline");
    }
    Ok(())
}

fn run_timeline<C: Clock>(
    mut map: WindowedMap<C>,
    scale: impl Fn(i64) -> Duration,
    wait: impl Fn(Duration),
) {
    let mut elapsed = 0;
    for (minute, step) in TIMELINE {
        wait(scale(minute - elapsed));
        elapsed = *minute;

        let label = format!("{}:{:02}:00", minute / 60, minute % 60);
        match step {
            Step::Put(key, value) => {
                map.put(*key, *value);
                println!("[{label}] put({key:?}, {value})");
            }
            Step::Check => {
                println!(
                    "[{label}] get(\"foo\") = {}, get(\"bar\") = {}, average = {}",
                    map.get("foo"),
                    map.get("bar"),
                    map.get_average()
                );
            }
        }
    }

    println!();
    println!("{}", map.stats().summary());
}

fn cmd_repl(window_ms: Option<i64>) -> anyhow::Result<()> {
    let window_ms = match window_ms {
        Some(ms) => ms,
        None => Config::load().context("loading configuration")?.window_size_ms,
    };
    let map = WindowedMap::with_clock(window_ms, MonotonicClock::new())?;
    let mut session = Session::new(map);

    println!("Windowed Map v{VERSION} (window: {window_ms} ms). Type 'help' for commands.");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        match session.execute_line(&line) {
            Ok(Output::Quit) => break,
            Ok(output) => println!("{output}"),
            Err(e) => eprintln!("Error: {e}"),
        }
    }

    Ok(())
}

fn cmd_config() -> anyhow::Result<()> {
    let config = Config::load().context("loading configuration")?;

    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file: {:?}", Config::config_path());
    println!();
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

fn cmd_set_window(window_ms: i64) -> anyhow::Result<()> {
    let mut config = Config::load().unwrap_or_default();
    config.window_size_ms = window_ms;
    if let Err(e) = config.validate() {
        bail!("{e}");
    }
    config.save().context("saving configuration")?;
    println!("Window set to {window_ms} ms.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_realtime_window_bounds() {
        assert!(check_realtime_window(1000).is_ok());
        assert!(check_realtime_window(i64::MAX / 66).is_ok());
        assert!(check_realtime_window(i64::MAX / 66 + 1).is_err());
        assert!(cmd_demo(true, i64::MAX).is_err());
    }
}
