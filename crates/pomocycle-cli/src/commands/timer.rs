use std::io::Write;
use std::time::Duration;

use clap::Subcommand;
use pomocycle_core::{
    Capabilities, Database, Event, IntervalTicker, NoNotifier, Notifier, SessionController,
    SessionCycle, SettingsStore, SilentPlayer,
};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::effects::{DesktopNotifier, Detached, TerminalBell};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run the timer in the foreground (s=start, p=pause, r=reset, q=quit)
    Run {
        /// Exit after the first interval completes
        #[arg(long)]
        once: bool,
        /// Do not send desktop notifications
        #[arg(long)]
        no_notify: bool,
    },
    /// Print the initial session state as JSON
    Status,
    /// Show the upcoming intervals
    Plan {
        /// Number of intervals to list
        #[arg(long, default_value = "8")]
        count: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct PlannedInterval {
    position: usize,
    interval: pomocycle_core::IntervalType,
    label: &'static str,
    duration_min: u32,
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        TimerAction::Run { once, no_notify } => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(run_session(once, no_notify))?;
        }
        TimerAction::Status => {
            let controller = SessionController::new(
                SettingsStore::new(Database::open()?),
                Capabilities {
                    ticker: Box::new(Detached),
                    sound: Box::new(SilentPlayer),
                    notifier: Box::new(NoNotifier),
                },
            );
            println!("{}", serde_json::to_string_pretty(&controller.snapshot())?);
        }
        TimerAction::Plan { count, json } => {
            let settings = SettingsStore::new(Database::open()?).load();
            let plan: Vec<PlannedInterval> = SessionCycle::new()
                .plan(settings.long_break_interval, count)
                .into_iter()
                .enumerate()
                .map(|(i, interval)| PlannedInterval {
                    position: i + 1,
                    interval,
                    label: interval.label(),
                    duration_min: interval.duration_min(&settings),
                })
                .collect();

            if json {
                println!("{}", serde_json::to_string_pretty(&plan)?);
            } else {
                println!("Now: Work ({} min)", settings.work_duration);
                for item in &plan {
                    println!(
                        "{:>3}. {:<12} {:>2} min",
                        item.position, item.label, item.duration_min
                    );
                }
            }
        }
    }
    Ok(())
}

async fn run_session(once: bool, no_notify: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (mut ticker, handle) = IntervalTicker::new(Duration::from_secs(1));
    let notifier: Box<dyn Notifier> = if no_notify {
        Box::new(NoNotifier)
    } else {
        Box::new(DesktopNotifier)
    };
    let mut controller = SessionController::new(
        SettingsStore::new(Database::open()?),
        Capabilities {
            ticker: Box::new(handle),
            sound: Box::new(TerminalBell),
            notifier,
        },
    );

    println!("commands: s=start  p=pause  r=reset  q=quit");
    controller.start();
    render(&controller)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Some(event) = controller.tick() {
                    announce(&event);
                    if once {
                        break;
                    }
                }
                render(&controller)?;
            }
            line = lines.next_line(), if stdin_open => {
                match line? {
                    None => stdin_open = false,
                    Some(input) => match input.trim() {
                        "s" | "start" => {
                            controller.start();
                        }
                        "p" | "pause" => {
                            controller.pause();
                        }
                        "r" | "reset" => {
                            controller.reset();
                        }
                        "q" | "quit" => break,
                        "" => {}
                        other => eprintln!("unknown command: {other}"),
                    },
                }
                render(&controller)?;
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    println!();
    Ok(())
}

fn render(controller: &SessionController) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    write!(
        stdout,
        "\r{:<11} {}  {:>3.0}%  done: {}  {}   ",
        controller.current_interval().display_name(),
        controller.formatted_remaining(),
        controller.progress_pct(),
        controller.completed_work(),
        if controller.is_running() { "running" } else { "paused " },
    )?;
    stdout.flush()
}

fn announce(event: &Event) {
    if let Event::IntervalCompleted {
        completed,
        next,
        completed_work,
        ..
    } = event
    {
        println!();
        println!("{completed} complete ({completed_work} work intervals done). Next: {next}");
    }
}
