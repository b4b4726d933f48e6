//! Main splitting mode.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};

use anyhow::{Result, bail};
use quakesplit_core::config::timing::{ATTACH_SETTLE_DELAY, PROCESS_SEARCH_INTERVAL, TICK_INTERVAL};
use quakesplit_core::{
    AutoSplitter, Error, LayoutTable, MemoryReader, ProcessHandle, RunLog, SplitterSettings,
    TimerModel, TimerPhase,
};
use tracing::{debug, error, info, warn};

use crate::console_timer::ConsoleTimer;
use crate::input::{self, HostCommand};
use crate::shutdown::ShutdownSignal;

pub struct RunOptions {
    pub settings: PathBuf,
    pub layouts: Option<PathBuf>,
    pub processes: Vec<String>,
    pub runs_dir: PathBuf,
}

/// Run the splitter until the user quits
pub fn run(options: &RunOptions) -> Result<()> {
    let shutdown = Arc::new(ShutdownSignal::new());
    shutdown.install_ctrlc_handler()?;

    let (command_tx, command_rx) = mpsc::channel();
    let _keyboard_handle = input::spawn_keyboard_monitor(Arc::clone(&shutdown), command_tx);

    info!("quakesplit {}", env!("CARGO_PKG_VERSION"));

    let settings = SplitterSettings::load_or_default(&options.settings)?;
    if settings.events.is_empty() {
        warn!(
            "No events configured in {}; the timer will never start on its own",
            options.settings.display()
        );
    }

    let table = match &options.layouts {
        Some(path) => LayoutTable::with_overrides(path)?,
        None => LayoutTable::builtin(),
    };

    let process_names: Vec<String> = if options.processes.is_empty() {
        table.process_names().into_iter().map(str::to_string).collect()
    } else {
        options.processes.clone()
    };
    let process_names: Vec<&str> = process_names.iter().map(String::as_str).collect();

    let segments = settings.events.len().saturating_sub(1);
    let mut splitter = AutoSplitter::new(table, settings);
    let mut timer = ConsoleTimer::new(RunLog::new(&options.runs_dir), segments);

    println!(
        "Waiting for {}... (s start, r reset, Esc or q quit)",
        process_names.join(", ")
    );
    while !shutdown.is_shutdown() {
        match ProcessHandle::find_and_open(&process_names) {
            Ok(found) => {
                let pid = found.pid;
                drop(found);

                // Let the game finish initializing before fingerprinting it
                if shutdown.wait(ATTACH_SETTLE_DELAY) {
                    break;
                }

                match attach(pid, &mut splitter) {
                    Ok(Some(process)) => {
                        let reader = MemoryReader::new(&process);
                        tick_loop(
                            &process,
                            &reader,
                            &mut splitter,
                            &mut timer,
                            &command_rx,
                            &shutdown,
                        );
                        splitter.detach();
                        println!("Game closed, waiting for it to restart...");
                    }
                    Ok(None) => {}
                    Err(e @ Error::UnknownGame(_)) => bail!("{}", e),
                    Err(e) => warn!("Failed to attach to pid {}: {}", pid, e),
                }
            }
            Err(Error::ProcessNotFound(_)) => {}
            Err(e) => error!("Process search failed: {}", e),
        }

        if shutdown.wait(PROCESS_SEARCH_INTERVAL) {
            break;
        }
    }

    info!("Shutdown complete");
    Ok(())
}

/// Reopen the process and detect its layout. `None` if it exited meanwhile.
fn attach(pid: u32, splitter: &mut AutoSplitter) -> quakesplit_core::Result<Option<ProcessHandle>> {
    let process = match ProcessHandle::open(pid) {
        Ok(process) => process,
        Err(e) => {
            debug!("Process {} went away during startup: {}", pid, e);
            return Ok(None);
        }
    };
    debug!(
        "Found {} (pid {}, base {:#x}, size {:#x})",
        process.name, process.pid, process.base_address, process.module_size
    );

    let reader = MemoryReader::new(&process);
    let layout = splitter.attach(&reader, &process.name)?;
    println!("Attached to {} ({})", process.name, layout.version);

    Ok(Some(process))
}

fn tick_loop(
    process: &ProcessHandle,
    reader: &MemoryReader,
    splitter: &mut AutoSplitter,
    timer: &mut ConsoleTimer,
    commands: &Receiver<HostCommand>,
    shutdown: &ShutdownSignal,
) {
    while !shutdown.is_shutdown() {
        if !process.is_alive() {
            info!("Process {} exited", process.pid);
            break;
        }

        while let Ok(command) = commands.try_recv() {
            match command {
                HostCommand::Reset => {
                    timer.reset();
                    splitter.on_reset();
                }
                HostCommand::Start => {
                    if timer.phase() == TimerPhase::NotRunning {
                        timer.start();
                        splitter.on_start();
                        println!("Started by hand");
                    }
                }
            }
        }

        if let Some(action) = splitter.tick(reader, timer) {
            let map = splitter
                .snapshot()
                .map(|s| s.curr_map.as_str())
                .unwrap_or_default();
            timer.record(action, map);
        }

        if shutdown.wait(TICK_INTERVAL) {
            break;
        }
    }
}
