use tracing::{debug, info, warn};

use crate::config::limits::GAME_NAME_LEN;
use crate::error::{Error, Result};
use crate::memory::ReadMemory;
use crate::offset::{LayoutMatch, LayoutTable, VersionLayout};

/// Pick the layout for the attached process.
///
/// The build is identified by process name and main module image size. An
/// unrecognized build of a known process gets that process's default layout;
/// only a process with no rows at all is an error. The game directory probe
/// then selects the total time pointer; if it cannot be read the default
/// pointer stays in place.
pub fn detect_layout<R: ReadMemory>(
    reader: &R,
    table: &LayoutTable,
    process_name: &str,
) -> Result<VersionLayout> {
    let module_size = reader.main_module_size();

    let found = table
        .lookup(process_name, module_size)
        .ok_or_else(|| Error::UnknownGame(process_name.to_string()))?;

    let entry = match found {
        LayoutMatch::Exact(entry) => {
            debug!(
                "Module size {:#x} matches {}",
                module_size, entry.layout.version
            );
            entry
        }
        LayoutMatch::Fallback(entry) => {
            warn!(
                "Unknown build of {} (module size {:#x}), using {} layout",
                process_name, module_size, entry.layout.version
            );
            entry
        }
    };

    let game_name = entry
        .layout
        .game_name
        .as_ref()
        .and_then(|probe| match probe.deref_string(reader, GAME_NAME_LEN) {
            Ok(name) if !name.trim().is_empty() => Some(name),
            Ok(_) => None,
            Err(e) => {
                debug!("Game name probe unreadable: {}", e);
                None
            }
        });

    let mut layout = entry.layout.clone();
    layout.total_time = entry.total_time_for(game_name.as_deref()).clone();

    info!(
        "Using layout {} (game: {})",
        layout.version,
        game_name.as_deref().unwrap_or("id1")
    );
    Ok(layout)
}
