//! # quakesplit-core
//!
//! Core library for the Quake autosplitter.
//!
//! This crate provides:
//! - Process memory reading and deep pointer resolution
//! - Per-build memory layouts for JoeQuake
//! - Game time reconciliation across intermissions, quickloads and restarts
//! - Start/split event matching against a configured event list
//!
//! ## Feature Flags
//!
//! - `debug-tools`: Enables diagnostics that resolve every layout field of a
//!   running game. Intended for CLI tools and development.

pub mod config;
#[cfg(feature = "debug-tools")]
pub mod debug;
pub mod error;
pub mod game;
pub mod memory;
pub mod offset;
pub mod session;
pub mod settings;
pub mod splitter;
pub mod timer;

pub use error::{Error, Result};
pub use game::{
    EventCatalog, EventMatcher, GameEvent, GameSnapshot, GameState, SplitAction,
    TerminalCondition, TickReading, TimingEngine,
};
pub use memory::{
    DeepPointer, MemoryReader, MemoryValue, ModuleInfo, ProcessHandle, ProcessInfo, ReadMemory,
    Vector3f, decode_game_string, list_processes, normalize_process_name,
};
pub use offset::{
    LayoutEntry, LayoutMatch, LayoutTable, TotalTimeVariant, VersionLayout, detect_layout,
    load_layouts, save_layouts,
};
pub use session::{RunLog, format_game_time};
pub use settings::SplitterSettings;
pub use splitter::AutoSplitter;
pub use timer::{TimerModel, TimerPhase};

// Debug utilities (requires debug-tools feature)
#[cfg(feature = "debug-tools")]
pub use debug::{FieldStatus, StatusInfo};
