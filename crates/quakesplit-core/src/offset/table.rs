//! Known JoeQuake builds.
//!
//! Rows are append-only: a new build gets a new row, existing rows are never
//! edited. The first built-in row for a process name is the fallback used
//! when the running build is not recognized, so the oldest known build stays
//! first.
//!
//! The built-in row carries the map name, map time, intermission state and
//! qdqstats map time addresses of the JoeQuake build the splitter was
//! written against. Its module size has not been checked against a release
//! binary; a mismatch only means the same row is used as the fallback.
//! Run counter, game directory probe and per-mod total time locations are
//! not known for any build and are left to override files.

use std::borrow::Cow;
use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::memory::DeepPointer;
use crate::offset::{LayoutEntry, TotalTimeVariant, VersionLayout, load_layouts};

pub const JOEQUAKE_PROCESS: &str = "joequake-gl";

const NO_VARIANTS: &[TotalTimeVariant] = &[];

static BUILTIN_LAYOUTS: &[LayoutEntry] = &[LayoutEntry {
    process_name: Cow::Borrowed(JOEQUAKE_PROCESS),
    module_size: 0x0071_5000,
    layout: VersionLayout {
        version: Cow::Borrowed("joequake-gl"),
        map_name: DeepPointer::direct(0x6FD148),
        map_time: DeepPointer::direct(0x6108F0),
        game_state: DeepPointer::direct(0x64F664),
        counter: None,
        total_time: DeepPointer::new(0x6FBFF8, &[0, 0x335C]),
        game_name: None,
    },
    total_time_variants: Cow::Borrowed(NO_VARIANTS),
}];

/// Layout rows searched during detection.
///
/// User-supplied rows take precedence over built-in ones for exact matches;
/// the fallback is always taken from the built-in rows when one exists.
#[derive(Debug, Clone, Default)]
pub struct LayoutTable {
    overrides: Vec<LayoutEntry>,
    builtin: Vec<LayoutEntry>,
}

/// Result of looking up a fingerprint
#[derive(Debug, Clone, Copy)]
pub enum LayoutMatch<'a> {
    Exact(&'a LayoutEntry),
    Fallback(&'a LayoutEntry),
}

impl<'a> LayoutMatch<'a> {
    pub fn entry(&self) -> &'a LayoutEntry {
        match self {
            Self::Exact(entry) | Self::Fallback(entry) => entry,
        }
    }

    pub fn is_exact(&self) -> bool {
        matches!(self, Self::Exact(_))
    }
}

impl LayoutTable {
    pub fn builtin() -> Self {
        Self {
            overrides: Vec::new(),
            builtin: BUILTIN_LAYOUTS.to_vec(),
        }
    }

    /// Built-in rows plus rows loaded from a JSON file
    pub fn with_overrides(path: impl AsRef<Path>) -> Result<Self> {
        let overrides = load_layouts(path.as_ref())?;
        debug!(
            "Loaded {} layout override(s) from {}",
            overrides.len(),
            path.as_ref().display()
        );
        Ok(Self {
            overrides,
            builtin: BUILTIN_LAYOUTS.to_vec(),
        })
    }

    pub fn push_override(&mut self, entry: LayoutEntry) {
        self.overrides.push(entry);
    }

    pub fn entries(&self) -> impl Iterator<Item = &LayoutEntry> {
        self.overrides.iter().chain(self.builtin.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty() && self.builtin.is_empty()
    }

    /// Distinct process names, in table order
    pub fn process_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for entry in self.entries() {
            if !names
                .iter()
                .any(|n| n.eq_ignore_ascii_case(&entry.process_name))
            {
                names.push(&entry.process_name);
            }
        }
        names
    }

    /// Find the row for a build, falling back to the default row for the
    /// process name. `None` when the process name is unknown.
    pub fn lookup(&self, process_name: &str, module_size: u64) -> Option<LayoutMatch<'_>> {
        if let Some(entry) = self.entries().find(|e| e.matches(process_name, module_size)) {
            return Some(LayoutMatch::Exact(entry));
        }

        self.builtin
            .iter()
            .chain(self.overrides.iter())
            .find(|e| e.matches_process(process_name))
            .map(LayoutMatch::Fallback)
    }
}
