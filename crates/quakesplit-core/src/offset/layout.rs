use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::memory::DeepPointer;

/// Concrete addresses for one game build, fixed for an attach session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionLayout {
    pub version: Cow<'static, str>,
    /// `char[32]` name of the loaded map
    pub map_name: DeepPointer,
    /// `f32` seconds since the map was loaded
    pub map_time: DeepPointer,
    /// `i32` intermission phase
    pub game_state: DeepPointer,
    /// `i32` incremented whenever a new game is spawned. Without it no
    /// counter change is ever reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counter: Option<DeepPointer>,
    /// `f32` time of the finished map as computed by the game (qdqstats),
    /// valid during intermissions
    pub total_time: DeepPointer,
    /// Game directory name, used to select a [`TotalTimeVariant`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_name: Option<DeepPointer>,
}

impl VersionLayout {
    pub fn validate(&self) -> Result<()> {
        for pointer in self.pointers() {
            pointer.validate()?;
        }
        Ok(())
    }

    fn pointers(&self) -> impl Iterator<Item = &DeepPointer> {
        [&self.map_name, &self.map_time, &self.game_state, &self.total_time]
            .into_iter()
            .chain(self.counter.as_ref())
            .chain(self.game_name.as_ref())
    }
}

/// Total time location for a content pack that relocates it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalTimeVariant {
    /// Game directory name, compared case-insensitively
    pub game_name: Cow<'static, str>,
    pub total_time: DeepPointer,
}

/// One row of the layout table: a build fingerprint plus its layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutEntry {
    pub process_name: Cow<'static, str>,
    /// Image size of the main module
    pub module_size: u64,
    pub layout: VersionLayout,
    #[serde(default)]
    pub total_time_variants: Cow<'static, [TotalTimeVariant]>,
}

impl LayoutEntry {
    pub fn matches_process(&self, process_name: &str) -> bool {
        crate::memory::normalize_process_name(&self.process_name)
            == crate::memory::normalize_process_name(process_name)
    }

    pub fn matches(&self, process_name: &str, module_size: u64) -> bool {
        self.module_size == module_size && self.matches_process(process_name)
    }

    /// Total time pointer for the given game directory, or the default one
    pub fn total_time_for(&self, game_name: Option<&str>) -> &DeepPointer {
        game_name
            .and_then(|name| {
                self.total_time_variants
                    .iter()
                    .find(|v| v.game_name.eq_ignore_ascii_case(name.trim()))
            })
            .map(|v| &v.total_time)
            .unwrap_or(&self.layout.total_time)
    }

    pub fn validate(&self) -> Result<()> {
        self.layout.validate()?;
        for variant in self.total_time_variants.iter() {
            variant.total_time.validate()?;
        }
        Ok(())
    }
}
