use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, FromRepr, IntoStaticStr};

/// `cl.intermission` as stored by the engine
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    FromRepr,
    EnumString,
    IntoStaticStr,
    Display,
)]
#[repr(i32)]
pub enum GameState {
    #[default]
    #[strum(serialize = "playing")]
    Playing = 0,
    /// Level completed, statistics screen
    #[strum(serialize = "intermission")]
    Intermission = 1,
    /// End of episode text or final screen
    #[strum(serialize = "intermission_text")]
    IntermissionText = 2,
}

impl GameState {
    pub fn from_i32(value: i32) -> Option<Self> {
        Self::from_repr(value)
    }

    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing)
    }

    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}
