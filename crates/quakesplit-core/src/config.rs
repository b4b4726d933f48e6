//! Tunable constants shared by the engine and the console host

pub mod timing {
    use std::time::Duration;

    /// Interval between ticks (roughly one refresh at 60 Hz)
    pub const TICK_INTERVAL: Duration = Duration::from_millis(16);

    /// Wait after the process appears before reading version-identifying memory.
    ///
    /// Several fields (notably the game-name probe) are still zero right after
    /// process creation.
    pub const ATTACH_SETTLE_DELAY: Duration = Duration::from_secs(1);

    /// Interval between process searches while the game is not running
    pub const PROCESS_SEARCH_INTERVAL: Duration = Duration::from_secs(2);
}

pub mod thresholds {
    /// A raw map time is only trusted after a load if it is below this value.
    ///
    /// The game keeps the previous map's counter for a few frames after a
    /// level change; values at or above this are leftovers.
    pub const MAP_TIME_SETTLE_SECS: f32 = 3.0;

    /// A drop in raw map time larger than this is treated as a quickload or
    /// in-map restart
    pub const RESTART_TOLERANCE_SECS: f32 = 0.1;
}

pub mod limits {
    /// Size of the map name buffer (`char mapname[32]`)
    pub const MAP_NAME_LEN: usize = 32;

    /// Size of the game directory probe buffer
    pub const GAME_NAME_LEN: usize = 16;
}

pub mod maps {
    /// Hub map the player selects a skill on; time spent here never counts
    pub const START_MAP: &str = "start";

    /// Final map holding Shub-Niggurath
    pub const END_MAP: &str = "end";

    /// Episode maps of the base game, in play order
    pub const EPISODE_MAPS: &[&str] = &[
        "e1m1", "e1m2", "e1m3", "e1m4", "e1m5", "e1m6", "e1m7", "e1m8", //
        "e2m1", "e2m2", "e2m3", "e2m4", "e2m5", "e2m6", "e2m7", //
        "e3m1", "e3m2", "e3m3", "e3m4", "e3m5", "e3m6", "e3m7", //
        "e4m1", "e4m2", "e4m3", "e4m4", "e4m5", "e4m6", "e4m7", "e4m8",
    ];
}
