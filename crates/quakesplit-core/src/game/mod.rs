mod event;
mod matcher;
mod snapshot;
mod state;
mod timing;

pub use event::*;
pub use matcher::*;
pub use snapshot::*;
pub use state::*;
pub use timing::*;
