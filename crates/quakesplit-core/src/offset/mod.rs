mod detect;
mod layout;
mod loader;
mod table;

pub use detect::*;
pub use layout::*;
pub use loader::*;
pub use table::*;
