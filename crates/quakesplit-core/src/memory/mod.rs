mod platform;
mod pointer;
mod process;
mod reader;

#[cfg(test)]
pub mod mock;

pub use pointer::*;
pub use process::*;
pub use reader::{MemoryReader, ReadMemory};

#[cfg(test)]
pub use mock::{MockMemoryBuilder, MockMemoryReader};
