//! OS-specific process access.
//!
//! Each backend provides `RawProcess` (open, read, liveness, module list) and
//! `list_processes`. Everything above this module is platform independent.

#[cfg(target_os = "windows")]
mod win32;
#[cfg(target_os = "windows")]
pub(crate) use win32::{RawProcess, list_processes};

#[cfg(target_os = "linux")]
mod procfs;
#[cfg(target_os = "linux")]
pub(crate) use procfs::{RawProcess, list_processes};

#[cfg(not(any(target_os = "windows", target_os = "linux")))]
mod unsupported;
#[cfg(not(any(target_os = "windows", target_os = "linux")))]
pub(crate) use unsupported::{RawProcess, list_processes};
