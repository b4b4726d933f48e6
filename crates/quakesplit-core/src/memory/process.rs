//! Process discovery and handle ownership.
//!
//! A [`ProcessHandle`] captures the module list once at open time; the main module's
//! load address and image size are what layout detection keys on.

use tracing::debug;

use super::platform::{self, RawProcess};
use crate::error::{Error, Result};

/// A module (executable or library) mapped into the target process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleInfo {
    /// File name of the module, e.g. `joequake-gl.exe`
    pub name: String,
    pub base_address: u64,
    /// Size of the in-memory image in bytes
    pub size: u64,
}

impl ModuleInfo {
    pub fn contains(&self, address: u64) -> bool {
        address >= self.base_address && address < self.base_address + self.size
    }
}

/// A running process as reported by the OS, before it is opened
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessInfo {
    pub pid: u32,
    pub name: String,
}

/// Normalize a process or module name for comparison.
///
/// Matching is case-insensitive and ignores a trailing `.exe`, so `joequake-gl`
/// matches both `joequake-gl.exe` and `JoeQuake-GL.EXE`.
pub fn normalize_process_name(name: &str) -> String {
    let lower = name.trim().to_ascii_lowercase();
    match lower.strip_suffix(".exe") {
        Some(stem) => stem.to_string(),
        None => lower,
    }
}

/// List processes currently running on this machine
pub fn list_processes() -> Result<Vec<ProcessInfo>> {
    platform::list_processes()
}

/// Open handle to the game process.
///
/// Reads through this handle fail cleanly once the process has exited.
pub struct ProcessHandle {
    pub pid: u32,
    /// Normalized process name (see [`normalize_process_name`])
    pub name: String,
    /// Load address of the main module
    pub base_address: u64,
    /// Image size of the main module
    pub module_size: u64,
    modules: Vec<ModuleInfo>,
    raw: RawProcess,
}

impl ProcessHandle {
    /// Find the first running process whose name matches one of `names` and open it
    pub fn find_and_open(names: &[&str]) -> Result<Self> {
        let wanted: Vec<String> = names.iter().map(|n| normalize_process_name(n)).collect();

        let info = list_processes()?
            .into_iter()
            .find(|p| wanted.contains(&normalize_process_name(&p.name)))
            .ok_or_else(|| Error::ProcessNotFound(names.join(", ")))?;

        Self::open_with_name(info.pid, &info.name)
    }

    /// Open a process by PID
    pub fn open(pid: u32) -> Result<Self> {
        let name = list_processes()?
            .into_iter()
            .find(|p| p.pid == pid)
            .map(|p| p.name)
            .ok_or_else(|| Error::ProcessNotFound(format!("pid {}", pid)))?;

        Self::open_with_name(pid, &name)
    }

    fn open_with_name(pid: u32, name: &str) -> Result<Self> {
        let raw = RawProcess::open(pid)?;
        let modules = raw.modules()?;
        let name = normalize_process_name(name);

        // The executable usually comes first, but under Wine the loader maps
        // other images before it.
        let main = modules
            .iter()
            .find(|m| normalize_process_name(&m.name) == name)
            .or_else(|| modules.first())
            .cloned()
            .ok_or_else(|| Error::ProcessOpenFailed(format!("pid {} has no modules", pid)))?;

        debug!(
            "Opened process {} (pid {}): main module {} at {:#x}, size {:#x}",
            name, pid, main.name, main.base_address, main.size
        );

        Ok(Self {
            pid,
            name,
            base_address: main.base_address,
            module_size: main.size,
            modules,
            raw,
        })
    }

    /// Fill `buffer` from `address`; fails unless every byte could be read
    pub fn read_memory(&self, address: u64, buffer: &mut [u8]) -> Result<()> {
        self.raw.read(address, buffer)
    }

    /// Check whether the process is still running
    pub fn is_alive(&self) -> bool {
        self.raw.is_alive()
    }

    pub fn modules(&self) -> &[ModuleInfo] {
        &self.modules
    }

    /// Find a loaded module by file name (case-insensitive)
    pub fn find_module(&self, name: &str) -> Option<&ModuleInfo> {
        self.modules
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_process_name() {
        assert_eq!(normalize_process_name("joequake-gl"), "joequake-gl");
        assert_eq!(normalize_process_name("JoeQuake-GL.EXE"), "joequake-gl");
        assert_eq!(normalize_process_name("  glquake.exe "), "glquake");
        assert_eq!(normalize_process_name("quake.exe.bak"), "quake.exe.bak");
    }

    #[test]
    fn test_module_contains() {
        let module = ModuleInfo {
            name: "joequake-gl.exe".to_string(),
            base_address: 0x400000,
            size: 0x1000,
        };
        assert!(module.contains(0x400000));
        assert!(module.contains(0x400FFF));
        assert!(!module.contains(0x401000));
        assert!(!module.contains(0x3FFFFF));
    }
}
