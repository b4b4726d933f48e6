//! Linux backend reading `/proc/<pid>/{comm,maps,mem}`.
//!
//! Wine-hosted games appear as ordinary processes whose `.exe` image is one
//! of the file mappings, so the same module lookup works for them.

use std::fs::{self, File};
use std::os::unix::fs::FileExt;
use std::path::Path;

use crate::error::{Error, Result};
use crate::memory::{ModuleInfo, ProcessInfo};

pub(crate) fn list_processes() -> Result<Vec<ProcessInfo>> {
    let mut processes = Vec::new();

    for entry in fs::read_dir("/proc")? {
        let Ok(entry) = entry else { continue };
        let Some(pid) = entry
            .file_name()
            .to_str()
            .and_then(|s| s.parse::<u32>().ok())
        else {
            continue;
        };

        // Processes may exit while we iterate
        if let Ok(comm) = fs::read_to_string(entry.path().join("comm")) {
            processes.push(ProcessInfo {
                pid,
                name: comm.trim_end().to_string(),
            });
        }
    }

    Ok(processes)
}

/// Collapse `/proc/<pid>/maps` into one entry per mapped file.
fn parse_maps(content: &str) -> Vec<ModuleInfo> {
    let mut modules: Vec<ModuleInfo> = Vec::new();

    for line in content.lines() {
        let Some(path_start) = line.find('/') else {
            continue;
        };
        let Some(range) = line.split_whitespace().next() else {
            continue;
        };
        let Some((start, end)) = range.split_once('-') else {
            continue;
        };
        let (Ok(start), Ok(end)) = (u64::from_str_radix(start, 16), u64::from_str_radix(end, 16))
        else {
            continue;
        };

        let path = line[path_start..].trim_end();
        let Some(name) = Path::new(path).file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        match modules.iter_mut().find(|m| m.name == name) {
            Some(module) => {
                let module_end = (module.base_address + module.size).max(end);
                module.base_address = module.base_address.min(start);
                module.size = module_end - module.base_address;
            }
            None => modules.push(ModuleInfo {
                name: name.to_string(),
                base_address: start,
                size: end.saturating_sub(start),
            }),
        }
    }

    modules
}

pub(crate) struct RawProcess {
    pid: u32,
    mem: File,
}

impl RawProcess {
    pub(crate) fn open(pid: u32) -> Result<Self> {
        let mem = File::open(format!("/proc/{}/mem", pid))
            .map_err(|e| Error::ProcessOpenFailed(format!("pid {}: {}", pid, e)))?;
        Ok(Self { pid, mem })
    }

    pub(crate) fn read(&self, address: u64, buffer: &mut [u8]) -> Result<()> {
        self.mem
            .read_exact_at(buffer, address)
            .map_err(|e| Error::MemoryReadFailed {
                address,
                message: e.to_string(),
            })
    }

    pub(crate) fn is_alive(&self) -> bool {
        Path::new(&format!("/proc/{}/mem", self.pid)).exists()
    }

    pub(crate) fn modules(&self) -> Result<Vec<ModuleInfo>> {
        let content = fs::read_to_string(format!("/proc/{}/maps", self.pid))
            .map_err(|e| Error::ProcessOpenFailed(format!("pid {}: {}", self.pid, e)))?;
        Ok(parse_maps(&content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAPS: &str = "\
00400000-00401000 r--p 00000000 08:01 1234       /games/quake/joequake-gl.exe
00401000-0068a000 r-xp 00001000 08:01 1234       /games/quake/joequake-gl.exe
0068a000-00800000 rw-p 00000000 00:00 0          [heap]
7f0000000000-7f0000021000 r-xp 00000000 08:01 99 /usr/lib/libc.so.6
";

    #[test]
    fn test_parse_maps_merges_segments() {
        let modules = parse_maps(MAPS);
        assert_eq!(modules.len(), 2);
        assert_eq!(modules[0].name, "joequake-gl.exe");
        assert_eq!(modules[0].base_address, 0x400000);
        assert_eq!(modules[0].size, 0x28A000);
        assert_eq!(modules[1].name, "libc.so.6");
    }

    #[test]
    fn test_parse_maps_ignores_anonymous() {
        let modules = parse_maps("0068a000-00800000 rw-p 00000000 00:00 0 [heap]\n");
        assert!(modules.is_empty());
    }

    #[test]
    fn test_list_processes_contains_self() {
        let me = std::process::id();
        let processes = list_processes().unwrap();
        assert!(processes.iter().any(|p| p.pid == me));
    }
}
