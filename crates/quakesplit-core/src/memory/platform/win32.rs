//! Windows backend built on ToolHelp snapshots and `ReadProcessMemory`.

use std::ffi::c_void;

use windows::Win32::Foundation::{BOOL, CloseHandle, HANDLE, STILL_ACTIVE};
use windows::Win32::System::Diagnostics::Debug::ReadProcessMemory;
use windows::Win32::System::Diagnostics::ToolHelp::{
    CREATE_TOOLHELP_SNAPSHOT_FLAGS, CreateToolhelp32Snapshot, MODULEENTRY32W, Module32FirstW,
    Module32NextW, PROCESSENTRY32W, Process32FirstW, Process32NextW, TH32CS_SNAPMODULE,
    TH32CS_SNAPMODULE32, TH32CS_SNAPPROCESS,
};
use windows::Win32::System::Threading::{
    GetExitCodeProcess, OpenProcess, PROCESS_QUERY_LIMITED_INFORMATION, PROCESS_VM_READ,
};

use crate::error::{Error, Result};
use crate::memory::{ModuleInfo, ProcessInfo};

/// Owned ToolHelp snapshot handle
struct Snapshot(HANDLE);

impl Snapshot {
    fn take(flags: CREATE_TOOLHELP_SNAPSHOT_FLAGS, pid: u32) -> Result<Self> {
        // SAFETY: CreateToolhelp32Snapshot has no pointer arguments.
        let handle = unsafe { CreateToolhelp32Snapshot(flags, pid) }
            .map_err(|e| Error::ProcessOpenFailed(format!("snapshot failed: {}", e)))?;
        Ok(Self(handle))
    }
}

impl Drop for Snapshot {
    fn drop(&mut self) {
        // SAFETY: the handle was returned by CreateToolhelp32Snapshot and is closed once.
        unsafe {
            let _ = CloseHandle(self.0);
        }
    }
}

fn wide_to_string(wide: &[u16]) -> String {
    let len = wide.iter().position(|&c| c == 0).unwrap_or(wide.len());
    String::from_utf16_lossy(&wide[..len])
}

pub(crate) fn list_processes() -> Result<Vec<ProcessInfo>> {
    let snapshot = Snapshot::take(TH32CS_SNAPPROCESS, 0)?;
    let mut entry = PROCESSENTRY32W {
        dwSize: std::mem::size_of::<PROCESSENTRY32W>() as u32,
        ..Default::default()
    };

    let mut processes = Vec::new();
    // SAFETY: entry.dwSize is initialized as the API requires.
    let mut ok = unsafe { Process32FirstW(snapshot.0, &mut entry) }.is_ok();
    while ok {
        processes.push(ProcessInfo {
            pid: entry.th32ProcessID,
            name: wide_to_string(&entry.szExeFile),
        });
        // SAFETY: same entry buffer, still correctly sized.
        ok = unsafe { Process32NextW(snapshot.0, &mut entry) }.is_ok();
    }

    Ok(processes)
}

pub(crate) struct RawProcess {
    pid: u32,
    handle: HANDLE,
}

impl RawProcess {
    pub(crate) fn open(pid: u32) -> Result<Self> {
        // SAFETY: OpenProcess only takes plain values.
        let handle = unsafe {
            OpenProcess(
                PROCESS_VM_READ | PROCESS_QUERY_LIMITED_INFORMATION,
                BOOL::from(false),
                pid,
            )
        }
        .map_err(|e| Error::ProcessOpenFailed(format!("pid {}: {}", pid, e)))?;

        Ok(Self { pid, handle })
    }

    pub(crate) fn read(&self, address: u64, buffer: &mut [u8]) -> Result<()> {
        if buffer.is_empty() {
            return Ok(());
        }

        let mut bytes_read = 0usize;
        // SAFETY: buffer is a valid writable slice of exactly buffer.len() bytes.
        unsafe {
            ReadProcessMemory(
                self.handle,
                address as usize as *const c_void,
                buffer.as_mut_ptr() as *mut c_void,
                buffer.len(),
                Some(&mut bytes_read),
            )
        }
        .map_err(|e| Error::MemoryReadFailed {
            address,
            message: e.to_string(),
        })?;

        if bytes_read != buffer.len() {
            return Err(Error::MemoryReadFailed {
                address,
                message: format!("expected {} bytes, got {}", buffer.len(), bytes_read),
            });
        }

        Ok(())
    }

    pub(crate) fn is_alive(&self) -> bool {
        let mut code = 0u32;
        // SAFETY: code is a valid out pointer for the duration of the call.
        let ok = unsafe { GetExitCodeProcess(self.handle, &mut code) }.is_ok();
        ok && code == STILL_ACTIVE.0 as u32
    }

    pub(crate) fn modules(&self) -> Result<Vec<ModuleInfo>> {
        let snapshot = Snapshot::take(TH32CS_SNAPMODULE | TH32CS_SNAPMODULE32, self.pid)?;
        let mut entry = MODULEENTRY32W {
            dwSize: std::mem::size_of::<MODULEENTRY32W>() as u32,
            ..Default::default()
        };

        let mut modules = Vec::new();
        // SAFETY: entry.dwSize is initialized as the API requires.
        let mut ok = unsafe { Module32FirstW(snapshot.0, &mut entry) }.is_ok();
        while ok {
            modules.push(ModuleInfo {
                name: wide_to_string(&entry.szModule),
                base_address: entry.modBaseAddr as usize as u64,
                size: entry.modBaseSize as u64,
            });
            // SAFETY: same entry buffer, still correctly sized.
            ok = unsafe { Module32NextW(snapshot.0, &mut entry) }.is_ok();
        }

        Ok(modules)
    }
}

impl Drop for RawProcess {
    fn drop(&mut self) {
        if !self.handle.is_invalid() {
            // SAFETY: the handle came from OpenProcess and is closed once.
            unsafe {
                let _ = CloseHandle(self.handle);
            }
        }
    }
}
