use crate::error::{Error, Result};
use crate::memory::{ModuleInfo, ProcessInfo};

pub(crate) fn list_processes() -> Result<Vec<ProcessInfo>> {
    Ok(Vec::new())
}

pub(crate) struct RawProcess;

impl RawProcess {
    pub(crate) fn open(pid: u32) -> Result<Self> {
        Err(Error::ProcessOpenFailed(format!(
            "pid {}: process access is not supported on this platform",
            pid
        )))
    }

    pub(crate) fn read(&self, address: u64, _buffer: &mut [u8]) -> Result<()> {
        Err(Error::MemoryReadFailed {
            address,
            message: "unsupported platform".to_string(),
        })
    }

    pub(crate) fn is_alive(&self) -> bool {
        false
    }

    pub(crate) fn modules(&self) -> Result<Vec<ModuleInfo>> {
        Ok(Vec::new())
    }
}
