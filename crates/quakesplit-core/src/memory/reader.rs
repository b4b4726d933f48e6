use crate::error::{Error, Result};
use crate::memory::{ModuleInfo, ProcessHandle};

/// Read-only view of the target's address space.
///
/// This is the only seam between the splitter logic and the OS. Every read
/// either returns exactly the requested bytes or an error; nothing panics
/// when the process is gone or the page is unmapped.
pub trait ReadMemory {
    /// Read exactly `size` bytes at `address`
    fn read_bytes(&self, address: u64, size: usize) -> Result<Vec<u8>>;

    /// Load address of the main module
    fn base_address(&self) -> u64;

    /// Image size of the main module, used to fingerprint the build
    fn main_module_size(&self) -> u64;

    /// Find a loaded module by file name (case-insensitive)
    fn find_module(&self, name: &str) -> Option<ModuleInfo>;

    fn read_array<const N: usize>(&self, address: u64) -> Result<[u8; N]> {
        let bytes = self.read_bytes(address, N)?;
        bytes.try_into().map_err(|b: Vec<u8>| Error::MemoryReadFailed {
            address,
            message: format!("expected {} bytes, got {}", N, b.len()),
        })
    }

    fn read_i32(&self, address: u64) -> Result<i32> {
        self.read_array::<4>(address).map(i32::from_le_bytes)
    }

    fn read_u32(&self, address: u64) -> Result<u32> {
        self.read_array::<4>(address).map(u32::from_le_bytes)
    }

    fn read_f32(&self, address: u64) -> Result<f32> {
        self.read_array::<4>(address).map(f32::from_le_bytes)
    }

    fn read_u8(&self, address: u64) -> Result<u8> {
        self.read_array::<1>(address).map(|b| b[0])
    }

    /// Read a 32-bit pointer (the game is a 32-bit process)
    fn read_ptr32(&self, address: u64) -> Result<u64> {
        self.read_u32(address).map(u64::from)
    }
}

/// [`ReadMemory`] over a live [`ProcessHandle`]
pub struct MemoryReader<'a> {
    process: &'a ProcessHandle,
}

impl<'a> MemoryReader<'a> {
    pub fn new(process: &'a ProcessHandle) -> Self {
        Self { process }
    }

    pub fn process(&self) -> &ProcessHandle {
        self.process
    }
}

impl ReadMemory for MemoryReader<'_> {
    fn read_bytes(&self, address: u64, size: usize) -> Result<Vec<u8>> {
        let mut buffer = vec![0u8; size];
        self.process.read_memory(address, &mut buffer)?;
        Ok(buffer)
    }

    fn base_address(&self) -> u64 {
        self.process.base_address
    }

    fn main_module_size(&self) -> u64 {
        self.process.module_size
    }

    fn find_module(&self, name: &str) -> Option<ModuleInfo> {
        self.process.find_module(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MockMemoryBuilder;

    #[test]
    fn test_typed_reads() {
        let reader = MockMemoryBuilder::new()
            .i32(0x1000, -7)
            .f32(0x1004, 12.5)
            .bytes(0x1008, &[0xFF])
            .u32(0x100C, 0x0060_0000)
            .build();

        assert_eq!(reader.read_i32(0x1000).unwrap(), -7);
        assert_eq!(reader.read_f32(0x1004).unwrap(), 12.5);
        assert_eq!(reader.read_u8(0x1008).unwrap(), 0xFF);
        assert_eq!(reader.read_ptr32(0x100C).unwrap(), 0x0060_0000);
    }

    #[test]
    fn test_partial_read_fails() {
        let reader = MockMemoryBuilder::new().bytes(0x2000, &[1, 2]).build();
        assert!(reader.read_i32(0x2000).is_err());
        assert!(reader.read_bytes(0x2000, 2).is_ok());
    }
}
