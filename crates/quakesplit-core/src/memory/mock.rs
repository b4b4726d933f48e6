//! Simulated address space for tests.
//!
//! Memory is sparse: only bytes that were written are readable, so reads that
//! run off a written region fail like an unmapped page would.

use std::cell::RefCell;
use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::memory::{ModuleInfo, ReadMemory};

pub struct MockMemoryReader {
    bytes: BTreeMap<u64, u8>,
    base_address: u64,
    main_module_size: u64,
    modules: Vec<ModuleInfo>,
    reads: RefCell<Vec<u64>>,
}

impl MockMemoryReader {
    pub fn write_bytes(&mut self, address: u64, data: &[u8]) {
        for (i, &b) in data.iter().enumerate() {
            self.bytes.insert(address + i as u64, b);
        }
    }

    pub fn write_i32(&mut self, address: u64, value: i32) {
        self.write_bytes(address, &value.to_le_bytes());
    }

    pub fn write_u32(&mut self, address: u64, value: u32) {
        self.write_bytes(address, &value.to_le_bytes());
    }

    pub fn write_f32(&mut self, address: u64, value: f32) {
        self.write_bytes(address, &value.to_le_bytes());
    }

    /// Write a NUL-padded 8-bit string into a buffer of `capacity` bytes
    pub fn write_str(&mut self, address: u64, value: &str, capacity: usize) {
        let mut buf = vec![0u8; capacity];
        let len = value.len().min(capacity);
        buf[..len].copy_from_slice(&value.as_bytes()[..len]);
        self.write_bytes(address, &buf);
    }

    /// Make a range unreadable again
    pub fn unmap(&mut self, address: u64, len: usize) {
        for i in 0..len as u64 {
            self.bytes.remove(&(address + i));
        }
    }

    /// Addresses of every `read_bytes` call so far
    pub fn reads(&self) -> Vec<u64> {
        self.reads.borrow().clone()
    }

    pub fn clear_reads(&self) {
        self.reads.borrow_mut().clear();
    }
}

impl ReadMemory for MockMemoryReader {
    fn read_bytes(&self, address: u64, size: usize) -> Result<Vec<u8>> {
        self.reads.borrow_mut().push(address);

        (0..size as u64)
            .map(|i| {
                self.bytes
                    .get(&address.wrapping_add(i))
                    .copied()
                    .ok_or_else(|| Error::MemoryReadFailed {
                        address,
                        message: format!("address {:#x} not mapped in mock", address.wrapping_add(i)),
                    })
            })
            .collect()
    }

    fn base_address(&self) -> u64 {
        self.base_address
    }

    fn main_module_size(&self) -> u64 {
        self.main_module_size
    }

    fn find_module(&self, name: &str) -> Option<ModuleInfo> {
        self.modules
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(name))
            .cloned()
    }
}

pub struct MockMemoryBuilder {
    reader: MockMemoryReader,
}

impl MockMemoryBuilder {
    pub fn new() -> Self {
        Self {
            reader: MockMemoryReader {
                bytes: BTreeMap::new(),
                base_address: 0,
                main_module_size: 0,
                modules: Vec::new(),
                reads: RefCell::new(Vec::new()),
            },
        }
    }

    pub fn base_address(mut self, base: u64) -> Self {
        self.reader.base_address = base;
        self
    }

    pub fn main_module_size(mut self, size: u64) -> Self {
        self.reader.main_module_size = size;
        self
    }

    pub fn module(mut self, name: &str, base_address: u64, size: u64) -> Self {
        self.reader.modules.push(ModuleInfo {
            name: name.to_string(),
            base_address,
            size,
        });
        self
    }

    pub fn bytes(mut self, address: u64, data: &[u8]) -> Self {
        self.reader.write_bytes(address, data);
        self
    }

    pub fn i32(mut self, address: u64, value: i32) -> Self {
        self.reader.write_i32(address, value);
        self
    }

    pub fn u32(mut self, address: u64, value: u32) -> Self {
        self.reader.write_u32(address, value);
        self
    }

    pub fn f32(mut self, address: u64, value: f32) -> Self {
        self.reader.write_f32(address, value);
        self
    }

    pub fn string(mut self, address: u64, value: &str, capacity: usize) -> Self {
        self.reader.write_str(address, value, capacity);
        self
    }

    pub fn build(self) -> MockMemoryReader {
        self.reader
    }
}

impl Default for MockMemoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
