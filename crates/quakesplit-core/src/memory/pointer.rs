//! Pointer chains through the target's address space.
//!
//! A [`DeepPointer`] starts at a module-relative base, dereferences 32-bit
//! pointers for every offset but the last, and then applies the last offset
//! to reach the value itself:
//!
//! ```text
//! addr = module_base + base
//! for off in offsets[..n-1]: addr = read_ptr32(addr + off)   (null => fail)
//! value_addr = addr + offsets[n-1]
//! ```
//!
//! A single `[0]` offset therefore addresses `module_base + base` directly,
//! while `[0, 0x335C]` reads the pointer stored at `module_base + base` and
//! then addresses `pointer + 0x335C`.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::memory::ReadMemory;

mod sealed {
    pub trait Sealed {}
}

/// Scalar types that can be read through a [`DeepPointer`].
///
/// Implemented for `i32`, `u32`, `f32`, `u8` and `bool`; other types are
/// rejected at compile time.
pub trait MemoryValue: sealed::Sealed + Copy {
    const SIZE: usize;

    fn from_le_slice(bytes: &[u8]) -> Option<Self>;
}

macro_rules! impl_memory_value {
    ($($ty:ty),*) => {
        $(
            impl sealed::Sealed for $ty {}

            impl MemoryValue for $ty {
                const SIZE: usize = std::mem::size_of::<$ty>();

                fn from_le_slice(bytes: &[u8]) -> Option<Self> {
                    bytes.get(..Self::SIZE)?.try_into().ok().map(<$ty>::from_le_bytes)
                }
            }
        )*
    };
}

impl_memory_value!(i32, u32, f32, u8);

impl sealed::Sealed for bool {}

impl MemoryValue for bool {
    const SIZE: usize = 1;

    fn from_le_slice(bytes: &[u8]) -> Option<Self> {
        bytes.first().map(|&b| b != 0)
    }
}

/// Three consecutive floats, e.g. a position
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3f {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3f {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn distance(&self, other: &Vector3f) -> f32 {
        let (dx, dy, dz) = (self.x - other.x, self.y - other.y, self.z - other.z);
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Distance ignoring height
    pub fn distance_xy(&self, other: &Vector3f) -> f32 {
        let (dx, dy) = (self.x - other.x, self.y - other.y);
        (dx * dx + dy * dy).sqrt()
    }

    /// Components truncated toward zero
    pub fn to_i32(&self) -> (i32, i32, i32) {
        (self.x as i32, self.y as i32, self.z as i32)
    }
}

impl std::fmt::Display for Vector3f {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.x, self.y, self.z)
    }
}

/// Decode a fixed-size string buffer read from game memory.
///
/// A zero second byte is taken to mean UTF-16LE text, anything else is
/// decoded as 8-bit (Windows-1252) text. The result stops at the first NUL.
pub fn decode_game_string(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[1] == 0 {
        let units = bytes
            .chunks_exact(2)
            .position(|c| c[0] == 0 && c[1] == 0)
            .unwrap_or(bytes.len() / 2);
        let (text, _) = encoding_rs::UTF_16LE.decode_without_bom_handling(&bytes[..units * 2]);
        text.into_owned()
    } else {
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        let (text, _) = encoding_rs::WINDOWS_1252.decode_without_bom_handling(&bytes[..end]);
        text.into_owned()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeepPointer {
    /// Module the base is relative to; `None` means the main module
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<Cow<'static, str>>,
    pub base: u64,
    pub offsets: Cow<'static, [i32]>,
}

impl DeepPointer {
    /// Pointer chain relative to the main module
    pub const fn new(base: u64, offsets: &'static [i32]) -> Self {
        Self {
            module: None,
            base,
            offsets: Cow::Borrowed(offsets),
        }
    }

    /// Pointer chain relative to a named module
    pub const fn in_module(module: &'static str, base: u64, offsets: &'static [i32]) -> Self {
        Self {
            module: Some(Cow::Borrowed(module)),
            base,
            offsets: Cow::Borrowed(offsets),
        }
    }

    /// A value stored directly at `main_module + base`
    pub const fn direct(base: u64) -> Self {
        Self::new(base, &[0])
    }

    /// Build a pointer from owned parts, e.g. from user configuration
    pub fn from_parts(module: Option<String>, base: u64, offsets: Vec<i32>) -> Result<Self> {
        let pointer = Self {
            module: module.map(Cow::Owned),
            base,
            offsets: Cow::Owned(offsets),
        };
        pointer.validate()?;
        Ok(pointer)
    }

    pub fn validate(&self) -> Result<()> {
        if self.offsets.is_empty() {
            return Err(Error::InvalidLayout(format!(
                "pointer at base {:#x} has no offsets",
                self.base
            )));
        }
        Ok(())
    }

    fn start_address<R: ReadMemory>(&self, reader: &R) -> Result<u64> {
        let module_base = match &self.module {
            Some(name) if !name.is_empty() => {
                reader
                    .find_module(name)
                    .ok_or_else(|| Error::ModuleNotFound(name.to_string()))?
                    .base_address
            }
            _ => reader.base_address(),
        };
        Ok(module_base.wrapping_add(self.base))
    }

    /// Resolve the chain to the address of the value it points at.
    ///
    /// Fails as soon as an intermediate pointer is unreadable or null; no
    /// further reads are issued after a failure.
    pub fn resolve<R: ReadMemory>(&self, reader: &R) -> Result<u64> {
        let Some((&last, path)) = self.offsets.split_last() else {
            return Err(Error::InvalidLayout("empty pointer chain".to_string()));
        };

        let mut address = self.start_address(reader)?;
        for &offset in path {
            let slot = address.wrapping_add_signed(i64::from(offset));
            address = reader.read_ptr32(slot)?;
            if address == 0 {
                return Err(Error::NullPointer { address: slot });
            }
        }

        Ok(address.wrapping_add_signed(i64::from(last)))
    }

    /// Read a scalar at the end of the chain
    pub fn deref<T: MemoryValue, R: ReadMemory>(&self, reader: &R) -> Result<T> {
        let address = self.resolve(reader)?;
        let bytes = reader.read_bytes(address, T::SIZE)?;
        T::from_le_slice(&bytes).ok_or_else(|| Error::MemoryReadFailed {
            address,
            message: format!("expected {} bytes, got {}", T::SIZE, bytes.len()),
        })
    }

    /// Read three floats at +0, +4 and +8; fails if any of them fails
    pub fn deref_vector<R: ReadMemory>(&self, reader: &R) -> Result<Vector3f> {
        let address = self.resolve(reader)?;
        let x = reader.read_f32(address)?;
        let y = reader.read_f32(address.wrapping_add(4))?;
        let z = reader.read_f32(address.wrapping_add(8))?;
        Ok(Vector3f::new(x, y, z))
    }

    /// Read a string stored in a fixed buffer of `max_len` bytes.
    ///
    /// Callers treat an error as "empty string, not updated"; a partially
    /// read buffer is never decoded.
    pub fn deref_string<R: ReadMemory>(&self, reader: &R, max_len: usize) -> Result<String> {
        let address = self.resolve(reader)?;
        let bytes = reader.read_bytes(address, max_len)?;
        Ok(decode_game_string(&bytes))
    }
}

impl std::fmt::Display for DeepPointer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(module) = &self.module {
            write!(f, "{}+", module)?;
        }
        write!(f, "{:#x}", self.base)?;
        for offset in self.offsets.iter() {
            write!(f, " -> {:#x}", offset)?;
        }
        Ok(())
    }
}
