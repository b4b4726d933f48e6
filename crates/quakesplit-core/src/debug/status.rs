use std::fmt;

use serde::Serialize;

use crate::config::limits::{GAME_NAME_LEN, MAP_NAME_LEN};
use crate::error::{Error, Result};
use crate::game::GameState;
use crate::memory::{DeepPointer, ReadMemory};
use crate::offset::{LayoutTable, detect_layout};

/// One layout field, resolved against the live process
#[derive(Debug, Clone, Serialize)]
pub struct FieldStatus {
    pub name: &'static str,
    pub pointer: String,
    pub address: Option<String>,
    pub value: Option<String>,
    pub error: Option<String>,
}

impl FieldStatus {
    fn resolve<R, F>(name: &'static str, pointer: &DeepPointer, reader: &R, read: F) -> Self
    where
        R: ReadMemory,
        F: FnOnce(&DeepPointer, &R) -> Result<String>,
    {
        let address = pointer.resolve(reader);
        let value = address.as_ref().ok().map(|_| read(pointer, reader));

        let error = match (&address, &value) {
            (Err(e), _) | (_, Some(Err(e))) => Some(e.to_string()),
            _ => None,
        };

        Self {
            name,
            pointer: pointer.to_string(),
            address: address.ok().map(|a| format!("{:#x}", a)),
            value: value.and_then(|v| v.ok()),
            error,
        }
    }
}

/// Snapshot of what the splitter would see right now
#[derive(Debug, Clone, Serialize)]
pub struct StatusInfo {
    pub process_name: String,
    pub base_address: String,
    pub module_size: String,
    pub layout_version: String,
    pub exact_match: bool,
    pub fields: Vec<FieldStatus>,
}

impl StatusInfo {
    pub fn collect<R: ReadMemory>(reader: &R, table: &LayoutTable, process_name: &str) -> Result<Self> {
        let module_size = reader.main_module_size();
        let exact_match = table
            .lookup(process_name, module_size)
            .ok_or_else(|| Error::UnknownGame(process_name.to_string()))?
            .is_exact();
        let layout = detect_layout(reader, table, process_name)?;

        let mut fields = vec![
            FieldStatus::resolve("map_name", &layout.map_name, reader, |p, r| {
                p.deref_string(r, MAP_NAME_LEN)
            }),
            FieldStatus::resolve("map_time", &layout.map_time, reader, |p, r| {
                p.deref::<f32, _>(r).map(|v| v.to_string())
            }),
            FieldStatus::resolve("game_state", &layout.game_state, reader, |p, r| {
                p.deref::<i32, _>(r).map(|v| match GameState::from_i32(v) {
                    Some(state) => state.to_string(),
                    None => format!("unknown ({})", v),
                })
            }),
            FieldStatus::resolve("total_time", &layout.total_time, reader, |p, r| {
                p.deref::<f32, _>(r).map(|v| v.to_string())
            }),
        ];
        // optional fields are only listed when the layout has them
        if let Some(counter) = &layout.counter {
            fields.push(FieldStatus::resolve("counter", counter, reader, |p, r| {
                p.deref::<i32, _>(r).map(|v| v.to_string())
            }));
        }
        if let Some(game_name) = &layout.game_name {
            fields.push(FieldStatus::resolve("game_name", game_name, reader, |p, r| {
                p.deref_string(r, GAME_NAME_LEN)
            }));
        }

        Ok(Self {
            process_name: process_name.to_string(),
            base_address: format!("{:#x}", reader.base_address()),
            module_size: format!("{:#x}", module_size),
            layout_version: layout.version.to_string(),
            exact_match,
            fields,
        })
    }
}

impl fmt::Display for StatusInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Process:      {}", self.process_name)?;
        writeln!(f, "Base address: {}", self.base_address)?;
        writeln!(f, "Module size:  {}", self.module_size)?;
        writeln!(
            f,
            "Layout:       {}{}",
            self.layout_version,
            if self.exact_match { "" } else { " (fallback)" }
        )?;
        writeln!(f)?;

        for field in &self.fields {
            let address = field.address.as_deref().unwrap_or("-");
            match (&field.value, &field.error) {
                (Some(value), _) => {
                    writeln!(f, "  {:<11} {:<12} {:?}", field.name, address, value)?
                }
                (None, Some(error)) => {
                    writeln!(f, "  {:<11} {:<12} <{}>", field.name, address, error)?
                }
                (None, None) => writeln!(f, "  {:<11} {:<12} -", field.name, address)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MockMemoryBuilder;

    #[test]
    fn test_collect_reports_each_field() {
        const BASE: u64 = 0x400000;
        let reader = MockMemoryBuilder::new()
            .base_address(BASE)
            .main_module_size(0x0071_5000)
            .string(BASE + 0x6FD148, "e1m1", MAP_NAME_LEN)
            .i32(BASE + 0x64F664, 1)
            .build();

        let status = StatusInfo::collect(&reader, &LayoutTable::builtin(), "joequake-gl").unwrap();
        assert!(status.exact_match);
        assert_eq!(status.fields.len(), 4);

        let map = &status.fields[0];
        assert_eq!(map.value.as_deref(), Some("e1m1"));
        assert!(map.error.is_none());

        let state = &status.fields[2];
        assert_eq!(state.value.as_deref(), Some("intermission"));

        // qdq pointer base is unmapped: no address, an error
        let total = &status.fields[3];
        assert!(total.address.is_none());
        assert!(total.error.is_some());

        let text = status.to_string();
        assert!(text.contains("joequake-gl"));
        assert!(!text.contains("fallback"));
    }
}
