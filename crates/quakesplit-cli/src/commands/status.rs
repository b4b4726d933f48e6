//! Show the detected layout and live field values.

use anyhow::Result;
use quakesplit_core::{LayoutTable, MemoryReader, ProcessHandle, StatusInfo};

pub fn run(table: &LayoutTable, process_names: &[&str], pid: Option<u32>, json: bool) -> Result<()> {
    let process = match pid {
        Some(pid) => ProcessHandle::open(pid)?,
        None => ProcessHandle::find_and_open(process_names)?,
    };

    if !json {
        println!(
            "Found {} (PID: {}, Base: {:#x}, Size: {:#x})",
            process.name, process.pid, process.base_address, process.module_size
        );
    }

    let reader = MemoryReader::new(&process);
    let status = StatusInfo::collect(&reader, table, &process.name)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        print!("{}", status);
    }

    Ok(())
}
