//! Write a starter settings file.

use std::path::Path;

use anyhow::{Result, bail};
use quakesplit_core::SplitterSettings;

pub fn run(output: &Path, force: bool) -> Result<()> {
    if output.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", output.display());
    }

    let settings = SplitterSettings::full_game();
    settings.save(output)?;

    println!("Wrote {} with {} events", output.display(), settings.events.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_refuses_to_overwrite() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");

        run(&path, false).unwrap();
        assert!(run(&path, false).is_err());
        run(&path, true).unwrap();

        let settings = SplitterSettings::load(&path).unwrap();
        assert_eq!(settings, SplitterSettings::full_game());
    }
}
