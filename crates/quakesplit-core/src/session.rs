use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Local};

use crate::error::Result;

const HEADER: &str = "index\tkind\tmap\tgame_time\ttimestamp";

/// Per-run TSV log of starts and splits under `<base>/<date>/run_<time>.tsv`
pub struct RunLog {
    base_dir: PathBuf,
    current_run: Option<PathBuf>,
    index: usize,
}

impl RunLog {
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
            current_run: None,
            index: 0,
        }
    }

    /// Open a new log file and write its header
    pub fn start_run(&mut self) -> Result<PathBuf> {
        let now: DateTime<Local> = Local::now();
        let run_dir = self.base_dir.join(now.format("%Y-%m-%d").to_string());
        fs::create_dir_all(&run_dir)?;

        let run_file = run_dir.join(format!("run_{}.tsv", now.format("%H%M%S")));
        self.current_run = Some(run_file.clone());
        self.index = 0;
        self.append_line(HEADER)?;

        Ok(run_file)
    }

    pub fn record(&mut self, kind: &str, map: &str, game_time: Duration) -> Result<()> {
        let line = format!(
            "{}\t{}\t{}\t{}\t{}",
            self.index,
            kind,
            map,
            format_game_time(game_time),
            Local::now().to_rfc3339()
        );
        self.append_line(&line)?;
        self.index += 1;
        Ok(())
    }

    pub fn end_run(&mut self) {
        self.current_run = None;
    }

    fn append_line(&self, line: &str) -> Result<()> {
        if let Some(ref path) = self.current_run {
            let mut file = fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            writeln!(file, "{}", line)?;
        }
        Ok(())
    }

    pub fn current_run_path(&self) -> Option<&Path> {
        self.current_run.as_deref()
    }
}

/// `h:mm:ss.mmm`, or `m:ss.mmm` under an hour
pub fn format_game_time(time: Duration) -> String {
    let total_ms = time.as_millis();
    let ms = total_ms % 1000;
    let secs = (total_ms / 1000) % 60;
    let mins = (total_ms / 60_000) % 60;
    let hours = total_ms / 3_600_000;

    if hours > 0 {
        format!("{}:{:02}:{:02}.{:03}", hours, mins, secs, ms)
    } else {
        format!("{}:{:02}.{:03}", mins, secs, ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_format_game_time() {
        assert_eq!(format_game_time(Duration::ZERO), "0:00.000");
        assert_eq!(format_game_time(Duration::from_millis(61_250)), "1:01.250");
        assert_eq!(format_game_time(Duration::from_secs(3723)), "1:02:03.000");
    }

    #[test]
    fn test_run_log_writes_lines() {
        let dir = tempdir().unwrap();
        let mut log = RunLog::new(dir.path());

        let path = log.start_run().unwrap();
        log.record("start", "e1m1", Duration::ZERO).unwrap();
        log.record("split", "e1m2", Duration::from_secs(75)).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], HEADER);
        assert!(lines[1].starts_with("0\tstart\te1m1\t0:00.000\t"));
        assert!(lines[2].starts_with("1\tsplit\te1m2\t1:15.000\t"));
    }

    #[test]
    fn test_record_without_run_is_noop() {
        let dir = tempdir().unwrap();
        let mut log = RunLog::new(dir.path());
        log.record("split", "e1m1", Duration::ZERO).unwrap();
        assert!(log.current_run_path().is_none());

        log.start_run().unwrap();
        log.end_run();
        assert!(log.current_run_path().is_none());
    }
}
