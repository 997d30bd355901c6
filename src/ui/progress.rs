use crate::WipeProgress;
use std::io::{self, Write};
use std::time::Instant;

/// Two-line terminal progress display driven by engine progress events.
///
/// Renders in place using ANSI cursor movement; callers should not print
/// between `render` calls until `finish` is invoked.
pub struct ProgressBar {
    width: usize,
    start: Instant,
    first_render: bool,
}

impl ProgressBar {
    /// width = number of bar character slots (not including the brackets)
    pub fn new(width: usize) -> Self {
        Self {
            width,
            start: Instant::now(),
            first_render: true,
        }
    }

    pub fn render(&mut self, progress: &WipeProgress) {
        let pct = if progress.total_bytes == 0 {
            if progress.is_complete { 100.0 } else { 0.0 }
        } else {
            (progress.bytes_processed as f64 / progress.total_bytes as f64) * 100.0
        }
        .clamp(0.0, 100.0);

        let filled = ((pct / 100.0) * self.width as f64).round() as usize;
        let empty = self.width.saturating_sub(filled);

        // Colors (ANSI)
        let green = "\x1b[38;5;82m";
        let gray = "\x1b[38;5;240m";
        let cyan = "\x1b[38;5;51m";
        let bold = "\x1b[1m";
        let reset = "\x1b[0m";

        let bar = format!(
            "{}{}{}{}{}{}{}",
            bold,
            green,
            "█".repeat(filled),
            reset,
            gray,
            "░".repeat(empty),
            reset
        );

        let status_line = match &progress.current_file {
            Some(file) => {
                let name = file
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| file.display().to_string());
                format!(
                    "file {}/{}  pass {}/{}  {}",
                    progress.files_processed + 1,
                    progress.total_files,
                    progress.current_pass,
                    progress.total_passes,
                    name
                )
            }
            None if progress.is_complete => "done".to_string(),
            None => format!("{} files queued", progress.total_files),
        };

        let elapsed = self.start.elapsed().as_secs_f64().max(0.0001);
        let speed = progress.bytes_processed as f64 / elapsed;
        let remaining = progress.total_bytes.saturating_sub(progress.bytes_processed);
        let eta_secs = if speed > 0.0 {
            (remaining as f64 / speed).round() as u64
        } else {
            0
        };

        let info = format!(
            "{}{:.1}%{}  {}{}/s  ETA {}{}",
            bold,
            pct,
            reset,
            cyan,
            human_bytes(speed),
            format_duration(eta_secs),
            reset
        );

        if self.first_render {
            print!("{}\n[{}] {}\n", status_line, bar, info);
            self.first_render = false;
        } else {
            // move cursor up 2 lines, clear them, reprint
            print!("\x1b[2A\x1b[2K\r{}\n", status_line);
            print!("\x1b[2K\r[{}] {}\n", bar, info);
        }

        io::stdout().flush().ok();
    }

    /// Leave the completed bar on screen and return the cursor to a
    /// fresh line.
    pub fn finish(&mut self) {
        if !self.first_render {
            println!();
        }
    }
}

/// Convert a byte count (or bytes/sec) to a readable string
pub fn human_bytes(value: f64) -> String {
    let units = ["B", "KB", "MB", "GB", "TB"];
    if value <= 0.0 {
        return "0B".to_string();
    }
    let mut val = value;
    let mut i = 0usize;
    while val >= 1024.0 && i + 1 < units.len() {
        val /= 1024.0;
        i += 1;
    }
    format!("{:.2}{}", val, units[i])
}

/// Format seconds to H:MM:SS or M:SS
pub fn format_duration(secs: u64) -> String {
    let h = secs / 3600;
    let m = (secs % 3600) / 60;
    let s = secs % 60;
    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{}:{:02}", m, s)
    }
}
