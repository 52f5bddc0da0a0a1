use std::io::{self, Write};

const BAR_WIDTH: usize = 30;

/// Sink for download progress
pub trait ProgressReporter {
    /// `delta` bytes arrived since the previous report. `total` is the size
    /// advertised by the server, when known.
    fn report(&mut self, delta: u64, total: Option<u64>);

    /// Transfer finished
    fn finish(&mut self, message: &str);
}

/// Turns cumulative byte counts into deltas.
///
/// Every byte is reported exactly once: the deltas sum to the last cumulative
/// value passed to `update`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProgressTracker {
    last_reported: u64,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_reported(&self) -> u64 {
        self.last_reported
    }

    /// Report progress up to `cumulative` bytes and return the delta sent
    pub fn update(
        &mut self,
        cumulative: u64,
        total: Option<u64>,
        reporter: &mut dyn ProgressReporter,
    ) -> u64 {
        let delta = cumulative.saturating_sub(self.last_reported);
        if delta > 0 {
            reporter.report(delta, total);
        }
        self.last_reported = self.last_reported.max(cumulative);
        delta
    }
}

/// Single-line progress bar redrawn with `\r`
pub struct ConsoleProgress<W: Write> {
    out: W,
    current: u64,
    max: Option<u64>,
}

impl ConsoleProgress<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleProgress<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            current: 0,
            max: None,
        }
    }

    pub fn current(&self) -> u64 {
        self.current
    }

    pub fn max(&self) -> Option<u64> {
        self.max
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn render(&self) -> String {
        match self.max {
            Some(max) if max > 0 => {
                let ratio = (self.current as f64 / max as f64).min(1.0);
                let filled = (ratio * BAR_WIDTH as f64) as usize;
                let bar = if filled >= BAR_WIDTH {
                    "=".repeat(BAR_WIDTH)
                } else {
                    format!("{}>{}", "=".repeat(filled), " ".repeat(BAR_WIDTH - filled - 1))
                };
                format!(
                    "{:>6}/{:<6} bytes [{}] {:>3}%",
                    self.current,
                    max,
                    bar,
                    (ratio * 100.0) as u32
                )
            }
            _ => format!("{:>6} bytes", self.current),
        }
    }
}

impl<W: Write> ProgressReporter for ConsoleProgress<W> {
    fn report(&mut self, delta: u64, total: Option<u64>) {
        // Bound is fixed the first time the server tells us the size
        if self.max.is_none() {
            self.max = total;
        }
        self.current += delta;

        let line = self.render();
        let _ = write!(self.out, "\r{}", line);
        let _ = self.out.flush();
    }

    fn finish(&mut self, message: &str) {
        let _ = writeln!(self.out);
        let _ = writeln!(self.out, "{}", message);
        let _ = self.out.flush();
    }
}
