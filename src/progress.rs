//! Progress reporting and display
//!
//! Theme switches report their phases through a trait so the engine stays
//! decoupled from how (or whether) progress is shown.

use std::sync::Arc;

/// Phase of a theme switch or restore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThemePhase {
    /// No switch in progress
    Idle,
    /// Snapshotting the outgoing theme
    BackingUp,
    /// Wiping the editor session
    Clearing,
    /// Loading a bundled template
    Applying,
    /// Loading a stored backup
    Restoring,
    /// Writing the session back into tenant data
    Syncing,
    /// Finished successfully
    Completed,
    /// Rejected before any state changed
    Failed(String),
}

/// Status of a single page during a switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageStatus {
    Installed { components: usize },
    Refreshed,
}

/// Progress reporter trait - implement this for different display backends.
pub trait ThemeProgress: Send + Sync {
    /// Set the current phase.
    fn set_phase(&self, phase: ThemePhase);

    /// Register the pages about to be installed.
    fn register_pages(&self, pages: Vec<String>);

    /// Update the status of a specific page.
    fn update_page(&self, page: &str, status: PageStatus);

    /// Log an informational message.
    fn log_info(&self, message: &str);

    /// Log a warning message.
    fn log_warn(&self, message: &str);

    /// Finish and clean up the display.
    fn finish(&self);
}

/// A no-op reporter for when progress display is disabled.
pub struct NullReporter;

impl ThemeProgress for NullReporter {
    fn set_phase(&self, _phase: ThemePhase) {}
    fn register_pages(&self, _pages: Vec<String>) {}
    fn update_page(&self, _page: &str, _status: PageStatus) {}
    fn log_info(&self, _message: &str) {}
    fn log_warn(&self, _message: &str) {}
    fn finish(&self) {}
}

/// Statistics collected during a switch.
#[derive(Debug, Default)]
struct Stats {
    pages: usize,
    components: usize,
    start_time: Option<std::time::Instant>,
}

fn phase_message(phase: &ThemePhase) -> Option<&'static str> {
    match phase {
        ThemePhase::Idle => None,
        ThemePhase::BackingUp => Some("💾 Backing up current theme..."),
        ThemePhase::Clearing => Some("🧹 Clearing editor state..."),
        ThemePhase::Applying => Some("🎨 Applying theme template..."),
        ThemePhase::Restoring => Some("♻️  Restoring theme backup..."),
        ThemePhase::Syncing => Some("🗄️  Syncing tenant data..."),
        ThemePhase::Completed => Some("✅ Completed!"),
        ThemePhase::Failed(_) => None,
    }
}

/// A simple reporter that just prints to stderr (for non-TTY).
pub struct SimpleReporter {
    stats: std::sync::RwLock<Stats>,
}

impl SimpleReporter {
    pub fn new() -> Self {
        Self {
            stats: std::sync::RwLock::new(Stats {
                start_time: Some(std::time::Instant::now()),
                ..Default::default()
            }),
        }
    }
}

impl Default for SimpleReporter {
    fn default() -> Self {
        Self::new()
    }
}

fn print_summary(stats: &Stats) {
    let duration = stats.start_time.map(|t| t.elapsed()).unwrap_or_default();
    eprintln!();
    eprintln!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    eprintln!("📊 Summary");
    eprintln!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    eprintln!("   📄 Pages:      {}", stats.pages);
    eprintln!("   🧩 Components: {}", stats.components);
    eprintln!("   ⏱️  Duration:   {:.2}s", duration.as_secs_f64());
    eprintln!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
}

impl ThemeProgress for SimpleReporter {
    fn set_phase(&self, phase: ThemePhase) {
        if let ThemePhase::Failed(ref e) = phase {
            eprintln!("❌ Failed: {e}");
            return;
        }
        if let Some(msg) = phase_message(&phase) {
            eprintln!("{msg}");
        }
    }

    fn register_pages(&self, pages: Vec<String>) {
        if let Ok(mut stats) = self.stats.write() {
            stats.pages = pages.len();
        }
        eprintln!("   Found {} pages", pages.len());
    }

    fn update_page(&self, page: &str, status: PageStatus) {
        match status {
            PageStatus::Installed { components } => {
                if let Ok(mut stats) = self.stats.write() {
                    stats.components += components;
                }
                eprintln!("   ✓ {page} ({components} components)");
            }
            PageStatus::Refreshed => eprintln!("   ↻ {page}"),
        }
    }

    fn log_info(&self, message: &str) {
        eprintln!("ℹ️  {message}");
    }

    fn log_warn(&self, message: &str) {
        eprintln!("⚠️  {message}");
    }

    fn finish(&self) {
        if let Ok(stats) = self.stats.read() {
            print_summary(&stats);
        }
    }
}

/// Fancy interactive reporter with a spinner (for TTY).
pub struct FancyReporter {
    multi: indicatif::MultiProgress,
    phase_bar: indicatif::ProgressBar,
    pages_bar: std::sync::RwLock<Option<indicatif::ProgressBar>>,
    stats: std::sync::RwLock<Stats>,
}

impl FancyReporter {
    pub fn new() -> Self {
        let multi = indicatif::MultiProgress::new();
        let phase_bar = multi.add(indicatif::ProgressBar::new_spinner());
        if let Ok(style) =
            indicatif::ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")
        {
            phase_bar.set_style(style);
        }
        phase_bar.enable_steady_tick(std::time::Duration::from_millis(100));

        Self {
            multi,
            phase_bar,
            pages_bar: std::sync::RwLock::new(None),
            stats: std::sync::RwLock::new(Stats {
                start_time: Some(std::time::Instant::now()),
                ..Default::default()
            }),
        }
    }
}

impl Default for FancyReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ThemeProgress for FancyReporter {
    fn set_phase(&self, phase: ThemePhase) {
        if let ThemePhase::Failed(ref e) = phase {
            self.phase_bar
                .finish_with_message(format!("❌ Failed: {e}"));
            return;
        }
        let Some(msg) = phase_message(&phase) else {
            return;
        };
        self.phase_bar.set_message(msg.to_string());

        if matches!(phase, ThemePhase::Completed) {
            self.phase_bar.finish_with_message(msg.to_string());
        }
    }

    fn register_pages(&self, pages: Vec<String>) {
        let total = pages.len();
        if let Ok(mut stats) = self.stats.write() {
            stats.pages = total;
        }

        let pb = self.multi.add(indicatif::ProgressBar::new(total as u64));
        if let Ok(style) = indicatif::ProgressStyle::default_bar()
            .template("   {bar:40.cyan/blue} {pos}/{len} pages")
        {
            pb.set_style(style.progress_chars("█▓▒░  "));
        }
        if let Ok(mut slot) = self.pages_bar.write() {
            *slot = Some(pb);
        }
    }

    fn update_page(&self, page: &str, status: PageStatus) {
        let PageStatus::Installed { components } = status else {
            return;
        };
        if let Ok(mut stats) = self.stats.write() {
            stats.components += components;
        }
        if let Ok(slot) = self.pages_bar.read() {
            if let Some(pb) = slot.as_ref() {
                pb.inc(1);
                pb.set_message(page.to_owned());
            }
        }
    }

    fn log_info(&self, message: &str) {
        self.multi.println(format!("ℹ️  {message}")).ok();
    }

    fn log_warn(&self, message: &str) {
        self.multi.println(format!("⚠️  {message}")).ok();
    }

    fn finish(&self) {
        if let Ok(slot) = self.pages_bar.read() {
            if let Some(pb) = slot.as_ref() {
                pb.finish_and_clear();
            }
        }
        self.phase_bar.finish_and_clear();
        if let Ok(stats) = self.stats.read() {
            print_summary(&stats);
        }
    }
}

/// Create an appropriate reporter based on terminal capabilities.
pub fn create_reporter() -> Arc<dyn ThemeProgress> {
    if console::Term::stderr().is_term() {
        Arc::new(FancyReporter::new())
    } else {
        Arc::new(SimpleReporter::new())
    }
}
