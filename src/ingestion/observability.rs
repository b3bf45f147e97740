use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{LoadErrorKind, LoadingError};

use super::unified::LoadFormat;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LoadSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal, e.g. a file skipped by a lenient directory load).
    Warning,
    /// Error-level event (operation failed).
    Error,
    /// Critical error (missing paths, I/O failures).
    Critical,
}

/// Context about a load attempt.
#[derive(Debug, Clone)]
pub struct LoadContext {
    /// The file or directory being loaded.
    pub path: PathBuf,
    /// Format used for loading.
    pub format: LoadFormat,
}

/// Minimal stats reported on a successful load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadStats {
    /// Number of loaded rows.
    pub rows: usize,
}

/// Observer interface for load outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait LoadObserver: Send + Sync {
    /// Called when a load succeeds.
    fn on_success(&self, _ctx: &LoadContext, _stats: LoadStats) {}

    /// Called when a load fails, or when a lenient directory load skips a file.
    fn on_failure(&self, _ctx: &LoadContext, _severity: LoadSeverity, _error: &LoadingError) {}

    /// Called when a failure meets an alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &LoadContext, severity: LoadSeverity, error: &LoadingError) {
        self.on_failure(ctx, severity, error)
    }
}

/// Severity of a failed load.
pub fn severity_for_error(e: &LoadingError) -> LoadSeverity {
    match e.kind() {
        LoadErrorKind::PathNotFound | LoadErrorKind::Io => LoadSeverity::Critical,
        _ => LoadSeverity::Error,
    }
}

/// Observer plus alert threshold, as carried by loaders.
#[derive(Clone)]
pub(crate) struct Reporter {
    pub(crate) observer: Option<Arc<dyn LoadObserver>>,
    pub(crate) alert_at_or_above: LoadSeverity,
}

impl Default for Reporter {
    fn default() -> Self {
        Self {
            observer: None,
            alert_at_or_above: LoadSeverity::Critical,
        }
    }
}

impl fmt::Debug for Reporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reporter")
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Reporter {
    /// Report the outcome of one load.
    pub(crate) fn report<T>(
        &self,
        ctx: impl FnOnce() -> LoadContext,
        result: &Result<T, LoadingError>,
        rows: impl FnOnce(&T) -> usize,
    ) {
        let Some(obs) = self.observer.as_ref() else {
            return;
        };
        let ctx = ctx();
        match result {
            Ok(v) => obs.on_success(&ctx, LoadStats { rows: rows(v) }),
            Err(e) => self.failure(obs.as_ref(), &ctx, severity_for_error(e), e),
        }
    }

    /// Report a skipped file (lenient aggregation).
    pub(crate) fn skipped(&self, ctx: &LoadContext, error: &LoadingError) {
        if let Some(obs) = self.observer.as_ref() {
            self.failure(obs.as_ref(), ctx, LoadSeverity::Warning, error);
        }
    }

    fn failure(&self, obs: &dyn LoadObserver, ctx: &LoadContext, sev: LoadSeverity, e: &LoadingError) {
        obs.on_failure(ctx, sev, e);
        if sev >= self.alert_at_or_above {
            obs.on_alert(ctx, sev, e);
        }
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn LoadObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn LoadObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl LoadObserver for CompositeObserver {
    fn on_success(&self, ctx: &LoadContext, stats: LoadStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &LoadContext, severity: LoadSeverity, error: &LoadingError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &LoadContext, severity: LoadSeverity, error: &LoadingError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Logs load events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl LoadObserver for StdErrObserver {
    fn on_success(&self, ctx: &LoadContext, stats: LoadStats) {
        eprintln!(
            "[load][ok] format={:?} path={} rows={}",
            ctx.format,
            ctx.path.display(),
            stats.rows
        );
    }

    fn on_failure(&self, ctx: &LoadContext, severity: LoadSeverity, error: &LoadingError) {
        eprintln!(
            "[load][{:?}] format={:?} path={} err={}",
            severity,
            ctx.format,
            ctx.path.display(),
            error
        );
    }

    fn on_alert(&self, ctx: &LoadContext, severity: LoadSeverity, error: &LoadingError) {
        eprintln!(
            "[ALERT][load][{:?}] format={:?} path={} err={}",
            severity,
            ctx.format,
            ctx.path.display(),
            error
        );
    }
}

/// Emits load events through `tracing`. Installing a subscriber is up to the host.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl LoadObserver for TracingObserver {
    fn on_success(&self, ctx: &LoadContext, stats: LoadStats) {
        tracing::info!(
            format = ?ctx.format,
            path = %ctx.path.display(),
            rows = stats.rows,
            "load succeeded"
        );
    }

    fn on_failure(&self, ctx: &LoadContext, severity: LoadSeverity, error: &LoadingError) {
        match severity {
            LoadSeverity::Info => tracing::info!(
                format = ?ctx.format,
                path = %ctx.path.display(),
                error = %error,
                "load event"
            ),
            LoadSeverity::Warning => tracing::warn!(
                format = ?ctx.format,
                path = %ctx.path.display(),
                error = %error,
                "load skipped"
            ),
            LoadSeverity::Error | LoadSeverity::Critical => tracing::error!(
                severity = ?severity,
                format = ?ctx.format,
                path = %ctx.path.display(),
                error = %error,
                "load failed"
            ),
        }
    }

    fn on_alert(&self, ctx: &LoadContext, severity: LoadSeverity, error: &LoadingError) {
        tracing::error!(
            alert = true,
            severity = ?severity,
            format = ?ctx.format,
            path = %ctx.path.display(),
            error = %error,
            "load alert"
        );
    }
}

/// Appends load events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl LoadObserver for FileObserver {
    fn on_success(&self, ctx: &LoadContext, stats: LoadStats) {
        self.append_line(&format!(
            "{} ok format={:?} path={} rows={}",
            unix_ts(),
            ctx.format,
            ctx.path.display(),
            stats.rows
        ));
    }

    fn on_failure(&self, ctx: &LoadContext, severity: LoadSeverity, error: &LoadingError) {
        self.append_line(&format!(
            "{} fail severity={:?} format={:?} path={} err={}",
            unix_ts(),
            severity,
            ctx.format,
            ctx.path.display(),
            error
        ));
    }

    fn on_alert(&self, ctx: &LoadContext, severity: LoadSeverity, error: &LoadingError) {
        self.append_line(&format!(
            "{} ALERT severity={:?} format={:?} path={} err={}",
            unix_ts(),
            severity,
            ctx.format,
            ctx.path.display(),
            error
        ));
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
