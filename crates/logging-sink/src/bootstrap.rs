//! crates/logging-sink/src/bootstrap.rs
//!
//! Ready-made default roots for applications.
//!
//! [`ScreenLog`] writes to standard error. [`DualLog`] additionally appends a
//! verbose rendering to a file, with independent thresholds for the two
//! destinations. Both build a root (empty-named) Log and either return it or
//! install it as the process-wide default.

use std::path::Path;
use std::sync::Arc;

use logging::levels::{Level, PASS_ALL};
use logging::{Log, LogDestination, TextFormatter, ThresholdRegistry, WriterSink};

use crate::error::SinkError;
use crate::file::FileSink;
use crate::guard::DefaultLogGuard;

const fn formatter(verbose: bool) -> TextFormatter {
    if verbose {
        TextFormatter::verbose()
    } else {
        TextFormatter::brief()
    }
}

/// Root Log writing to standard error.
#[derive(Clone, Copy, Debug)]
pub struct ScreenLog;

impl ScreenLog {
    /// Returns a standard-error destination.
    ///
    /// With `verbose`, records carry a timestamp and list their properties.
    #[must_use]
    pub fn destination(verbose: bool, threshold: Level) -> LogDestination {
        LogDestination::new(WriterSink::stderr(), formatter(verbose), threshold)
    }

    /// Builds a root Log with a single screen destination.
    #[must_use]
    pub fn build(verbose: bool) -> Log {
        let mut root = Log::new("");
        root.add_destination(Arc::new(Self::destination(verbose, PASS_ALL)));
        root
    }

    /// Installs a screen root as the default and returns the previous one.
    pub fn install(verbose: bool) -> Log {
        Log::set_default(Self::build(verbose))
    }

    /// Installs a screen root as the default until the guard is dropped.
    pub fn install_scoped(verbose: bool) -> DefaultLogGuard {
        DefaultLogGuard::install(Self::build(verbose))
    }
}

/// Root Log writing to standard error and to a file.
///
/// The screen destination uses the brief format and the file destination the
/// verbose one. Building a dual root also sets the root threshold in the
/// registry to the lower of the two destination thresholds, so records meant
/// for the more permissive destination are not stopped by the Log itself.
///
/// # Examples
///
/// ```
/// use logging::levels::{DEBUG, WARN};
/// use logging::ThresholdRegistry;
/// use logging_sink::DualLog;
/// use std::sync::Arc;
///
/// let dir = tempfile::tempdir().unwrap();
/// let path = dir.path().join("pipeline.log");
/// let registry = Arc::new(ThresholdRegistry::new());
///
/// let root = DualLog::build_with_registry(&path, DEBUG, WARN, registry).unwrap();
/// root.child("stage").debug("file only");
///
/// let contents = std::fs::read_to_string(&path).unwrap();
/// assert!(contents.contains("stage: file only"));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct DualLog;

impl DualLog {
    /// Builds a dual root on the global registry.
    pub fn build(
        path: impl AsRef<Path>,
        file_threshold: Level,
        screen_threshold: Level,
    ) -> Result<Log, SinkError> {
        Self::build_with_registry(
            path,
            file_threshold,
            screen_threshold,
            Arc::clone(ThresholdRegistry::global()),
        )
    }

    /// Builds a dual root resolving thresholds through `registry`.
    pub fn build_with_registry(
        path: impl AsRef<Path>,
        file_threshold: Level,
        screen_threshold: Level,
        registry: Arc<ThresholdRegistry>,
    ) -> Result<Log, SinkError> {
        let file = FileSink::open(path)?;
        let mut root = Log::with_registry("", registry);
        root.add_destination(Arc::new(ScreenLog::destination(false, screen_threshold)));
        root.add_destination(Arc::new(LogDestination::new(
            file,
            TextFormatter::verbose(),
            file_threshold,
        )));
        root.set_threshold(file_threshold.min(screen_threshold));
        Ok(root)
    }

    /// Installs a dual root as the default and returns the previous one.
    pub fn install(
        path: impl AsRef<Path>,
        file_threshold: Level,
        screen_threshold: Level,
    ) -> Result<Log, SinkError> {
        let root = Self::build(path, file_threshold, screen_threshold)?;
        Ok(Log::set_default(root))
    }

    /// Installs a dual root as the default until the guard is dropped.
    pub fn install_scoped(
        path: impl AsRef<Path>,
        file_threshold: Level,
        screen_threshold: Level,
    ) -> Result<DefaultLogGuard, SinkError> {
        let root = Self::build(path, file_threshold, screen_threshold)?;
        Ok(DefaultLogGuard::install(root))
    }
}
