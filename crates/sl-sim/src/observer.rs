//! Run observer trait for progress reporting.

use sl_core::TowerId;

/// Callbacks invoked by [`LineRunner::run`][crate::LineRunner::run] at key
/// points of a line's processing.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  Tower callbacks fire after the fan-in
/// join, in line order, regardless of how the fan-out was scheduled.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter;
///
/// impl RunObserver for ProgressPrinter {
///     fn on_line_start(&mut self, event: &str, line: &str, ntowers: usize) {
///         println!("{event}/{line}: {ntowers} towers");
///     }
/// }
/// ```
pub trait RunObserver {
    /// Called before any processing of one (event, line) pair.
    fn on_line_start(&mut self, _event: &str, _line: &str, _ntowers: usize) {}

    /// Called once per tower after its fan-out result has been joined.
    fn on_tower_done(&mut self, _tower: TowerId) {}

    /// Called after aggregation completes for one (event, line) pair.
    /// Not called when the line fails — the error itself is the report.
    fn on_line_end(&mut self, _event: &str, _line: &str) {}
}

/// A [`RunObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl RunObserver for NoopObserver {}
