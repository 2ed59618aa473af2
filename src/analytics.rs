//! Page-view reporting.
//!
//! The router reports each resolved path (except the initial one, which the
//! host's own page load already counts) to an optional [`AnalyticsSink`].
//! Reporting is best effort: a failing sink is logged and ignored.

use crate::warn_log;
use std::error::Error;

/// Error type returned by sinks.
pub type AnalyticsError = Box<dyn Error + 'static>;

/// Receiver of page views.
pub trait AnalyticsSink {
    fn record_page_view(&self, path: &str) -> Result<(), AnalyticsError>;
}

/// Any `Fn(&str) -> Result<(), AnalyticsError>` closure is a sink.
impl<F> AnalyticsSink for F
where
    F: Fn(&str) -> Result<(), AnalyticsError>,
{
    fn record_page_view(&self, path: &str) -> Result<(), AnalyticsError> {
        self(path)
    }
}

/// Report `path`, swallowing failures.
pub(crate) fn report(sink: &dyn AnalyticsSink, path: &str) {
    if let Err(err) = sink.record_page_view(path) {
        warn_log!("Analytics sink failed to record '{}': {}", path, err);
    }
}
