//! ObservationScope for automatic open/close logging
//!
//! - Logs the opening event on creation
//! - Logs a closing event when completed or failed
//! - Logs the abandonment event if dropped while still open

use std::time::Instant;

use super::events::Event;
use super::logger::Logger;

/// A scope that logs the lifecycle of one operation.
///
/// Every line written by the scope carries the fields given at creation
/// plus `elapsed_ms`.
///
/// ```ignore
/// let scope = ObservationScope::new(
///     Event::ScanOpen,
///     Event::ScanAbandoned,
///     vec![("table", "user".to_string())],
/// );
/// scope.complete(Event::ScanComplete, &[("rows", "2")]);
/// ```
#[derive(Debug)]
pub struct ObservationScope {
    abandoned: Event,
    completed: bool,
    fields: Vec<(&'static str, String)>,
    started: Instant,
}

impl ObservationScope {
    /// Opens the scope and logs `opened` immediately
    pub fn new(opened: Event, abandoned: Event, fields: Vec<(&'static str, String)>) -> Self {
        let scope = Self {
            abandoned,
            completed: false,
            fields,
            started: Instant::now(),
        };
        scope.emit(opened, &[]);
        scope
    }

    /// Closes the scope with `event`
    pub fn complete(mut self, event: Event, extra_fields: &[(&str, &str)]) {
        self.close(event, extra_fields);
    }

    /// Closes the scope with `event` and a failure reason
    pub fn fail(mut self, event: Event, reason: &str) {
        self.close(event, &[("reason", reason)]);
    }

    /// Check if the scope has been closed
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Milliseconds since the scope was opened
    pub fn elapsed_ms(&self) -> u128 {
        self.started.elapsed().as_millis()
    }

    fn close(&mut self, event: Event, extra_fields: &[(&str, &str)]) {
        self.completed = true;
        let elapsed = self.elapsed_ms().to_string();
        let mut fields = vec![("elapsed_ms", elapsed.as_str())];
        fields.extend(extra_fields.iter().copied());
        self.emit(event, &fields);
    }

    fn emit(&self, event: Event, extra_fields: &[(&str, &str)]) {
        let mut fields: Vec<(&str, &str)> = self
            .fields
            .iter()
            .map(|(k, v)| (*k, v.as_str()))
            .collect();
        fields.extend(extra_fields.iter().copied());
        Logger::event(event, &fields);
    }
}

impl Drop for ObservationScope {
    fn drop(&mut self) {
        if !self.completed {
            let abandoned = self.abandoned;
            self.close(abandoned, &[("reason", "dropped before completion")]);
        }
    }
}
