//! Synchronization between the input record and an addressable location.
//!
//! On startup the input is hydrated from the location's query string (if
//! it carries any recognized key). After that every change is mirrored
//! back. Without a location, mirroring is a no-op.

use crate::{compute, query, DosageInput, DosageOutput, Field, Result};

/// Something with a query string that can be read and replaced
///
/// The address bar of a browser is the canonical example.
pub trait Location {
    /// Current query string, without the leading `?`
    fn query(&self) -> Option<String>;

    /// Replace the query string in place (no new history entry)
    fn replace_query(&mut self, query: &str);
}

/// In-memory location
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryLocation {
    query: Option<String>,
    writes: usize,
}

impl MemoryLocation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            writes: 0,
        }
    }

    /// Number of `replace_query` calls so far
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl Location for MemoryLocation {
    fn query(&self) -> Option<String> {
        self.query.clone()
    }

    fn replace_query(&mut self, query: &str) {
        self.query = Some(query.to_string());
        self.writes += 1;
    }
}

/// Mirrors a `DosageInput` into an optional `Location`
#[derive(Debug)]
pub struct Synchronizer<L> {
    location: Option<L>,
}

impl<L: Location> Synchronizer<L> {
    pub fn new(location: Option<L>) -> Self {
        Self { location }
    }

    /// A synchronizer for environments without an addressable location
    pub fn detached() -> Self {
        Self { location: None }
    }

    pub fn location(&self) -> Option<&L> {
        self.location.as_ref()
    }

    /// Initial input: decoded from the location if it has a recognized
    /// key, otherwise `defaults`
    pub fn hydrate(&self, defaults: &DosageInput) -> DosageInput {
        match self.location.as_ref().and_then(|l| l.query()) {
            Some(q) if query::has_recognized_key(&q) => {
                tracing::debug!("Hydrating input from query {:?}", q);
                query::deserialize(&q, defaults)
            }
            _ => *defaults,
        }
    }

    /// Mirror `input` into the location
    ///
    /// Skips the write when the query is already current. Returns whether
    /// the location was updated.
    pub fn publish(&mut self, input: &DosageInput) -> bool {
        let Some(location) = self.location.as_mut() else {
            tracing::trace!("No location available, skipping query update");
            return false;
        };

        let next = query::serialize(input);
        if location.query().as_deref() == Some(next.as_str()) {
            return false;
        }

        location.replace_query(&next);
        tracing::debug!("Updated location query to {:?}", next);
        true
    }
}

/// Live dosage state: the current input plus its synchronizer
///
/// Outputs are never cached; every call to [`DosageSession::output`]
/// recomputes the whole chain from the current input.
#[derive(Debug)]
pub struct DosageSession<L> {
    input: DosageInput,
    sync: Synchronizer<L>,
}

impl<L: Location> DosageSession<L> {
    /// Start a session, hydrating from the location once
    pub fn start(sync: Synchronizer<L>, defaults: &DosageInput) -> Self {
        let input = sync.hydrate(defaults);
        Self { input, sync }
    }

    pub fn input(&self) -> &DosageInput {
        &self.input
    }

    pub fn synchronizer(&self) -> &Synchronizer<L> {
        &self.sync
    }

    /// Set a field from freeform text; unparsable text becomes NaN
    pub fn set_field(&mut self, field: Field, text: &str) {
        let value = text.trim().parse::<f64>().unwrap_or(f64::NAN);
        self.set_value(field, value);
    }

    /// Set a field to a numeric value and mirror the change
    pub fn set_value(&mut self, field: Field, value: f64) {
        field.set(&mut self.input, value);
        self.sync.publish(&self.input);
    }

    /// Replace the whole input and mirror the change
    pub fn replace(&mut self, input: DosageInput) {
        self.input = input;
        self.sync.publish(&self.input);
    }

    /// Derived values for the current input
    pub fn output(&self) -> Result<DosageOutput> {
        compute(&self.input)
    }
}
