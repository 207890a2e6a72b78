//! Scripted [`HttpProbe`] for deterministic reachability tests.

use fieldgroup_core::{HttpProbe, ProbeError};
use std::cell::RefCell;
use std::collections::BTreeMap;

/// Answers each URL from a script and records every call.
///
/// URLs without a scripted answer get the fallback, which defaults to a
/// transport error.
#[derive(Debug)]
pub struct ScriptedProbe {
    responses: BTreeMap<String, Result<u16, ProbeError>>,
    fallback: Result<u16, ProbeError>,
    calls: RefCell<Vec<String>>,
}

impl Default for ScriptedProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedProbe {
    /// Probe with an empty script.
    pub fn new() -> Self {
        Self {
            responses: BTreeMap::new(),
            fallback: Err(ProbeError::Transport("connection refused".to_owned())),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Answer `url` with `status`.
    #[must_use]
    pub fn with_status(mut self, url: impl Into<String>, status: u16) -> Self {
        self.responses.insert(url.into(), Ok(status));
        self
    }

    /// Answer `url` with `error`.
    #[must_use]
    pub fn with_error(mut self, url: impl Into<String>, error: ProbeError) -> Self {
        self.responses.insert(url.into(), Err(error));
        self
    }

    /// Answer unscripted URLs with `outcome`.
    #[must_use]
    pub fn with_fallback(mut self, outcome: Result<u16, ProbeError>) -> Self {
        self.fallback = outcome;
        self
    }

    /// URLs requested so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// Number of requests so far.
    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl HttpProbe for ScriptedProbe {
    fn get(&self, url: &str) -> Result<u16, ProbeError> {
        self.calls.borrow_mut().push(url.to_owned());
        self.responses
            .get(url)
            .cloned()
            .unwrap_or_else(|| self.fallback.clone())
    }
}
