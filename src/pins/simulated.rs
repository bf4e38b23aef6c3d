use super::{PinError, PinInterface};
use std::collections::HashMap;

/// In-memory output lines for `--dry-run` and tests. Every successful
/// write is recorded in order.
#[derive(Debug, Default)]
pub struct SimulatedPins {
    levels: HashMap<u32, bool>,
    writes: Vec<(u32, bool)>,
}

impl SimulatedPins {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `pin` already configured at `level`.
    pub fn with_level(mut self, pin: u32, level: bool) -> Self {
        self.levels.insert(pin, level);
        self
    }

    pub fn level(&self, pin: u32) -> Option<bool> {
        self.levels.get(&pin).copied()
    }

    pub fn writes(&self) -> &[(u32, bool)] {
        &self.writes
    }
}

impl PinInterface for SimulatedPins {
    fn setup_output(&mut self, pin: u32) -> Result<(), PinError> {
        self.levels.entry(pin).or_insert(false);
        Ok(())
    }

    fn read(&mut self, pin: u32) -> Result<bool, PinError> {
        self.level(pin).ok_or(PinError::NotConfigured(pin))
    }

    fn write(&mut self, pin: u32, value: bool) -> Result<(), PinError> {
        let level = self
            .levels
            .get_mut(&pin)
            .ok_or(PinError::NotConfigured(pin))?;
        *level = value;
        self.writes.push((pin, value));
        tracing::trace!(pin, value, "Simulated GPIO write");
        Ok(())
    }
}
