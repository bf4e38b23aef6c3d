use super::ShutdownFlag;
use crate::datasources::TemperatureSource;
use crate::error::{Result, TempMonError};
use crate::models::{Reading, Rule, RuleSet};
use crate::pins::PinInterface;
use std::time::Duration;

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(2);
pub const DEFAULT_SLICE: Duration = Duration::from_millis(50);
const MIN_SLICE: Duration = Duration::from_millis(1);

/// Polling cadence. The inter-cycle sleep is split into `slice`-sized
/// steps so a shutdown request is noticed within one slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopTiming {
    pub interval: Duration,
    pub slice: Duration,
}

impl LoopTiming {
    pub fn new(interval: Duration, slice: Duration) -> Self {
        Self {
            interval,
            slice: slice.max(MIN_SLICE),
        }
    }
}

impl Default for LoopTiming {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL, DEFAULT_SLICE)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    ShuttingDown,
    Stopped,
}

/// What happened to one rule during one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleOutcome {
    /// The output was written.
    Fired { value: bool, on_terminate: bool },
    /// The rule matched but the output was already at the target level.
    AlreadyAtTarget,
    NoMatch,
    /// `first` is set on the pass where the source went away.
    SourceUnavailable { first: bool },
    UnsupportedCondition,
    /// Reading or writing the output line failed. The sample is not
    /// recorded, so the rule is retried next cycle even on a steady reading.
    OutputError,
}

pub struct Monitor<S, P> {
    rules: RuleSet,
    source: S,
    pins: P,
    shutdown: ShutdownFlag,
    timing: LoopTiming,
    state: LoopState,
    passes: u64,
}

impl<S: TemperatureSource, P: PinInterface> Monitor<S, P> {
    pub fn new(
        rules: RuleSet,
        source: S,
        pins: P,
        shutdown: ShutdownFlag,
        timing: LoopTiming,
    ) -> Self {
        Self {
            rules,
            source,
            pins,
            shutdown,
            timing,
            state: LoopState::Running,
            passes: 0,
        }
    }

    /// Configure every referenced line as an output.
    pub fn initialize(&mut self) -> Result<()> {
        let pins = self.rules.pins();
        for pin in &pins {
            self.pins
                .setup_output(*pin)
                .map_err(TempMonError::OutputInit)?;
        }
        tracing::debug!(outputs = ?pins, "Outputs initialized");
        Ok(())
    }

    /// Poll until shutdown is requested, then run one final pass that
    /// honours `match_on_terminate` rules and stop. Returns immediately
    /// once the monitor has stopped.
    pub async fn run(&mut self) {
        if self.state == LoopState::Stopped {
            return;
        }

        tracing::debug!(
            rules = self.rules.len(),
            interval_ms = self.timing.interval.as_millis() as u64,
            "Monitor loop starting"
        );

        loop {
            if self.state == LoopState::Running && self.shutdown.is_requested() {
                self.state = LoopState::ShuttingDown;
            }

            self.run_pass().await;

            if self.state == LoopState::ShuttingDown {
                self.state = LoopState::Stopped;
                break;
            }

            self.sleep_until_next_cycle().await;
        }
    }

    /// Evaluate every rule once, in configuration order.
    pub async fn run_pass(&mut self) -> Vec<RuleOutcome> {
        let terminating = self.state == LoopState::ShuttingDown;
        let mut outcomes = Vec::with_capacity(self.rules.len());

        for rule in self.rules.iter_mut() {
            let reading = self.source.read(&rule.source).await;
            let outcome = evaluate_rule(rule, reading, terminating, &mut self.pins);
            if outcome != RuleOutcome::OutputError {
                rule.last_sample = reading.into();
            }
            outcomes.push(outcome);
        }

        self.passes += 1;
        outcomes
    }

    async fn sleep_until_next_cycle(&self) {
        let mut remaining = self.timing.interval;
        while !remaining.is_zero() && !self.shutdown.is_requested() {
            let step = remaining.min(self.timing.slice);
            tokio::time::sleep(step).await;
            remaining -= step;
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn passes(&self) -> u64 {
        self.passes
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn pins(&self) -> &P {
        &self.pins
    }
}

fn evaluate_rule<P: PinInterface>(
    rule: &Rule,
    reading: Reading,
    terminating: bool,
    pins: &mut P,
) -> RuleOutcome {
    let Some(degrees) = reading.degrees() else {
        let first = !rule.last_sample.is_unavailable();
        if first {
            tracing::warn!(
                "Cannot read current temperature for wPi pin {} {}",
                rule.pin,
                rule.source
            );
        }
        return RuleOutcome::SourceUnavailable { first };
    };

    let Some(holds) = rule.condition.holds(degrees, rule.threshold_deg_c) else {
        tracing::warn!(
            "Not supported comparison operation for wPi pin {} {}",
            rule.pin,
            rule.condition
        );
        return RuleOutcome::UnsupportedCondition;
    };

    let terminate_match = terminating && rule.match_on_terminate;
    let condition_match = rule.last_sample.differs_from(reading) && holds;

    if !terminate_match && !condition_match {
        return RuleOutcome::NoMatch;
    }

    apply_output(rule, reading, terminate_match, pins)
}

fn apply_output<P: PinInterface>(
    rule: &Rule,
    reading: Reading,
    terminate_match: bool,
    pins: &mut P,
) -> RuleOutcome {
    let current = match pins.read(rule.pin) {
        Ok(level) => level,
        Err(e) => {
            tracing::warn!(error = %e, "Cannot read output state for wPi pin {}", rule.pin);
            return RuleOutcome::OutputError;
        }
    };

    if current == rule.output_value {
        return RuleOutcome::AlreadyAtTarget;
    }

    if let Err(e) = pins.write(rule.pin, rule.output_value) {
        tracing::warn!(error = %e, "Cannot drive wPi pin {}", rule.pin);
        return RuleOutcome::OutputError;
    }

    tracing::info!(
        "{} {} {} :: wPi pin {} = {}{}",
        reading,
        rule.condition,
        rule.threshold_deg_c,
        rule.pin,
        u8::from(rule.output_value),
        if terminate_match {
            " :: TERMINATION TRIGGERED"
        } else {
            ""
        }
    );

    RuleOutcome::Fired {
        value: rule.output_value,
        on_terminate: terminate_match,
    }
}
