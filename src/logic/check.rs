use crate::datasources::TemperatureSource;
use crate::models::{Reading, Rule, RuleSet};

/// One line of `--check` output: a rule and what its source reads right now.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckLine {
    pub pin: u32,
    pub source: String,
    pub reading: Reading,
    pub condition: String,
    pub threshold_deg_c: f64,
    pub output_value: bool,
    pub match_on_terminate: bool,
    /// `None` when the reading is unavailable or the operator unsupported.
    pub condition_holds: Option<bool>,
}

impl CheckLine {
    fn new(rule: &Rule, reading: Reading) -> Self {
        let condition_holds = reading
            .degrees()
            .and_then(|d| rule.condition.holds(d, rule.threshold_deg_c));

        Self {
            pin: rule.pin,
            source: rule.source.clone(),
            reading,
            condition: rule.condition.to_string(),
            threshold_deg_c: rule.threshold_deg_c,
            output_value: rule.output_value,
            match_on_terminate: rule.match_on_terminate,
            condition_holds,
        }
    }
}

impl std::fmt::Display for CheckLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let verdict = match self.condition_holds {
            Some(true) => "match",
            Some(false) => "no match",
            None if !self.reading.is_available() => "source unavailable",
            None => "unsupported condition",
        };
        write!(
            f,
            "wPi pin {} <- {}: {} {} {} => {} ({}){}",
            self.pin,
            self.source,
            self.reading,
            self.condition,
            self.threshold_deg_c,
            u8::from(self.output_value),
            verdict,
            if self.match_on_terminate {
                " [on terminate]"
            } else {
                ""
            }
        )
    }
}

/// Read every rule's source once without touching any output.
pub async fn sample_all<S: TemperatureSource>(rules: &RuleSet, source: &S) -> Vec<CheckLine> {
    let mut lines = Vec::with_capacity(rules.len());
    for rule in rules.iter() {
        let reading = source.read(&rule.source).await;
        lines.push(CheckLine::new(rule, reading));
    }
    lines
}
