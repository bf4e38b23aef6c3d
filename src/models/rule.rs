use super::{Condition, LastSample};
use crate::config::RuleConfig;
use crate::error::{Result, TempMonError};

/// One monitored output: drive `pin` to `output_value` when the sampled
/// temperature of `source` satisfies `condition` against `threshold_deg_c`.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub pin: u32,
    pub output_value: bool,
    pub condition: Condition,
    pub threshold_deg_c: f64,
    pub source: String,
    pub match_on_terminate: bool,
    pub last_sample: LastSample,
}

impl Rule {
    pub fn new(
        pin: u32,
        output_value: bool,
        condition: Condition,
        threshold_deg_c: f64,
        source: &str,
    ) -> Self {
        Self {
            pin,
            output_value,
            condition,
            threshold_deg_c,
            source: source.to_string(),
            match_on_terminate: false,
            last_sample: LastSample::Unset,
        }
    }

    pub fn with_match_on_terminate(mut self, enabled: bool) -> Self {
        self.match_on_terminate = enabled;
        self
    }
}

impl From<RuleConfig> for Rule {
    fn from(config: RuleConfig) -> Self {
        Rule::new(
            config.wpi_pin,
            config.output_val,
            Condition::parse(&config.condition),
            config.temperature_deg_c,
            &config.temperature_src,
        )
        .with_match_on_terminate(config.match_on_terminate)
    }
}

/// The ordered, fixed-size collection of rules evaluated each cycle.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Parse raw JSON configuration into rules, keeping file order.
    ///
    /// `origin` names where the text came from and is only used in errors.
    /// An empty array is rejected: a monitor with nothing to watch is a
    /// configuration mistake.
    pub fn build(raw_config: &str, origin: &str) -> Result<Self> {
        let entries: Vec<RuleConfig> = serde_json::from_str(raw_config)
            .map_err(|e| TempMonError::ConfigInvalid(format!("{}: {}", origin, e)))?;

        Self::from_rules(entries.into_iter().map(Rule::from).collect(), origin)
    }

    pub fn from_rules(rules: Vec<Rule>, origin: &str) -> Result<Self> {
        if rules.is_empty() {
            return Err(TempMonError::EmptyRuleSet(origin.to_string()));
        }
        Ok(Self { rules })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Rule> {
        self.rules.iter_mut()
    }

    /// Distinct output lines in first-seen order.
    pub fn pins(&self) -> Vec<u32> {
        let mut pins = Vec::with_capacity(self.rules.len());
        for rule in &self.rules {
            if !pins.contains(&rule.pin) {
                pins.push(rule.pin);
            }
        }
        pins
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {
            "wpi_pin": 17,
            "output_val": true,
            "condition": "<",
            "temperature_degC": 30.0,
            "temperature_src": "/sys/class/thermal/thermal_zone0/temp"
        },
        {
            "wpi_pin": 4,
            "output_val": false,
            "condition": ">=",
            "temperature_degC": 55,
            "temperature_src": "/sys/bus/w1/devices/28-0000/temperature",
            "match_on_terminate": true,
            "comment": "fan off on exit"
        }
    ]"#;

    #[test]
    fn build_keeps_order_and_fields() {
        let set = RuleSet::build(SAMPLE, "config.json").unwrap();
        assert_eq!(set.len(), 2);

        let rules: Vec<&Rule> = set.iter().collect();
        assert_eq!(rules[0].pin, 17);
        assert!(rules[0].output_value);
        assert_eq!(rules[0].condition, Condition::Lt);
        assert_eq!(rules[0].threshold_deg_c, 30.0);
        assert_eq!(rules[0].source, "/sys/class/thermal/thermal_zone0/temp");
        assert!(!rules[0].match_on_terminate);
        assert_eq!(rules[0].last_sample, LastSample::Unset);

        assert_eq!(rules[1].pin, 4);
        assert!(!rules[1].output_value);
        assert_eq!(rules[1].condition, Condition::Ge);
        assert_eq!(rules[1].threshold_deg_c, 55.0);
        assert!(rules[1].match_on_terminate);
    }

    #[test]
    fn build_accepts_unknown_condition() {
        let raw = r#"[{"wpi_pin": 1, "output_val": true, "condition": "!=",
                       "temperature_degC": 1.0, "temperature_src": "s1"}]"#;
        let set = RuleSet::build(raw, "inline").unwrap();
        let rule = set.iter().next().unwrap();
        assert_eq!(rule.condition, Condition::Unsupported("!=".into()));
    }

    #[test]
    fn build_rejects_empty_array() {
        let err = RuleSet::build("[]", "./config.json").unwrap_err();
        assert!(
            matches!(err, TempMonError::EmptyRuleSet(ref origin) if origin == "./config.json")
        );
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn build_rejects_non_sequence() {
        let err = RuleSet::build(r#"{"wpi_pin": 1}"#, "inline").unwrap_err();
        assert!(matches!(err, TempMonError::ConfigInvalid(_)));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn build_rejects_missing_required_field() {
        let raw = r#"[{"wpi_pin": 1, "output_val": true, "condition": "<",
                       "temperature_src": "s1"}]"#;
        let err = RuleSet::build(raw, "inline").unwrap_err();
        assert!(err.to_string().contains("temperature_degC"));
    }

    #[test]
    fn build_rejects_wrong_field_types() {
        let raw = r#"[{"wpi_pin": "17", "output_val": true, "condition": "<",
                       "temperature_degC": 1.0, "temperature_src": "s1"}]"#;
        assert!(matches!(
            RuleSet::build(raw, "inline"),
            Err(TempMonError::ConfigInvalid(_))
        ));

        let raw = r#"[{"wpi_pin": 17, "output_val": 1, "condition": "<",
                       "temperature_degC": 1.0, "temperature_src": "s1"}]"#;
        assert!(matches!(
            RuleSet::build(raw, "inline"),
            Err(TempMonError::ConfigInvalid(_))
        ));
    }

    #[test]
    fn build_rejects_malformed_json() {
        assert!(matches!(
            RuleSet::build("[{", "inline"),
            Err(TempMonError::ConfigInvalid(_))
        ));
    }

    #[test]
    fn pins_are_deduplicated_in_order() {
        let set = RuleSet::from_rules(
            vec![
                Rule::new(17, true, Condition::Lt, 30.0, "a"),
                Rule::new(4, false, Condition::Gt, 40.0, "b"),
                Rule::new(17, false, Condition::Ge, 35.0, "a"),
            ],
            "inline",
        )
        .unwrap();
        assert_eq!(set.pins(), vec![17, 4]);
    }

    #[test]
    fn builder_sets_terminate_flag() {
        let rule = Rule::new(2, true, Condition::Eq, 0.0, "s").with_match_on_terminate(true);
        assert!(rule.match_on_terminate);
    }
}
