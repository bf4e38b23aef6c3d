/// Comparison applied between a sampled temperature and a rule threshold.
///
/// Configuration strings outside the five supported operators are kept as
/// [`Condition::Unsupported`] so the rule can be reported every cycle
/// instead of failing startup.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Eq,
    Lt,
    Gt,
    Le,
    Ge,
    Unsupported(String),
}

impl Condition {
    pub fn parse(s: &str) -> Self {
        match s {
            "=" => Condition::Eq,
            "<" => Condition::Lt,
            ">" => Condition::Gt,
            "<=" => Condition::Le,
            ">=" => Condition::Ge,
            other => Condition::Unsupported(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Condition::Eq => "=",
            Condition::Lt => "<",
            Condition::Gt => ">",
            Condition::Le => "<=",
            Condition::Ge => ">=",
            Condition::Unsupported(raw) => raw,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Condition::Unsupported(_))
    }

    /// Evaluate `current <op> threshold`. `None` for an unsupported operator.
    pub fn holds(&self, current: f64, threshold: f64) -> Option<bool> {
        match self {
            Condition::Eq => Some(current == threshold),
            Condition::Lt => Some(current < threshold),
            Condition::Gt => Some(current > threshold),
            Condition::Le => Some(current <= threshold),
            Condition::Ge => Some(current >= threshold),
            Condition::Unsupported(_) => None,
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
