/// Result of one attempt to read a temperature source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading {
    Degrees(f64),
    Unavailable,
}

impl Reading {
    /// Convert a raw millidegree value (as exposed by thermal zones and
    /// 1-wire sensors) to degrees.
    pub fn from_millidegrees(raw: i64) -> Self {
        Reading::Degrees(raw as f64 / 1000.0)
    }

    pub fn degrees(&self) -> Option<f64> {
        match self {
            Reading::Degrees(d) => Some(*d),
            Reading::Unavailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Reading::Degrees(_))
    }
}

impl std::fmt::Display for Reading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Reading::Degrees(d) => write!(f, "{}", d),
            Reading::Unavailable => write!(f, "unavailable"),
        }
    }
}

/// Previous sample remembered per rule for edge detection.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum LastSample {
    /// Nothing read yet. Compares like a 0.0 reading, so a genuine first
    /// sample of exactly zero degrees counts as unchanged.
    #[default]
    Unset,
    Unavailable,
    Degrees(f64),
}

impl LastSample {
    const UNSET_SENTINEL: f64 = 0.0;

    /// Whether `reading` counts as a new value relative to this sample.
    ///
    /// An unavailable side never compares equal, so a rule whose source
    /// comes back is re-evaluated on the first good reading.
    pub fn differs_from(&self, reading: Reading) -> bool {
        match (self, reading) {
            (_, Reading::Unavailable) | (LastSample::Unavailable, _) => true,
            (LastSample::Unset, Reading::Degrees(d)) => d != Self::UNSET_SENTINEL,
            (LastSample::Degrees(prev), Reading::Degrees(d)) => *prev != d,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, LastSample::Unavailable)
    }
}

impl From<Reading> for LastSample {
    fn from(reading: Reading) -> Self {
        match reading {
            Reading::Degrees(d) => LastSample::Degrees(d),
            Reading::Unavailable => LastSample::Unavailable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn millidegrees_scale_to_degrees() {
        assert_eq!(Reading::from_millidegrees(35000), Reading::Degrees(35.0));
        assert_eq!(Reading::from_millidegrees(-1500), Reading::Degrees(-1.5));
        assert_eq!(Reading::from_millidegrees(42), Reading::Degrees(0.042));
    }

    #[test]
    fn equal_values_do_not_differ() {
        let last = LastSample::Degrees(35.0);
        assert!(!last.differs_from(Reading::Degrees(35.0)));
        assert!(last.differs_from(Reading::Degrees(25.0)));
    }

    #[test]
    fn unavailable_always_differs() {
        assert!(LastSample::Unavailable.differs_from(Reading::Unavailable));
        assert!(LastSample::Unavailable.differs_from(Reading::Degrees(20.0)));
        assert!(LastSample::Degrees(20.0).differs_from(Reading::Unavailable));
        assert!(LastSample::Unset.differs_from(Reading::Unavailable));
    }

    // Latent edge case kept on purpose: the initial sample behaves like a
    // 0.0 reading, so a first real reading of exactly zero is "unchanged".
    #[test]
    fn unset_treats_first_zero_reading_as_unchanged() {
        assert!(!LastSample::Unset.differs_from(Reading::Degrees(0.0)));
        assert!(LastSample::Unset.differs_from(Reading::Degrees(0.001)));
        assert!(LastSample::Unset.differs_from(Reading::Degrees(-4.0)));
    }

    #[test]
    fn reading_converts_into_last_sample() {
        assert_eq!(
            LastSample::from(Reading::Degrees(21.5)),
            LastSample::Degrees(21.5)
        );
        assert!(LastSample::from(Reading::Unavailable).is_unavailable());
        assert_eq!(LastSample::default(), LastSample::Unset);
    }

    #[test]
    fn reading_display() {
        assert_eq!(Reading::Degrees(25.5).to_string(), "25.5");
        assert_eq!(Reading::Degrees(35.0).to_string(), "35");
        assert_eq!(Reading::Unavailable.to_string(), "unavailable");
    }
}
