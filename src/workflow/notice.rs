use std::fmt;

/// How alarming a notice is. Each tier maps to a fixed indicator
/// colour so callers can tell them apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    pub fn indicator(&self) -> &'static str {
        match self {
            Severity::Info => "blue",
            Severity::Success => "green",
            Severity::Warning => "orange",
            Severity::Error => "red",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.indicator())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

impl Notice {
    pub fn new(severity: Severity, message: &str) -> Self {
        Self {
            severity,
            message: message.to_string(),
        }
    }

    pub fn info(message: &str) -> Self {
        Self::new(Severity::Info, message)
    }

    pub fn success(message: &str) -> Self {
        Self::new(Severity::Success, message)
    }

    pub fn warning(message: &str) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn error(message: &str) -> Self {
        Self::new(Severity::Error, message)
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indicators_are_distinct() {
        let indicators = [
            Severity::Info.indicator(),
            Severity::Success.indicator(),
            Severity::Warning.indicator(),
            Severity::Error.indicator(),
        ];
        for (i, a) in indicators.iter().enumerate() {
            for b in indicators.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_display() {
        let notice = Notice::warning("AI decision log update is not available.");
        assert_eq!(
            notice.to_string(),
            "[orange] AI decision log update is not available."
        );
    }
}
