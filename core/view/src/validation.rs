//! FILENAME: core/view/src/validation.rs
//! PURPOSE: Per-column validation rules run on converted edit values.
//! CONTEXT: Every rule except `Required` accepts Null, so an optional
//! column can be left blank. A literal message, when set, replaces the
//! message key.

use crate::editor::CellEditError;
use crate::error::ViewError;
use engine::messages::{
    VALIDATION_CUSTOM, VALIDATION_EMAIL, VALIDATION_MAX_LENGTH, VALIDATION_MIN_LENGTH,
    VALIDATION_PATTERN, VALIDATION_RANGE, VALIDATION_REQUIRED,
};
use engine::Value;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static EMAIL: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$").ok()
});

pub enum Rule {
    Required,
    MinLength(usize),
    MaxLength(usize),
    /// Inclusive numeric bounds.
    Range { min: f64, max: f64 },
    Email,
    Pattern(Regex),
    Custom {
        name: String,
        check: Box<dyn Fn(&Value) -> bool>,
    },
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Required => f.write_str("Required"),
            Rule::MinLength(n) => write!(f, "MinLength({})", n),
            Rule::MaxLength(n) => write!(f, "MaxLength({})", n),
            Rule::Range { min, max } => write!(f, "Range({}, {})", min, max),
            Rule::Email => f.write_str("Email"),
            Rule::Pattern(re) => write!(f, "Pattern({})", re.as_str()),
            Rule::Custom { name, .. } => write!(f, "Custom({})", name),
        }
    }
}

#[derive(Debug)]
pub struct Validation {
    rule: Rule,
    message_key: &'static str,
    message: Option<String>,
}

impl Validation {
    fn new(rule: Rule, message_key: &'static str) -> Self {
        Validation {
            rule,
            message_key,
            message: None,
        }
    }

    pub fn required() -> Self {
        Self::new(Rule::Required, VALIDATION_REQUIRED)
    }

    pub fn min_length(min: usize) -> Self {
        Self::new(Rule::MinLength(min), VALIDATION_MIN_LENGTH)
    }

    pub fn max_length(max: usize) -> Self {
        Self::new(Rule::MaxLength(max), VALIDATION_MAX_LENGTH)
    }

    pub fn range(min: f64, max: f64) -> Self {
        Self::new(Rule::Range { min, max }, VALIDATION_RANGE)
    }

    pub fn email() -> Self {
        Self::new(Rule::Email, VALIDATION_EMAIL)
    }

    pub fn pattern(pattern: &str) -> Result<Self, ViewError> {
        Ok(Self::new(Rule::Pattern(Regex::new(pattern)?), VALIDATION_PATTERN))
    }

    pub fn custom(name: impl Into<String>, check: impl Fn(&Value) -> bool + 'static) -> Self {
        Self::new(
            Rule::Custom {
                name: name.into(),
                check: Box::new(check),
            },
            VALIDATION_CUSTOM,
        )
    }

    /// Uses a literal message instead of the message key.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    pub fn message_key(&self) -> &str {
        self.message_key
    }

    pub fn is_custom(&self) -> bool {
        matches!(self.rule, Rule::Custom { .. })
    }

    pub fn validate(&self, value: &Value) -> Result<(), CellEditError> {
        if self.passes(value) {
            Ok(())
        } else {
            Err(self.error())
        }
    }

    fn passes(&self, value: &Value) -> bool {
        if let Rule::Required = self.rule {
            return !value.is_null() && !value.to_string().trim().is_empty();
        }
        if value.is_null() {
            return true;
        }
        let text = value.to_string();
        match &self.rule {
            Rule::Required => true,
            Rule::MinLength(min) => text.chars().count() >= *min,
            Rule::MaxLength(max) => text.chars().count() <= *max,
            Rule::Range { min, max } => value
                .as_f64()
                .or_else(|| text.trim().parse::<f64>().ok())
                .map(|n| n >= *min && n <= *max)
                .unwrap_or(false),
            Rule::Email => EMAIL.as_ref().map(|re| re.is_match(&text)).unwrap_or(false),
            Rule::Pattern(re) => re.is_match(&text),
            Rule::Custom { check, .. } => check(value),
        }
    }

    fn error(&self) -> CellEditError {
        if let Some(message) = &self.message {
            return CellEditError::message(message.clone());
        }
        let args = match &self.rule {
            Rule::MinLength(n) | Rule::MaxLength(n) => vec![n.to_string()],
            Rule::Range { min, max } => vec![min.to_string(), max.to_string()],
            _ => Vec::new(),
        };
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        CellEditError::key(self.message_key, &args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_rejects_null_and_blank() {
        let rule = Validation::required();
        assert!(rule.validate(&Value::Null).is_err());
        assert!(rule.validate(&Value::text("  ")).is_err());
        assert!(rule.validate(&Value::text("x")).is_ok());
    }

    #[test]
    fn optional_rules_accept_null() {
        assert!(Validation::min_length(3).validate(&Value::Null).is_ok());
        assert!(Validation::email().validate(&Value::Null).is_ok());
    }

    #[test]
    fn length_bounds_count_characters() {
        assert!(Validation::min_length(3).validate(&Value::text("Tå")).is_err());
        assert!(Validation::max_length(3).validate(&Value::text("Tåg")).is_ok());
        assert_eq!(
            Validation::max_length(2).validate(&Value::text("abc")),
            Err(CellEditError::key(VALIDATION_MAX_LENGTH, &["2"]))
        );
    }

    #[test]
    fn range_is_inclusive() {
        let rule = Validation::range(1.0, 8.0);
        assert!(rule.validate(&Value::Int(1)).is_ok());
        assert!(rule.validate(&Value::Float(8.0)).is_ok());
        assert!(rule.validate(&Value::Int(9)).is_err());
        assert!(rule.validate(&Value::text("abc")).is_err());
    }

    #[test]
    fn email_and_pattern() {
        assert!(Validation::email().validate(&Value::text("george@mount.vernon.org")).is_ok());
        assert!(Validation::email().validate(&Value::text("george@")).is_err());
        let years = Validation::pattern(r"^\d{4}$").unwrap();
        assert!(years.validate(&Value::Int(1789)).is_ok());
        assert!(years.validate(&Value::text("89")).is_err());
        assert!(Validation::pattern("(").is_err());
    }

    #[test]
    fn custom_rules_are_flagged_and_use_literal_messages() {
        let even = Validation::custom("even", |v| v.as_f64().map(|n| n % 2.0 == 0.0).unwrap_or(false))
            .with_message("Must be even");
        assert!(even.is_custom());
        assert!(!Validation::required().is_custom());
        assert_eq!(even.validate(&Value::Int(3)), Err(CellEditError::message("Must be even")));
        assert!(even.validate(&Value::Int(4)).is_ok());
    }
}
