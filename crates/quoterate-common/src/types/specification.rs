//! Variable Specifications - how a quote variable is priced
//!
//! A specification decides two things about every quote variable that
//! references it:
//! - where its value comes from ([`ResolutionType`])
//! - how that value combines with the running price ([`ApplicationMode`])
//!
//! Both enums round-trip through their string codes. Codes this build does
//! not recognise are kept in an `Unsupported` variant so a catalog written by
//! a newer release still loads; the rater skips such variables.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Priority assigned when a specification does not set one
pub const DEFAULT_PRIORITY: i32 = 10;

/// Where a variable's numeric value comes from
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResolutionType {
    /// Value supplied directly on the quote variable
    Simple,
    /// Policy variable in the quote's jurisdiction scope
    StateLookup,
    /// Policy variable in the global scope
    GlobalLookup,
    /// Code not understood by this build
    Unsupported(String),
}

impl ResolutionType {
    pub fn as_str(&self) -> &str {
        match self {
            ResolutionType::Simple => "simple",
            ResolutionType::StateLookup => "state_lookup",
            ResolutionType::GlobalLookup => "global_lookup",
            ResolutionType::Unsupported(code) => code,
        }
    }

    /// Whether resolution reads the policy variable store
    pub fn requires_lookup_key(&self) -> bool {
        matches!(
            self,
            ResolutionType::StateLookup | ResolutionType::GlobalLookup
        )
    }
}

impl From<String> for ResolutionType {
    fn from(code: String) -> Self {
        match code.as_str() {
            "simple" => ResolutionType::Simple,
            "state_lookup" => ResolutionType::StateLookup,
            "global_lookup" => ResolutionType::GlobalLookup,
            _ => ResolutionType::Unsupported(code),
        }
    }
}

impl From<ResolutionType> for String {
    fn from(resolution: ResolutionType) -> Self {
        resolution.as_str().to_string()
    }
}

impl fmt::Display for ResolutionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a resolved value modifies the running price
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ApplicationMode {
    /// Resolved value replaces the running price
    Additive,
    /// Running price is scaled by the value read as a percentage
    Multiplier,
    /// Code not understood by this build
    Unsupported(String),
}

impl ApplicationMode {
    pub fn as_str(&self) -> &str {
        match self {
            ApplicationMode::Additive => "additive",
            ApplicationMode::Multiplier => "multiplier",
            ApplicationMode::Unsupported(code) => code,
        }
    }
}

impl From<String> for ApplicationMode {
    fn from(code: String) -> Self {
        match code.as_str() {
            "additive" => ApplicationMode::Additive,
            "multiplier" => ApplicationMode::Multiplier,
            _ => ApplicationMode::Unsupported(code),
        }
    }
}

impl From<ApplicationMode> for String {
    fn from(mode: ApplicationMode) -> Self {
        mode.as_str().to_string()
    }
}

impl fmt::Display for ApplicationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Definition of a pricing variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableSpecification {
    /// Unique specification code
    pub code: String,
    /// Value source
    pub resolution_type: ResolutionType,
    /// Combination rule
    pub application_mode: ApplicationMode,
    /// Lower priorities are applied first
    #[serde(default = "default_priority")]
    pub priority: i32,
    /// Policy variable key for lookup resolutions
    #[serde(default)]
    pub lookup_key: Option<String>,
    /// Declared fallback value. The rater does not consult it.
    #[serde(default)]
    pub default_value: Option<f64>,
    /// Human-readable description
    pub description: String,
}

fn default_priority() -> i32 {
    DEFAULT_PRIORITY
}

impl VariableSpecification {
    /// Create a specification whose value is supplied on the quote variable
    pub fn simple(code: impl Into<String>, application_mode: ApplicationMode) -> Self {
        Self {
            code: code.into(),
            resolution_type: ResolutionType::Simple,
            application_mode,
            priority: DEFAULT_PRIORITY,
            lookup_key: None,
            default_value: None,
            description: String::new(),
        }
    }

    /// Create a specification resolved from the quote's jurisdiction scope
    pub fn state_lookup(
        code: impl Into<String>,
        application_mode: ApplicationMode,
        lookup_key: impl Into<String>,
    ) -> Self {
        Self {
            resolution_type: ResolutionType::StateLookup,
            lookup_key: Some(lookup_key.into()),
            ..Self::simple(code, application_mode)
        }
    }

    /// Create a specification resolved from the global scope
    pub fn global_lookup(
        code: impl Into<String>,
        application_mode: ApplicationMode,
        lookup_key: impl Into<String>,
    ) -> Self {
        Self {
            resolution_type: ResolutionType::GlobalLookup,
            lookup_key: Some(lookup_key.into()),
            ..Self::simple(code, application_mode)
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_default_value(mut self, default_value: f64) -> Self {
        self.default_value = Some(default_value);
        self
    }

    /// Check the specification invariants
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.code.trim().is_empty() {
            return Err(ValidationError::EmptyCode);
        }
        if self.resolution_type.requires_lookup_key() && self.lookup_key.is_none() {
            return Err(ValidationError::MissingLookupKey {
                code: self.code.clone(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for VariableSpecification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.code, self.resolution_type)
    }
}
