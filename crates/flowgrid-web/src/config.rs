#![forbid(unsafe_code)]

//! Controller configuration.

use flowgrid_layout::DEFAULT_LINE_TOLERANCE;
use serde::{Deserialize, Serialize};

/// Configuration for [`FlowReorder`](crate::FlowReorder).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowGridConfig {
    /// Two tiles share a line when their top edges differ by less than this
    /// many pixels. The default `0` requires exact equality.
    pub line_tolerance: f64,
    /// Track in-flight transitions per tile so a repeated start without an
    /// end cannot leave the pending count stuck above zero.
    pub dedupe_transition_starts: bool,
    /// Initial value of the "animations enabled" flag.
    pub enable_transitions_initially: bool,
}

impl Default for FlowGridConfig {
    fn default() -> Self {
        Self {
            line_tolerance: DEFAULT_LINE_TOLERANCE,
            dedupe_transition_starts: true,
            enable_transitions_initially: true,
        }
    }
}

/// Invalid configuration value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlowConfigError {
    /// `line_tolerance` is negative, NaN, or infinite.
    InvalidLineTolerance(f64),
}

impl core::fmt::Display for FlowConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidLineTolerance(value) => {
                write!(f, "line tolerance must be finite and >= 0, got {value}")
            }
        }
    }
}

impl std::error::Error for FlowConfigError {}

impl FlowGridConfig {
    /// Build a validated configuration.
    pub fn new(
        line_tolerance: f64,
        dedupe_transition_starts: bool,
    ) -> Result<Self, FlowConfigError> {
        let config = Self {
            line_tolerance,
            dedupe_transition_starts,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), FlowConfigError> {
        if !self.line_tolerance.is_finite() || self.line_tolerance < 0.0 {
            return Err(FlowConfigError::InvalidLineTolerance(self.line_tolerance));
        }
        Ok(())
    }
}

#[cfg(feature = "input-parser")]
impl FlowGridConfig {
    /// Parse and validate a JSON configuration. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, crate::input_parser::InputParseError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| crate::input_parser::InputParseError::Json(e.to_string()))?;
        config
            .validate()
            .map_err(crate::input_parser::InputParseError::Config)?;
        Ok(config)
    }
}
