//! Joint authoring parameters.
//!
//! Parameters travel as `(expression, units)` pairs so the host can keep
//! them unit-aware and editable; the core only ever consumes values
//! resolved to `f64` through a [`UnitEvaluator`].

use serde::{Deserialize, Serialize};

use crate::ids::EntityToken;

/// Evaluates a unit-bearing expression to a real number. Implemented by
/// the host application's unit/expression service.
pub trait UnitEvaluator {
    fn evaluate(&self, expression: &str, units: &str) -> Result<f64, ParameterError>;
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ParameterError {
    #[error("invalid expression '{expression}': {reason}")]
    InvalidExpression { expression: String, reason: String },
}

/// Where a parameter value came from. Each variant carries the expression
/// text and the units it is stated in; resolution is uniform across
/// variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source")]
pub enum ParameterSource {
    /// A programmatic default or directly supplied value.
    Literal { expression: String, units: String },
    /// Text currently held by an editor input field.
    EditorField { expression: String, units: String },
    /// Text read back from document custom-parameter storage.
    Persisted { expression: String, units: String },
}

impl ParameterSource {
    /// A unitless literal value.
    pub fn literal(value: f64) -> Self {
        Self::Literal {
            expression: value.to_string(),
            units: String::new(),
        }
    }

    /// A length literal, stated in centimeters.
    pub fn length_cm(value: f64) -> Self {
        Self::Literal {
            expression: value.to_string(),
            units: "cm".to_string(),
        }
    }

    pub fn expression(&self) -> &str {
        match self {
            Self::Literal { expression, .. }
            | Self::EditorField { expression, .. }
            | Self::Persisted { expression, .. } => expression,
        }
    }

    pub fn units(&self) -> &str {
        match self {
            Self::Literal { units, .. }
            | Self::EditorField { units, .. }
            | Self::Persisted { units, .. } => units,
        }
    }

    pub fn resolve(&self, evaluator: &dyn UnitEvaluator) -> Result<f64, ParameterError> {
        evaluator.evaluate(self.expression(), self.units())
    }
}

/// All parameters that define a specific box joint, plus the selected
/// outside faces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointParameters {
    pub faces: Vec<EntityToken>,
    pub min_fingers: ParameterSource,
    pub max_fingers: ParameterSource,
    pub min_finger_width: ParameterSource,
    pub max_finger_width: ParameterSource,
    pub finger_ratio: ParameterSource,
    pub margin: ParameterSource,
    pub bit_diameter: ParameterSource,
}

impl JointParameters {
    /// Default parameters. Length defaults depend on the document's
    /// preferred units: 2.5 cm / 15 cm metric, 1 in / 6 in imperial
    /// (expressed in centimeters either way).
    pub fn defaults(prefer_inches: bool) -> Self {
        let cm_or_in = |cm: f64, inches: f64| {
            if prefer_inches {
                ParameterSource::length_cm(inches * 2.54)
            } else {
                ParameterSource::length_cm(cm)
            }
        };
        Self {
            faces: Vec::new(),
            min_fingers: ParameterSource::literal(3.0),
            max_fingers: ParameterSource::literal(33.0),
            min_finger_width: cm_or_in(2.5, 1.0),
            max_finger_width: cm_or_in(15.0, 6.0),
            finger_ratio: ParameterSource::literal(0.5),
            margin: ParameterSource::length_cm(0.0),
            bit_diameter: ParameterSource::length_cm(0.635),
        }
    }

    pub fn resolve(&self, evaluator: &dyn UnitEvaluator) -> Result<ResolvedParameters, ParameterError> {
        Ok(ResolvedParameters {
            min_fingers: self.min_fingers.resolve(evaluator)?,
            max_fingers: self.max_fingers.resolve(evaluator)?,
            min_finger_width: self.min_finger_width.resolve(evaluator)?,
            max_finger_width: self.max_finger_width.resolve(evaluator)?,
            finger_ratio: self.finger_ratio.resolve(evaluator)?,
            margin: self.margin.resolve(evaluator)?,
            bit_diameter: self.bit_diameter.resolve(evaluator)?,
        })
    }
}

/// Parameter values resolved to internal units (centimeters for lengths).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedParameters {
    pub min_fingers: f64,
    pub max_fingers: f64,
    pub min_finger_width: f64,
    pub max_finger_width: f64,
    pub finger_ratio: f64,
    pub margin: f64,
    pub bit_diameter: f64,
}
