//! Persisting joint parameters on the document.
//!
//! The seven authoring parameters go into custom-parameter storage as
//! `(expression, units)` pairs, the selected face tokens into a single
//! space-joined named value, and the bodies those faces live on into
//! dependency declarations so the host recomputes the joint when they
//! change.

use joint_types::{EntityToken, JointParameters, ParameterSource};
use kernel_port::BodyRef;

use crate::error::SyncError;
use crate::port::DocumentPort;

const FACES_VALUE: &str = "faces";

fn parameter_fields(
    params: &JointParameters,
) -> [(&'static str, &ParameterSource); 7] {
    [
        ("minFingers", &params.min_fingers),
        ("maxFingers", &params.max_fingers),
        ("minFingerWidth", &params.min_finger_width),
        ("maxFingerWidth", &params.max_finger_width),
        ("fingerRatio", &params.finger_ratio),
        ("margin", &params.margin),
        ("bitDiameter", &params.bit_diameter),
    ]
}

pub fn save_parameters<D: DocumentPort + ?Sized>(
    doc: &mut D,
    params: &JointParameters,
    bodies: &[BodyRef],
) -> Result<(), SyncError> {
    for (name, source) in parameter_fields(params) {
        doc.set_custom_parameter(name, source.expression(), source.units())?;
    }
    let tokens: Vec<&str> = params.faces.iter().map(EntityToken::as_str).collect();
    doc.set_named_value(FACES_VALUE, &tokens.join(" "))?;
    doc.declare_dependencies(bodies)?;
    Ok(())
}

/// Reads parameters back from the document. The width and count
/// parameters are required; ratio, margin, and bit diameter fall back
/// to their historical defaults when a document predates them.
pub fn load_parameters<D: DocumentPort + ?Sized>(
    doc: &D,
) -> Result<JointParameters, SyncError> {
    let faces_value =
        doc.named_value(FACES_VALUE)
            .ok_or_else(|| SyncError::MissingPersistedValue {
                name: FACES_VALUE.to_string(),
            })?;
    let faces = faces_value
        .split_whitespace()
        .map(EntityToken::from)
        .collect();

    let required = |name: &str| -> Result<ParameterSource, SyncError> {
        let (expression, units) =
            doc.custom_parameter(name)
                .ok_or_else(|| SyncError::MissingPersistedValue {
                    name: name.to_string(),
                })?;
        Ok(ParameterSource::Persisted { expression, units })
    };
    let optional = |name: &str, default: f64| -> ParameterSource {
        match doc.custom_parameter(name) {
            Some((expression, units)) => ParameterSource::Persisted { expression, units },
            None => ParameterSource::literal(default),
        }
    };

    Ok(JointParameters {
        faces,
        min_fingers: required("minFingers")?,
        max_fingers: required("maxFingers")?,
        min_finger_width: required("minFingerWidth")?,
        max_finger_width: required("maxFingerWidth")?,
        finger_ratio: optional("fingerRatio", 0.5),
        margin: optional("margin", 0.0),
        bit_diameter: optional("bitDiameter", 0.0),
    })
}
