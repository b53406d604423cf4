use joint_types::{FeatureId, ParameterError};
use kernel_port::KernelError;

#[derive(Debug, Clone, thiserror::Error)]
pub enum SyncError {
    #[error(transparent)]
    Kernel(#[from] KernelError),

    #[error(transparent)]
    Parameter(#[from] ParameterError),

    #[error("feature {feature} not found in the document")]
    FeatureNotFound { feature: FeatureId },

    #[error("feature {feature} is not a {expected} feature")]
    WrongFeatureKind {
        feature: FeatureId,
        expected: &'static str,
    },

    #[error("missing persisted value '{name}'")]
    MissingPersistedValue { name: String },

    #[error("document error: {message}")]
    Document { message: String },
}
