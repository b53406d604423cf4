use kernel_port::KernelError;

#[derive(Debug, Clone, thiserror::Error)]
pub enum JointError {
    #[error(transparent)]
    Kernel(#[from] KernelError),

    /// The seam exists topologically but its geometry does not admit a
    /// joint (for example the sweep direction misses the butting plane).
    #[error("degenerate seam: {reason}")]
    DegenerateSeam { reason: String },
}
