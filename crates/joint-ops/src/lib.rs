//! Box-joint synthesis.
//!
//! Given a set of selected outside faces, finds the seams where the
//! bodies butt against each other, solves the finger layout for each
//! seam, and emits the boolean operations that cut the fingers into one
//! body and join them onto the other. No document state is touched;
//! the output is an [`OperationSet`] for the reconciler to apply.

pub mod brep;
pub mod detect;
pub mod error;
pub mod frame;
pub mod ops;
pub mod pipeline;
pub mod solids;
pub mod tiling;

pub use detect::{find_seams, Seam};
pub use error::JointError;
pub use ops::{BooleanOperation, OperationSet};
pub use pipeline::compute_box_joint;
pub use tiling::{TilingParams, TilingSolution};
