//! The document side of reconciliation.

use joint_types::FeatureId;
use kernel_port::{BodyRef, SolidHandle};

use crate::error::SyncError;

/// A position in the document timeline. Cursors are only produced by
/// [`DocumentPort`] navigation calls and consumed by creation calls;
/// they are not stable across timeline edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineCursor(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombineKind {
    /// Union of the tool bodies into the target, tools kept alive.
    Join,
    /// Intersection with the tool bodies, tools consumed.
    Intersect,
}

/// Operations the reconciler needs from the host document: timeline
/// navigation, base/combine feature management, and the storage that
/// persists joint parameters across sessions.
pub trait DocumentPort {
    /// Cursor at the current end of the timeline.
    fn timeline_end(&self) -> TimelineCursor;

    /// Rolls the timeline to just after `feature` and returns the
    /// cursor there.
    fn roll_after(&mut self, feature: FeatureId) -> Result<TimelineCursor, SyncError>;

    /// Creates a base feature at the cursor. The feature is seeded with
    /// `seed` (a dummy solid that covers the final body) and then
    /// immediately given `solid` as its real body.
    fn create_base_feature(
        &mut self,
        at: TimelineCursor,
        seed: SolidHandle,
        solid: SolidHandle,
    ) -> Result<FeatureId, SyncError>;

    /// Replaces the solid held by an existing base feature, keeping the
    /// feature's identity.
    fn update_base_body(
        &mut self,
        feature: FeatureId,
        solid: SolidHandle,
    ) -> Result<(), SyncError>;

    /// Renames the base feature's source body (its display name).
    fn set_source_body_name(
        &mut self,
        feature: FeatureId,
        name: &str,
    ) -> Result<(), SyncError>;

    /// Creates a combine feature at the cursor, using the bodies of
    /// `base` as tools against `target`.
    fn create_combine_feature(
        &mut self,
        at: TimelineCursor,
        target: &BodyRef,
        base: FeatureId,
        kind: CombineKind,
        keep_tools: bool,
    ) -> Result<FeatureId, SyncError>;

    /// Current target body of a combine feature.
    fn combine_target(&self, feature: FeatureId) -> Result<BodyRef, SyncError>;

    fn set_combine_target(
        &mut self,
        feature: FeatureId,
        target: &BodyRef,
    ) -> Result<(), SyncError>;

    fn delete_feature(&mut self, feature: FeatureId) -> Result<(), SyncError>;

    /// Writes a custom parameter as an `(expression, units)` pair.
    fn set_custom_parameter(
        &mut self,
        name: &str,
        expression: &str,
        units: &str,
    ) -> Result<(), SyncError>;

    fn custom_parameter(&self, name: &str) -> Option<(String, String)>;

    fn set_named_value(&mut self, name: &str, value: &str) -> Result<(), SyncError>;

    fn named_value(&self, name: &str) -> Option<String>;

    /// Declares the bodies this feature group reads, so the host can
    /// recompute it when they change.
    fn declare_dependencies(&mut self, bodies: &[BodyRef]) -> Result<(), SyncError>;
}
