//! Boolean operation records produced by joint synthesis.

use joint_types::BodyId;
use kernel_port::{BodyRef, BooleanKind, SolidHandle};

/// One boolean operation against a document body. The tool is a
/// transient kernel solid; the target is identified by its stable id.
#[derive(Debug, Clone)]
pub struct BooleanOperation {
    pub target: BodyRef,
    pub tool: SolidHandle,
    pub kind: BooleanKind,
}

impl BooleanOperation {
    pub fn difference(target: BodyRef, tool: SolidHandle) -> Self {
        Self {
            target,
            tool,
            kind: BooleanKind::Difference,
        }
    }

    pub fn union(target: BodyRef, tool: SolidHandle) -> Self {
        Self {
            target,
            tool,
            kind: BooleanKind::Union,
        }
    }

    pub fn intersection(target: BodyRef, tool: SolidHandle) -> Self {
        Self {
            target,
            tool,
            kind: BooleanKind::Intersection,
        }
    }
}

/// Ordered collection of boolean operations, grouped by target body.
///
/// Target bodies are tracked separately from operations so a body whose
/// seams produced no joint still gets a (no-op) feature triple during
/// reconciliation. Both lists keep insertion order; reconciliation
/// depends on it being stable across recomputes.
#[derive(Debug, Clone, Default)]
pub struct OperationSet {
    targets: Vec<BodyRef>,
    operations: Vec<BooleanOperation>,
}

impl OperationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a target body without any operation.
    pub fn add_target_body(&mut self, body: BodyRef) {
        if !self.targets.iter().any(|t| t.id == body.id) {
            self.targets.push(body);
        }
    }

    pub fn add(&mut self, operation: BooleanOperation) {
        self.add_target_body(operation.target.clone());
        self.operations.push(operation);
    }

    /// Target bodies in first-seen order.
    pub fn targets(&self) -> &[BodyRef] {
        &self.targets
    }

    pub fn operations(&self) -> &[BooleanOperation] {
        &self.operations
    }

    pub fn for_target<'a>(
        &'a self,
        id: &'a BodyId,
    ) -> impl Iterator<Item = &'a BooleanOperation> {
        self.operations.iter().filter(move |op| op.target.id == *id)
    }

    /// True when no operations were emitted (targets may still exist).
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }
}
