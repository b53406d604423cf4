//! In-memory document for tests.

use std::collections::HashMap;

use joint_types::{BodyId, FeatureId};
use kernel_port::{BodyRef, SolidHandle};

use crate::error::SyncError;
use crate::port::{CombineKind, DocumentPort, TimelineCursor};

#[derive(Debug, Clone)]
enum MockFeature {
    Base {
        seed: SolidHandle,
        body: SolidHandle,
        source_name: String,
    },
    Combine {
        target: BodyRef,
        base: FeatureId,
        kind: CombineKind,
        keep_tools: bool,
    },
}

/// Document double backed by a flat feature timeline. Cursors are
/// timeline indices; they go stale as soon as the timeline changes,
/// which matches how the reconciler uses them.
#[derive(Debug, Default)]
pub struct MockDocument {
    timeline: Vec<FeatureId>,
    features: HashMap<FeatureId, MockFeature>,
    parameters: HashMap<String, (String, String)>,
    named_values: HashMap<String, String>,
    dependencies: Vec<BodyId>,
}

impl MockDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timeline(&self) -> &[FeatureId] {
        &self.timeline
    }

    /// Solid currently held by a base feature.
    pub fn base_body(&self, feature: FeatureId) -> Option<&SolidHandle> {
        match self.features.get(&feature)? {
            MockFeature::Base { body, .. } => Some(body),
            MockFeature::Combine { .. } => None,
        }
    }

    /// Seed solid a base feature was created with.
    pub fn base_seed(&self, feature: FeatureId) -> Option<&SolidHandle> {
        match self.features.get(&feature)? {
            MockFeature::Base { seed, .. } => Some(seed),
            MockFeature::Combine { .. } => None,
        }
    }

    pub fn source_body_name(&self, feature: FeatureId) -> Option<&str> {
        match self.features.get(&feature)? {
            MockFeature::Base { source_name, .. } => Some(source_name),
            MockFeature::Combine { .. } => None,
        }
    }

    /// `(target id, base feature, kind, keep_tools)` of a combine.
    pub fn combine_info(
        &self,
        feature: FeatureId,
    ) -> Option<(BodyId, FeatureId, CombineKind, bool)> {
        match self.features.get(&feature)? {
            MockFeature::Combine {
                target,
                base,
                kind,
                keep_tools,
            } => Some((target.id, *base, *kind, *keep_tools)),
            MockFeature::Base { .. } => None,
        }
    }

    pub fn dependencies(&self) -> &[BodyId] {
        &self.dependencies
    }

    fn insert(&mut self, at: TimelineCursor, feature: MockFeature) -> FeatureId {
        let id = FeatureId::new();
        let index = (at.0 as usize).min(self.timeline.len());
        self.timeline.insert(index, id);
        self.features.insert(id, feature);
        id
    }

    fn feature_mut(&mut self, feature: FeatureId) -> Result<&mut MockFeature, SyncError> {
        self.features
            .get_mut(&feature)
            .ok_or(SyncError::FeatureNotFound { feature })
    }
}

impl DocumentPort for MockDocument {
    fn timeline_end(&self) -> TimelineCursor {
        TimelineCursor(self.timeline.len() as u64)
    }

    fn roll_after(&mut self, feature: FeatureId) -> Result<TimelineCursor, SyncError> {
        let index = self
            .timeline
            .iter()
            .position(|f| *f == feature)
            .ok_or(SyncError::FeatureNotFound { feature })?;
        Ok(TimelineCursor(index as u64 + 1))
    }

    fn create_base_feature(
        &mut self,
        at: TimelineCursor,
        seed: SolidHandle,
        solid: SolidHandle,
    ) -> Result<FeatureId, SyncError> {
        Ok(self.insert(
            at,
            MockFeature::Base {
                seed,
                body: solid,
                source_name: String::new(),
            },
        ))
    }

    fn update_base_body(
        &mut self,
        feature: FeatureId,
        solid: SolidHandle,
    ) -> Result<(), SyncError> {
        match self.feature_mut(feature)? {
            MockFeature::Base { body, .. } => {
                *body = solid;
                Ok(())
            }
            MockFeature::Combine { .. } => Err(SyncError::WrongFeatureKind {
                feature,
                expected: "base",
            }),
        }
    }

    fn set_source_body_name(
        &mut self,
        feature: FeatureId,
        name: &str,
    ) -> Result<(), SyncError> {
        match self.feature_mut(feature)? {
            MockFeature::Base { source_name, .. } => {
                *source_name = name.to_string();
                Ok(())
            }
            MockFeature::Combine { .. } => Err(SyncError::WrongFeatureKind {
                feature,
                expected: "base",
            }),
        }
    }

    fn create_combine_feature(
        &mut self,
        at: TimelineCursor,
        target: &BodyRef,
        base: FeatureId,
        kind: CombineKind,
        keep_tools: bool,
    ) -> Result<FeatureId, SyncError> {
        if !matches!(self.features.get(&base), Some(MockFeature::Base { .. })) {
            return Err(SyncError::WrongFeatureKind {
                feature: base,
                expected: "base",
            });
        }
        Ok(self.insert(
            at,
            MockFeature::Combine {
                target: target.clone(),
                base,
                kind,
                keep_tools,
            },
        ))
    }

    fn combine_target(&self, feature: FeatureId) -> Result<BodyRef, SyncError> {
        match self.features.get(&feature) {
            Some(MockFeature::Combine { target, .. }) => Ok(target.clone()),
            Some(MockFeature::Base { .. }) => Err(SyncError::WrongFeatureKind {
                feature,
                expected: "combine",
            }),
            None => Err(SyncError::FeatureNotFound { feature }),
        }
    }

    fn set_combine_target(
        &mut self,
        feature: FeatureId,
        new_target: &BodyRef,
    ) -> Result<(), SyncError> {
        match self.feature_mut(feature)? {
            MockFeature::Combine { target, .. } => {
                *target = new_target.clone();
                Ok(())
            }
            MockFeature::Base { .. } => Err(SyncError::WrongFeatureKind {
                feature,
                expected: "combine",
            }),
        }
    }

    fn delete_feature(&mut self, feature: FeatureId) -> Result<(), SyncError> {
        let index = self
            .timeline
            .iter()
            .position(|f| *f == feature)
            .ok_or(SyncError::FeatureNotFound { feature })?;
        self.timeline.remove(index);
        self.features.remove(&feature);
        Ok(())
    }

    fn set_custom_parameter(
        &mut self,
        name: &str,
        expression: &str,
        units: &str,
    ) -> Result<(), SyncError> {
        self.parameters
            .insert(name.to_string(), (expression.to_string(), units.to_string()));
        Ok(())
    }

    fn custom_parameter(&self, name: &str) -> Option<(String, String)> {
        self.parameters.get(name).cloned()
    }

    fn set_named_value(&mut self, name: &str, value: &str) -> Result<(), SyncError> {
        self.named_values
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn named_value(&self, name: &str) -> Option<String> {
        self.named_values.get(name).cloned()
    }

    fn declare_dependencies(&mut self, bodies: &[BodyRef]) -> Result<(), SyncError> {
        self.dependencies = bodies.iter().map(|b| b.id).collect();
        Ok(())
    }
}
