//! Leak detection over finished dispose analyses

use super::analyzer::DisposeAnalysisResult;
use crate::errors::{DisposeError, Result};
use crate::features::dispose_analysis::domain::{DisposeAbstractValueKind, DisposeLeak, LeakKind};
use crate::features::points_to::{LocationKind, PointsToResult};
use crate::shared::models::FieldRef;

pub struct DisposeLeakDetector;

impl DisposeLeakDetector {
    /// Locations still `NotDisposed` when control reaches the exit block
    ///
    /// Field default locations are left to [`Self::undisposed_fields`].
    pub fn find_leaks(result: &DisposeAnalysisResult, points_to: &dyn PointsToResult) -> Vec<DisposeLeak> {
        let mut leaks: Vec<DisposeLeak> = result
            .exit_state()
            .iter()
            .filter(|(_, value)| value.kind() == DisposeAbstractValueKind::NotDisposed)
            .filter_map(|(&loc, _)| {
                let location = points_to.location(loc);
                if location.is_some_and(|l| matches!(l.kind, LocationKind::FieldDefault(_))) {
                    return None;
                }
                let type_name = location.and_then(|l| l.type_name()).map(str::to_string);
                let message = format!(
                    "'{}' is not disposed on all paths",
                    type_name.as_deref().unwrap_or("object")
                );
                Some(
                    DisposeLeak::new(LeakKind::NotDisposed, message)
                        .with_location(loc)
                        .with_allocation(location.and_then(|l| l.allocation()))
                        .with_type_name(type_name),
                )
            })
            .collect();

        leaks.sort_by_key(|l| l.location);
        leaks
    }

    /// Disposable fields a `Dispose` method leaves undisposed
    ///
    /// `result` must come from analysing the type's `Dispose` method with
    /// instance field tracking on. A field counts as disposed only if every
    /// location of its first read is `Disposed` on exit; a field that was
    /// never read is reported too.
    pub fn undisposed_fields(result: &DisposeAnalysisResult, disposable_fields: &[FieldRef]) -> Vec<DisposeLeak> {
        let Some(tracked) = result.tracked_instance_field_locations() else {
            return Vec::new();
        };

        let mut leaks = Vec::new();
        for field in disposable_fields {
            let name = field.qualified_name();
            let type_name = Some(field.ty.name.clone());
            match tracked.get(&name) {
                None => leaks.push(
                    DisposeLeak::new(
                        LeakKind::FieldNotDisposed,
                        format!("field '{}' is never disposed", field.name),
                    )
                    .with_field(name)
                    .with_type_name(type_name),
                ),
                Some(pts) => {
                    let mut locations: Vec<_> = pts.locations().collect();
                    locations.sort_unstable();
                    let undisposed = locations.iter().copied().find(|loc| {
                        result.value_at_exit(*loc).map(|v| v.kind())
                            != Some(DisposeAbstractValueKind::Disposed)
                    });
                    if let Some(loc) = undisposed {
                        leaks.push(
                            DisposeLeak::new(
                                LeakKind::FieldNotDisposed,
                                format!("field '{}' is not disposed on all paths", field.name),
                            )
                            .with_location(loc)
                            .with_field(name)
                            .with_type_name(type_name),
                        );
                    }
                }
            }
        }
        leaks
    }

    /// JSON report of `leaks`
    pub fn to_json(leaks: &[DisposeLeak]) -> Result<String> {
        serde_json::to_string_pretty(leaks)
            .map_err(|e| DisposeError::internal(format!("leak report serialization failed: {}", e)))
    }
}
