//! Dispose analysis state: location -> dispose value

use super::dispose_domain::DisposeAbstractValueDomain;
use super::dispose_value::DisposeAbstractValue;
use crate::features::flow_analysis::domain::MapAbstractDomain;
use crate::features::points_to::LocationId;
use rustc_hash::FxHashMap;

/// Dispose state of every tracked location at one program point
pub type DisposeAnalysisData = FxHashMap<LocationId, DisposeAbstractValue>;

/// Pointwise lattice over [`DisposeAnalysisData`]
pub type DisposeAnalysisDomain =
    MapAbstractDomain<LocationId, DisposeAbstractValue, DisposeAbstractValueDomain>;

pub fn dispose_analysis_domain() -> DisposeAnalysisDomain {
    MapAbstractDomain::new(DisposeAbstractValueDomain::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::flow_analysis::domain::AbstractValueDomain;
    use crate::features::dispose_analysis::domain::DisposeAbstractValueKind;
    use std::cmp::Ordering;

    #[test]
    fn test_pointwise_merge() {
        let domain = dispose_analysis_domain();
        let mut then_branch = DisposeAnalysisData::default();
        then_branch.insert(1, DisposeAbstractValue::disposed(10));
        let mut else_branch = DisposeAnalysisData::default();
        else_branch.insert(1, DisposeAbstractValue::NOT_DISPOSED);
        else_branch.insert(2, DisposeAbstractValue::NOT_DISPOSED);

        let merged = domain.merge(&then_branch, &else_branch);
        assert_eq!(merged[&1].kind(), DisposeAbstractValueKind::MaybeDisposed);
        assert_eq!(merged[&2].kind(), DisposeAbstractValueKind::NotDisposed);
        assert_eq!(domain.compare(&else_branch, &merged), Ordering::Less);
    }
}
