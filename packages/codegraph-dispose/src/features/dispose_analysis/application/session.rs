//! Compilation-scoped dispose analysis session
//!
//! Everything that depends only on the compilation is computed once and
//! shared by every procedure analysed through the session:
//! - well-known types (resolved eagerly, creation fails without them)
//! - ownership-transfer-likely types (lazily, once)
//! - disposable instance fields per declared type (lazily, per type)
//!
//! Caches only grow while the session lives. `teardown` clears them
//! explicitly; [`DisposeSessionRegistry::release`] does so when the last
//! handle to a compilation's session is returned.

use super::analyzer::{DisposeAnalysis, DisposeAnalysisResult};
use super::context::DisposeAnalysisContext;
use crate::config::{DisposeConfig, Validatable};
use crate::errors::Result;
use crate::features::dispose_analysis::infrastructure::WellKnownTypes;
use crate::features::dispose_analysis::ports::ProcedureBodyProvider;
use crate::features::points_to::PointsToResult;
use crate::shared::models::{Compilation, CompilationId, FieldRef, MethodRef, OperationBlock};
use crate::shared::CancellationToken;
use dashmap::DashMap;
use once_cell::sync::OnceCell;
use rayon::prelude::*;
use rustc_hash::FxHashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// One procedure to analyse
#[derive(Clone)]
pub struct ProcedureRequest {
    pub blocks: Vec<OperationBlock>,
    pub owning_method: MethodRef,
    pub points_to: Arc<dyn PointsToResult>,
}

/// Cache counters
#[derive(Debug, Default)]
pub struct SessionStats {
    pub field_cache_hits: AtomicU64,
    pub field_cache_misses: AtomicU64,
    pub procedures_analyzed: AtomicU64,
}

pub struct DisposeAnalysisSession {
    compilation: Arc<Compilation>,
    config: Arc<DisposeConfig>,
    well_known: Arc<WellKnownTypes>,
    ownership_transfer_types: OnceCell<Arc<FxHashSet<String>>>,
    disposable_fields: DashMap<String, Arc<Vec<FieldRef>>>,
    body_provider: Option<Arc<dyn ProcedureBodyProvider>>,
    cancellation: CancellationToken,
    stats: SessionStats,
}

impl std::fmt::Debug for DisposeAnalysisSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DisposeAnalysisSession")
            .field("compilation", &self.compilation.id)
            .finish_non_exhaustive()
    }
}

impl DisposeAnalysisSession {
    /// Validate `config` and resolve the well-known types of `compilation`
    pub fn new(compilation: Arc<Compilation>, config: DisposeConfig) -> Result<Self> {
        config.validate()?;
        let well_known = WellKnownTypes::resolve(&compilation, &config.well_known)?;
        debug!(compilation = %compilation.id, "dispose session created");

        Ok(Self {
            compilation,
            config: Arc::new(config),
            well_known: Arc::new(well_known),
            ownership_transfer_types: OnceCell::new(),
            disposable_fields: DashMap::new(),
            body_provider: None,
            cancellation: CancellationToken::new(),
            stats: SessionStats::default(),
        })
    }

    pub fn with_body_provider(mut self, provider: Arc<dyn ProcedureBodyProvider>) -> Self {
        self.body_provider = Some(provider);
        self
    }

    pub fn compilation_id(&self) -> CompilationId {
        self.compilation.id
    }

    pub fn config(&self) -> &DisposeConfig {
        &self.config
    }

    pub fn well_known(&self) -> &WellKnownTypes {
        &self.well_known
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Token observed by every analysis started from this session
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// Ownership-transfer-likely types present in the compilation, plus
    /// configured extras
    pub fn ownership_transfer_types(&self) -> Arc<FxHashSet<String>> {
        self.ownership_transfer_types
            .get_or_init(|| {
                let mut types: FxHashSet<String> = self
                    .config
                    .well_known
                    .ownership_transfer_types
                    .iter()
                    .filter(|name| self.compilation.get_type_by_metadata_name(name).is_some())
                    .cloned()
                    .collect();
                types.extend(self.config.additional_ownership_transfer_types.iter().cloned());
                debug!(
                    compilation = %self.compilation.id,
                    count = types.len(),
                    "ownership transfer types computed"
                );
                Arc::new(types)
            })
            .clone()
    }

    /// Disposable instance fields declared by `type_name`
    pub fn disposable_fields(&self, type_name: &str) -> Arc<Vec<FieldRef>> {
        if let Some(fields) = self.disposable_fields.get(type_name) {
            self.stats.field_cache_hits.fetch_add(1, Ordering::Relaxed);
            return Arc::clone(fields.value());
        }

        self.stats.field_cache_misses.fetch_add(1, Ordering::Relaxed);
        let fields: Vec<FieldRef> = self
            .compilation
            .fields_of(type_name)
            .iter()
            .filter(|f| !f.is_static && self.well_known.is_tracked_type(&f.ty))
            .cloned()
            .collect();
        debug!(ty = type_name, count = fields.len(), "disposable fields computed");

        self.disposable_fields
            .entry(type_name.to_string())
            .or_insert_with(|| Arc::new(fields))
            .value()
            .clone()
    }

    /// Analysis context for one procedure
    pub fn context(&self, points_to: Arc<dyn PointsToResult>) -> DisposeAnalysisContext {
        let mut ctx = DisposeAnalysisContext::new(
            Arc::clone(&self.config),
            Arc::clone(&self.well_known),
            self.ownership_transfer_types(),
            points_to,
        )
        .with_cancellation(self.cancellation.clone());
        if let Some(provider) = &self.body_provider {
            ctx = ctx.with_body_provider(Arc::clone(provider));
        }
        ctx
    }

    pub fn analyze(
        &self,
        blocks: &[OperationBlock],
        owning_method: &MethodRef,
        points_to: Arc<dyn PointsToResult>,
    ) -> Result<DisposeAnalysisResult> {
        let ctx = self.context(points_to);
        let result = DisposeAnalysis::analyze(blocks, owning_method, &ctx);
        self.stats.procedures_analyzed.fetch_add(1, Ordering::Relaxed);
        result
    }

    /// Analyse independent procedures in parallel; results keep input order
    pub fn analyze_many(&self, requests: &[ProcedureRequest]) -> Vec<Result<DisposeAnalysisResult>> {
        requests
            .par_iter()
            .map(|r| self.analyze(&r.blocks, &r.owning_method, Arc::clone(&r.points_to)))
            .collect()
    }

    /// Drop all cached data; later lookups recompute it
    pub fn teardown(&mut self) {
        let fields = self.disposable_fields.len();
        self.disposable_fields.clear();
        self.ownership_transfer_types.take();
        debug!(
            compilation = %self.compilation.id,
            cached_field_types = fields,
            "dispose session torn down"
        );
    }

    pub fn cached_field_type_count(&self) -> usize {
        self.disposable_fields.len()
    }

    pub fn has_ownership_transfer_types(&self) -> bool {
        self.ownership_transfer_types.get().is_some()
    }
}

/// Sessions keyed by compilation
pub struct DisposeSessionRegistry {
    config: DisposeConfig,
    sessions: DashMap<CompilationId, Arc<DisposeAnalysisSession>>,
}

impl DisposeSessionRegistry {
    pub fn new(config: DisposeConfig) -> Self {
        Self {
            config,
            sessions: DashMap::new(),
        }
    }

    /// Existing session for the compilation, or a new one
    pub fn get_or_create(&self, compilation: Arc<Compilation>) -> Result<Arc<DisposeAnalysisSession>> {
        if let Some(session) = self.sessions.get(&compilation.id) {
            return Ok(Arc::clone(session.value()));
        }

        let id = compilation.id;
        let session = Arc::new(DisposeAnalysisSession::new(compilation, self.config.clone())?);
        Ok(Arc::clone(self.sessions.entry(id).or_insert(session).value()))
    }

    pub fn get(&self, id: CompilationId) -> Option<Arc<DisposeAnalysisSession>> {
        self.sessions.get(&id).map(|s| Arc::clone(s.value()))
    }

    /// Forget the compilation's session, tearing it down if this was the
    /// last handle. Returns whether a session was registered.
    pub fn release(&self, id: CompilationId) -> bool {
        let Some((_, session)) = self.sessions.remove(&id) else {
            return false;
        };
        match Arc::try_unwrap(session) {
            Ok(mut session) => session.teardown(),
            Err(_) => debug!(compilation = %id, "session released while still in use"),
        }
        true
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
