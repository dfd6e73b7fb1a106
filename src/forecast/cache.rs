use std::sync::{Arc, PoisonError, RwLockReadGuard, RwLockWriteGuard, RwLock};

use log::{debug, error, info};
use measure_time::debug_time;
use rustc_hash::FxHashMap;
#[cfg(feature = "tracing")]
use tracing::Level;

use crate::forecast::{FeatureBuilder, FlowPredictor, ForecastKey, ForecastTable, PredictorError};
use crate::graph::Graph;

#[derive(Debug, Default)]
struct CacheState {
    entries: FxHashMap<ForecastKey, Arc<ForecastTable>>,
    active: Option<Arc<ForecastTable>>,
    version: u64,
}

/// Forecast tables by key, plus the most recently resolved table.
///
/// One lock guards the map, the active table and the version counter.
/// Predictions run outside the lock, so two concurrent builds both
/// complete and the last one to store becomes active.
#[derive(Debug, Default)]
pub struct ForecastCache {
    state: RwLock<CacheState>,
}

impl ForecastCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, CacheState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, CacheState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the table for `key`, building it when absent or when
    /// `force_refresh` is set. The returned table becomes active either way.
    ///
    /// A failed build leaves both the map and the active table untouched.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, graph, features, predictor), err(level = Level::ERROR)))]
    pub fn get_or_build(
        &self,
        graph: &Graph,
        key: ForecastKey,
        features: &FeatureBuilder,
        predictor: &dyn FlowPredictor,
        force_refresh: bool,
    ) -> Result<Arc<ForecastTable>, PredictorError> {
        if !force_refresh {
            let mut state = self.write();
            if let Some(table) = state.entries.get(&key).cloned() {
                debug!("Forecast cache hit for {key} (version {})", table.version());
                state.active = Some(Arc::clone(&table));
                return Ok(table);
            }
        }

        let mut table = Self::build(graph, key, features, predictor).inspect_err(|err| {
            error!("Forecast for {key} failed with {} predictor: {err}", predictor.name());
        })?;

        let mut state = self.write();
        state.version += 1;
        table.version = state.version;

        let table = Arc::new(table);
        state.entries.insert(key, Arc::clone(&table));
        state.active = Some(Arc::clone(&table));

        info!(
            "Stored forecast {key} as version {} ({} edges)",
            table.version(),
            table.len()
        );
        Ok(table)
    }

    fn build(
        graph: &Graph,
        key: ForecastKey,
        features: &FeatureBuilder,
        predictor: &dyn FlowPredictor,
    ) -> Result<ForecastTable, PredictorError> {
        debug_time!("forecast {} using {}", key, predictor.name());

        let rows = features.rows(graph, &key);
        let predictions = predictor.predict(&rows)?;
        ForecastTable::from_predictions(graph, key, predictions)
    }

    /// The most recently resolved table, if any.
    pub fn active(&self) -> Option<Arc<ForecastTable>> {
        self.read().active.clone()
    }

    /// Looks up a stored table without changing the active one.
    pub fn get(&self, key: &ForecastKey) -> Option<Arc<ForecastTable>> {
        self.read().entries.get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().entries.is_empty()
    }

    /// Drops every stored table and the active pointer.
    /// Versions keep increasing across a clear.
    pub fn clear(&self) {
        let mut state = self.write();
        state.entries.clear();
        state.active = None;
    }
}
