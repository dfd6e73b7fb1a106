use std::sync::Arc;
use std::time::Duration;

use log::info;

use crate::forecast::{BaselinePredictor, FeatureBuilder, FlowPredictor, ForecastCache, LinearPredictor};
use crate::graph::Graph;
use crate::route::Planner;
use crate::server::Config;

/// Everything a request handler reads. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub graph: Arc<Graph>,
    pub cache: Arc<ForecastCache>,
    pub predictor: Arc<dyn FlowPredictor>,
    pub features: FeatureBuilder,
    pub planner: Planner,
    pub route_timeout: Duration,
}

impl AppState {
    pub fn new(graph: Graph, predictor: Arc<dyn FlowPredictor>) -> Self {
        AppState {
            graph: Arc::new(graph),
            cache: Arc::new(ForecastCache::new()),
            predictor,
            features: FeatureBuilder::default(),
            planner: Planner::default(),
            route_timeout: Config::default().route_timeout,
        }
    }

    pub fn with_timeout(self, route_timeout: Duration) -> Self {
        AppState {
            route_timeout,
            ..self
        }
    }

    /// Loads the graph and the flow model named by `config`.
    pub fn from_config(config: &Config) -> crate::Result<Self> {
        let graph = Graph::from_csv(&config.nodes_csv, &config.edges_csv)?;

        let predictor: Arc<dyn FlowPredictor> = match &config.flow_model {
            Some(path) => Arc::new(LinearPredictor::from_file(path)?),
            None => Arc::new(BaselinePredictor),
        };

        info!(
            "Serving {:?} with the {} flow model",
            graph,
            predictor.name()
        );

        Ok(AppState::new(graph, predictor).with_timeout(config.route_timeout))
    }
}
