use ecometer::config::AppConfig;
use ecometer::scoring::{bonus_source, EcoScoreEngine, ScoringConfig};
use ecometer::usage::{BillImageStore, JsonFileStore, SystemClock, UsageService};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

pub(crate) type FileUsageService = UsageService<JsonFileStore, SystemClock>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn scoring_engine(config: &AppConfig) -> EcoScoreEngine {
    let scoring = ScoringConfig {
        tariff_per_unit: config.scoring.tariff_per_unit,
        ..ScoringConfig::default()
    };
    EcoScoreEngine::new(scoring, bonus_source(config.scoring.bonus))
}

/// Usage service backed by the configured JSON document and bills directory.
pub(crate) fn build_usage_service(config: &AppConfig) -> FileUsageService {
    UsageService::new(
        Arc::new(JsonFileStore::new(config.storage.data_file.clone())),
        Arc::new(SystemClock),
        scoring_engine(config),
        BillImageStore::new(config.storage.bills_dir.clone()),
    )
}
