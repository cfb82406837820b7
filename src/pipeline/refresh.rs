//! Periodic refresh loop
//!
//! Every `telemetry.refresh_secs` (default 20s) the loop performs at
//! most one telemetry fetch and one prediction cycle, then publishes
//! the resulting snapshot. A failed fetch degrades to manual defaults
//! for that cycle — no retries, the next tick tries again.

use super::{resolve_inputs, AppState, DashboardSnapshot};
use crate::config::AppConfig;
use crate::dataset::ReferenceDataset;
use crate::engine;
use crate::telemetry::ReadingProvider;
use crate::types::{LiveReadings, TelemetryStatus};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Run one prediction cycle: resolve inputs, validate, predict.
///
/// Range violations suppress the prediction; the snapshot carries the
/// messages instead. This is the single request handler both the timer
/// tick and the manual API path go through.
pub fn run_cycle(
    config: &AppConfig,
    dataset: &ReferenceDataset,
    live: &LiveReadings,
    telemetry: TelemetryStatus,
    cycle: u64,
) -> DashboardSnapshot {
    let inputs = resolve_inputs(&config.defaults, live, &config.limits);
    let query = inputs.to_query();

    let violations = engine::validate(&query, &config.limits);
    let prediction = if violations.is_empty() {
        match engine::predict(&query, dataset) {
            Ok(result) => Some(result),
            Err(e) => {
                error!(error = %e, "Prediction failed");
                None
            }
        }
    } else {
        None
    };

    let notice = telemetry.notice();
    DashboardSnapshot {
        inputs,
        violations: violations.iter().map(ToString::to_string).collect(),
        prediction,
        telemetry,
        notice,
        generated_at: Utc::now(),
        cycle,
    }
}

/// Background task that keeps the dashboard snapshot fresh.
pub struct RefreshLoop {
    config: Arc<AppConfig>,
    dataset: Arc<ReferenceDataset>,
    provider: Option<Box<dyn ReadingProvider>>,
    app_state: Arc<RwLock<AppState>>,
    cancel: CancellationToken,
}

impl RefreshLoop {
    pub fn new(
        config: Arc<AppConfig>,
        dataset: Arc<ReferenceDataset>,
        provider: Option<Box<dyn ReadingProvider>>,
        app_state: Arc<RwLock<AppState>>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            config,
            dataset,
            provider,
            app_state,
            cancel,
        }
    }

    /// Run until cancelled. The first cycle fires immediately so the
    /// dashboard has data as soon as the server is up.
    pub async fn run(self) {
        let period = Duration::from_secs(self.config.telemetry.refresh_secs.max(1));
        let mut interval = tokio::time::interval(period);
        info!(
            period_secs = period.as_secs(),
            telemetry = self.provider.is_some(),
            "[RefreshLoop] Task starting"
        );

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.tick().await;
                }
                () = self.cancel.cancelled() => {
                    info!("[RefreshLoop] Received shutdown signal");
                    break;
                }
            }
        }
    }

    /// One refresh cycle: fetch (if enabled), predict, publish.
    async fn tick(&self) {
        let (readings, status) = match &self.provider {
            Some(provider) => match provider.latest().await {
                Ok(readings) if readings.is_empty() => {
                    warn!(
                        provider = provider.provider_name(),
                        "Channel feed returned no usable readings"
                    );
                    (readings, TelemetryStatus::NoData)
                }
                Ok(readings) => (readings, TelemetryStatus::Live),
                Err(e) => {
                    warn!(
                        provider = provider.provider_name(),
                        error = %e,
                        "Telemetry fetch failed, using manual defaults"
                    );
                    (
                        LiveReadings::default(),
                        TelemetryStatus::Unavailable {
                            message: e.to_string(),
                        },
                    )
                }
            },
            None => (LiveReadings::default(), TelemetryStatus::Disabled),
        };

        let mut state = self.app_state.write().await;
        let cycle = state.cycles_completed + 1;
        let snapshot = run_cycle(&self.config, &self.dataset, &readings, status.clone(), cycle);

        state.last_readings = readings;
        state.telemetry = status;
        state.latest = Some(snapshot);
        state.cycles_completed = cycle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::TelemetryError;
    use crate::types::{ReadingSource, ReferenceRow};
    use async_trait::async_trait;

    fn test_dataset() -> ReferenceDataset {
        ReferenceDataset::from_rows(vec![
            ReferenceRow {
                thermal_cond: 100.0,
                block_size: 10.0,
                source_temp: 60.0,
                ambient_temp: 25.0,
                avg_temp: 45.2,
                max_temp: 58.1,
                center_temp: 50.3,
            },
            ReferenceRow {
                thermal_cond: 400.0,
                block_size: 40.0,
                source_temp: 120.0,
                ambient_temp: 40.0,
                avg_temp: 85.0,
                max_temp: 110.0,
                center_temp: 95.0,
            },
        ])
    }

    /// Scripted provider for refresh-loop tests.
    struct StubProvider {
        readings: Result<LiveReadings, &'static str>,
    }

    #[async_trait]
    impl ReadingProvider for StubProvider {
        async fn latest(&self) -> Result<LiveReadings, TelemetryError> {
            match &self.readings {
                Ok(r) => Ok(*r),
                Err(_) => Err(TelemetryError::ServerError(
                    reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                )),
            }
        }

        fn provider_name(&self) -> &str {
            "stub"
        }
    }

    #[test]
    fn test_cycle_with_defaults_predicts_first_row() {
        let config = AppConfig::default();
        let dataset = test_dataset();
        let snapshot = run_cycle(
            &config,
            &dataset,
            &LiveReadings::default(),
            TelemetryStatus::Disabled,
            1,
        );

        assert!(snapshot.violations.is_empty());
        let prediction = snapshot.prediction.expect("prediction should run");
        assert_eq!(prediction.nearest_index, 0);
        assert_eq!(prediction.avg_temp, 45.2);
        assert!(snapshot.notice.is_none());
    }

    #[test]
    fn test_cycle_with_live_override() {
        let config = AppConfig::default();
        let dataset = test_dataset();
        let live = LiveReadings {
            ambient: Some(41.0),
            source: Some(118.0),
        };
        let snapshot = run_cycle(&config, &dataset, &live, TelemetryStatus::Live, 1);

        assert_eq!(snapshot.inputs.ambient_temp.source, ReadingSource::Live);
        assert_eq!(snapshot.inputs.source_temp.value, 118.0);
        assert!(snapshot.prediction.is_some());
    }

    #[test]
    fn test_cycle_with_unavailable_telemetry_sets_notice() {
        let config = AppConfig::default();
        let dataset = test_dataset();
        let status = TelemetryStatus::Unavailable {
            message: "connection refused".to_string(),
        };
        let snapshot = run_cycle(&config, &dataset, &LiveReadings::default(), status, 3);

        assert!(snapshot.prediction.is_some(), "fallback still predicts");
        let notice = snapshot.notice.expect("advisory notice expected");
        assert!(notice.contains("connection refused"));
        assert_eq!(snapshot.inputs.ambient_temp.source, ReadingSource::Manual);
    }

    #[test]
    fn test_cycle_with_out_of_range_defaults_suppresses_prediction() {
        let mut config = AppConfig::default();
        config.defaults.thermal_cond = 1000.0;
        let dataset = test_dataset();
        let snapshot = run_cycle(
            &config,
            &dataset,
            &LiveReadings::default(),
            TelemetryStatus::Disabled,
            1,
        );

        assert!(snapshot.prediction.is_none());
        assert_eq!(
            snapshot.violations,
            vec!["ThermalCond should be between 50 and 500".to_string()]
        );
    }

    #[tokio::test]
    async fn test_refresh_tick_publishes_snapshot() {
        let config = Arc::new(AppConfig::default());
        let dataset = Arc::new(test_dataset());
        let app_state = Arc::new(RwLock::new(AppState::default()));
        let provider: Box<dyn ReadingProvider> = Box::new(StubProvider {
            readings: Ok(LiveReadings {
                ambient: Some(22.5),
                source: Some(65.0),
            }),
        });

        let refresh = RefreshLoop::new(
            config,
            dataset,
            Some(provider),
            Arc::clone(&app_state),
            CancellationToken::new(),
        );
        refresh.tick().await;

        let state = app_state.read().await;
        assert_eq!(state.cycles_completed, 1);
        assert_eq!(state.telemetry, TelemetryStatus::Live);
        let snapshot = state.latest.as_ref().expect("snapshot published");
        assert_eq!(snapshot.inputs.ambient_temp.value, 22.5);
        assert_eq!(snapshot.inputs.source_temp.value, 65.0);
    }

    #[tokio::test]
    async fn test_refresh_tick_fetch_failure_falls_back() {
        let config = Arc::new(AppConfig::default());
        let dataset = Arc::new(test_dataset());
        let app_state = Arc::new(RwLock::new(AppState::default()));
        let provider: Box<dyn ReadingProvider> =
            Box::new(StubProvider { readings: Err("boom") });

        let refresh = RefreshLoop::new(
            config,
            dataset,
            Some(provider),
            Arc::clone(&app_state),
            CancellationToken::new(),
        );
        refresh.tick().await;

        let state = app_state.read().await;
        assert!(matches!(
            state.telemetry,
            TelemetryStatus::Unavailable { .. }
        ));
        let snapshot = state.latest.as_ref().expect("snapshot still published");
        assert!(snapshot.prediction.is_some());
        assert_eq!(snapshot.inputs.ambient_temp.value, 25.0);
    }
}
