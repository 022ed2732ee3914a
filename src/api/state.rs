use crate::config::{Config, OwnerScope, ReportConfig};
use crate::export::Exporters;
use crate::repositories::{IndicatorFetcher, SharedStore};
use crate::services::{DashboardService, ExportService, ReportBuilder};
use chrono::{DateTime, FixedOffset};
use std::sync::Arc;
use std::time::Duration;

/// Everything a handler needs, cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub dashboard: DashboardService,
    pub reports: ReportBuilder,
    pub exports: ExportService,
    pub settings: Arc<ReportConfig>,
    pub refresh_every: Duration,
}

impl AppState {
    pub fn new(store: SharedStore, config: &Config) -> Self {
        Self::with_exporters(store, config, Exporters::standard())
    }

    pub fn with_exporters(store: SharedStore, config: &Config, exporters: Exporters) -> Self {
        let fetcher = IndicatorFetcher::new(store);
        let reports = ReportBuilder::new(
            fetcher.clone(),
            config.reports.title.clone(),
            config.reports.activity_limit,
        );

        Self {
            dashboard: DashboardService::new(fetcher),
            exports: ExportService::new(reports.clone(), exporters),
            reports,
            settings: Arc::new(config.reports.clone()),
            refresh_every: Duration::from_secs(config.dashboard.refresh_interval_secs),
        }
    }

    pub fn owner_scope(&self) -> OwnerScope {
        self.settings.owner_scope
    }

    pub fn now(&self) -> DateTime<FixedOffset> {
        self.settings.now()
    }
}
