use crate::domain::report::PageSize;
use serde::Deserialize;
use std::num::NonZeroUsize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub history: HistorySettings,
    pub report: ReportSettings,
    pub preview: PreviewSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind_address: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HistorySettings {
    pub capacity: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportSettings {
    pub page_width: f64,
    pub page_height: f64,
    pub surface_width: u32,
    pub surface_height: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PreviewSettings {
    pub max_rows: usize,
}

impl HistorySettings {
    pub fn capacity(&self) -> anyhow::Result<NonZeroUsize> {
        NonZeroUsize::new(self.capacity)
            .ok_or_else(|| anyhow::anyhow!("history.capacity must be at least 1"))
    }
}

impl ReportSettings {
    pub fn page_size(&self) -> PageSize {
        PageSize::new(self.page_width, self.page_height)
    }
}

fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
    config::Config::builder()
        .set_default("server.bind_address", "0.0.0.0:8080")?
        .set_default("history.capacity", 5)?
        .set_default("report.page_width", PageSize::LETTER.width)?
        .set_default("report.page_height", PageSize::LETTER.height)?
        .set_default("report.surface_width", 900)?
        .set_default("report.surface_height", 600)?
        .set_default("preview.max_rows", 50)
}

/// Largest page or surface edge accepted, in points or pixels.
const MAX_REPORT_EDGE: u32 = 10_000;

fn validate(config: AppConfig) -> anyhow::Result<AppConfig> {
    config.history.capacity()?;

    let report = &config.report;
    let page_ok = |edge: f64| edge.is_finite() && (1.0..=f64::from(MAX_REPORT_EDGE)).contains(&edge);
    if !page_ok(report.page_width) || !page_ok(report.page_height) {
        anyhow::bail!(
            "report page dimensions must be finite and between 1 and {} (got {}x{})",
            MAX_REPORT_EDGE,
            report.page_width,
            report.page_height
        );
    }
    let surface_ok = |edge: u32| (1..=MAX_REPORT_EDGE).contains(&edge);
    if !surface_ok(report.surface_width) || !surface_ok(report.surface_height) {
        anyhow::bail!(
            "report surface dimensions must be between 1 and {} (got {}x{})",
            MAX_REPORT_EDGE,
            report.surface_width,
            report.surface_height
        );
    }
    Ok(config)
}

/// Load settings from `config/server.toml` (optional) and `EQUIPMENT__*` env vars
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = defaults()?
        .add_source(config::File::with_name("config/server").required(false))
        .add_source(
            config::Environment::with_prefix("EQUIPMENT")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    validate(settings.try_deserialize()?)
}
