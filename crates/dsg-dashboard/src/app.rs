use std::path::{Path, PathBuf};
use std::sync::Arc;

use dsg_core::{Controls, Dataset, Views};
use tracing::info;

use crate::config::DashboardConfig;
use crate::error::{Error, Result};
use crate::layout::DashboardLayout;
use crate::sources::BoundSources;

/// A loaded app directory: configuration, dataset and page layout.
#[derive(Debug, Clone)]
pub struct DashboardApp {
    pub app_dir: PathBuf,
    pub config: DashboardConfig,
    pub dataset: Arc<Dataset>,
    pub initial_controls: Controls,
    pub layout: DashboardLayout,
}

impl DashboardApp {
    /// Read `dsg.toml` (if any) and the dataset it points at.
    pub fn load(app_dir: impl Into<PathBuf>) -> Result<Self> {
        let app_dir = app_dir.into();
        let config = DashboardConfig::load_app_dir(&app_dir)?;
        Self::with_config(app_dir, config)
    }

    pub fn with_config(app_dir: impl Into<PathBuf>, config: DashboardConfig) -> Result<Self> {
        let app_dir = app_dir.into();
        let data_path = config.data_path(&app_dir);
        let dataset = dsg_io::load_dataset(&data_path).map_err(|source| Error::LoadFailed {
            path: data_path.clone(),
            source,
        })?;
        if let Some((first, last)) = dataset.date_range() {
            info!(
                "loaded {} observations for {} stations from {} ({} to {})",
                dataset.len(),
                dataset.stations().len(),
                data_path.display(),
                first,
                last
            );
        }

        let initial_controls = config.controls.to_controls()?;
        let views = Views::derive(&dataset, &initial_controls)?;
        let initial = BoundSources::from(&views);
        let layout =
            DashboardLayout::build(&config.title, &dataset, &initial_controls, &initial.instant);

        Ok(Self {
            app_dir,
            config,
            dataset: Arc::new(dataset),
            initial_controls,
            layout,
        })
    }

    pub fn app_dir(&self) -> &Path {
        &self.app_dir
    }
}
