//! Long-lived scanning service.
//!
//! A service fixes the scanning mode and output format for its lifetime and
//! is shared read-only by every worker created from it.

use std::sync::Arc;

use crate::config::{CasOptions, ServiceConfig};
use crate::engine::{OutputFormat, ScanEngine, ScanningMode};

#[derive(Debug, Clone)]
pub struct DependencyScanningService {
    config: ServiceConfig,
    engine: Arc<dyn ScanEngine>,
}

impl DependencyScanningService {
    pub fn new(config: ServiceConfig, engine: Arc<dyn ScanEngine>) -> Self {
        tracing::debug!(
            format = %config.output_format,
            mode = ?config.scanning_mode,
            reuse_file_manager = config.reuse_file_manager,
            "creating dependency scanning service"
        );
        Self { config, engine }
    }

    pub fn mode(&self) -> ScanningMode {
        self.config.scanning_mode
    }

    pub fn format(&self) -> OutputFormat {
        self.config.output_format
    }

    pub fn cas_options(&self) -> &CasOptions {
        &self.config.cas
    }

    pub fn reuse_file_manager(&self) -> bool {
        self.config.reuse_file_manager
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn engine(&self) -> &Arc<dyn ScanEngine> {
        &self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::UnavailableEngine;

    #[test]
    fn test_service_exposes_config() {
        let config = ServiceConfig::default().with_output_format(OutputFormat::Make);
        let service = DependencyScanningService::new(config, Arc::new(UnavailableEngine));
        assert_eq!(service.format(), OutputFormat::Make);
        assert_eq!(service.mode(), ScanningMode::DependencyDirectivesScan);
        assert!(service.cas_options().path.is_none());
        assert!(!service.reuse_file_manager());
    }
}
