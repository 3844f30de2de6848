//! Per-worker scan execution.
//!
//! A worker is bound to one service and one file system at creation. It keeps
//! the set of modules it has already reported so that later queries on the
//! same worker do not report them again.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::consumer::{FullDependencyConsumer, SeenModules};
use crate::deps::FullDependenciesResult;
use crate::engine::{DependencyConsumer, OutputFormat, ScanError};
use crate::fs::{FileSystem, PhysicalFileSystem};
use crate::lookup::{ModuleOutputCallback, OutputLookup};
use crate::service::DependencyScanningService;
use crate::{Error, Result};

/// Which public result generation a query is extracting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandShape {
    /// One flattened driver command line per translation unit.
    LegacyDriverCommand,
    /// Every driver command the translation unit needs.
    MultiCommand,
}

#[derive(Debug)]
pub struct DependencyScanningWorker {
    service: DependencyScanningService,
    fs: Arc<dyn FileSystem>,
    already_seen: Mutex<SeenModules>,
}

impl DependencyScanningWorker {
    pub fn new(service: &DependencyScanningService, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            service: service.clone(),
            fs,
            already_seen: Mutex::new(SeenModules::new()),
        }
    }

    /// Worker bound to the host's physical file system.
    pub fn with_physical_fs(service: &DependencyScanningService) -> Self {
        Self::new(service, Arc::new(PhysicalFileSystem::new()))
    }

    pub fn format(&self) -> OutputFormat {
        self.service.format()
    }

    pub fn service(&self) -> &DependencyScanningService {
        &self.service
    }

    /// Number of distinct modules this worker has reported as discovered.
    pub fn seen_module_count(&self) -> usize {
        self.already_seen.lock().len()
    }

    /// Run the engine against one compilation, streaming into `consumer`.
    pub fn compute_dependencies(
        &self,
        working_directory: &str,
        command_line: &[String],
        consumer: &mut dyn DependencyConsumer,
        module_name: Option<&str>,
    ) -> std::result::Result<(), ScanError> {
        self.service.engine().compute_dependencies(
            self.fs.as_ref(),
            working_directory,
            command_line,
            consumer,
            module_name,
        )
    }

    /// Scan one compilation and extract its full dependency result.
    ///
    /// `lookup` resolves module output paths; module file paths are cached
    /// for the duration of this call only. Nothing is recorded as seen when
    /// the scan fails.
    ///
    /// # Panics
    ///
    /// Panics when `shape` is [`CommandShape::LegacyDriverCommand`] and the
    /// engine produced more than one driver command.
    pub fn get_full_dependencies(
        &self,
        command_line: &[String],
        working_directory: &str,
        module_name: Option<&str>,
        lookup: &mut dyn ModuleOutputCallback,
        shape: CommandShape,
    ) -> Result<FullDependenciesResult> {
        if command_line.len() < 2 {
            return Err(Error::InvalidArguments);
        }
        if self.format() != OutputFormat::Full {
            return Err(Error::UnsupportedMode);
        }

        tracing::debug!(
            working_directory,
            module_name,
            args = command_line.len(),
            ?shape,
            "computing full dependencies"
        );

        let mut seen = self.already_seen.lock();
        let mut consumer = FullDependencyConsumer::new(&mut seen, OutputLookup::new(lookup));
        self.compute_dependencies(working_directory, command_line, &mut consumer, module_name)?;

        let result = match shape {
            CommandShape::LegacyDriverCommand => {
                consumer.full_dependencies_legacy_driver_command(command_line)?
            }
            CommandShape::MultiCommand => consumer.take_full_dependencies()?,
        };

        tracing::trace!(result = %result.to_json_string(), "full dependencies");
        Ok(result)
    }
}
