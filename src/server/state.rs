use std::sync::Arc;
use std::time::Instant;

use crate::config::Settings;
use crate::template::{create_template_store, HelperRegistry, TemplateProcessor, TemplateStore};

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub registry: Arc<HelperRegistry>,
    pub processor: TemplateProcessor,
    pub template_store: Arc<TemplateStore>,
    pub start_time: Instant,
}

impl AppState {
    /// Build state with the built-in helper set
    pub fn new(settings: Settings) -> Self {
        Self::with_registry(settings, Arc::new(HelperRegistry::new()))
    }

    /// Build state around an existing registry, e.g. one with custom helpers
    pub fn with_registry(settings: Settings, registry: Arc<HelperRegistry>) -> Self {
        let processor = TemplateProcessor::new(registry.clone());

        Self {
            settings: Arc::new(settings),
            registry,
            processor,
            template_store: create_template_store(),
            start_time: Instant::now(),
        }
    }
}
