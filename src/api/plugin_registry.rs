use crate::core::GeometryProvider;
use crate::error::{FunnelError, FunnelResult};
use crate::extensions::{GraphEvent, GraphPlugin, GraphPluginContext};

use super::FunnelGraph;

impl<G: GeometryProvider> FunnelGraph<G> {
    /// Registers a plugin with a unique, non-empty id.
    pub fn register_plugin(&mut self, plugin: Box<dyn GraphPlugin>) -> FunnelResult<()> {
        let plugin_id = plugin.id().to_owned();
        if plugin_id.is_empty() {
            return Err(FunnelError::InvalidData(
                "plugin id must not be empty".to_owned(),
            ));
        }
        if self.has_plugin(&plugin_id) {
            return Err(FunnelError::InvalidData(format!(
                "plugin with id `{plugin_id}` is already registered"
            )));
        }
        self.runtime.plugins.push(plugin);
        Ok(())
    }

    /// Unregisters a plugin by id. Returns `true` when removed.
    pub fn unregister_plugin(&mut self, plugin_id: &str) -> bool {
        let Some(position) = self
            .runtime
            .plugins
            .iter()
            .position(|entry| entry.id() == plugin_id)
        else {
            return false;
        };
        self.runtime.plugins.remove(position);
        true
    }

    #[must_use]
    pub fn plugin_count(&self) -> usize {
        self.runtime.plugins.len()
    }

    #[must_use]
    pub fn has_plugin(&self, plugin_id: &str) -> bool {
        self.runtime
            .plugins
            .iter()
            .any(|plugin| plugin.id() == plugin_id)
    }

    pub(super) fn plugin_context(&self) -> GraphPluginContext {
        let config = &self.model.config;
        GraphPluginContext {
            stage_count: self.model.series.stage_count(),
            is_2d: self.model.series.is_2d(),
            direction: config.direction,
            gradient_direction: config.gradient_direction,
            width: config.width,
            height: config.height,
            pending_tasks: self.runtime.scheduler.len(),
            lifecycle: self.runtime.lifecycle,
        }
    }

    pub(super) fn emit_plugin_event(&mut self, event: GraphEvent) {
        if self.runtime.plugins.is_empty() {
            return;
        }
        let context = self.plugin_context();
        for plugin in &mut self.runtime.plugins {
            plugin.on_event(event, context);
        }
    }
}
