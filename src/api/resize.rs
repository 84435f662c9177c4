use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::{ContainerBox, Ease, GeometryProvider};
use crate::extensions::GraphEvent;

use super::{FunnelGraph, GraphTask, TaskChannel, TaskKey};

const DEFAULT_WIDTH_FACTOR: f64 = 0.1;
const DEFAULT_HEIGHT_FACTOR: f64 = 0.5;
const TOGGLE_FACTOR: f64 = 0.4;

/// Resize configuration as written by the host.
///
/// `true` enables resize with 0.4/0.4 factors, `false` disables it. The
/// object form takes a free-form `factor` object and a debounce `wait` in
/// milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResizeSetting {
    Toggle(bool),
    Policy {
        #[serde(default)]
        factor: Option<serde_json::Value>,
        #[serde(default)]
        wait: Option<u64>,
    },
}

impl ResizeSetting {
    /// Resize with explicit factors.
    #[must_use]
    pub fn factors(width: f64, height: f64) -> Self {
        Self::Policy {
            factor: Some(serde_json::json!({ "width": width, "height": height })),
            wait: None,
        }
    }

    #[must_use]
    pub fn with_wait(self, wait: Duration) -> Self {
        let wait = Some(u64::try_from(wait.as_millis()).unwrap_or(u64::MAX));
        match self {
            Self::Policy { factor, .. } => Self::Policy { factor, wait },
            Self::Toggle(enabled) => Self::Policy {
                factor: enabled.then(|| {
                    serde_json::json!({ "width": TOGGLE_FACTOR, "height": TOGGLE_FACTOR })
                }),
                wait,
            },
        }
    }

    /// Resolves the setting into a policy.
    ///
    /// `Ok(None)` disables resize. A policy whose `factor` is not an object is
    /// rejected.
    pub fn resolve(&self) -> Result<Option<ResizePolicy>, InvalidResizeSetting> {
        match self {
            Self::Toggle(false) => Ok(None),
            Self::Toggle(true) => Ok(Some(ResizePolicy {
                width_factor: Some(TOGGLE_FACTOR),
                height_factor: Some(TOGGLE_FACTOR),
                wait: Duration::ZERO,
            })),
            Self::Policy {
                factor: Some(serde_json::Value::Object(factor)),
                wait,
            } => Ok(Some(ResizePolicy {
                width_factor: factor.get("width").and_then(serde_json::Value::as_f64),
                height_factor: factor.get("height").and_then(serde_json::Value::as_f64),
                wait: Duration::from_millis(wait.unwrap_or(0)),
            })),
            Self::Policy { .. } => Err(InvalidResizeSetting),
        }
    }
}

/// Marker for a resize setting without a usable factor object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidResizeSetting;

/// Enabled resize behavior.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResizePolicy {
    pub width_factor: Option<f64>,
    pub height_factor: Option<f64>,
    pub wait: Duration,
}

impl ResizePolicy {
    /// Width factor, defaulting to 0.1 when absent, zero or not finite.
    #[must_use]
    pub fn effective_width_factor(&self) -> f64 {
        effective_factor(self.width_factor, DEFAULT_WIDTH_FACTOR)
    }

    /// Height factor, defaulting to 0.5 when absent, zero or not finite.
    #[must_use]
    pub fn effective_height_factor(&self) -> f64 {
        effective_factor(self.height_factor, DEFAULT_HEIGHT_FACTOR)
    }

    /// New plotting size: `container - full_size * factor` per dimension.
    #[must_use]
    pub fn resized_dimensions(
        &self,
        container: ContainerBox,
        full_width: f64,
        full_height: f64,
    ) -> (f64, f64) {
        (
            container.client_width - full_width * self.effective_width_factor(),
            container.client_height - full_height * self.effective_height_factor(),
        )
    }
}

fn effective_factor(factor: Option<f64>, default: f64) -> f64 {
    factor
        .filter(|value| value.is_finite() && *value != 0.0)
        .unwrap_or(default)
}

/// Window resize listener registered by one graph, keyed by instance id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeListener {
    pub key: String,
    pub wait: Duration,
}

impl<G: GeometryProvider> FunnelGraph<G> {
    /// Recomputes plotting dimensions from the container box and re-runs the
    /// pipeline. Without a known container nothing happens.
    pub fn on_resize(&mut self) {
        if self.recompute_size() {
            self.draw_graph();
        }
    }

    /// Host notification that the window changed size.
    ///
    /// With a listener attached this (re)starts the debounced resize timer.
    pub fn notify_window_resize(&mut self) {
        let Some(listener) = &self.runtime.resize_listener else {
            return;
        };
        let wait = listener.wait;
        self.runtime.scheduler.schedule(
            TaskKey::graph(TaskChannel::Resize),
            wait,
            Duration::ZERO,
            Ease::Linear,
            GraphTask::Resize,
        );
    }

    #[must_use]
    pub fn has_resize_listener(&self) -> bool {
        self.runtime.resize_listener.is_some()
    }

    #[must_use]
    pub fn resize_listener(&self) -> Option<&ResizeListener> {
        self.runtime.resize_listener.as_ref()
    }

    pub(super) fn set_resize_setting(&mut self, setting: &ResizeSetting) {
        self.model.config.resize = match setting.resolve() {
            Ok(policy) => policy,
            Err(InvalidResizeSetting) => {
                warn!(
                    graph_id = %self.id,
                    "resize is disabled, no valid factor configuration was found"
                );
                None
            }
        };
    }

    /// Attaches or detaches the window listener to match the resize policy.
    ///
    /// Attaching performs one immediate recompute-and-redraw.
    pub(super) fn sync_resize_listener(&mut self) {
        if !self.runtime.scene.is_mounted() {
            return;
        }
        match (self.model.config.resize, self.runtime.resize_listener.is_some()) {
            (Some(policy), false) => {
                let key = format!("resize.{}", self.id);
                debug!(graph_id = %self.id, listener = %key, "resize listener attached");
                self.runtime.resize_listener = Some(ResizeListener {
                    key,
                    wait: policy.wait,
                });
                if self.recompute_size() {
                    self.render_pass();
                }
            }
            (Some(policy), true) => {
                if let Some(listener) = self.runtime.resize_listener.as_mut() {
                    listener.wait = policy.wait;
                }
            }
            (None, true) => self.detach_resize_listener(),
            (None, false) => {}
        }
    }

    pub(super) fn detach_resize_listener(&mut self) {
        if let Some(listener) = self.runtime.resize_listener.take() {
            debug!(graph_id = %self.id, listener = %listener.key, "resize listener detached");
        }
        self.runtime
            .scheduler
            .cancel(TaskKey::graph(TaskChannel::Resize));
    }

    /// Applies the resize formula. Returns `false` when no container is known.
    fn recompute_size(&mut self) -> bool {
        let Some(container) = self.model.container else {
            debug!(graph_id = %self.id, "resize skipped without container box");
            return false;
        };
        let policy = self.model.config.resize.unwrap_or(ResizePolicy {
            width_factor: None,
            height_factor: None,
            wait: Duration::ZERO,
        });
        let (width, height) = policy.resized_dimensions(
            container,
            self.model.config.full_width(),
            self.model.config.full_height(),
        );
        self.model.config.width = width;
        self.model.config.height = height;
        debug!(graph_id = %self.id, width, height, "resized");
        self.emit_plugin_event(GraphEvent::Resized { width, height });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formula_uses_default_factors() {
        let policy = ResizePolicy {
            width_factor: None,
            height_factor: Some(0.0),
            wait: Duration::ZERO,
        };
        let (width, height) =
            policy.resized_dimensions(ContainerBox::new(500.0, 500.0), 400.0, 400.0);
        assert!((width - 460.0).abs() <= 1e-9);
        assert!((height - 300.0).abs() <= 1e-9);
    }

    #[test]
    fn settings_resolve_like_loose_configuration() {
        assert_eq!(ResizeSetting::Toggle(false).resolve(), Ok(None));
        let toggled = ResizeSetting::Toggle(true)
            .resolve()
            .expect("valid")
            .expect("enabled");
        assert_eq!(toggled.width_factor, Some(0.4));

        let invalid: ResizeSetting =
            serde_json::from_str(r#"{"factor": 0.3}"#).expect("parses");
        assert_eq!(invalid.resolve(), Err(InvalidResizeSetting));

        let object: ResizeSetting =
            serde_json::from_str(r#"{"factor": {"width": 0.2}, "wait": 50}"#).expect("parses");
        let policy = object.resolve().expect("valid").expect("enabled");
        assert_eq!(policy.width_factor, Some(0.2));
        assert_eq!(policy.height_factor, None);
        assert_eq!(policy.wait, Duration::from_millis(50));
    }
}
