//! Configuration for trace analysis
//!
//! Loaded from an optional TOML file, then overridden by command-line flags.
//!
//! ```toml
//! [bounds]
//! xmin = 0
//! margin = 10
//!
//! [exclude]
//! all = ["Flush"]
//! lifecycle = ["esp_timer"]
//! blocking = ["esp_timer", "IDLE"]
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::error::{Result, TraceError};
use crate::event::Tick;
use crate::filter::{TaskFilter, View};
use crate::reconstruct::Bounds;

/// Complete analysis configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    pub bounds: BoundsConfig,
    pub exclude: ExcludeConfig,
}

/// Tick range for the reconstructed views
///
/// Unset ends are inferred from the data, padded by `margin` ticks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundsConfig {
    pub xmin: Option<Tick>,
    pub xmax: Option<Tick>,
    pub margin: Tick,
}

fn default_margin() -> Tick {
    10
}

impl Default for BoundsConfig {
    fn default() -> Self {
        Self {
            xmin: None,
            xmax: None,
            margin: default_margin(),
        }
    }
}

/// Task names hidden from the views
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExcludeConfig {
    /// Hidden from every view
    pub all: Vec<String>,
    pub cpu: Vec<String>,
    pub lifecycle: Vec<String>,
    pub blocking: Vec<String>,
}

impl TraceConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| TraceError::from_open(path, e))?;
        let config: Self = toml::from_str(&text).map_err(|source| TraceError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), ?config, "loaded configuration");
        Ok(config)
    }

    /// Build the task filter described by `[exclude]`
    pub fn filter(&self) -> TaskFilter {
        let mut filter = TaskFilter::excluding(self.exclude.all.iter().cloned());
        filter.exclude_from(View::Cpu, self.exclude.cpu.iter().cloned());
        filter.exclude_from(View::Lifecycle, self.exclude.lifecycle.iter().cloned());
        filter.exclude_from(View::Blocking, self.exclude.blocking.iter().cloned());
        filter
    }

    /// Resolve the view range against the data's tick range.
    ///
    /// An empty trace behaves as if its only tick were 0. An inferred range
    /// that collapses is widened to one tick; an explicit range with
    /// `xmax < xmin` is an error.
    pub fn resolve_bounds(&self, data_range: Option<(Tick, Tick)>) -> Result<Bounds> {
        let (dmin, dmax) = data_range.unwrap_or((0, 0));
        let b = &self.bounds;

        if let (Some(xmin), Some(xmax)) = (b.xmin, b.xmax) {
            if xmax < xmin {
                return Err(TraceError::InvalidBounds { xmin, xmax });
            }
        }

        // Saturating: ticks at the ends of the i64 range are valid input
        let xmin = b.xmin.unwrap_or_else(|| dmin.saturating_sub(b.margin));
        let mut xmax = b.xmax.unwrap_or_else(|| dmax.saturating_add(b.margin));
        if xmax <= xmin {
            xmax = xmin.saturating_add(1);
        }
        Ok(Bounds { xmin, xmax })
    }
}
