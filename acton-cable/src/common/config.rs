/*
 * Copyright (c) 2024. Govcraft
 *
 * Licensed under either of
 *   * Apache License, Version 2.0 (the "License");
 *     you may not use this file except in compliance with the License.
 *     You may obtain a copy of the License at http://www.apache.org/licenses/LICENSE-2.0
 *   * MIT license: http://opensource.org/licenses/MIT
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the applicable License for the specific language governing permissions and
 * limitations under that License.
 */

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

/// Order in which buffered actions are replayed after a subscription is confirmed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlushOrder {
    /// Oldest action first, i.e. the order the actions were issued.
    #[default]
    Fifo,
    /// Most recently buffered action first.
    ///
    /// Only useful for peers that were built against most-recent-first replay.
    Lifo,
}

/// Configuration for Acton Cable channels.
///
/// Loaded from `cable.toml` in the XDG `acton` config directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CableConfig {
    /// Defaults applied to newly created channels
    pub channel: ChannelDefaults,
}

/// Per-channel defaults, overridable through [`ChannelOptions`](crate::common::ChannelOptions).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelDefaults {
    /// Subscribe as soon as a channel is created
    pub auto_subscribe: bool,
    /// Buffer actions issued while not subscribed
    pub buffer_actions: bool,
    /// Replay order for buffered actions
    pub flush_order: FlushOrder,
}

impl Default for ChannelDefaults {
    fn default() -> Self {
        Self {
            auto_subscribe: true,
            buffer_actions: true,
            flush_order: FlushOrder::Fifo,
        }
    }
}

impl CableConfig {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns the TOML error if `config_str` is not a valid configuration.
    pub fn from_toml_str(config_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(config_str)
    }

    /// Load configuration from XDG-compliant locations
    ///
    /// Looks for `$XDG_CONFIG_HOME/acton/cable.toml` (falling back to the
    /// platform's XDG config dirs). A missing file yields the defaults; an
    /// unreadable or malformed file is logged and also yields the defaults.
    pub fn load() -> Self {
        use tracing::{error, info};

        let xdg_dirs = match xdg::BaseDirectories::with_prefix("acton") {
            Ok(dirs) => dirs,
            Err(e) => {
                error!("Failed to initialize XDG directories: {}", e);
                return Self::default();
            }
        };

        let Some(path) = xdg_dirs.find_config_file("cable.toml") else {
            info!("No cable configuration file found, using defaults");
            return Self::default();
        };

        info!("Loading cable configuration from: {}", path.display());
        match std::fs::read_to_string(&path) {
            Ok(config_str) => match Self::from_toml_str(&config_str) {
                Ok(config) => config,
                Err(e) => {
                    error!("Failed to parse configuration file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                error!("Failed to read configuration file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

lazy_static! {
    /// Global configuration instance loaded from XDG-compliant locations
    pub static ref CONFIG: CableConfig = CableConfig::load();
}
