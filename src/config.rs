// SPDX-FileCopyrightText: 2026 The dtree Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use figment::providers::{Env, Format, Toml};
use figment::Figment;

use directories::ProjectDirs;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Settings {
    /// Levels scanned below a node at bootstrap and on each lazy expansion.
    pub load_depth: usize,
    /// Spaces of indentation per tree level.
    pub indent_width: u16,
    /// Idle wait for a keypress per loop iteration.
    pub tick_rate_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            load_depth: 3,
            indent_width: 3,
            tick_rate_ms: 250,
        }
    }
}

/// This is the single source of truth for app directories.
pub fn get_app_paths() -> Option<(PathBuf, PathBuf)> {
    if let Some(proj_dirs) = ProjectDirs::from("com", "github", "dtree") {
        let config_dir = proj_dirs.config_dir().to_path_buf();
        let data_dir = proj_dirs.data_local_dir().to_path_buf();

        // Ensure directories exist
        fs::create_dir_all(&config_dir).ok()?;
        fs::create_dir_all(&data_dir).ok()?;

        Some((config_dir, data_dir))
    } else {
        None
    }
}

pub fn load_settings() -> Settings {
    if let Some((config_dir, _)) = get_app_paths() {
        let config_file_path = config_dir.join("settings.toml");

        return Figment::new()
            .merge(Toml::file(config_file_path))
            .merge(Env::prefixed("DTREE_"))
            .extract()
            .unwrap_or_default();
    }

    // Fallback if we can't even determine the application paths.
    Settings::default()
}
