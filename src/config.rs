// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nereid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Engine configuration, loaded from an optional TOML file.
//!
//! Every field has a default, so an empty file (or no file at all) yields the stock grid
//! layout and best-effort writes.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{DiagramType, Point};
use crate::store::WriteDurability;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse TOML configuration {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Validation(String),
}

/// Grid used to place generated elements: `columns` cells per row, `spacing` apart, starting
/// at `origin`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    pub origin_x: f64,
    pub origin_y: f64,
    pub spacing: f64,
    pub columns: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            origin_x: 100.0,
            origin_y: 100.0,
            spacing: 300.0,
            columns: 3,
        }
    }
}

impl LayoutConfig {
    pub fn origin(&self) -> Point {
        Point::new(self.origin_x, self.origin_y)
    }

    /// Position of the `index`-th grid cell, row-major.
    ///
    /// Values that cannot form a grid (zero columns, a non-positive spacing, a non-finite
    /// origin) fall back to the defaults, so distinct indexes always map to distinct cells.
    pub fn cell(&self, index: usize) -> Point {
        let defaults = Self::default();
        let columns = self.columns.max(1);
        let spacing = if self.spacing.is_finite() && self.spacing > 0.0 {
            self.spacing
        } else {
            defaults.spacing
        };
        let origin_x = finite_or(self.origin_x, defaults.origin_x);
        let origin_y = finite_or(self.origin_y, defaults.origin_y);

        let column = (index % columns) as f64;
        let row = (index / columns) as f64;
        Point::new(origin_x + column * spacing, origin_y + row * spacing)
    }
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    pub durability: WriteDurability,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub default_diagram_type: DiagramType,
    pub layout: LayoutConfig,
    pub store: StoreConfig,
}

impl Config {
    pub fn from_toml_str(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.layout.columns == 0 {
            return Err(ConfigError::Validation(
                "layout.columns must be at least 1".to_owned(),
            ));
        }
        if !(self.layout.spacing.is_finite() && self.layout.spacing > 0.0) {
            return Err(ConfigError::Validation(
                "layout.spacing must be a positive number".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Loads the configuration from `path`, or returns defaults when no path is given.
///
/// An explicit path that does not exist is an error.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let Some(path) = path else {
        debug!("No configuration file given, using defaults");
        return Ok(Config::default());
    };

    info!(path = path.display().to_string(); "Loading configuration");
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Config::from_toml_str(&content, path)
}
