use crate::error::StoreError;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::OpenOptions;
use std::path::Path;

/// (m) Round distances of the reference program, in running order.
pub const ROUND_DISTANCES: [u32; 5] = [1200, 1400, 1600, 1800, 2000];

/// Number of horses in a generated pool.
pub const POOL_SIZE: usize = 20;

/// Number of horses drawn into each round.
pub const LINEUP_SIZE: usize = 10;

pub const HORSE_NAMES: [&str; 30] = [
    "Thunderbolt",
    "Silver Arrow",
    "Midnight Star",
    "Golden Gale",
    "Desert Storm",
    "Wild Spirit",
    "Blue Comet",
    "Iron Duke",
    "Crimson Tide",
    "Northern Dancer",
    "Shadowfax",
    "Lucky Clover",
    "Royal Flush",
    "Dark Horizon",
    "Morning Glory",
    "Flash Point",
    "Storm Chaser",
    "Velvet Thunder",
    "Red Rum",
    "Seabiscuit",
    "Secretariat",
    "Black Caviar",
    "Frankel",
    "Sea The Stars",
    "Whirlaway",
    "War Admiral",
    "Phar Lap",
    "Kincsem",
    "Ribot",
    "Zenyatta",
];

pub const COLORS: [&str; 20] = [
    "#e6194b", "#3cb44b", "#ffe119", "#4363d8", "#f58231", "#911eb4", "#46f0f0", "#f032e6",
    "#bcf60c", "#fabebe", "#008080", "#e6beff", "#9a6324", "#fffac8", "#800000", "#aaffc3",
    "#808000", "#ffd8b1", "#000075", "#808080",
];

/// StoreConfig holds the immutable inputs of a race store.
/// * `distances` - (m) Round distances in running order, one round per entry
/// * `horse_names` - Candidate names for generated horses, at least `pool_size` unique entries
/// * `colors` - CSS color palette, assigned cyclically by horse index
/// * `pool_size` - Number of horses per generated pool
/// * `lineup_size` - Maximum number of horses per round
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    pub distances: Vec<u32>,
    pub horse_names: Vec<String>,
    pub colors: Vec<String>,
    pub pool_size: usize,
    pub lineup_size: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            distances: ROUND_DISTANCES.to_vec(),
            horse_names: HORSE_NAMES.iter().map(|&name| name.to_owned()).collect(),
            colors: COLORS.iter().map(|&color| color.to_owned()).collect(),
            pool_size: POOL_SIZE,
            lineup_size: LINEUP_SIZE,
        }
    }
}

impl StoreConfig {
    /// unique_horse_names returns the horse names with duplicates removed, keeping the first
    /// occurrence of each name.
    pub fn unique_horse_names(&self) -> Vec<String> {
        let mut seen = HashSet::with_capacity(self.horse_names.len());
        self.horse_names
            .iter()
            .filter(|name| seen.insert(name.as_str()))
            .cloned()
            .collect()
    }

    /// validate checks that a program can be generated from the configuration without running
    /// out of names, colors or rounds.
    pub fn validate(&self) -> Result<(), StoreError> {
        let no_unique_names = self.unique_horse_names().len();
        if no_unique_names < self.pool_size {
            return Err(StoreError::Configuration(format!(
                "{} unique horse names are required for a pool of {} horses, got {}",
                self.pool_size, self.pool_size, no_unique_names
            )));
        }

        if self.colors.is_empty() {
            return Err(StoreError::Configuration(
                "Color palette must not be empty".to_owned(),
            ));
        }

        for color in self.colors.iter() {
            color.parse::<css_color_parser::Color>().map_err(|_| {
                StoreError::Configuration(format!("Could not parse color {:?}", color))
            })?;
        }

        if self.distances.is_empty() {
            return Err(StoreError::Configuration(
                "At least one round distance is required".to_owned(),
            ));
        }

        if self.distances.contains(&0) {
            return Err(StoreError::Configuration(
                "Round distances must be positive".to_owned(),
            ));
        }

        if self.lineup_size == 0 {
            return Err(StoreError::Configuration(
                "Lineup size must be positive".to_owned(),
            ));
        }

        Ok(())
    }
}

/// read_store_config reads the JSON file and decodes it into the store configuration. Fields
/// missing in the file keep their reference values. The result is not validated yet, this
/// happens when the store is created.
pub fn read_store_config(filepath: &Path) -> anyhow::Result<StoreConfig> {
    let fh = OpenOptions::new()
        .read(true)
        .open(filepath)
        .context(format!(
            "Failed to open store config file {}!",
            filepath.display()
        ))?;
    let config = serde_json::from_reader(&fh).context(format!(
        "Failed to parse store config file {}!",
        filepath.display()
    ))?;
    Ok(config)
}
