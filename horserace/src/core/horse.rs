use crate::error::StoreError;
use crate::pre::read_store_config::StoreConfig;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const CONDITION_MIN: u32 = 1;
pub const CONDITION_MAX: u32 = 100;

/// * `id` - Horse number, 1-based and unique within the pool
/// * `name` - Horse name, unique within the pool
/// * `color` - CSS color taken cyclically from the palette
/// * `condition` - Fitness in [1, 100], higher is faster
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Horse {
    pub id: u32,
    pub name: String,
    pub color: String,
    pub condition: u32,
}

/// generate_horses creates a fresh pool of `config.pool_size` horses. Names are drawn without
/// replacement from the unique configured names, so every ordered selection is equally likely and
/// the draw always terminates.
pub fn generate_horses<R: Rng + ?Sized>(
    config: &StoreConfig,
    rng: &mut R,
) -> Result<Vec<Horse>, StoreError> {
    let mut names = config.unique_horse_names();
    if names.len() < config.pool_size {
        return Err(StoreError::Configuration(format!(
            "Cannot draw {} unique horse names from {} candidates",
            config.pool_size,
            names.len()
        )));
    }
    if config.colors.is_empty() {
        return Err(StoreError::Configuration(
            "Color palette must not be empty".to_owned(),
        ));
    }

    let (drawn, _) = names.partial_shuffle(rng, config.pool_size);

    let horses = drawn
        .iter()
        .enumerate()
        .map(|(i, name)| Horse {
            id: i as u32 + 1,
            name: name.to_owned(),
            color: config.colors[i % config.colors.len()].to_owned(),
            condition: rng.gen_range(CONDITION_MIN..=CONDITION_MAX),
        })
        .collect();

    Ok(horses)
}
