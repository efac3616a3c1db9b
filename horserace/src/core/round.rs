use crate::core::horse::Horse;
use crate::pre::read_store_config::StoreConfig;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// * `id` - Round number, 1-based in running order
/// * `distance` - (m) Race distance
/// * `horses` - Lineup in lane order, no horse appears twice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    pub id: u32,
    pub distance: u32,
    pub horses: Vec<Horse>,
}

/// generate_schedule creates one round per configured distance. Every lineup is an independent
/// uniform draw of up to `config.lineup_size` horses from the pool, so a horse may run in several
/// rounds or in none. An empty pool yields rounds with empty lineups.
pub fn generate_schedule<R: Rng + ?Sized>(
    horses: &[Horse],
    config: &StoreConfig,
    rng: &mut R,
) -> Vec<Round> {
    let lineup_size = config.lineup_size.min(horses.len());

    config
        .distances
        .iter()
        .enumerate()
        .map(|(i, &distance)| {
            let mut pool = horses.to_vec();
            let (lineup, _) = pool.partial_shuffle(rng, lineup_size);

            Round {
                id: i as u32 + 1,
                distance,
                horses: lineup.to_vec(),
            }
        })
        .collect()
}
