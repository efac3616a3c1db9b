use crate::core::race::RoundRace;
use crate::core::store::RaceStore;
use crate::error::StoreError;
use crate::interfaces::view_interface::{RoundState, MAX_VIEW_UPDATE_FREQUENCY};
use crate::post::race_result::RoundResult;
use flume::Sender;
use tracing::{debug, info, warn};

/// handle_round starts the current round of the store, simulates it and records its result in
/// the store. If a sender is inserted, round states are streamed to it while the round runs and
/// once more with the final result.
pub fn handle_round(
    store: &mut RaceStore,
    timestep_size: f64,
    print_debug: bool,
    tx: Option<&Sender<RoundState>>,
) -> anyhow::Result<RoundResult> {
    let round = store.current_round().cloned().ok_or_else(|| {
        StoreError::PreconditionViolation("No round is scheduled".to_owned())
    })?;
    let mut race = RoundRace::new(&round, timestep_size)?;

    store.start_race()?;
    info!(
        "Running round {} over {}m with {} horses",
        round.id,
        round.distance,
        round.horses.len()
    );

    let mut t_race_update_print = 0.0;
    let mut t_race_update_view = 0.0;
    let mut tx = tx;

    while !race.get_all_finished() {
        race.simulate_timestep(store.rng());

        if print_debug && race.cur_racetime > t_race_update_print + 9.9999 {
            debug!(
                "Simulating... Current race time is {:.3}s, leader is {}",
                race.cur_racetime,
                race.get_leader().map_or("-", |h| h.name.as_str())
            );
            t_race_update_print = race.cur_racetime;
        }

        if let Some(sender) = tx {
            if race.cur_racetime > t_race_update_view + 1.0 / MAX_VIEW_UPDATE_FREQUENCY - 0.001 {
                if sender.send(race.get_round_state()).is_err() {
                    warn!("Viewer disconnected, continuing without round states");
                    tx = None;
                }
                t_race_update_view = race.cur_racetime;
            }
        }
    }

    let result = race.get_round_result();

    if let Some(sender) = tx {
        let mut final_msg = race.get_round_state();
        final_msg.final_result = Some(result.clone());
        if sender.send(final_msg).is_err() {
            warn!("Viewer disconnected before the final round state");
        }
    }

    store.finish_round(result.clone())?;
    Ok(result)
}

/// handle_program runs the remaining rounds of the store one after another and returns all
/// results of the program.
pub fn handle_program(
    store: &mut RaceStore,
    timestep_size: f64,
    print_debug: bool,
    tx: Option<&Sender<RoundState>>,
) -> anyhow::Result<Vec<RoundResult>> {
    if store.schedule().is_empty() {
        return Err(StoreError::PreconditionViolation(
            "Cannot run a program without a schedule".to_owned(),
        )
        .into());
    }

    while !store.is_race_finished() {
        handle_round(store, timestep_size, print_debug, tx)?;
    }

    Ok(store.results().to_vec())
}
