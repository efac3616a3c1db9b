use crate::core::horse::{generate_horses, Horse};
use crate::core::round::{generate_schedule, Round};
use crate::core::state_handler::{State, StateHandler};
use crate::error::StoreError;
use crate::interfaces::view_interface::StoreSnapshot;
use crate::post::race_result::RoundResult;
use crate::pre::read_store_config::StoreConfig;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

/// RaceStore is the single source of truth of a program: the horse pool, the schedule, the
/// results and the progress through the rounds. Views read it through the projection methods,
/// the mutating methods are the only way to change it.
#[derive(Debug)]
pub struct RaceStore {
    config: StoreConfig,
    rng: StdRng,
    horses: Vec<Horse>,
    schedule: Vec<Round>,
    results: Vec<RoundResult>,
    sh: StateHandler,
}

impl RaceStore {
    /// new creates an empty store with an entropy-seeded random number generator. The
    /// configuration is validated up front.
    pub fn new(config: StoreConfig) -> Result<RaceStore, StoreError> {
        RaceStore::with_rng(config, StdRng::from_entropy())
    }

    /// with_seed creates an empty store whose horse and schedule draws are reproducible.
    pub fn with_seed(config: StoreConfig, seed: u64) -> Result<RaceStore, StoreError> {
        RaceStore::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: StoreConfig, rng: StdRng) -> Result<RaceStore, StoreError> {
        config.validate()?;

        Ok(RaceStore {
            config,
            rng,
            horses: Vec::new(),
            schedule: Vec::new(),
            results: Vec::new(),
            sh: StateHandler::default(),
        })
    }

    // ---------------------------------------------------------------------------------------------
    // OPERATIONS ----------------------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    /// generate_horses replaces the horse pool with a fresh one. Schedule and results are left
    /// untouched, they keep referring to the previous horses until the next schedule.
    pub fn generate_horses(&mut self) -> Result<(), StoreError> {
        if self.sh.get_race_running() {
            warn!("Replacing the horse pool while a race is running");
        }

        self.horses = generate_horses(&self.config, &mut self.rng)?;
        debug!("Generated {} horses", self.horses.len());
        Ok(())
    }

    /// generate_schedule draws a new lineup for every configured distance from the current pool
    /// and resets results and progress, whatever state the store was in.
    pub fn generate_schedule(&mut self) {
        if self.sh.get_race_running() {
            warn!("Replacing the schedule while a race is running");
        }

        self.schedule = generate_schedule(&self.horses, &self.config, &mut self.rng);
        self.results.clear();
        self.sh.reset();
        debug!(
            "Generated schedule with {} rounds from {} horses",
            self.schedule.len(),
            self.horses.len()
        );
    }

    /// generate_program creates a new horse pool and a schedule for it.
    pub fn generate_program(&mut self) -> Result<(), StoreError> {
        self.generate_horses()?;
        self.generate_schedule();
        info!(
            "New program: {} horses, {} rounds",
            self.horses.len(),
            self.schedule.len()
        );
        Ok(())
    }

    /// start_race marks the current round as running.
    pub fn start_race(&mut self) -> Result<(), StoreError> {
        self.sh.start_race(self.schedule.len())?;
        debug!("Started round {}", self.sh.get_cur_round_idx() + 1);
        Ok(())
    }

    /// finish_round records the result of the running round and advances to the next round, or
    /// finishes the program after the last scheduled round. The result is not checked against the
    /// current round.
    pub fn finish_round(&mut self, result: RoundResult) -> Result<(), StoreError> {
        let cur_round_id = self.current_round().map(|round| round.id);
        let last_round_idx = self.schedule.len().saturating_sub(1);
        let finished = self.sh.finish_round(last_round_idx)?;

        if let Some(round_id) = cur_round_id {
            if round_id != result.round_id {
                warn!(
                    "Result of round {} recorded while round {} is current",
                    result.round_id, round_id
                );
            }
        }

        debug!(
            "Finished round {} ({}m), winner: {}",
            result.round_id,
            result.distance,
            result.positions.first().map_or("-", |h| h.name.as_str())
        );
        self.results.push(result);

        if finished {
            info!("All {} rounds finished", self.results.len());
        }
        Ok(())
    }

    // ---------------------------------------------------------------------------------------------
    // PROJECTIONS ---------------------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    pub fn all_horses(&self) -> &[Horse] {
        &self.horses
    }

    pub fn schedule(&self) -> &[Round] {
        &self.schedule
    }

    pub fn results(&self) -> &[RoundResult] {
        &self.results
    }

    /// current_round returns the round at the current index, None without a schedule.
    pub fn current_round(&self) -> Option<&Round> {
        self.schedule.get(self.sh.get_cur_round_idx())
    }

    pub fn current_round_idx(&self) -> usize {
        self.sh.get_cur_round_idx()
    }

    pub fn is_race_running(&self) -> bool {
        self.sh.get_race_running()
    }

    pub fn is_race_finished(&self) -> bool {
        self.sh.get_race_finished()
    }

    pub fn state(&self) -> State {
        self.sh.get_state(self.schedule.len())
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// snapshot returns every read projection at once as a single owned value.
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            horses: self.horses.to_owned(),
            schedule: self.schedule.to_owned(),
            results: self.results.to_owned(),
            current_round: self.current_round().cloned(),
            current_round_idx: self.current_round_idx(),
            is_race_running: self.is_race_running(),
            is_race_finished: self.is_race_finished(),
            state: self.state(),
        }
    }

    /// rng gives the round simulator access to the store's random number generator, which keeps
    /// seeded programs reproducible end to end.
    pub(crate) fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}
