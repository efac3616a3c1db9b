use anyhow::Context;
use clap::Parser;
use horserace::core::handle_race::handle_program;
use horserace::interfaces::view_interface::RoundState;
use horserace::post::race_result::{
    print_results, round_title, write_results_csv, write_results_json, RoundResult,
};
use horserace::pre::read_store_config::{read_store_config, StoreConfig};
use horserace::pre::sim_opts::SimOpts;
use horserace::{Horse, RaceStore, Round};
use std::fmt::Write;
use std::path::Path;
use std::thread;
use std::time::Instant;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Width of the progress bar of a lane in watch mode.
const LANE_WIDTH: usize = 40;

fn format_horse_list(horses: &[Horse]) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    writeln!(&mut out, "Horse List (1-{})", horses.len())?;
    writeln!(&mut out, "{:>3}  {:<20} {:>9}  {}", "No", "Name", "Condition", "Color")?;
    for horse in horses.iter() {
        writeln!(
            &mut out,
            "{:>3}  {:<20} {:>9}  {}",
            horse.id, horse.name, horse.condition, horse.color
        )?;
    }
    Ok(out)
}

fn format_schedule(schedule: &[Round]) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    writeln!(&mut out, "Program")?;
    for round in schedule.iter() {
        writeln!(&mut out, "{}", round_title(round.id, round.distance))?;
        for (lane, horse) in round.horses.iter().enumerate() {
            writeln!(&mut out, "{:>3}  {}", lane + 1, horse.name)?;
        }
    }
    Ok(out)
}

fn format_round_state(state: &RoundState) -> String {
    let mut out = format!(
        "{} @ {:.1}s\n",
        round_title(state.round_id, state.distance),
        state.race_time
    );
    for (lane, runner) in state.runners.iter().enumerate() {
        let filled = (runner.progress * LANE_WIDTH as f64).round() as usize;
        out.push_str(&format!(
            "{:>3} |{}{}| {}{}\n",
            lane + 1,
            "=".repeat(filled),
            " ".repeat(LANE_WIDTH - filled),
            runner.name,
            if runner.finished { " (finished)" } else { "" }
        ));
    }
    out
}

/// should_print selects about one watch frame per simulated second of every round, plus the
/// final frame of each round. `last_printed` holds the (round, second) of the last printed frame.
fn should_print(state: &RoundState, last_printed: &mut Option<(u32, u64)>) -> bool {
    let key = (state.round_id, state.race_time.floor() as u64);
    if state.final_result.is_some() || *last_printed != Some(key) {
        *last_printed = Some(key);
        true
    } else {
        false
    }
}

fn export_results(results: &[RoundResult], path: &Path) -> anyhow::Result<String> {
    let is_json = path
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        write_results_json(results, path)
    } else {
        write_results_csv(results, path)
    }
}

fn main() -> anyhow::Result<()> {
    // PRE-PROCESSING ------------------------------------------------------------------------------
    // get simulation options from the command line arguments
    let sim_opts: SimOpts = SimOpts::parse();
    sim_opts.check_timestep_size()?;

    // initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(if sim_opts.debug { Level::DEBUG } else { Level::INFO })
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber!")?;

    // get store configuration
    let config = if let Some(config_path) = &sim_opts.config_path {
        info!("Reading store config from {:?}", config_path);
        read_store_config(config_path)?
    } else {
        StoreConfig::default()
    };

    let mut store = match sim_opts.seed {
        Some(seed) => RaceStore::with_seed(config, seed)?,
        None => RaceStore::new(config)?,
    };

    // generate program
    store.generate_program()?;
    print!("{}", format_horse_list(store.all_horses())?);
    println!();
    let distances: Vec<String> = store
        .config()
        .distances
        .iter()
        .map(|d| format!("{}m", d))
        .collect();
    println!("Distances: {}", distances.join(", "));
    print!("{}", format_schedule(store.schedule())?);
    println!();

    // EXECUTION -----------------------------------------------------------------------------------
    let t_start = Instant::now();

    let results = if !sim_opts.watch {
        handle_program(&mut store, sim_opts.timestep_size, sim_opts.debug, None)?
    } else {
        // run the simulator in its own thread and print the streamed round states here
        let (tx, rx) = flume::unbounded();
        let timestep_size = sim_opts.timestep_size;
        let print_debug = sim_opts.debug;

        let sim_thread = thread::spawn(move || {
            handle_program(&mut store, timestep_size, print_debug, Some(&tx))
        });

        let mut last_printed = None;
        for state in rx.iter() {
            if should_print(&state, &mut last_printed) {
                print!("{}", format_round_state(&state));
            }
        }

        match sim_thread.join() {
            Ok(results) => results?,
            Err(_) => anyhow::bail!("Simulator thread panicked!"),
        }
    };

    info!("Execution time: {}ms", t_start.elapsed().as_millis());

    // POST-PROCESSING -----------------------------------------------------------------------------
    print_results(&results)?;

    if let Some(output) = &sim_opts.output {
        match export_results(&results, output) {
            Ok(path) => info!("Results written to {}", path),
            Err(e) => warn!("Could not write results: {:#}", e),
        }
    }

    Ok(())
}
