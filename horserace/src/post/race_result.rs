use crate::core::horse::Horse;
use helpers::general::ordinal;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::io::Write as IoWrite;
use std::path::Path;

/// RoundResult is the recorded finish order of one round.
/// * `round_id` - Id of the raced round
/// * `distance` - (m) Distance of the raced round
/// * `positions` - Horses in finishing order, winner first
/// * `finish_times` - (s) Finish times parallel to `positions`, empty if not measured
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RoundResult {
    pub round_id: u32,
    pub distance: u32,
    pub positions: Vec<Horse>,
    #[serde(default)]
    pub finish_times: Vec<f64>,
}

/// ResultRow is one line of the CSV export.
#[derive(Debug, Serialize)]
struct ResultRow<'a> {
    round: u32,
    distance: u32,
    position: usize,
    horse_id: u32,
    name: &'a str,
    time_s: Option<f64>,
}

/// round_title returns the heading of a round, e.g. "2nd Round - 1400m".
pub fn round_title(round_id: u32, distance: u32) -> String {
    format!("{} Round - {}m", ordinal(round_id), distance)
}

/// format_results renders one table per round with position, horse name and finish time.
pub fn format_results(results: &[RoundResult]) -> Result<String, std::fmt::Error> {
    let mut out = String::new();

    if results.is_empty() {
        writeln!(&mut out, "No races finished yet.")?;
        return Ok(out);
    }

    for result in results.iter() {
        writeln!(&mut out, "{}", round_title(result.round_id, result.distance))?;
        writeln!(&mut out, "{:>3}  {:<20} {:>9}", "Pos", "Name", "Time")?;

        for (i, horse) in result.positions.iter().enumerate() {
            match result.finish_times.get(i) {
                Some(t) => writeln!(&mut out, "{:>3}  {:<20} {:>8.3}s", i + 1, horse.name, t)?,
                None => writeln!(&mut out, "{:>3}  {:<20} {:>9}", i + 1, horse.name, "-")?,
            }
        }
        writeln!(&mut out)?;
    }

    Ok(out)
}

/// print_results prints the result tables to the console output.
pub fn print_results(results: &[RoundResult]) -> anyhow::Result<()> {
    println!("RESULT: Race results");
    print!("{}", format_results(results)?);
    Ok(())
}

/// write_results_csv writes one row per horse and round. Returns the path to the written file.
pub fn write_results_csv(results: &[RoundResult], path: &Path) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_path(path)?;

    for result in results.iter() {
        for (i, horse) in result.positions.iter().enumerate() {
            wtr.serialize(ResultRow {
                round: result.round_id,
                distance: result.distance,
                position: i + 1,
                horse_id: horse.id,
                name: &horse.name,
                time_s: result.finish_times.get(i).copied(),
            })?;
        }
    }
    wtr.flush()?;

    Ok(path.to_string_lossy().into_owned())
}

/// write_results_json writes the results as a JSON array. Returns the path to the written file.
pub fn write_results_json(results: &[RoundResult], path: &Path) -> anyhow::Result<String> {
    let content = serde_json::to_string_pretty(results)?;
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(path)?;
    file.write_all(content.as_bytes())?;
    file.flush()?;

    Ok(path.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn horse(id: u32, name: &str) -> Horse {
        Horse {
            id,
            name: name.to_owned(),
            color: "#123abc".to_owned(),
            condition: 50,
        }
    }

    fn sample_results() -> Vec<RoundResult> {
        vec![
            RoundResult {
                round_id: 1,
                distance: 1200,
                positions: vec![horse(1, "Thunder"), horse(2, "Storm")],
                finish_times: vec![70.25, 71.5],
            },
            RoundResult {
                round_id: 2,
                distance: 1400,
                positions: vec![horse(3, "Flash")],
                finish_times: Vec::new(),
            },
        ]
    }

    #[test]
    fn test_round_title() {
        assert_eq!(round_title(1, 1200), "1st Round - 1200m");
        assert_eq!(round_title(2, 1500), "2nd Round - 1500m");
        assert_eq!(round_title(3, 800), "3rd Round - 800m");
    }

    #[test]
    fn test_format_empty_results() {
        assert_eq!(format_results(&[]).unwrap(), "No races finished yet.\n");
    }

    #[test]
    fn test_format_results_tables() {
        let out = format_results(&sample_results()).unwrap();
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0], "1st Round - 1200m");
        assert!(lines[2].trim_start().starts_with("1  Thunder"));
        assert!(lines[2].ends_with("70.250s"));
        assert!(lines[3].trim_start().starts_with("2  Storm"));
        assert!(out.contains("2nd Round - 1400m"));
        assert!(out.lines().any(|l| l.contains("Flash") && l.ends_with('-')));
    }

    #[test]
    fn test_result_json_without_finish_times() {
        let json = r##"{
            "round_id": 3,
            "distance": 800,
            "positions": [{ "id": 10, "name": "Alpha", "color": "#ff0000", "condition": 70 }]
        }"##;
        let result: RoundResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.round_id, 3);
        assert_eq!(result.positions[0].name, "Alpha");
        assert!(result.finish_times.is_empty());
    }

    #[test]
    fn test_write_results_csv() {
        let path = std::env::temp_dir().join(format!("{}_results.csv", std::process::id()));
        write_results_csv(&sample_results(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();

        assert_eq!(lines[0], "round,distance,position,horse_id,name,time_s");
        assert_eq!(lines[1], "1,1200,1,1,Thunder,70.25");
        assert_eq!(lines[3], "2,1400,1,3,Flash,");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_write_results_json() {
        let path = std::env::temp_dir().join(format!("{}_results.json", std::process::id()));
        let results = sample_results();
        write_results_json(&results, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        let parsed: Vec<RoundResult> = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed, results);
    }
}
