use serde::Serialize;
use std::io::Write;

use crate::domain::env::controller::EpisodeController;
use crate::domain::topology::graph::RoutingGraph;
use crate::error::Result;

/// Summary of one finished (or abandoned) episode. Each record becomes one
/// row of the statistics CSV; field names are the column headers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct EpisodeRecord {
    pub episode: i64,
    pub start_node: usize,
    pub end_node: usize,

    /// Number of `step` calls in the episode.
    pub steps: i64,

    pub total_reward: f64,
    pub reached_destination: bool,
    pub invalid_actions: u64,
    pub visited_nodes: usize,
}

impl EpisodeRecord {
    /// Snapshot of the controller's current episode.
    pub fn capture<G: RoutingGraph>(env: &EpisodeController<G>) -> Self {
        let episode = env.episode();

        Self {
            episode: episode.episode_index,
            start_node: episode.state.start.get(),
            end_node: episode.state.end.get(),
            steps: episode.step_index + 1,
            total_reward: episode.total_reward,
            reached_destination: episode.reached_destination(),
            invalid_actions: episode.invalid_actions,
            visited_nodes: episode.visited_count(),
        }
    }
}

/// Collects [`EpisodeRecord`]s of a run.
#[derive(Debug, Default)]
pub struct EpisodeStatistics {
    records: Vec<EpisodeRecord>,
}

impl EpisodeStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, record: EpisodeRecord) {
        log::debug!(
            "Episode {} done: {} steps, reward {:.3}, reached destination: {}",
            record.episode,
            record.steps,
            record.total_reward,
            record.reached_destination
        );
        self.records.push(record);
    }

    pub fn records(&self) -> &[EpisodeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Share of episodes that reached their destination, `0.0` for an empty run.
    pub fn success_rate(&self) -> f64 {
        if self.records.is_empty() {
            return 0.0;
        }
        self.records.iter().filter(|r| r.reached_destination).count() as f64 / self.records.len() as f64
    }

    pub fn mean_reward(&self) -> f64 {
        if self.records.is_empty() {
            return 0.0;
        }
        self.records.iter().map(|r| r.total_reward).sum::<f64>() / self.records.len() as f64
    }

    pub fn mean_steps(&self) -> f64 {
        if self.records.is_empty() {
            return 0.0;
        }
        self.records.iter().map(|r| r.steps as f64).sum::<f64>() / self.records.len() as f64
    }

    /// Writes all records as `;`-delimited CSV with a header row.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_wtr = csv::WriterBuilder::new().delimiter(b';').from_writer(writer);

        for record in &self.records {
            csv_wtr.serialize(record)?;
        }

        csv_wtr.flush()?;
        Ok(())
    }
}
