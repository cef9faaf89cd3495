use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::domain::env::config::TrafficSource;
use crate::domain::topology::link::Link;
use crate::error::{Error, Result};

/// Randomised link load generator.
///
/// Traffic randomness is kept apart from the start/end selection generator so
/// that one can be fixed while the other stays random.
#[derive(Debug)]
pub struct TrafficModel {
    rng: Option<StdRng>,
}

impl TrafficModel {
    pub fn new(source: TrafficSource) -> Self {
        let rng = match source {
            TrafficSource::Entropy => None,
            TrafficSource::Seeded(seed) => Some(StdRng::seed_from_u64(seed)),
        };

        Self { rng }
    }

    pub fn is_reproducible(&self) -> bool {
        self.rng.is_some()
    }

    /// Draws every link's traffic uniformly from `[0, capacity]`.
    pub fn sample_all(&mut self, links: &mut [Link]) {
        self.with_rng(|rng| {
            for link in links.iter_mut() {
                let traffic = rng.random_range(0.0..=link.capacity());
                link.set_traffic(traffic);
            }
        });
    }

    /// Shifts every link's load by a uniformly drawn percentage of its capacity
    /// in `[low_pct, high_pct]`. The result is kept inside `[0, capacity]`.
    pub fn perturb(&mut self, links: &mut [Link], low_pct: f64, high_pct: f64) -> Result<()> {
        check_perturbation_range(low_pct, high_pct)?;

        self.with_rng(|rng| {
            for link in links.iter_mut() {
                let traffic_pct = link.utilization() * 100.0;
                let delta_pct = rng.random_range(low_pct..=high_pct);
                let new_traffic = (traffic_pct + delta_pct) * link.capacity() / 100.0;

                link.set_traffic(new_traffic);
            }
        });

        Ok(())
    }

    fn with_rng<F: FnOnce(&mut dyn RngCore)>(&mut self, f: F) {
        match self.rng.as_mut() {
            Some(rng) => f(rng),
            None => f(&mut StdRng::from_os_rng()),
        }
    }
}

/// Accepts `[low_pct, high_pct]` only if both bounds and its width are finite
/// and the range is not inverted.
pub fn check_perturbation_range(low_pct: f64, high_pct: f64) -> Result<()> {
    if !(high_pct - low_pct).is_finite() || low_pct > high_pct {
        return Err(Error::InvalidPerturbationRange { low: low_pct, high: high_pct });
    }
    Ok(())
}

/// One row of the traffic table: `(link index, traffic, capacity)`.
pub fn traffic_row(link: &Link) -> [f64; 3] {
    [link.index.get() as f64, link.traffic(), link.capacity()]
}

/// Human readable traffic table, one line per link.
pub fn format_traffic_table(links: &[Link]) -> String {
    let mut table = String::from("link        traffic       capacity   load\n");
    for link in links {
        table.push_str(&format!("{:>4} {:>14.3} {:>14.3} {:>5.1}%\n", link.index, link.traffic(), link.capacity(), link.utilization() * 100.0));
    }
    table
}
