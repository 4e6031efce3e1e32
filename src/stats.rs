//! Descriptive statistics over episodes.

use std::io::Write;

use anyhow::{bail, Result};
use serde::Serialize;

use crate::logging::{info, obj, v_num, Domain, ProfileScope};
use crate::run::RunRecord;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    /// Most frequent value; ties go to the one seen first.
    pub mode: f64,
    pub sd: f64,
    pub total: f64,
}

impl Summary {
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let n = values.len() as f64;
        let total: f64 = values.iter().sum();
        let mean = total / n;
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let mid = sorted.len() / 2;
        let median = if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        };

        let mut mode = values[0];
        let mut mode_count = 0;
        for &k in values {
            let c = values.iter().filter(|&&v| v == k).count();
            if c > mode_count {
                mode_count = c;
                mode = k;
            }
        }

        Some(Self {
            count: values.len(),
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            mean,
            median,
            mode,
            sd: var.sqrt(),
            total,
        })
    }
}

/// Reward and transition-count statistics over the episodes of one file.
#[derive(Debug, Clone, Serialize)]
pub struct EpisodeStats {
    pub reward: Summary,
    pub transitions: Summary,
    pub best_policy_reward: Option<f64>,
}

impl EpisodeStats {
    pub fn from_runs(runs: &[RunRecord]) -> Result<Self> {
        let _scope = ProfileScope::new("episode_stats");
        let rewards: Vec<f64> = runs.iter().map(RunRecord::total_reward).collect();
        let transitions: Vec<f64> = runs.iter().map(|r| r.rewards.len() as f64).collect();
        let (Some(reward), Some(transitions)) =
            (Summary::from_values(&rewards), Summary::from_values(&transitions))
        else {
            bail!("no runs to summarize");
        };
        let best_policy_reward = runs
            .iter()
            .filter_map(|r| r.policy_reward)
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))));

        info(
            Domain::Stats,
            "episode_stats",
            obj(&[
                ("episodes", v_num(reward.count as f64)),
                ("mean_reward", v_num(reward.mean)),
                ("total_reward", v_num(reward.total)),
            ]),
        );
        Ok(Self {
            reward,
            transitions,
            best_policy_reward,
        })
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "Episodes: {}", self.reward.count)?;
        writeln!(out, "Minimum transitions: {:.2}", self.transitions.min)?;
        writeln!(out, "Maximum transitions: {:.2}", self.transitions.max)?;
        writeln!(out, "Mean transitions: {:.2}", self.transitions.mean)?;
        writeln!(out, "Median transitions: {:.2}", self.transitions.median)?;
        writeln!(out, "Mode transitions: {:.2}", self.transitions.mode)?;
        writeln!(out, "SD transitions: {:.2}", self.transitions.sd)?;
        writeln!(out, "Minimum reward: {:.2}", self.reward.min)?;
        writeln!(out, "Maximum reward: {:.2}", self.reward.max)?;
        writeln!(out, "Mean reward: {:.2}", self.reward.mean)?;
        writeln!(out, "Median reward: {:.2}", self.reward.median)?;
        writeln!(out, "SD reward: {:.2}", self.reward.sd)?;
        writeln!(out, "Accumulated rewards: {:.2}", self.reward.total)?;
        if let Some(best) = self.best_policy_reward {
            writeln!(out, "Best policy reward: {:.2}", best)?;
        }
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::run::parse_runs;

    #[test]
    fn summary_of_odd_count() {
        let s = Summary::from_values(&[3.0, 1.0, 2.0]).unwrap();
        assert_eq!(s.count, 3);
        assert_eq!(s.min, 1.0);
        assert_eq!(s.max, 3.0);
        assert_eq!(s.median, 2.0);
        assert_eq!(s.total, 6.0);
        assert!((s.mean - 2.0).abs() < 1e-12);
        assert!((s.sd - (2.0f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn summary_of_even_count_averages_median() {
        let s = Summary::from_values(&[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(s.median, 2.5);
    }

    #[test]
    fn mode_prefers_first_of_equal_counts() {
        let s = Summary::from_values(&[2.0, 5.0, 5.0, 2.0, 7.0]).unwrap();
        assert_eq!(s.mode, 2.0);
        let s = Summary::from_values(&[1.0, 3.0, 3.0]).unwrap();
        assert_eq!(s.mode, 3.0);
    }

    #[test]
    fn summary_of_nothing() {
        assert!(Summary::from_values(&[]).is_none());
    }

    #[test]
    fn episode_stats_from_runs() {
        let runs = parse_runs(
            r#"[
                {"rewards": [{"a": 0, "b": 1}, {"a": 1, "b": 2}], "policyReward": 3.0},
                {"rewards": [{"a": 0, "b": 5}], "policyReward": 5.0},
                {"rewards": [{"a": 0, "b": -1}, {"a": 1, "b": 0}, {"a": 2, "b": 1}]}
            ]"#,
        )
        .unwrap();
        let st = EpisodeStats::from_runs(&runs).unwrap();
        assert_eq!(st.reward.count, 3);
        assert_eq!(st.reward.min, 0.0);
        assert_eq!(st.reward.max, 5.0);
        assert_eq!(st.reward.total, 8.0);
        assert_eq!(st.transitions.min, 1.0);
        assert_eq!(st.transitions.max, 3.0);
        assert_eq!(st.transitions.mode, 2.0);
        assert_eq!(st.best_policy_reward, Some(5.0));

        let mut out = Vec::new();
        st.write_to(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Accumulated rewards: 8.00"));
        assert!(text.contains("Mode transitions: 2.00"));
        assert!(text.contains("Best policy reward: 5.00"));
    }

    #[test]
    fn episode_stats_need_runs() {
        assert!(EpisodeStats::from_runs(&[]).is_err());
    }
}
