//! Cumulative reward curves over concatenated episodes.

use anyhow::{anyhow, bail, Result};

use crate::logging::{debug, obj, v_num, warn, Domain};
use crate::run::RunRecord;

/// Flattened `(x, y)` curve: iteration and reward accrued so far.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RewardSeries {
    pub x: Vec<i64>,
    pub y: Vec<f64>,
}

impl RewardSeries {
    /// Concatenate the episodes' rewards and accumulate them.
    ///
    /// Each episode's `a` values are shifted by the last x value already
    /// collected, so a later episode continues where the previous one
    /// stopped. An episode without rewards is fine as long as something
    /// was collected before it.
    pub fn from_runs(runs: &[RunRecord]) -> Result<Self> {
        if runs.is_empty() {
            bail!("no runs to aggregate");
        }
        let total: usize = runs.iter().map(|r| r.rewards.len()).sum();
        let mut x = Vec::with_capacity(total);
        let mut y = Vec::with_capacity(total);
        let mut last_iteration = 0i64;
        for (i, run) in runs.iter().enumerate() {
            if run.rewards.is_empty() {
                warn(Domain::Series, "empty_episode", obj(&[("run", v_num(i as f64))]));
            }
            x.extend(run.rewards.iter().map(|r| r.a + last_iteration));
            y.extend(run.rewards.iter().map(|r| r.b));
            last_iteration = *x
                .last()
                .ok_or_else(|| anyhow!("run {} has no rewards and none precede it", i))?;
        }
        prefix_sum(&mut y);

        debug(
            Domain::Series,
            "series_built",
            obj(&[
                ("runs", v_num(runs.len() as f64)),
                ("points", v_num(x.len() as f64)),
                ("final_reward", v_num(y.last().copied().unwrap_or(0.0))),
            ]),
        );
        Ok(Self { x, y })
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = (i64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }

    pub fn final_reward(&self) -> Option<f64> {
        self.y.last().copied()
    }

    pub fn x_bounds(&self) -> Option<(i64, i64)> {
        let min = self.x.iter().min()?;
        let max = self.x.iter().max()?;
        Some((*min, *max))
    }

    pub fn y_bounds(&self) -> Option<(f64, f64)> {
        if self.y.is_empty() {
            return None;
        }
        let min = self.y.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self.y.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some((min, max))
    }
}

/// In-place running sum: `v[i] = v[i - 1] + v[i]` for `i > 0`.
pub fn prefix_sum(values: &mut [f64]) {
    for i in 1..values.len() {
        values[i] += values[i - 1];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::run::parse_runs;

    fn runs(text: &str) -> Vec<RunRecord> {
        parse_runs(text).unwrap()
    }

    #[test]
    fn prefix_sum_accumulates() {
        let mut v = vec![1.0, 2.0, 3.0, -4.0];
        prefix_sum(&mut v);
        assert_eq!(v, vec![1.0, 3.0, 6.0, 2.0]);

        let mut empty: Vec<f64> = Vec::new();
        prefix_sum(&mut empty);
        assert!(empty.is_empty());
    }

    #[test]
    fn second_episode_is_offset_by_last_x() {
        let r = runs(
            r#"[{"rewards":[{"a":0,"b":1},{"a":1,"b":2}]},
                {"rewards":[{"a":0,"b":3}]}]"#,
        );
        let s = RewardSeries::from_runs(&r).unwrap();
        assert_eq!(s.x, vec![0, 1, 1]);
        assert_eq!(s.y, vec![1.0, 3.0, 6.0]);
        assert_eq!(s.final_reward(), Some(6.0));
    }

    #[test]
    fn one_based_iterations_stay_strictly_increasing() {
        let r = runs(
            r#"[{"rewards":[{"a":1,"b":0.5},{"a":2,"b":0.5}]},
                {"rewards":[{"a":1,"b":1},{"a":2,"b":1}]},
                {"rewards":[{"a":1,"b":2}]}]"#,
        );
        let s = RewardSeries::from_runs(&r).unwrap();
        assert_eq!(s.x, vec![1, 2, 3, 4, 5]);
        assert_eq!(s.y, vec![0.5, 1.0, 2.0, 3.0, 5.0]);
    }

    #[test]
    fn empty_episode_after_data_carries_offset() {
        let r = runs(
            r#"[{"rewards":[{"a":0,"b":1},{"a":4,"b":1}]},
                {"rewards":[]},
                {"rewards":[{"a":1,"b":1}]}]"#,
        );
        let s = RewardSeries::from_runs(&r).unwrap();
        assert_eq!(s.x, vec![0, 4, 5]);
        assert_eq!(s.y, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn leading_empty_episode_fails() {
        let r = runs(r#"[{"rewards":[]},{"rewards":[{"a":0,"b":1}]}]"#);
        let err = RewardSeries::from_runs(&r).unwrap_err();
        assert!(err.to_string().contains("run 0"));
    }

    #[test]
    fn no_runs_fails() {
        assert!(RewardSeries::from_runs(&[]).is_err());
    }

    #[test]
    fn bounds() {
        let s = RewardSeries {
            x: vec![0, 3, 7],
            y: vec![-1.0, 2.5, 1.0],
        };
        assert_eq!(s.x_bounds(), Some((0, 7)));
        assert_eq!(s.y_bounds(), Some((-1.0, 2.5)));
        assert_eq!(RewardSeries::default().x_bounds(), None);
        assert_eq!(RewardSeries::default().y_bounds(), None);
    }
}
