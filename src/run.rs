//! Run-log records as written by the Q-learning experiment driver.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

use crate::logging::{debug, info, obj, v_num, v_str, Domain, ProfileScope};
use crate::policy::PolicyEntry;

/// Parameter keys that differ between otherwise identical runs.
pub const NOISE_PARAMETER_KEYS: [&str; 4] = ["additionalInformation", "saveQ", "seed", "error"];

/// One `{a, b}` reward pair: iteration offset and reward value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardPoint {
    pub a: i64,
    pub b: f64,
}

/// One episode entry of a run log.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRecord {
    pub rewards: Vec<RewardPoint>,
    #[serde(default)]
    pub parameter: Map<String, Value>,
    #[serde(default)]
    pub policy: Option<Vec<PolicyEntry>>,
    #[serde(default)]
    pub policy_reward: Option<f64>,
}

impl RunRecord {
    pub fn total_reward(&self) -> f64 {
        self.rewards.iter().map(|r| r.b).sum()
    }

    /// Parameters with the noise keys removed, in input order.
    pub fn display_parameters(&self) -> Map<String, Value> {
        self.parameter
            .iter()
            .filter(|(k, _)| !NOISE_PARAMETER_KEYS.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// `{key: value, ...}` rendering of [`RunRecord::display_parameters`].
    pub fn legend_label(&self) -> String {
        let body = self
            .display_parameters()
            .iter()
            .map(|(k, v)| match v {
                Value::String(s) => format!("{}: {}", k, s),
                other => format!("{}: {}", k, other),
            })
            .collect::<Vec<_>>()
            .join(", ");
        format!("{{{}}}", body)
    }
}

pub fn parse_runs(text: &str) -> Result<Vec<RunRecord>> {
    let runs: Vec<RunRecord> = serde_json::from_str(text).context("decode run records")?;
    Ok(runs)
}

/// Read a whole run-log file and decode it.
pub fn load_runs(path: &Path) -> Result<Vec<RunRecord>> {
    let _scope = ProfileScope::with_context("load_runs", &[("path", v_str(&path.display().to_string()))]);
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    debug(
        Domain::Load,
        "file_read",
        obj(&[
            ("path", v_str(&path.display().to_string())),
            ("bytes", v_num(bytes.len() as f64)),
            ("sha256", v_str(&bytes_sha256(&bytes))),
        ]),
    );
    let text = std::str::from_utf8(&bytes).with_context(|| format!("{} is not UTF-8", path.display()))?;
    let runs = parse_runs(text).with_context(|| format!("parse {}", path.display()))?;
    info(
        Domain::Load,
        "runs_loaded",
        obj(&[
            ("path", v_str(&path.display().to_string())),
            ("runs", v_num(runs.len() as f64)),
        ]),
    );
    Ok(runs)
}

pub fn bytes_sha256(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
