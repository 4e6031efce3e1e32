//! Policy traces: the actions a learned policy takes, host by host.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::Write;

use crate::logging::{info, obj, v_num, Domain};
use crate::run::RunRecord;

/// One `{a: state, b: action}` step of a policy trace. The final state
/// of a trace carries no action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyEntry {
    #[serde(default)]
    pub a: Value,
    #[serde(default)]
    pub b: Option<PolicyAction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyAction {
    pub current_actor: String,
    pub target: String,
    pub action: String,
}

/// For every entry that carries an action, whether its actor differs
/// from the previous acting entity.
pub fn actor_changes(entries: &[PolicyEntry]) -> Vec<bool> {
    let mut prev_actor: &str = "";
    entries
        .iter()
        .filter_map(|e| e.b.as_ref())
        .map(|action| {
            let changed = prev_actor != action.current_actor;
            if changed {
                prev_actor = action.current_actor.as_str();
            }
            changed
        })
        .collect()
}

/// Text lines for a trace; the actor name is only repeated when it changes.
pub fn policy_lines(entries: &[PolicyEntry]) -> Vec<String> {
    let actions = entries.iter().filter_map(|e| e.b.as_ref());
    actions
        .zip(actor_changes(entries))
        .map(|(action, changed)| {
            if changed {
                format!(
                    "Active Host: {} \tTarget: {} \tAction: {}",
                    action.current_actor, action.target, action.action
                )
            } else {
                format!("\t\t\tTarget: {} \tAction: {}", action.target, action.action)
            }
        })
        .collect()
}

/// Print length, reward and trace of every run. Reward series are not read.
pub fn write_policy<W: Write>(out: &mut W, runs: &[RunRecord]) -> Result<()> {
    let mut printed = 0usize;
    for (i, run) in runs.iter().enumerate() {
        let policy = run
            .policy
            .as_deref()
            .ok_or_else(|| anyhow!("run {} has no policy", i))?;
        let reward = run
            .policy_reward
            .ok_or_else(|| anyhow!("run {} has no policyReward", i))?;

        writeln!(out, "policy length (actions done): {}", policy.len() as i64 - 1)?;
        writeln!(out, "policy reward: {:?}", reward)?;
        for line in policy_lines(policy) {
            writeln!(out, "{}", line)?;
            printed += 1;
        }
    }
    out.flush()?;

    info(
        Domain::Policy,
        "policy_printed",
        obj(&[
            ("runs", v_num(runs.len() as f64)),
            ("actions", v_num(printed as f64)),
        ]),
    );
    Ok(())
}
