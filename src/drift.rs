//! Application-pool configuration drift.
//!
//! Compares every pool's process-model settings against a baseline and
//! reports field-level differences. The baseline is the most common
//! configuration across the inventory; ties go to the configuration held
//! by the lexically smallest pool name, so the report is stable across
//! enumeration orders.

use std::collections::HashMap;

use serde::Serialize;

use crate::platform::{AppPool, PipelineMode, PoolIdentity};

/// The comparable slice of a pool's settings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PoolConfig {
    pub runtime_version: String,
    pub pipeline_mode: PipelineMode,
    pub enable_32bit: bool,
    pub identity: PoolIdentity,
    pub idle_timeout_minutes: u32,
}

impl PoolConfig {
    fn of(pool: &AppPool) -> Self {
        Self {
            runtime_version: pool.runtime_version.clone(),
            pipeline_mode: pool.pipeline_mode,
            enable_32bit: pool.enable_32bit,
            identity: pool.identity,
            idle_timeout_minutes: pool.idle_timeout_minutes,
        }
    }
}

/// One field that differs from the baseline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDrift {
    pub field: &'static str,
    pub baseline: String,
    pub actual: String,
}

/// All of one pool's differences from the baseline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoolDrift {
    pub pool: String,
    pub fields: Vec<FieldDrift>,
}

/// The full drift report for a pool inventory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriftReport {
    /// Lexically smallest pool holding the baseline configuration; `None`
    /// for an empty inventory.
    pub baseline_pool: Option<String>,
    pub baseline: Option<PoolConfig>,
    /// Pools whose configuration differs from the baseline, in inventory
    /// order. Pools matching the baseline exactly are omitted.
    pub drifted: Vec<PoolDrift>,
}

/// Compare a pool inventory against its most common configuration.
pub fn compare_pools(pools: &[AppPool]) -> DriftReport {
    let Some((baseline_pool, baseline)) = select_baseline(pools) else {
        return DriftReport {
            baseline_pool: None,
            baseline: None,
            drifted: Vec::new(),
        };
    };

    let drifted = pools
        .iter()
        .filter_map(|pool| {
            let fields = diff_fields(&baseline, pool);
            if fields.is_empty() {
                None
            } else {
                Some(PoolDrift {
                    pool: pool.name.clone(),
                    fields,
                })
            }
        })
        .collect();

    DriftReport {
        baseline_pool: Some(baseline_pool),
        baseline: Some(baseline),
        drifted,
    }
}

/// Most common configuration; ties broken by the lexically smallest pool
/// name carrying each candidate. Returns that smallest holder alongside
/// the configuration.
fn select_baseline(pools: &[AppPool]) -> Option<(String, PoolConfig)> {
    let mut counts: HashMap<PoolConfig, (usize, &str)> = HashMap::new();

    for pool in pools {
        let entry = counts
            .entry(PoolConfig::of(pool))
            .or_insert((0, pool.name.as_str()));
        entry.0 += 1;
        if pool.name.as_str() < entry.1 {
            entry.1 = pool.name.as_str();
        }
    }

    counts
        .into_iter()
        .max_by(|(_, (count_a, holder_a)), (_, (count_b, holder_b))| {
            count_a.cmp(count_b).then_with(|| holder_b.cmp(holder_a))
        })
        .map(|(config, (_, holder))| (holder.to_string(), config))
}

fn diff_fields(baseline: &PoolConfig, pool: &AppPool) -> Vec<FieldDrift> {
    let mut fields = Vec::new();

    if pool.runtime_version != baseline.runtime_version {
        fields.push(FieldDrift {
            field: "runtime_version",
            baseline: baseline.runtime_version.clone(),
            actual: pool.runtime_version.clone(),
        });
    }
    if pool.pipeline_mode != baseline.pipeline_mode {
        fields.push(FieldDrift {
            field: "pipeline_mode",
            baseline: baseline.pipeline_mode.to_string(),
            actual: pool.pipeline_mode.to_string(),
        });
    }
    if pool.enable_32bit != baseline.enable_32bit {
        fields.push(FieldDrift {
            field: "enable_32bit",
            baseline: baseline.enable_32bit.to_string(),
            actual: pool.enable_32bit.to_string(),
        });
    }
    if pool.identity != baseline.identity {
        fields.push(FieldDrift {
            field: "identity",
            baseline: baseline.identity.to_string(),
            actual: pool.identity.to_string(),
        });
    }
    if pool.idle_timeout_minutes != baseline.idle_timeout_minutes {
        fields.push(FieldDrift {
            field: "idle_timeout_minutes",
            baseline: baseline.idle_timeout_minutes.to_string(),
            actual: pool.idle_timeout_minutes.to_string(),
        });
    }

    fields
}
