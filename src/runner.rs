//! Sample registration and batch execution.
//!
//! Providers register their samples explicitly at construction time; there is
//! no runtime introspection. The runner filters the registered samples by
//! requested name, logs a manifest of what will run, then executes everything
//! sequentially, isolating each sample's failures so one broken sample never
//! aborts the batch.

use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info};

/// A registered sample: its name, a one-line description, and whether it is
/// safe to run in CI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleInfo {
    /// Sample name, used for filtering and dispatch.
    pub name: &'static str,
    /// One-line description shown in the manifest.
    pub description: &'static str,
    /// Whether the sample is safe for unattended CI runs.
    pub ci: bool,
}

/// A collection of related samples sharing configuration and clients.
///
/// Providers enumerate their samples up front and dispatch by name; the
/// runner drives [`setup`](Self::setup) exactly once per provider before its
/// first sample executes.
#[async_trait]
pub trait SampleProvider: Send + Sync {
    /// Provider name, used as the manifest header.
    fn name(&self) -> &str;

    /// The samples this provider exposes, in the order they should run.
    fn samples(&self) -> Vec<SampleInfo>;

    /// One-time initialization (clients, shared resources). The runner calls
    /// this before the provider's first sample; implementations need not
    /// guard against repeat calls themselves.
    async fn setup(&self) -> Result<()>;

    /// Runs the named sample.
    ///
    /// # Errors
    ///
    /// Returns [`SampleError::UnknownSample`](crate::SampleError::UnknownSample)
    /// for names not present in [`samples`](Self::samples).
    async fn run_sample(&self, name: &str) -> Result<()>;
}

/// One provider's share of an execution plan.
#[derive(Debug, Clone)]
pub struct PlannedGroup {
    /// Index of the provider in the slice handed to [`plan`].
    pub provider: usize,
    /// Provider name, for the manifest.
    pub provider_name: String,
    /// The samples selected from this provider, in discovery order.
    pub samples: Vec<SampleInfo>,
}

/// The filtered execution plan: only providers contributing at least one
/// selected sample appear.
#[derive(Debug, Clone, Default)]
pub struct SamplePlan {
    pub groups: Vec<PlannedGroup>,
}

impl SamplePlan {
    /// Total number of samples selected.
    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.samples.len()).sum()
    }

    /// Whether the plan selects nothing.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Filters the registered samples down to an execution plan.
///
/// An empty `requested` list keeps every sample; otherwise exactly the
/// intersection of requested and registered names is kept, in discovery
/// order. With `ci_only`, samples not marked CI-safe are dropped as well.
/// Providers with zero matches contribute no group.
pub fn plan(
    providers: &[Arc<dyn SampleProvider>],
    requested: &[String],
    ci_only: bool,
) -> SamplePlan {
    let mut groups = Vec::new();

    for (index, provider) in providers.iter().enumerate() {
        let samples: Vec<_> = provider
            .samples()
            .into_iter()
            .filter(|s| requested.is_empty() || requested.iter().any(|r| r == s.name))
            .filter(|s| !ci_only || s.ci)
            .collect();

        if !samples.is_empty() {
            groups.push(PlannedGroup {
                provider: index,
                provider_name: provider.name().to_string(),
                samples,
            });
        }
    }

    SamplePlan { groups }
}

/// Runs every selected sample in plan order.
///
/// Each sample's entry and exit are logged; any error raised by a sample (or
/// by a provider's setup) is logged with its full chain and the batch
/// continues with the next sample. Setup is attempted before a provider's
/// first sample and marked complete only on success, so a failed setup is
/// retried before that provider's next sample.
///
/// There is no return value: outcomes are observable only through the log
/// output, and a failing sample never changes the process exit code.
pub async fn run_all_samples(
    providers: &[Arc<dyn SampleProvider>],
    requested: &[String],
    ci_only: bool,
) {
    let plan = plan(providers, requested, ci_only);

    for group in &plan.groups {
        info!(provider = %group.provider_name, "discovered samples");
        for sample in &group.samples {
            info!("    {} -- {}", sample.name, sample.description);
        }
    }

    let mut setup_done = vec![false; providers.len()];

    for group in &plan.groups {
        let provider = &providers[group.provider];

        for sample in &group.samples {
            if !setup_done[group.provider] {
                match provider.setup().await {
                    Ok(()) => setup_done[group.provider] = true,
                    Err(e) => {
                        error!(
                            provider = %group.provider_name,
                            sample = sample.name,
                            error = %format!("{:#}", anyhow::Error::from(e)),
                            "provider setup failed, skipping sample"
                        );
                        continue;
                    }
                }
            }

            info!(sample = sample.name, "running sample");
            match provider.run_sample(sample.name).await {
                Ok(()) => info!(sample = sample.name, "sample completed"),
                Err(e) => error!(
                    sample = sample.name,
                    error = %format!("{:#}", anyhow::Error::from(e)),
                    "sample failed"
                ),
            }
        }
    }
}
