//! Command-line entrypoint for the Aura decision core.
//!
//! Reads one context packet from a JSON file, runs the full arbitration
//! pipeline against the configured reasoner, and prints the resulting
//! suggestion as JSON on stdout. Optionally records user feedback for the
//! produced suggestion.

#![deny(unsafe_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{info, warn};

use aura_core::{ContextPacket, logging};
use aura_llm::{HttpReasoner, HttpReasonerConfig};
use aura_memory::{HashEmbedding, MemoryStore, VectorMemoryStore};
use aura_runtime::{DecisionOrchestrator, OrchestratorConfig};
use aura_settings::AuraSettings;

/// Baseline preference facts seeded on first start so an empty memory still
/// gives the reasoner something to work with.
const SEED_FACTS: [&str; 2] = [
    "User prefers a bath at 42 degrees Celsius after a workout.",
    "After stressful meetings, the user likes soft lighting and calm music.",
];

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Feedback {
    /// The user accepted the suggestion.
    Accepted,
    /// The user rejected the suggestion.
    Rejected,
}

#[derive(Debug, Parser)]
#[command(
    name = "aura-agent",
    about = "Context-to-action decision core for a proactive assistant"
)]
struct Args {
    /// Path to the context packet JSON file.
    context: PathBuf,

    /// Path to the settings file. Missing file means built-in defaults.
    #[arg(long, default_value = "aura.json")]
    config: PathBuf,

    /// Override the device capability configuration path from settings.
    #[arg(long)]
    devices: Option<PathBuf>,

    /// Record this outcome for the produced suggestion before exiting.
    #[arg(long, value_enum)]
    feedback: Option<Feedback>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let settings = aura_settings::load_settings_from_path(&args.config)
        .with_context(|| format!("loading settings from {}", args.config.display()))?;
    logging::init_tracing(&settings.logging.level);

    let devices_path = args
        .devices
        .clone()
        .unwrap_or_else(|| PathBuf::from(&settings.devices.capabilities_path));
    let capabilities = aura_policy::load_capability_map(&devices_path)
        .with_context(|| format!("loading capability config {}", devices_path.display()))?;
    info!(devices = capabilities.len(), "capability config loaded");

    let orchestrator = build_orchestrator(&settings, capabilities).await?;

    let ctx = read_context(&args.context)?;
    let suggestion = orchestrator.process_context(ctx.clone()).await;
    println!("{}", serde_json::to_string_pretty(&suggestion)?);

    if let Some(feedback) = args.feedback {
        let accepted = matches!(feedback, Feedback::Accepted);
        orchestrator.record_feedback(&suggestion, &ctx, accepted).await;
        info!(accepted, "feedback recorded");
    }
    Ok(())
}

async fn build_orchestrator(
    settings: &AuraSettings,
    capabilities: aura_policy::CapabilityMap,
) -> Result<DecisionOrchestrator> {
    let api_key = std::env::var(&settings.reasoner.api_key_env).ok();
    if api_key.is_none() {
        warn!(var = %settings.reasoner.api_key_env, "no API key in environment");
    }
    let reasoner = HttpReasoner::new(HttpReasonerConfig {
        base_url: settings.reasoner.base_url.clone(),
        model: settings.reasoner.model.clone(),
        api_key,
        timeout: Duration::from_millis(settings.reasoner.timeout_ms),
    })
    .context("building reasoner client")?;

    let memory = Arc::new(VectorMemoryStore::new(
        Arc::new(HashEmbedding::default()),
        settings.memory.similarity_threshold,
    ));
    seed_memory(memory.as_ref()).await;

    let config = OrchestratorConfig {
        cooldown: Duration::from_secs(settings.throttle.cooldown_minutes * 60),
        memory_results: settings.memory.n_results,
        reasoner_timeout: Duration::from_millis(settings.reasoner.timeout_ms),
        memory_timeout: Duration::from_millis(settings.memory.timeout_ms),
    };
    Ok(DecisionOrchestrator::new(
        Arc::new(reasoner),
        memory,
        capabilities,
        config,
    ))
}

/// Seeding is best-effort; a fact that fails to store costs one warning,
/// not the process.
async fn seed_memory(memory: &VectorMemoryStore) {
    for fact in SEED_FACTS {
        if let Err(e) = memory
            .add_document(fact, serde_json::json!({"type": "seed_preference"}))
            .await
        {
            warn!(error = %e, "failed to seed preference fact");
        }
    }
}

fn read_context(path: &Path) -> Result<ContextPacket> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading context packet {}", path.display()))?;
    let ctx: ContextPacket =
        serde_json::from_str(&text).context("parsing context packet JSON")?;
    ctx.validate().context("validating context packet")?;
    Ok(ctx)
}
