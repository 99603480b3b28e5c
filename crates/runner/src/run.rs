use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use serde::Serialize;

use subswap_automation::{
    ActionOutcome, ActionRegistry, SWAP_IN_FIELD, SWAP_OUT_FIELD, SWAP_PRODUCT_ACTION,
    WorkflowContext, register_actions,
};
use subswap_infra::Fixture;
use subswap_subscriptions::Subscription;
use subswap_swap::{ProductSwap, SwapConfig};

const USAGE: &str = "usage: subswap-run <fixture.json> <swap-out-product-id> <swap-in-product-id>";

/// Command-line arguments. Product ids stay raw so the action applies its own
/// "blank means absent" handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunArgs {
    pub fixture: PathBuf,
    pub swap_out: String,
    pub swap_in: String,
}

impl RunArgs {
    pub fn parse<I>(args: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let args: Vec<String> = args.into_iter().collect();
        let [fixture, swap_out, swap_in] = args.as_slice() else {
            bail!("{USAGE}");
        };
        Ok(Self {
            fixture: PathBuf::from(fixture),
            swap_out: swap_out.clone(),
            swap_in: swap_in.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub outcome: ActionOutcome,
    pub subscription: Subscription,
}

/// Seed the in-memory host from the fixture and run the swap action through
/// the registry, as the automation engine would.
pub fn execute(args: &RunArgs, config: SwapConfig) -> anyhow::Result<RunReport> {
    let fixture = Fixture::load(&args.fixture)?;
    let subscription_id = fixture.subscription_id();
    let (repository, catalog) = fixture.seed();
    let repository = Arc::new(repository);

    let mut registry = ActionRegistry::new();
    register_actions(
        &mut registry,
        ProductSwap::new(repository.clone(), Arc::new(catalog), config),
    )?;

    let context = WorkflowContext::for_subscription(subscription_id)
        .with_option(SWAP_OUT_FIELD, args.swap_out.as_str())
        .with_option(SWAP_IN_FIELD, args.swap_in.as_str());
    let outcome = registry.run(SWAP_PRODUCT_ACTION, &context)?;

    let subscription = repository
        .get(subscription_id)
        .with_context(|| format!("subscription {subscription_id} vanished from the store"))?;

    Ok(RunReport {
        outcome,
        subscription,
    })
}
