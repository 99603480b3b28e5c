use anyhow::Context;

fn main() -> anyhow::Result<()> {
    subswap_observability::init();

    let args = subswap_runner::RunArgs::parse(std::env::args().skip(1))?;
    let config = subswap_swap::SwapConfig::from_env();
    tracing::info!(
        fixture = %args.fixture.display(),
        strategy = %config.strategy,
        "running product swap"
    );

    let report = subswap_runner::execute(&args, config)?;
    let json = serde_json::to_string_pretty(&report).context("failed to render report")?;
    println!("{json}");
    Ok(())
}
