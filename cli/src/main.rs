use clap::Parser;
use ingl_cli::{cli::Cli, commands::run, settings::Settings, telemetry::setup_telemetry};
use ingl_client::{config::ProgramConfig, rpc::SolanaRpcConnection, service::NftService};
use tracing::debug;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let settings = Settings::load(cli.global.config.as_deref())?.apply_args(&cli.global);
    setup_telemetry(&settings.logging);
    debug!("settings: {:?}", settings);

    let rpc = SolanaRpcConnection::new(settings.rpc_config(&cli.command)?);
    let wallet = settings.wallet()?;
    let service = NftService::new(rpc, wallet, ProgramConfig::new(settings.network));

    run(&cli.command, &service, cli.global.mint.as_deref(), &settings).await?;
    Ok(())
}
