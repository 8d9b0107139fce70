//! octoprov - Main entry point

use clap::Parser;
use log::{debug, info};

use octoprov::{
    resolve_space, run_feed_command, run_process_command, run_resource_command, ApiKeyResolver,
    Cli, Command, GetResource, OctopusClient, ServerResolver,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.log_level))
        .init();

    info!("Starting octoprov v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(&cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let server = ServerResolver::resolve(cli.server.as_deref(), cli.batch)?;
    let api_keys = ApiKeyResolver::new(&server);
    let api_key = api_keys.resolve(cli.api_key.as_deref())?;
    let space = resolve_space(cli.space.as_deref(), &api_keys);
    debug!("Server: {}, space: {:?}", server, space);

    let client = OctopusClient::new(&server, api_key, space)?;

    match &cli.command {
        Command::Get { resource } => match resource {
            GetResource::Process(_) => run_process_command(&client, cli).await,
            GetResource::Feed(_) => run_feed_command(&client, cli).await,
        },
        Command::Resource(_) => run_resource_command(&client, cli).await,
    }
}
