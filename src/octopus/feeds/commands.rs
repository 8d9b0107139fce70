//! Feed command handlers

use log::debug;

use crate::cli::{Cli, Command, GetResource};
use crate::octopus::OctopusClient;
use crate::output::output_feeds;
use crate::ui::{create_spinner, finish_spinner};

/// Run the feed list/get command
pub async fn run_feed_command(
    client: &OctopusClient,
    cli: &Cli,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let Command::Get {
        resource: GetResource::Feed(args),
    } = &cli.command
    else {
        unreachable!()
    };

    let spinner = create_spinner("Fetching feeds...", cli.batch);

    if let Some(name) = &args.name {
        let result = client.find_feed(name).await;
        finish_spinner(spinner);
        return match result? {
            Some(feed) => {
                output_feeds(&[feed], args.output, cli.no_header);
                Ok(())
            }
            None => Err(format!("Feed '{}' not found", name).into()),
        };
    }

    let result = client.get_feeds().await;
    finish_spinner(spinner);
    let mut feeds = result?;

    if let Some(filter) = &args.filter {
        let filter_lower = filter.to_lowercase();
        feeds.retain(|f| f.name.to_lowercase().contains(&filter_lower));
        debug!("Filtered to {} feeds matching '{}'", feeds.len(), filter);
    }

    if feeds.is_empty() && !args.output.is_structured() {
        eprintln!("No feeds found");
        return Ok(());
    }

    output_feeds(&feeds, args.output, cli.no_header);
    Ok(())
}
