mod client;
mod output;

use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use dumpwatch_shared::coords::format_packed_coordinates;
use dumpwatch_shared::models::{FilterMode, IncidentStatus, NaturalPoint, NewIncident};
use dumpwatch_shared::overlay::SkipLog;
use dumpwatch_shared::store::{IncidentStore, RefreshOutcome};
use tracing_subscriber::EnvFilter;

use client::Client;

#[derive(Parser)]
#[command(name = "dumpwatch", version, about = "Browse and report illegal-dumping incidents")]
struct Cli {
    /// Base URL of the incident service
    #[arg(long, env = "DUMPWATCH_URL", default_value = "http://localhost:8080")]
    url: String,

    /// Give up on a request after this many seconds
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the current incidents
    List {
        /// all, reported or resolved
        #[arg(long, default_value = "all")]
        filter: FilterMode,
    },
    /// Poll the service and reprint whenever the incidents or their freshness change
    Watch {
        #[arg(long, default_value = "all")]
        filter: FilterMode,
        #[arg(long, default_value_t = 15)]
        interval_secs: u64,
    },
    /// Report an incident at a position in map-image pixels
    Report {
        x: f64,
        y: f64,
        #[arg(long, short)]
        description: String,
    },
    /// Mark an incident resolved
    Resolve {
        id: String,
        /// Set it back to reported instead
        #[arg(long)]
        reopen: bool,
    },
}

fn refresh(store: &mut IncidentStore, client: &Client) -> anyhow::Result<RefreshOutcome> {
    let ticket = store.begin_refresh();
    let result = client.list_incidents();
    Ok(store.complete_refresh(ticket, result)?)
}

fn watch(client: &Client, filter: FilterMode, interval: Duration) -> anyhow::Result<()> {
    let mut store = IncidentStore::new();
    let mut shown = output::ShownListing::default();
    let mut skip_log = SkipLog::new();
    loop {
        if let Err(e) = refresh(&mut store, client) {
            tracing::warn!(error = %e, "Refresh failed, keeping the last listing");
        }
        if shown.update(&store) {
            println!("{}", output::format_listing(&store, filter, &mut skip_log));
        }
        std::thread::sleep(interval);
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = Client::new(&cli.url, Duration::from_secs(cli.timeout_secs))?;

    match cli.command {
        Command::List { filter } => {
            let mut store = IncidentStore::new();
            refresh(&mut store, &client)
                .with_context(|| format!("could not list incidents from {}", cli.url))?;
            print!("{}", output::format_listing(&store, filter, &mut SkipLog::new()));
        }
        Command::Watch {
            filter,
            interval_secs,
        } => {
            tracing::info!(url = %cli.url, interval_secs, "Watching incidents");
            watch(&client, filter, Duration::from_secs(interval_secs))?;
        }
        Command::Report { x, y, description } => {
            let input = NewIncident {
                description,
                coordinates: format_packed_coordinates(NaturalPoint { x, y }),
            };
            let incident = client
                .create_incident(&input)
                .context("could not submit report")?;
            println!("Reported {} at {}", incident.id, incident.coordinates);
        }
        Command::Resolve { id, reopen } => {
            let status = if reopen {
                IncidentStatus::Reported
            } else {
                IncidentStatus::Resolved
            };
            let incident = client
                .update_status(&id, status)
                .with_context(|| format!("could not update incident {id}"))?;
            println!("{} is now {}", incident.id, incident.status);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_list_filter() {
        let cli = Cli::try_parse_from(["dumpwatch", "list", "--filter", "resolved"]).unwrap();
        match cli.command {
            Command::List { filter } => assert_eq!(filter, FilterMode::Resolved),
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_filter() {
        assert!(Cli::try_parse_from(["dumpwatch", "list", "--filter", "open"]).is_err());
    }

    #[test]
    fn test_parse_report() {
        let cli = Cli::try_parse_from([
            "dumpwatch",
            "--url",
            "http://example.test",
            "report",
            "600",
            "449.5",
            "-d",
            "Fridge",
        ])
        .unwrap();
        assert_eq!(cli.url, "http://example.test");
        match cli.command {
            Command::Report { x, y, description } => {
                assert_eq!((x, y), (600.0, 449.5));
                assert_eq!(description, "Fridge");
            }
            _ => panic!("expected report"),
        }
    }

    #[test]
    fn test_parse_resolve_reopen() {
        let cli = Cli::try_parse_from(["dumpwatch", "resolve", "abc", "--reopen"]).unwrap();
        match cli.command {
            Command::Resolve { id, reopen } => {
                assert_eq!(id, "abc");
                assert!(reopen);
            }
            _ => panic!("expected resolve"),
        }
    }
}
