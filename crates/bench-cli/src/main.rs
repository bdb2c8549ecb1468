//! Command-line interface for toolbench
//!
//! Exposes the tool corpus for inspection and ad-hoc invocation: dump the
//! function-calling schemas of any interface, or run a single tool call
//! against a fixture file and print the result.

use anyhow::Context;
use bench_core::Store;
use bench_harness::Episode;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "toolbench")]
#[command(about = "Inspect and invoke benchmark tools against JSON fixtures", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the available domains and their interfaces
    Domains,

    /// Print the function-calling schemas of an interface as JSON
    Schemas {
        /// Domain name, e.g. fund_finance
        #[arg(short, long)]
        domain: String,

        /// Interface number within the domain
        #[arg(short, long, default_value_t = 1)]
        interface: u32,
    },

    /// Invoke one tool against a fixture file and print its result
    Invoke {
        /// Domain name, e.g. fund_finance
        #[arg(short, long)]
        domain: String,

        /// Interface number within the domain
        #[arg(short, long, default_value_t = 1)]
        interface: u32,

        /// Path to the JSON fixture file
        #[arg(short, long)]
        fixture: PathBuf,

        /// Tool name to invoke
        #[arg(short, long)]
        tool: String,

        /// Tool arguments as a JSON object
        #[arg(short, long, default_value = "{}")]
        args: String,

        /// Print the post-call store state as JSON
        #[arg(long)]
        dump_store: bool,
    },
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Domains => {
            for (domain, interfaces) in bench_domains::DOMAINS {
                for number in 1..=*interfaces {
                    println!("{domain}/interface_{number}");
                }
            }
        }
        Command::Schemas { domain, interface } => {
            let interface = bench_domains::interface(&domain, interface)?;
            let schemas = serde_json::Value::Array(interface.schemas());
            println!("{}", serde_json::to_string_pretty(&schemas)?);
        }
        Command::Invoke {
            domain,
            interface,
            fixture,
            tool,
            args,
            dump_store,
        } => {
            let raw = fs::read_to_string(&fixture)
                .with_context(|| format!("reading fixture {}", fixture.display()))?;
            let fixture_value: serde_json::Value =
                serde_json::from_str(&raw).context("fixture is not valid JSON")?;
            let store = Store::from_value(fixture_value)?;

            let interface = bench_domains::interface(&domain, interface)?;
            let args: serde_json::Value =
                serde_json::from_str(&args).context("--args is not valid JSON")?;

            let mut episode = Episode::new(store, interface);
            info!(tool = %tool, "invoking");
            let output = episode.call(&tool, args);
            println!("{output}");

            if dump_store {
                let state = episode.into_store().into_value();
                println!("{}", serde_json::to_string_pretty(&state)?);
            }
        }
    }

    Ok(())
}
