//! Stockline CLI - run functions offline and manage Shopify app resources.
//!
//! # Usage
//!
//! ```bash
//! # List every function the server advertises
//! stockline functions
//!
//! # Run a YAML script of function calls against a fresh store
//! stockline run script.yaml --seed seed.yaml
//!
//! # Manage webhook subscriptions on the configured shop
//! stockline webhooks list
//! stockline webhooks register -t ORDERS_CREATE -c https://example.com/hooks/orders
//! stockline webhooks delete gid://shopify/WebhookSubscription/1
//!
//! # App billing subscriptions
//! stockline subscriptions list
//! stockline subscriptions create -n Pro -r https://example.com/billing --line-items '[...]'
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "stockline")]
#[command(author, version, about = "Stockline CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available functions grouped by server
    Functions {
        /// Print only the function names
        #[arg(long)]
        names: bool,
    },
    /// Run a YAML script of function calls
    Run {
        /// Script file: a list of `{function, args}` steps
        script: PathBuf,

        /// Seed file loaded into the store before the first step
        #[arg(short, long)]
        seed: Option<PathBuf>,

        /// Keep running after a step fails
        #[arg(short, long)]
        keep_going: bool,
    },
    /// Manage Shopify webhook subscriptions
    Webhooks {
        #[command(subcommand)]
        action: WebhookAction,
    },
    /// Manage Shopify app billing subscriptions
    Subscriptions {
        #[command(subcommand)]
        action: SubscriptionAction,
    },
}

#[derive(Subcommand)]
enum WebhookAction {
    /// List webhook subscriptions
    List {
        /// Maximum number to fetch (capped at 250)
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// Register a webhook subscription
    Register {
        /// Webhook topic (e.g. `ORDERS_CREATE`)
        #[arg(short, long)]
        topic: String,

        /// HTTPS callback URL
        #[arg(short, long)]
        callback_url: String,

        /// Payload format (`JSON` or `XML`)
        #[arg(short, long, default_value = "JSON")]
        format: String,
    },
    /// Delete a webhook subscription by id
    Delete {
        /// Webhook subscription GID
        id: String,
    },
}

#[derive(Subcommand)]
enum SubscriptionAction {
    /// List app subscriptions
    List {
        /// Maximum number to fetch (capped at 250)
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// Create an app subscription
    Create {
        /// Plan name
        #[arg(short, long)]
        name: String,

        /// URL the merchant returns to after approving
        #[arg(short, long)]
        return_url: String,

        /// Line items as a JSON array
        #[arg(long)]
        line_items: String,

        /// Free trial length in days
        #[arg(long, default_value_t = 0)]
        trial_days: i64,

        /// Create a test charge
        #[arg(long)]
        test: bool,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stockline_cli=info,stockline_core=warn".into()),
        )
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Functions { names } => commands::functions::list(names),
        Commands::Run {
            script,
            seed,
            keep_going,
        } => commands::script::run(&script, seed.as_deref(), keep_going).await?,
        Commands::Webhooks { action } => match action {
            WebhookAction::List { limit } => commands::shopify::list_webhooks(limit).await?,
            WebhookAction::Register {
                topic,
                callback_url,
                format,
            } => commands::shopify::register_webhook(&topic, &callback_url, &format).await?,
            WebhookAction::Delete { id } => commands::shopify::delete_webhook(&id).await?,
        },
        Commands::Subscriptions { action } => match action {
            SubscriptionAction::List { limit } => {
                commands::shopify::list_subscriptions(limit).await?;
            }
            SubscriptionAction::Create {
                name,
                return_url,
                line_items,
                trial_days,
                test,
            } => {
                commands::shopify::create_subscription(
                    &name,
                    &line_items,
                    &return_url,
                    trial_days,
                    test,
                )
                .await?;
            }
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run() {
        let cli = Cli::try_parse_from(["stockline", "run", "s.yaml", "--seed", "seed.yaml", "-k"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Run { seed: Some(_), keep_going: true, .. })
        ));
    }
}
