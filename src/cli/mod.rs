use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod catalog;
pub mod chat;
pub mod suggest;
pub mod terminal;
pub mod write_back;

use crate::core::AppConfig;
use crate::gateway::ChatFilters;
use crate::workflow::{EntityKind, EventInput, EventKind, HostContext, Subject};

#[derive(Args, Clone, Debug, Default)]
pub struct FilterArgs {
    /// Include expired certificates in the context sent to the model
    #[arg(long, action, default_value = "false")]
    include_expired_certificates: bool,
    /// Include closed nonconformance records
    #[arg(long, action, default_value = "false")]
    include_closed_nonconformance: bool,
    /// Only consider records on or after this date (YYYY-MM-DD)
    #[arg(long, default_value = "")]
    from_date: String,
    /// Only consider records on or before this date (YYYY-MM-DD)
    #[arg(long, default_value = "")]
    to_date: String,
}

impl FilterArgs {
    fn is_empty(&self) -> bool {
        !self.include_expired_certificates
            && !self.include_closed_nonconformance
            && self.from_date.is_empty()
            && self.to_date.is_empty()
    }

    fn into_filters(self) -> ChatFilters {
        ChatFilters {
            include_expired_certificates: self.include_expired_certificates,
            include_closed_nonconformance: self.include_closed_nonconformance,
            from_date: self.from_date,
            to_date: self.to_date,
        }
    }

    fn into_input(self) -> EventInput {
        if self.is_empty() {
            EventInput::None
        } else {
            EventInput::Filters(self.into_filters())
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Ask for a compliance suggestion on a lot
    Suggest {
        #[arg(long)]
        lot: String,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Ask for a narrative summary of an evidence pack
    Summarize {
        #[arg(long)]
        evidence_pack: String,
        /// Write the summary to this file when accepted
        #[arg(long)]
        apply_to: Option<PathBuf>,
        /// Never write back, only log the decision
        #[arg(long, action, default_value = "false")]
        read_only: bool,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Start an assistant chat session about a lot
    Chat {
        #[arg(long)]
        lot: String,
        #[arg(long)]
        model: Option<String>,
        #[arg(long)]
        template: Option<String>,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// List the prompt templates offered by the gateway
    Templates {},
    /// List the models offered by the gateway
    Models {},
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Overrides TRACE_ASSIST_GATEWAY_URL
    #[arg(long, global = true)]
    gateway_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=info", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();
    init_logging();

    let Some(command) = args.command else {
        return Ok(());
    };
    let config = match &args.gateway_url {
        Some(url) => AppConfig::from_env_with_gateway(url)?,
        None => AppConfig::from_env()?,
    };
    let host = |entity: EntityKind, id: &str| HostContext::new(&config.user, Subject::new(entity, id));

    // Handle each sub command
    match command {
        Command::Suggest { lot, filters } => {
            suggest::run(
                &config,
                host(EntityKind::Lot, &lot),
                EventKind::ComplianceSuggestion,
                filters.into_input(),
                None,
            )
            .await?;
        }
        Command::Summarize {
            evidence_pack,
            apply_to,
            read_only,
            filters,
        } => {
            suggest::run(
                &config,
                host(EntityKind::EvidencePack, &evidence_pack).read_only(read_only),
                EventKind::NarrativeSummary,
                filters.into_input(),
                apply_to,
            )
            .await?;
        }
        Command::Chat {
            lot,
            model,
            template,
            filters,
        } => {
            chat::run(
                &config,
                host(EntityKind::Lot, &lot),
                model,
                template,
                filters.into_filters(),
            )
            .await?;
        }
        Command::Templates {} => {
            catalog::templates(&config).await?;
        }
        Command::Models {} => {
            catalog::models(&config).await?;
        }
    }

    Ok(())
}
