use std::{io::Read, path::PathBuf, sync::Arc};

use clap::Parser;
use postbox::Config;
use postbox_common::{ClientId, ContactMessage, LogReporter};
use postbox_pipeline::{DeliveryOutcome, SubmissionError};

/// Accept one contact message and run it through the submission pipeline.
#[derive(Debug, Parser)]
#[command(name = "postbox", version, about)]
struct Args {
    /// Path to the configuration file
    #[arg(long, default_value = "./postbox.config.toml")]
    config: PathBuf,

    /// Client identity used for admission control
    #[arg(long, default_value = "cli")]
    client: String,

    /// Visitor name
    #[arg(long)]
    name: String,

    /// Visitor reply address
    #[arg(long)]
    email: String,

    /// Message content (read from stdin when omitted)
    #[arg(long)]
    message: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    postbox_common::logging::init();

    let args = Args::parse();

    let config = match Config::from_path(&args.config) {
        Ok(config) => config,
        Err(error) => {
            tracing::warn!(%error, path = %args.config.display(), "configuration not loaded, running with defaults");
            Config::default()
        }
    };
    let pipeline = config.build(Arc::new(LogReporter));

    let content = match args.message {
        Some(message) => message,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let message = ContactMessage::new(args.name, args.email, content);
    let client = ClientId::new(args.client);

    match pipeline.submit(message, &client).await {
        Ok(outcome) => {
            println!("{outcome}");
            Ok(())
        }
        Err(error @ (SubmissionError::Validation(_) | SubmissionError::AdmissionDenied { .. })) => {
            eprintln!("{}: {error}", DeliveryOutcome::HardFailure);
            std::process::exit(1);
        }
    }
}
