use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "vitro")]
#[command(about = "Find movies and TV shows and play them through an embed provider", long_about = None)]
struct Args {
    #[arg(short, long, default_value = "vitro.yaml")]
    config: String,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: vitro_rs::Command,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let default_filter = if args.debug { "vitro_rs=debug" } else { "vitro_rs=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = vitro_rs::run(&args.config, args.debug, args.command).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
