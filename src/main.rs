use clap::Parser;
use std::env;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use compound::api::{Cli, build_inputs, render_projection, run_http_server};
use compound::core::project;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "compound=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let raw_args: Vec<String> = env::args().collect();
    if raw_args.get(1).map(|s| s.as_str()) == Some("serve") {
        let port = raw_args
            .get(2)
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(8080);
        if let Err(e) = run_http_server(port).await {
            eprintln!("Server error: {e}");
            std::process::exit(1);
        }
        return;
    }

    let cli = Cli::parse();
    let inputs = match build_inputs(&cli) {
        Ok(inputs) => inputs,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    print!("{}", render_projection(&inputs, &project(&inputs)));
}
