//! # genaisis
//!
//! Entry point: installs the stderr log subscriber and hands off to [`cli`].
//!
//! `RUST_LOG` sets the filter and `GENAISIS_LOG_FORMAT=json` switches the log
//! lines to JSON. Stdout is left to the banner and command output.

use clap::Parser;
use genaisis::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    let log_format = std::env::var("GENAISIS_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "genaisis=info,tower_http=debug".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!(event = "command_failed", "{}", e);
        std::process::exit(1);
    }
}

/// Print the GENAISIS startup banner.
fn print_banner() {
    println!(
        r#"
   ██████╗ ███████╗███╗   ██╗ █████╗ ██╗███████╗██╗███████╗
  ██╔════╝ ██╔════╝████╗  ██║██╔══██╗██║██╔════╝██║██╔════╝
  ██║  ███╗█████╗  ██╔██╗ ██║███████║██║███████╗██║███████╗
  ██║   ██║██╔══╝  ██║╚██╗██║██╔══██║██║╚════██║██║╚════██║
  ╚██████╔╝███████╗██║ ╚████║██║  ██║██║███████║██║███████║
   ╚═════╝ ╚══════╝╚═╝  ╚═══╝╚═╝  ╚═╝╚═╝╚══════╝╚═╝╚══════╝

  Symposium Registration Desk v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
