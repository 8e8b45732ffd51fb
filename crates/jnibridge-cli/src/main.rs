//! findclass
//!
//! Starts an embedded Java VM, looks up one class by its internal name, and
//! prints the resulting reference (`0x0` when the class does not exist).
//!
//! ```text
//! $ findclass java/lang/String
//! 0x7f3a1c00a2b8
//! ```

mod output;

use std::io::{self, Write};

use anyhow::Context;
use clap::Parser;
use jnibridge_runtime::{report, HostOptions, VmHost};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use output::{resolve_color_choice, StyledOutput};

#[derive(Parser)]
#[command(name = "findclass")]
#[command(about = "Look up a class in an embedded Java VM", long_about = None)]
#[command(version)]
struct Cli {
    /// Class name in internal form, e.g. java/lang/String
    class_name: String,

    /// Also print the class through the VM's System.out
    #[arg(long)]
    print: bool,

    /// Colored status output
    #[arg(long, value_parser = ["auto", "always", "never"])]
    color: Option<String>,

    /// Log filter used when JNIBRIDGE_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn init_logging(fallback: &str) {
    let filter = EnvFilter::try_from_env("JNIBRIDGE_LOG")
        .unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .without_time(),
        )
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);
    let mut styled = StyledOutput::new(resolve_color_choice(cli.color.as_deref()));

    let mut host = VmHost::new(HostOptions::default());
    host.initialize().context("could not start the Java VM")?;

    let class = host.resolve_class_by_name(&cli.class_name)?;
    {
        let mut stdout = io::stdout().lock();
        report(&mut stdout, class)?;
        stdout.flush()?;
    }
    styled.lookup_status(&cli.class_name, class.is_some());

    if let (true, Some(class)) = (cli.print, class) {
        host.print_object(class.into())
            .with_context(|| format!("could not print {}", cli.class_name))?;
    }

    if let Err(e) = host.shutdown() {
        tracing::warn!(error = %e, "Java VM shutdown failed");
    }
    Ok(())
}
