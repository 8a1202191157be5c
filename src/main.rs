use clap::Parser;
use miette::Result;
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*, EnvFilter};

use attrsync::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(log_filter(global.verbose))
        .try_init();

    match cli.command {
        Commands::Init(args) => attrsync::cli::commands::init::run(args),
        Commands::Export(args) => attrsync::cli::commands::export::run(args, &global),
        Commands::Import(args) => attrsync::cli::commands::import::run(args, &global),
        Commands::Terms(cmd) => attrsync::cli::commands::terms::run(cmd, &global),
        Commands::Completions(args) => attrsync::cli::commands::completions::run(args),
    }
}

/// RUST_LOG when set; otherwise DEBUG with --verbose, WARN without
fn log_filter(verbose: bool) -> EnvFilter {
    let default = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    EnvFilter::builder()
        .with_default_directive(default.into())
        .from_env_lossy()
}
