mod commands;
mod utils;

use clap::Parser;
use commands::{list_packages, switch};
use oswitch_container::{SwitchConfig, DEFAULT_PING_TIMEOUT};
use oswitch_core::DEFAULT_RUNTIME;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "oswitch", version)]
#[command(about = "Switch into a container that looks like your own shell")]
struct Cli {
    /// List packages that already have a build context
    #[arg(long, short)]
    list: bool,

    /// Directory holding per-package build contexts [default: ~/.oswitch]
    #[arg(long, env = "OSWITCH_STATE_DIR")]
    state_dir: Option<PathBuf>,

    /// Directory of files copied into every build context
    /// [default: <prefix>/share/oswitch/context]
    #[arg(long, env = "OSWITCH_TEMPLATES")]
    templates: Option<PathBuf>,

    /// Container runtime binary
    #[arg(long, env = "OSWITCH_RUNTIME", default_value = DEFAULT_RUNTIME)]
    runtime: String,

    /// Seconds to wait for the runtime daemon to answer
    #[arg(long, default_value_t = DEFAULT_PING_TIMEOUT.as_secs())]
    ping_timeout: u64,

    /// Log debug output to stderr
    #[arg(long, short)]
    verbose: bool,

    /// Image to switch into, e.g. biocontainers/samtools:1.9
    #[arg(required_unless_present = "list")]
    package: Option<String>,

    /// Command to run instead of an interactive shell
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    command: Vec<String>,
}

impl Cli {
    fn config(&self) -> Result<SwitchConfig, String> {
        let state_root = self
            .state_dir
            .clone()
            .or_else(utils::default_state_dir)
            .ok_or("could not determine home directory, pass --state-dir")?;
        let template_dir = self
            .templates
            .clone()
            .or_else(utils::default_template_dir)
            .ok_or("could not locate build templates, pass --templates")?;

        let mut config = SwitchConfig::new(state_root, template_dir);
        config.runtime = self.runtime.clone();
        config.ping_timeout = Duration::from_secs(self.ping_timeout);
        Ok(config)
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match cli.config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("oswitch: {}", e);
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!(?config, "Loaded configuration");

    if cli.list {
        return match list_packages(&config).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("{}", utils::bug_report(&e));
                ExitCode::FAILURE
            }
        };
    }

    let Some(package) = cli.package.as_deref() else {
        return ExitCode::FAILURE;
    };

    match switch(config, package, &cli.command).await {
        Ok(code) => std::process::exit(code),
        Err(e) if e.is_expected() => {
            println!("{}", e);
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("{}", utils::bug_report(&e));
            ExitCode::FAILURE
        }
    }
}
