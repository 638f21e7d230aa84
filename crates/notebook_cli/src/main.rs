//! Command-line entry point for notebook tools.
//!
//! # Responsibility
//! - Build the tool registry once and run a single tool per process.
//! - Resolve logging from flags layered over the environment.

use clap::Parser;
use log::error;
use notebook_core::{init_from_config, CoreConfig, FileNotebookStore, ToolRegistry};
use serde_json::Value;
use std::process::ExitCode;

/// Inspect and edit Jupyter notebooks through named tools.
#[derive(Debug, clap::Parser)]
#[command(name = "notebook_cli", version)]
struct Cli {
    /// Log level (trace|debug|info|warn|error). Overrides NOTEBOOK_LOG_LEVEL.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files. Overrides NOTEBOOK_LOG_DIR.
    #[arg(long, global = true)]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, clap::Subcommand)]
enum Command {
    /// List registered tools.
    Tools,

    /// Invoke one tool against notebook files on disk.
    Call(CallArgs),
}

#[derive(Debug, clap::Args)]
struct CallArgs {
    /// Tool name, e.g. `read_notebook`.
    tool: String,

    /// Tool parameters as a JSON object.
    #[arg(long, default_value = "{}")]
    params: String,

    /// Print the full response envelope as JSON.
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = CoreConfig::from_env().with_overrides(cli.log_level, cli.log_dir);
    if let Err(err) = init_from_config(&config) {
        eprintln!("warning: logging disabled: {err}");
    }

    let registry = ToolRegistry::with_notebook_tools();
    match cli.command {
        Command::Tools => {
            for spec in registry.tools() {
                println!("{:<26} {}", spec.name, spec.description);
            }
            ExitCode::SUCCESS
        }
        Command::Call(args) => call(&registry, args),
    }
}

fn call(registry: &ToolRegistry, args: CallArgs) -> ExitCode {
    let params: Value = match serde_json::from_str(&args.params) {
        Ok(params) => params,
        Err(err) => {
            error!(
                "event=cli_call module=cli status=error tool={} error_code=bad_params_json",
                args.tool
            );
            eprintln!("Error: --params is not valid JSON: {err}");
            return ExitCode::from(2);
        }
    };

    let store = FileNotebookStore::new();
    let response = registry.invoke(&store, &args.tool, params);

    if args.json {
        match serde_json::to_string_pretty(&response) {
            Ok(rendered) => println!("{rendered}"),
            Err(err) => {
                eprintln!("Error: failed to render response: {err}");
                return ExitCode::FAILURE;
            }
        }
    } else if response.ok {
        println!("{}", response.content);
    } else {
        eprintln!("{}", response.content);
    }

    if response.ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
