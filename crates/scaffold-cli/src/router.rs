// Command routing and dispatch

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use scaffold_generation::{ConfigManager, ConflictPolicy, EngineConfig, ScaffoldManager};
use tracing::debug;

use crate::commands::{Command, CreateCommand, ListCommand, ShowCommand};
use crate::error::{CliError, CliResult};

/// Scaffold - render project templates into new directories
#[derive(Parser, Debug)]
#[command(name = "scaffold")]
#[command(bin_name = "scaffold")]
#[command(about = "Render project templates into new directories")]
#[command(
    long_about = "Scaffold: render named project templates into a destination directory.\n\nQuick Start:\n  • scaffold list                               Show available templates\n  • scaffold show basic                         Show a template's variables\n  • scaffold create basic my-app --set projectName=my-app"
)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimize output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Preview changes without applying them
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Configuration file (default: <config dir>/scaffold/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Additional template root; may be repeated, later roots win
    #[arg(long = "templates-dir", global = true, value_name = "DIR")]
    pub templates_dir: Vec<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Render a template into a destination directory
    #[command(about = "Render a template into a destination directory")]
    Create {
        /// Template identifier
        #[arg(value_name = "TEMPLATE")]
        template: String,

        /// Destination directory
        #[arg(value_name = "DESTINATION")]
        destination: PathBuf,

        /// Variable value; may be repeated
        #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
        set: Vec<(String, String)>,

        /// What to do with files that already exist
        #[arg(long, value_name = "POLICY")]
        policy: Option<ConflictPolicy>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// List available templates
    #[command(about = "List available templates")]
    List {
        /// Print the templates as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a template's variables and files
    #[command(about = "Show a template's variables and files")]
    Show {
        /// Template identifier
        #[arg(value_name = "TEMPLATE")]
        template: String,
    },
}

/// Parse a `key=value` pair; the value may itself contain `=`
pub fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing variable name in '{}'", s));
    }

    Ok((key.to_string(), value.to_string()))
}

/// Routes parsed arguments to command handlers
pub struct CommandRouter;

impl CommandRouter {
    /// Parse CLI arguments and route to appropriate handler
    pub fn route() -> CliResult<()> {
        let cli = Cli::parse();

        // Initialize logging based on CLI flags
        crate::logging::init_logging(cli.verbose, cli.quiet);

        Self::execute(&cli)
    }

    /// Execute a command
    pub fn execute(cli: &Cli) -> CliResult<()> {
        let config = Self::load_config(cli)?;
        let manager = ScaffoldManager::new(config)?;
        debug!("{} template(s) available", manager.registry().len());

        match &cli.command {
            Commands::Create {
                template,
                destination,
                set,
                policy,
                json,
            } => {
                let cmd = CreateCommand::new(&manager, template.clone(), destination.clone())
                    .with_values(set.iter().cloned())
                    .with_policy(*policy)
                    .with_dry_run(cli.dry_run)
                    .with_json(*json);
                cmd.execute()
            }
            Commands::List { json } => {
                let cmd = ListCommand::new(&manager).with_json(*json);
                cmd.execute()
            }
            Commands::Show { template } => {
                let cmd = ShowCommand::new(&manager, template.clone());
                cmd.execute()
            }
        }
    }

    /// Load the engine configuration and apply `--templates-dir`
    pub fn load_config(cli: &Cli) -> CliResult<EngineConfig> {
        let manager = match &cli.config {
            Some(path) => {
                if !path.is_file() {
                    return Err(CliError::Config(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
                ConfigManager::with_path(path.clone())
            }
            None => ConfigManager::new(),
        };

        let mut config = manager
            .load()
            .map_err(|e| CliError::Config(e.to_string()))?;
        config.template_roots.extend(cli.templates_dir.iter().cloned());

        Ok(config)
    }
}
