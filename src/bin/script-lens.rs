//! Command line host for script lenses.
//!
//! Usage:
//!   script-lens lenses src/build.script.ts         # list the lenses of a file
//!   script-lens run src/build.script.ts -s build   # run a script like a lens click
//!   script-lens tree src/build.script.ts --ast     # dump the parse

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::{error, info};

use script_lens::config::{JsonSettingsFile, SettingsSource, DEFAULT_FUNCTION};
use script_lens::document::TextDocument;
use script_lens::lens::LensProvider;
use script_lens::logging;
use script_lens::parser::ast::HasMeta;
use script_lens::parser::ScriptParser;
use script_lens::runner::terminal::ShellTerminals;
use script_lens::runner::workspace::NativeWorkspace;
use script_lens::runner::{RunRequest, Runner, DEFAULT_SCRIPT_NAME};

const WORKSPACE_SETTINGS: &str = ".vscode/settings.json";

/// script-lens - find and run the scripts declared in script files
#[derive(Parser)]
#[command(name = "script-lens")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON settings file (default: .vscode/settings.json of the first workspace folder)
    #[arg(long, global = true, value_name = "PATH")]
    settings: Option<PathBuf>,

    /// Workspace folder, the first one is the fallback working directory
    #[arg(long = "workspace", global = true, value_name = "DIR")]
    workspaces: Vec<PathBuf>,

    /// Log as JSON lines
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the code lenses of a file
    Lenses {
        file: PathBuf,

        /// Print the lenses as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run a script the way clicking its lens does
    Run {
        /// Script file, defaults to nothing which makes the run a no-op
        file: Option<PathBuf>,

        /// Script name passed to the command
        #[arg(short, long, default_value = DEFAULT_SCRIPT_NAME)]
        script: String,

        /// Configured function whose command to use
        #[arg(short, long, conflicts_with = "template")]
        key: Option<String>,

        /// Command template used instead of a configured one
        #[arg(short = 'c', long = "command", value_name = "TEMPLATE")]
        template: Option<String>,

        #[arg(long)]
        debug: bool,

        /// Return as soon as the command is started
        #[arg(long)]
        no_wait: bool,
    },
    /// Dump the parse of a file
    Tree {
        file: PathBuf,

        /// Print the AST instead of the raw token tree
        #[arg(long)]
        ast: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.log_json);

    match execute(cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            let message = format!("{:#}", e);
            error!(error = %message, "Command failed");
            eprintln!("Error: {}", message);
            process::exit(1);
        }
    }
}

fn settings_file(cli: &Cli) -> JsonSettingsFile {
    match &cli.settings {
        Some(path) => JsonSettingsFile::new(path.clone()),
        None => {
            let base = cli
                .workspaces
                .first()
                .cloned()
                .unwrap_or_else(|| PathBuf::from("."));
            JsonSettingsFile::new(base.join(WORKSPACE_SETTINGS))
        }
    }
}

fn execute(cli: Cli) -> anyhow::Result<i32> {
    let settings = settings_file(&cli);
    match &cli.command {
        Commands::Lenses { file, json } => print_lenses(settings, file, *json),
        Commands::Run {
            file,
            script,
            key,
            template,
            debug,
            no_wait,
        } => {
            let command_template = match template {
                Some(template) => Some(template.clone()),
                None => {
                    let key = key.as_deref().unwrap_or(DEFAULT_FUNCTION);
                    let loaded = settings.load();
                    match loaded.functions.get(key) {
                        Some(entry) => Some(entry.command.clone()),
                        None => bail!("no function {:?} in settings", key),
                    }
                }
            };
            let request = RunRequest {
                file_path: file.clone(),
                command_template,
                script_name: script.clone(),
                is_debug: *debug,
            };
            run_script(cli.workspaces.clone(), request, !*no_wait)
        }
        Commands::Tree { file, ast } => print_tree(file, *ast),
    }
}

fn print_lenses(settings: JsonSettingsFile, file: &Path, json: bool) -> anyhow::Result<i32> {
    let document = TextDocument::open(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let provider = LensProvider::new(settings);
    let lenses = provider.provide_code_lenses(&document);
    if json {
        println!("{}", serde_json::to_string_pretty(&lenses)?);
    } else {
        for lens in &lenses {
            let range = lens.range;
            println!(
                "{}:{}-{}:{}\t{}\t{}",
                range.start.line + 1,
                range.start.character + 1,
                range.end.line + 1,
                range.end.character + 1,
                lens.command.title,
                lens.command.arguments.script_name
            );
        }
    }
    Ok(0)
}

fn run_script(workspaces: Vec<PathBuf>, request: RunRequest, wait: bool) -> anyhow::Result<i32> {
    let mut runner = Runner::new(NativeWorkspace::new(workspaces), ShellTerminals);
    let outcome = match runner.run(request)? {
        Some(outcome) => outcome,
        None => {
            info!("Nothing to run");
            return Ok(0);
        }
    };
    if !wait {
        return Ok(0);
    }
    let code = match runner.active_terminal_mut() {
        Some(terminal) => match terminal.wait() {
            Ok(code) => code,
            Err(e) => {
                terminal.dispose();
                return Err(e.into());
            }
        },
        None => None,
    };
    info!(terminal = %outcome.terminal_id, exit_code = ?code, "Script finished");
    Ok(code.unwrap_or(1))
}

fn print_tree(file: &Path, ast: bool) -> anyhow::Result<i32> {
    let document = TextDocument::open(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let text = document.text();
    let dump = if ast {
        ScriptParser::parse_to_ast(text)
            .map_err(|e| script_lens::Error::parse(&file.to_string_lossy(), e))?
            .to_formatted_string(text)
    } else {
        match ScriptParser::parse_to_token_tree(text) {
            Ok(tree) => tree,
            Err(message) => bail!("{}: {}", file.display(), message),
        }
    };
    println!("{}", dump);
    Ok(0)
}
