use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use scspell::cli::output::{self, OutputFormat};
use scspell::cli::prompt::ConsoleOperator;
use scspell::{dict, Config, Corpora, SpellChecker};
use std::io;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "scspell")]
#[command(version, about = "An interactive, conservative spell checker for source code", long_about = None)]
struct Cli {
    /// Source files to check
    #[arg(value_name = "FILES")]
    files: Vec<PathBuf>,

    /// List unmatched tokens without prompting or modifying files
    #[arg(long)]
    report_only: bool,

    /// Output format for --report-only (text, json)
    #[arg(short = 'o', long, default_value = "text")]
    format: OutputFormat,

    /// Descend into directory arguments (honours .gitignore)
    #[arg(short, long)]
    recursive: bool,

    /// Directory holding the configuration and dictionaries
    #[arg(long, env = "SCSPELL_DATA_DIR", value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Generate shell completion script
    #[arg(long, value_name = "SHELL")]
    completion: Option<Shell>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Parser, Debug)]
enum Commands {
    /// Dictionary management
    Dict {
        #[command(subcommand)]
        action: DictCommands,
    },
}

#[derive(Parser, Debug)]
enum DictCommands {
    /// Show dictionary locations and word counts
    Info,
    /// Use a different keyword dictionary file (absolute path)
    SetKeywords {
        path: PathBuf,
    },
    /// Copy the current keyword dictionary to a file
    ExportKeywords {
        path: PathBuf,
    },
    /// Download the full English wordlist
    Download,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if let Some(shell) = cli.completion {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "scspell", &mut io::stdout());
        return Ok(());
    }

    let data_dir = match cli.data_dir.clone() {
        Some(dir) => dir,
        None => Config::default_data_dir().context("Failed to get data directory")?,
    };
    let mut config = Config::load(&data_dir)?;

    if let Some(command) = cli.command {
        return handle_command(command, &mut config);
    }

    if cli.files.is_empty() {
        anyhow::bail!("No files specified. Use --help for usage information.");
    }

    config.ensure_data_dir()?;
    let corpora = Corpora::open(
        &config.natural_dictionary_path(),
        &config.keyword_dictionary_path(),
    )?;

    let colored = !cli.no_color;
    if !colored {
        colored::control::set_override(false);
    }
    let mut checker = SpellChecker::new(&config, corpora).with_colors(colored);
    let files = collect_files(&cli.files, cli.recursive, colored);

    if cli.report_only {
        run_report(&checker, &files, &cli.format, colored);
    } else {
        run_interactive(&mut checker, &files, colored)?;
    }

    Ok(())
}

fn run_interactive(checker: &mut SpellChecker, files: &[PathBuf], colored: bool) -> Result<()> {
    let mut operator = ConsoleOperator::new();
    let mut escalations = 0;
    let mut rewritten = 0;

    for path in files {
        match checker.check_file(path, &mut operator) {
            Ok(report) => {
                escalations += report.escalations;
                rewritten += usize::from(report.rewritten);
            }
            Err(e) if e.is_abort() => {
                output::print_abort(colored);
                std::process::exit(1);
            }
            Err(e) => return Err(e.into()),
        }
    }

    output::print_session_summary(escalations, rewritten, files.len(), colored);
    Ok(())
}

fn run_report(checker: &SpellChecker, files: &[PathBuf], format: &OutputFormat, colored: bool) {
    let reports: Vec<(&Path, _)> = files
        .iter()
        .map(|path| (path.as_path(), checker.report_file(path)))
        .collect();
    let total: usize = reports.iter().map(|(_, r)| r.errors.len()).sum();

    match format {
        OutputFormat::Text => {
            for (path, report) in &reports {
                output::print_report(path, report, colored);
            }
            output::print_report_summary(total, files.len(), colored);
        }
        OutputFormat::Json => output::print_json_reports(&reports),
    }

    if total > 0 {
        std::process::exit(1);
    }
}

/// Expand the command-line paths into the ordered list of files to check.
fn collect_files(paths: &[PathBuf], recursive: bool, colored: bool) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }
        if !recursive {
            output::print_error(
                &format!("{} is a directory; use --recursive", path.display()),
                colored,
            );
            continue;
        }

        let walker = ignore::WalkBuilder::new(path)
            .sort_by_file_path(|a, b| a.cmp(b))
            .build();
        for entry in walker {
            match entry {
                Ok(entry) if entry.file_type().is_some_and(|t| t.is_file()) => {
                    files.push(entry.into_path());
                }
                Ok(_) => {}
                Err(e) => log::warn!("{}", e),
            }
        }
    }

    files
}

fn handle_command(command: Commands, config: &mut Config) -> Result<()> {
    match command {
        Commands::Dict { action } => match action {
            DictCommands::Info => {
                config.ensure_data_dir()?;
                dict::manager::show_info(config)?;
            }
            DictCommands::SetKeywords { path } => {
                dict::manager::set_keyword_dictionary(config, &path)?;
            }
            DictCommands::ExportKeywords { path } => {
                config.ensure_data_dir()?;
                dict::manager::export_keyword_dictionary(config, &path)?;
            }
            DictCommands::Download => {
                dict::manager::download_wordlist(config)?;
            }
        },
    }
    Ok(())
}
