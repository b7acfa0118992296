use crate::{FileReport, SpellError};
use colored::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonError {
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub word: String,
    pub unmatched: Vec<String>,
    pub context: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput {
    pub files_checked: usize,
    pub total_errors: usize,
    pub errors: Vec<JsonError>,
}

impl JsonError {
    fn new(file_path: &Path, error: &SpellError) -> Self {
        Self {
            file: file_path.display().to_string(),
            line: error.line,
            column: error.column,
            word: error.word.clone(),
            unmatched: error.unmatched.clone(),
            context: error.context.clone(),
        }
    }
}

/// Header line for an escalated token.
pub fn print_unmatched(file: &str, line: usize, token: &str, unmatched: &[String], colored: bool) {
    let subwords = unmatched.join(", ");
    if colored {
        println!(
            "{}:{}: Unmatched '{}' --> {{{}}}",
            file.bold(),
            line.to_string().blue(),
            token.red().bold(),
            subwords.yellow()
        );
    } else {
        println!("{}:{}: Unmatched '{}' --> {{{}}}", file, line, token, subwords);
    }
}

pub fn print_action_menu(colored: bool) {
    let menu = "   (i)gnore, (I)gnore all, (r)eplace, (R)eplace all, (a)dd to dictionary, or show (c)ontext? [i]";
    if colored {
        println!("{}", menu.cyan());
    } else {
        println!("{}", menu);
    }
}

pub fn print_add_menu(subword: &str, colored: bool) {
    let word = if colored {
        subword.yellow().bold().to_string()
    } else {
        subword.to_string()
    };
    println!("   Subtoken '{}':", word);
    println!(
        "      (i)gnore, add to (p)rogramming language dictionary, or add to (n)atural language"
    );
    println!("      dictionary? [i]");
}

pub fn print_context(context: &[(usize, String)], line_num: usize, colored: bool) {
    for (num, text) in context {
        if colored && *num == line_num {
            println!("{}: {}", format!("{:4}", num).blue().bold(), text.bold());
        } else {
            println!("{:4}: {}", num, text);
        }
    }
    println!();
}

pub fn print_not_replaced(colored: bool) {
    if colored {
        println!("      {}", "(Not replaced.)".dimmed());
    } else {
        println!("      (Not replaced.)");
    }
}

pub fn print_abort(colored: bool) {
    if colored {
        println!("{}", "User abort.".red().bold());
    } else {
        println!("User abort.");
    }
}

pub fn print_error(message: &str, colored: bool) {
    if colored {
        eprintln!("{} {}", "Error:".red().bold(), message);
    } else {
        eprintln!("Error: {}", message);
    }
}

pub fn print_read_error(path: &Path, err: &crate::Error, colored: bool) {
    let reason = match err {
        crate::Error::Io { source, .. } => source.to_string(),
        other => other.to_string(),
    };
    print_error(
        &format!(
            "can't read source file \"{}\"; skipping.  (Reason: {})",
            path.display(),
            reason
        ),
        colored,
    );
}

/// Print every file's failures as one JSON document.
pub fn print_json_reports(reports: &[(&Path, FileReport)]) {
    let errors: Vec<JsonError> = reports
        .iter()
        .flat_map(|(path, report)| report.errors.iter().map(move |e| JsonError::new(path, e)))
        .collect();
    let output = JsonOutput {
        files_checked: reports.len(),
        total_errors: errors.len(),
        errors,
    };
    print_json(&output);
}

fn print_json(output: &JsonOutput) {
    match serde_json::to_string_pretty(output) {
        Ok(json) => println!("{}", json),
        Err(e) => print_error(&format!("failed to serialize report: {}", e), false),
    }
}

/// Print the failures collected for one file in report-only mode.
pub fn print_report(file_path: &Path, report: &FileReport, colored_output: bool) {
    if report.errors.is_empty() {
        return;
    }

    let file_name = file_path.display().to_string();

    if colored_output {
        println!("\n{}", file_name.bold().underline());
    } else {
        println!("\n{}", file_name);
    }

    for error in &report.errors {
        let line_info = format!("{}:{}", error.line, error.column);
        let subwords = error.unmatched.join(", ");

        if colored_output {
            println!(
                "  {} {} {}",
                line_info.blue().bold(),
                error.word.red().bold(),
                format_context(&error.context, &error.word, colored_output)
            );
            println!("    {} {}", "→".dimmed(), subwords.yellow());
        } else {
            println!("  {} {} {}", line_info, error.word, &error.context);
            println!("    → {}", subwords);
        }
    }
}

fn format_context(context: &str, word: &str, colored: bool) -> String {
    if colored {
        context.replace(word, &word.red().bold().to_string())
    } else {
        context.to_string()
    }
}

pub fn print_report_summary(total_errors: usize, files: usize, colored: bool) {
    println!();
    if total_errors == 0 {
        if colored {
            println!("{}", "✓ No unmatched tokens found!".green().bold());
        } else {
            println!("✓ No unmatched tokens found!");
        }
    } else {
        let error_word = if total_errors == 1 { "token" } else { "tokens" };
        let file_word = if files == 1 { "file" } else { "files" };
        if colored {
            println!(
                "{} {} unmatched {} in {} {}",
                "✗".red().bold(),
                total_errors.to_string().red().bold(),
                error_word,
                files,
                file_word
            );
        } else {
            println!(
                "✗ {} unmatched {} in {} {}",
                total_errors, error_word, files, file_word
            );
        }
    }
}

pub fn print_session_summary(escalations: usize, rewritten: usize, files: usize, colored: bool) {
    let file_word = if files == 1 { "file" } else { "files" };
    let summary = format!(
        "{} {} checked, {} escalated, {} rewritten",
        files, file_word, escalations, rewritten
    );
    if colored {
        println!("{} {}", "✓".green().bold(), summary);
    } else {
        println!("✓ {}", summary);
    }
}
