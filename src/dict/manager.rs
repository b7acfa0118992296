use crate::config::Config;
use crate::dict::corpus::KeywordStore;
use crate::dict::natural::Dictionary;
use anyhow::{Context, Result};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::Path;

// Pinned to a commit so the wordlist does not change underneath users.
const WORDLIST_BASE_URL: &str =
    "https://raw.githubusercontent.com/dwyl/english-words/6e4bc58ad764c3e6df8b5be4048671962c9d6a23";
const WORDLIST_VERSION: &str = "2023.12";

/// Record an absolute keyword dictionary location in the config file.
pub fn set_keyword_dictionary(config: &mut Config, location: &Path) -> Result<()> {
    config.set_keyword_dictionary(location)?;
    println!(
        "{} Keyword dictionary location set to {}",
        "✓".green().bold(),
        location.display().to_string().cyan()
    );
    Ok(())
}

/// Copy the current keyword dictionary to `target`.
pub fn export_keyword_dictionary(config: &Config, target: &Path) -> Result<()> {
    let source = config.keyword_dictionary_path();
    fs::copy(&source, target).with_context(|| {
        format!(
            "Failed to export {} to {}",
            source.display(),
            target.display()
        )
    })?;
    println!(
        "{} Keyword dictionary exported to {}",
        "✓".green().bold(),
        target.display().to_string().cyan()
    );
    Ok(())
}

pub fn show_info(config: &Config) -> Result<()> {
    let natural_path = config.natural_dictionary_path();
    let keyword_path = config.keyword_dictionary_path();

    println!("{}", "Dictionaries:".bold());
    println!("  Data directory: {}", config.data_dir().display());

    match Dictionary::load_from_path(&natural_path) {
        Ok(dict) => println!(
            "  Natural language: {} ({} words)",
            natural_path.display(),
            dict.len().to_string().yellow()
        ),
        Err(e) => println!("  Natural language: {}: {}", "error".red(), e),
    }

    match KeywordStore::load(&keyword_path) {
        Ok(store) => {
            println!(
                "  Keywords: {} ({} global)",
                keyword_path.display(),
                store.global().len().to_string().yellow()
            );
            for (key, list) in store.filetypes() {
                let label = if key.is_empty() {
                    "(no extension)".to_string()
                } else {
                    format!(".{}", key)
                };
                println!("    {:<16} {} words", label.cyan(), list.len());
            }
        }
        Err(e) => println!("  Keywords: {}: {}", "error".red(), e),
    }

    Ok(())
}

/// Replace the natural-language wordlist with the full English list.
pub fn download_wordlist(config: &Config) -> Result<()> {
    println!(
        "{} English wordlist (version: {})...",
        "Downloading".cyan().bold(),
        WORDLIST_VERSION.dimmed()
    );

    let wordlist_url = format!("{}/words_alpha.txt", WORDLIST_BASE_URL);
    println!("Source: {}", wordlist_url.dimmed());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    pb.set_message("Downloading...");

    let response =
        reqwest::blocking::get(&wordlist_url).context("Failed to download wordlist")?;

    if !response.status().is_success() {
        anyhow::bail!("Failed to download wordlist: HTTP {}", response.status());
    }

    let content = response.text()?;
    pb.finish_with_message("Download complete");

    let words = normalize_wordlist(&content);
    println!("Found {} words", words.len().to_string().yellow());

    let target = config.natural_dictionary_path();
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).context("Failed to create data directory")?;
    }
    fs::write(&target, words.join("\n") + "\n")
        .with_context(|| format!("Failed to write wordlist: {}", target.display()))?;

    println!(
        "{} Wordlist installed: {}",
        "✓".green().bold(),
        target.display().to_string().cyan()
    );

    Ok(())
}

/// Fold case, drop blank lines, sort and dedupe.
fn normalize_wordlist(content: &str) -> Vec<String> {
    let mut words: Vec<String> = content
        .lines()
        .map(|line| line.trim().to_lowercase())
        .filter(|line| !line.is_empty())
        .collect();
    words.sort();
    words.dedup();
    words
}
