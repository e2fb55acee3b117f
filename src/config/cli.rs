use crate::core::selection::LanguageSelection;
use crate::domain::model::{Selection, SignupRequest};
use crate::utils::error::{Result, WaitlistError};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "cliro-waitlist")]
#[command(about = "Waitlist intake for the Cliro browser extension")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the backend API URL from config
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Validate a signup and hand it to the configured store
    Submit(SubmitArgs),
    /// Print the resolved public config (interest reasons and languages)
    Config,
    /// Check that the backend API is reachable
    Health,
}

#[derive(Debug, Clone, Args)]
pub struct SubmitArgs {
    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub name: Option<String>,

    /// Interest reason id (only the first one is kept)
    #[arg(long = "interest")]
    pub interests: Vec<String>,

    /// Language code, repeatable; repeats are ignored and beyond the limit the oldest is dropped
    #[arg(long = "language")]
    pub languages: Vec<String>,

    /// Read a raw signup request from a JSON file instead
    #[arg(long, conflicts_with_all = ["email", "name", "interests", "languages"])]
    pub json: Option<PathBuf>,
}

impl SubmitArgs {
    /// 將命令列參數轉成報名請求；語言會先經過 FIFO 上限處理
    pub fn to_request(&self, max_languages: usize) -> Result<SignupRequest> {
        if let Some(path) = &self.json {
            let content = std::fs::read_to_string(path)?;
            return serde_json::from_str(&content).map_err(WaitlistError::from);
        }

        let mut languages = LanguageSelection::new(max_languages);
        for code in &self.languages {
            // 命令列上重複的語言只算一次，不當成取消選取
            if languages.contains(code) {
                tracing::debug!("Ignoring repeated language '{}'", code);
                continue;
            }
            if let Some(evicted) = languages.toggle(code.as_str()) {
                tracing::info!("Language limit reached, dropped '{}'", evicted);
            }
        }

        Ok(SignupRequest {
            email: self.email.clone(),
            name: self.name.clone(),
            interest_reason: Selection::new(self.interests.iter().cloned()),
            preferred_languages: languages.to_selection(),
        })
    }
}
