//! CLI argument parsing and search dispatch

use std::io;

use clap::Parser;

use findstar::Result;
use findstar::cache::CacheStore;
use findstar::config::Config;
use findstar::finder::{Finder, SearchRequest};
use findstar::github::GitHubClient;
use findstar::matcher::{MatchMode, Query};
use findstar::report;

/// Grep over your github starred repositories!
#[derive(Parser, Debug)]
#[command(name = "findstar")]
pub struct Cli {
    /// github username
    #[arg(short, long, value_name = "USERNAME")]
    username: String,

    /// refresh cache
    #[arg(short, long)]
    flush: bool,

    /// match greps case-sensitively
    #[arg(short = 's', long)]
    case_sensitive: bool,

    /// match greps using AND instead of OR
    #[arg(short = 'a', long = "and")]
    and: bool,

    /// strings to grep for
    greps: Vec<String>,
}

impl Cli {
    fn request(&self) -> SearchRequest {
        let mode = if self.and {
            MatchMode::All
        } else {
            MatchMode::Any
        };

        SearchRequest {
            username: self.username.clone(),
            query: Query::new(self.greps.clone(), mode, self.case_sensitive),
            flush: self.flush,
        }
    }

    /// Run the search and print the report.
    pub async fn execute(self) -> Result<()> {
        let config = Config::from_env()?;
        let request = self.request();

        let client = GitHubClient::new(&config.api_base, config.token.as_deref(), config.per_page)?;
        let mut finder = Finder::new(CacheStore::new(&config.cache_root), client);
        let outcome = finder.run(&request).await?;

        let use_color = console::colors_enabled();
        report::render(&mut io::stdout().lock(), &outcome, &request.query, use_color)?;
        eprintln!("{}", report::summary(&outcome));
        Ok(())
    }
}
