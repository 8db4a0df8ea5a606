use anyhow::Result;
use clap::Parser;
use console::Term;
use std::io::{self, BufRead, IsTerminal};
use maps_scout::scrapers::{ScrapeConfig, SearchParams};

/// Search a map service and save businesses, reviews and photos as CSV
#[derive(Debug, Parser)]
#[command(name = "maps-scout", version)]
pub struct Cli {
    /// Location appended to the query, e.g. "fethiye" (prompted when omitted)
    #[arg(long)]
    pub location: Option<String>,

    /// Business type to search for, e.g. "berber" (prompted when omitted)
    #[arg(long)]
    pub query: Option<String>,

    /// Output directory (prompted when omitted, defaults to "output")
    #[arg(long)]
    pub output: Option<String>,

    /// Run Chrome without a visible window
    #[arg(long)]
    pub headless: bool,

    /// Unchanged result-feed readings before the feed counts as fully loaded
    #[arg(long, default_value_t = 5)]
    pub feed_idle_rounds: u32,

    /// Unchanged panel readings before a reviews/photos panel counts as loaded
    #[arg(long, default_value_t = 8)]
    pub panel_idle_rounds: u32,

    /// Stop any scroll loop after this many rounds (unbounded by default)
    #[arg(long)]
    pub max_scroll_rounds: Option<u32>,

    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn scrape_config(&self) -> ScrapeConfig {
        ScrapeConfig {
            headless: self.headless,
            feed_idle_rounds: self.feed_idle_rounds,
            panel_idle_rounds: self.panel_idle_rounds,
            max_scroll_rounds: self.max_scroll_rounds,
            ..ScrapeConfig::default()
        }
    }

    /// Fill in anything not given on the command line by asking on the terminal
    pub fn search_params(&self, term: &Term) -> Result<SearchParams> {
        let defaults = SearchParams::default();
        let ask = |given: &Option<String>, label: &str, default: Option<&str>| match given {
            Some(value) => Ok(value.trim().to_string()),
            None => prompt(term, label, default),
        };

        Ok(SearchParams {
            location: ask(&self.location, "Location (e.g., fethiye)", None)?,
            query: ask(&self.query, "Query (e.g., berber)", None)?,
            output_dir: ask(&self.output, "Output directory", Some(defaults.output_dir.as_str()))?,
        })
    }
}

fn prompt(term: &Term, label: &str, default: Option<&str>) -> Result<String> {
    term.write_str(&prompt_line(label, default))?;
    // Term::read_line gives back nothing when stdin is piped
    let answer = if term.is_term() && io::stdin().is_terminal() {
        term.read_line()?
    } else {
        read_answer(&mut io::stdin().lock())?
    };
    Ok(resolve_answer(&answer, default))
}

/// One line from a non-interactive reader; end of input reads as blank
fn read_answer<R: BufRead>(reader: &mut R) -> Result<String> {
    let mut line = String::new();
    reader.read_line(&mut line)?;
    Ok(line)
}

fn prompt_line(label: &str, default: Option<&str>) -> String {
    match default {
        Some(default) => format!("{} [{}]: ", label, default),
        None => format!("{}: ", label),
    }
}

/// Trimmed answer, or the default when the answer is blank
fn resolve_answer(answer: &str, default: Option<&str>) -> String {
    let answer = answer.trim();
    if answer.is_empty() {
        default.unwrap_or_default().to_string()
    } else {
        answer.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_answer_takes_default() {
        assert_eq!(resolve_answer("   ", Some("output")), "output");
        assert_eq!(resolve_answer("", None), "");
        assert_eq!(resolve_answer(" data \n", Some("output")), "data");
    }

    #[test]
    fn test_piped_answers_are_read_in_order() {
        let mut stdin = io::Cursor::new("fethiye\nberber\ndata_out\n");
        let location = resolve_answer(&read_answer(&mut stdin).unwrap(), None);
        let query = resolve_answer(&read_answer(&mut stdin).unwrap(), None);
        let output = resolve_answer(&read_answer(&mut stdin).unwrap(), Some("output"));
        assert_eq!(location, "fethiye");
        assert_eq!(query, "berber");
        assert_eq!(output, "data_out");
    }

    #[test]
    fn test_piped_input_exhausted_falls_back_to_default() {
        let mut stdin = io::Cursor::new("fethiye\r\n\n");
        assert_eq!(resolve_answer(&read_answer(&mut stdin).unwrap(), None), "fethiye");
        assert_eq!(resolve_answer(&read_answer(&mut stdin).unwrap(), Some("output")), "output");
        assert_eq!(resolve_answer(&read_answer(&mut stdin).unwrap(), Some("output")), "output");
    }

    #[test]
    fn test_prompt_line_shows_default() {
        assert_eq!(prompt_line("Output directory", Some("output")), "Output directory [output]: ");
        assert_eq!(prompt_line("Query (e.g., berber)", None), "Query (e.g., berber): ");
    }

    #[test]
    fn test_flags_map_onto_config() {
        let cli = Cli::parse_from([
            "maps-scout",
            "--location",
            "fethiye",
            "--headless",
            "--feed-idle-rounds",
            "3",
            "--max-scroll-rounds",
            "40",
        ]);
        let config = cli.scrape_config();
        assert!(config.headless);
        assert_eq!(config.feed_idle_rounds, 3);
        assert_eq!(config.panel_idle_rounds, 8);
        assert_eq!(config.max_scroll_rounds, Some(40));
        assert_eq!(cli.location.as_deref(), Some("fethiye"));
    }

    #[test]
    fn test_given_values_skip_prompts() {
        let cli = Cli::parse_from([
            "maps-scout",
            "--location",
            " fethiye ",
            "--query",
            "berber",
            "--output",
            "out",
        ]);
        let params = cli.search_params(&Term::stdout()).unwrap();
        assert_eq!(params.location, "fethiye");
        assert_eq!(params.search_text(), "berber fethiye");
        assert_eq!(params.output_dir, "out");
    }
}
