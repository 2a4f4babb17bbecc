use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use repopulse_api::GitHubClient;
use repopulse_core::{
    parse_creation_date, Config, ExportFormat, Exporter, GitHubProvider, ScoringPipeline,
    SearchQuery,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "repopulse")]
#[command(version, about = "Score GitHub repositories by stars, forks and update recency", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Search repositories and score their popularity
    Search(SearchArgs),
    /// Show the config file location and effective settings
    Config {
        /// Write a default config file if none exists
        #[arg(long)]
        init: bool,
    },
}

#[derive(clap::Args)]
struct SearchArgs {
    /// Only repositories created on or after this date (YYYY-MM-DD)
    #[arg(long)]
    since: Option<String>,

    /// Primary language filter, e.g. rust
    #[arg(short, long)]
    language: Option<String>,

    /// Pages to fetch (clamped to 1-30, further capped at 10 without a token)
    #[arg(long, allow_negative_numbers = true)]
    max_pages: Option<i64>,

    /// Results per page (clamped to 1-100)
    #[arg(long, allow_negative_numbers = true)]
    page_size: Option<i64>,

    /// GitHub access token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// GitHub API base URL
    #[arg(long)]
    api_url: Option<String>,

    /// Output format (defaults to table, or the --output file extension)
    #[arg(short, long, value_enum)]
    format: Option<FormatArg>,

    /// Write results to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum FormatArg {
    Table,
    Json,
    Csv,
    Markdown,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Table => ExportFormat::Table,
            FormatArg::Json => ExportFormat::Json,
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Markdown => ExportFormat::Markdown,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so results on stdout stay pipeable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "repopulse=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Search(args)) => {
            let config = Config::load().context("Failed to load config")?;
            search(args, config).await?;
        }
        Some(Commands::Config { init }) => {
            show_config(init)?;
        }
        None => {
            println!("No command specified. Try --help");
        }
    }

    Ok(())
}

async fn search(args: SearchArgs, config: Config) -> anyhow::Result<()> {
    let since = args
        .since
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(parse_creation_date)
        .transpose()?;

    let query = SearchQuery::new(
        since,
        args.language,
        args.max_pages
            .unwrap_or_else(|| i64::from(config.search.max_pages)),
        args.page_size
            .unwrap_or_else(|| i64::from(config.search.page_size)),
    );

    let token = resolve_token(args.token, config.github.token);
    let api_url = args.api_url.unwrap_or(config.github.api_url);

    let client = GitHubClient::with_base_url(token, api_url)
        .context("Failed to build HTTP client")?;
    let provider = GitHubProvider::new(client);
    let authenticated = provider.is_authenticated();

    tracing::info!(
        "Searching (language: {}, since: {}, max pages: {}, page size: {}, authenticated: {})",
        query.language().unwrap_or("any"),
        query
            .earliest_creation_date()
            .map(|d| d.to_string())
            .unwrap_or_else(|| "any".to_string()),
        query.max_pages(),
        query.page_size(),
        authenticated
    );

    let pipeline = ScoringPipeline::new(Box::new(provider), authenticated);

    let scored = match pipeline.run(&query).await {
        Ok(scored) => scored,
        Err(e) => {
            if let Some(upstream) = e.as_github() {
                let report = serde_json::json!({
                    "status": upstream.status_code(),
                    "error": upstream.kind(),
                    "message": upstream.to_string(),
                });
                eprintln!("{}", report);
            }
            return Err(e).context("Search failed");
        }
    };

    match (args.output, args.format) {
        (Some(path), Some(format)) => {
            Exporter::export_to_file_with_format(&scored, &path, format.into())?;
            tracing::info!("Wrote {} repositories to {}", scored.len(), path.display());
        }
        (Some(path), None) => {
            Exporter::export_to_file(&scored, &path)?;
            tracing::info!("Wrote {} repositories to {}", scored.len(), path.display());
        }
        (None, format) => {
            let format = format.map(ExportFormat::from).unwrap_or_default();
            print!("{}", Exporter::render(&scored, format)?);
        }
    }

    Ok(())
}

/// The flag or env token wins over the config file, unless it is blank
fn resolve_token(flag: Option<String>, configured: Option<String>) -> Option<String> {
    let non_blank = |t: &String| !t.trim().is_empty();
    flag.filter(non_blank).or(configured.filter(non_blank))
}

fn show_config(init: bool) -> anyhow::Result<()> {
    let path = Config::config_path()?;

    if init && !path.exists() {
        Config::default().save_to(&path)?;
        println!("Wrote default config to {}", path.display());
    }

    let config = Config::load_from(&path)?;
    println!("# {}", path.display());
    print!(
        "{}",
        toml::to_string_pretty(&config.redacted()).context("Failed to render config")?
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_search_args() {
        let cli = Cli::try_parse_from([
            "repopulse",
            "search",
            "--since",
            "2024-01-01",
            "--language",
            "rust",
            "--max-pages",
            "-3",
            "--page-size",
            "50",
            "--format",
            "json",
        ])
        .unwrap();

        let Some(Commands::Search(args)) = cli.command else {
            panic!("expected search command");
        };
        assert_eq!(args.since.as_deref(), Some("2024-01-01"));
        assert_eq!(args.language.as_deref(), Some("rust"));
        assert_eq!(args.max_pages, Some(-3));
        assert_eq!(args.page_size, Some(50));
        assert_eq!(args.format, Some(FormatArg::Json));
    }

    #[test]
    fn test_blank_token_flag_falls_back_to_config() {
        let configured = Some("ghp_from_config".to_string());

        assert_eq!(
            resolve_token(Some("   ".to_string()), configured.clone()).as_deref(),
            Some("ghp_from_config")
        );
        assert_eq!(
            resolve_token(Some(String::new()), configured.clone()).as_deref(),
            Some("ghp_from_config")
        );
        assert_eq!(
            resolve_token(Some("ghp_flag".to_string()), configured).as_deref(),
            Some("ghp_flag")
        );
        assert_eq!(resolve_token(None, Some(" ".to_string())), None);
        assert_eq!(resolve_token(None, None), None);
    }

    #[test]
    fn test_format_arg_maps_to_export_format() {
        assert_eq!(ExportFormat::from(FormatArg::Markdown), ExportFormat::Markdown);
        assert_eq!(ExportFormat::from(FormatArg::Table), ExportFormat::Table);
    }
}
