use crate::{models::ScoredRepository, Error, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Aligned plain-text columns for the terminal
    #[default]
    Table,
    Json,
    Csv,
    Markdown,
}

impl ExportFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(ExportFormat::Json),
            "csv" => Some(ExportFormat::Csv),
            "md" | "markdown" => Some(ExportFormat::Markdown),
            "txt" => Some(ExportFormat::Table),
            _ => None,
        }
    }
}

/// Renders scored repositories
pub struct Exporter;

impl Exporter {
    /// Render in the given format
    pub fn render(repos: &[ScoredRepository], format: ExportFormat) -> Result<String> {
        match format {
            ExportFormat::Table => Ok(Self::to_table(repos)),
            ExportFormat::Json => Self::to_json(repos),
            ExportFormat::Csv => Ok(Self::to_csv(repos)),
            ExportFormat::Markdown => Ok(Self::to_markdown(repos)),
        }
    }

    /// Export to a file, picking the format from its extension
    pub fn export_to_file<P: AsRef<Path>>(repos: &[ScoredRepository], path: P) -> Result<()> {
        let path = path.as_ref();

        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(ExportFormat::from_extension)
            .ok_or_else(|| {
                Error::ConfigError(
                    "Could not determine export format from extension. Use .json, .csv, .md or .txt"
                        .to_string(),
                )
            })?;

        Self::export_to_file_with_format(repos, path, format)
    }

    pub fn export_to_file_with_format<P: AsRef<Path>>(
        repos: &[ScoredRepository],
        path: P,
        format: ExportFormat,
    ) -> Result<()> {
        let content = Self::render(repos, format)?;

        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;

        Ok(())
    }

    pub fn to_json(repos: &[ScoredRepository]) -> Result<String> {
        Ok(serde_json::to_string_pretty(repos)?)
    }

    pub fn to_csv(repos: &[ScoredRepository]) -> String {
        let mut output = String::new();

        output.push_str("Id,Name,Stars,Forks,Language,Created At,Pushed At,Popularity Score,URL\n");

        for scored in repos {
            let repo = &scored.repository;
            output.push_str(&format!(
                "{},{},{},{},{},{},{},{:.2},{}\n",
                repo.id,
                Self::escape_csv(&repo.name),
                repo.stars,
                repo.forks,
                Self::escape_csv(repo.language.as_deref().unwrap_or("")),
                repo.created_at.format("%Y-%m-%d"),
                repo.pushed_at.format("%Y-%m-%d"),
                scored.popularity_score,
                repo.url,
            ));
        }

        output
    }

    pub fn to_markdown(repos: &[ScoredRepository]) -> String {
        let mut output = String::new();

        output.push_str("# Repository Popularity\n\n");
        output.push_str(&format!("Total repositories: {}\n\n", repos.len()));

        if repos.is_empty() {
            return output;
        }

        output.push_str("| Repository | Score | ⭐ Stars | 🍴 Forks | Language | 📌 Pushed |\n");
        output.push_str("|------------|-------|---------|---------|----------|-----------|\n");

        for scored in repos {
            let repo = &scored.repository;
            output.push_str(&format!(
                "| [{}]({}) | {:.2} | {} | {} | {} | {} |\n",
                repo.name,
                repo.url,
                scored.popularity_score,
                Self::format_number(repo.stars),
                Self::format_number(repo.forks),
                repo.language.as_deref().unwrap_or("-"),
                repo.pushed_at.format("%Y-%m-%d"),
            ));
        }

        // Summary statistics
        let total_stars: u64 = repos.iter().map(|r| u64::from(r.repository.stars)).sum();
        let total_forks: u64 = repos.iter().map(|r| u64::from(r.repository.forks)).sum();
        let avg_score: f64 =
            repos.iter().map(|r| r.popularity_score).sum::<f64>() / repos.len() as f64;

        output.push_str("\n## Summary\n\n");
        output.push_str(&format!("- Total Stars: {}\n", total_stars));
        output.push_str(&format!("- Total Forks: {}\n", total_forks));
        output.push_str(&format!("- Average Popularity Score: {:.2}/5\n", avg_score));

        output
    }

    pub fn to_table(repos: &[ScoredRepository]) -> String {
        if repos.is_empty() {
            return "No repositories found.\n".to_string();
        }

        let name_width = repos
            .iter()
            .map(|r| r.repository.name.chars().count())
            .max()
            .unwrap_or(0)
            .max("REPOSITORY".len());

        let mut output = format!(
            "{:<width$}  {:>5}  {:>8}  {:>7}  {:<12}  {}\n",
            "REPOSITORY",
            "SCORE",
            "STARS",
            "FORKS",
            "LANGUAGE",
            "PUSHED",
            width = name_width
        );

        for scored in repos {
            let repo = &scored.repository;
            output.push_str(&format!(
                "{:<width$}  {:>5.2}  {:>8}  {:>7}  {:<12}  {}\n",
                repo.name,
                scored.popularity_score,
                Self::format_number(repo.stars),
                Self::format_number(repo.forks),
                repo.language.as_deref().unwrap_or("-"),
                repo.pushed_at.format("%Y-%m-%d"),
                width = name_width
            ));
        }

        output
    }

    /// Escape CSV special characters
    fn escape_csv(s: &str) -> String {
        if s.contains(',') || s.contains('"') || s.contains('\n') {
            format!("\"{}\"", s.replace('"', "\"\""))
        } else {
            s.to_string()
        }
    }

    /// Format numbers with K/M suffixes
    fn format_number(num: u32) -> String {
        if num >= 1_000_000 {
            format!("{:.1}M", num as f64 / 1_000_000.0)
        } else if num >= 1_000 {
            format!("{:.1}k", num as f64 / 1_000.0)
        } else {
            num.to_string()
        }
    }
}
