use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about = "Contracts, sales figures and release dates from the shared publishing sheet", long_about = None)]
pub struct Cli {
    /// YAML configuration file (defaults are used when omitted)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    /// Read a saved sheet response instead of fetching it
    #[arg(short, long, global = true)]
    pub input: Option<PathBuf>,
    /// Override the sheet URL from the configuration
    #[arg(long, global = true)]
    pub url: Option<String>,
    /// Email of the signed-in user
    #[arg(long, global = true, env = "DASHBOARD_USER_EMAIL")]
    pub email: Option<String>,
    /// Display name of the signed-in user
    #[arg(long, global = true, env = "DASHBOARD_USER_NAME")]
    pub name: Option<String>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print contract tables grouped by year, each with its statistics
    Table(TableArgs),
    /// Print only the per-year statistics
    Stats(StatsArgs),
    /// Print the pre-order and release calendar for one year
    Calendar(CalendarArgs),
    /// Show the signed-in identity
    Whoami,
    /// Write per-year CSV tables plus statistics and calendar JSON
    Export(ExportArgs),
}

#[derive(Debug, Args)]
pub struct TableArgs {
    /// Only show this contract year
    #[arg(long)]
    pub year: Option<i32>,
    /// Header clicks of the form `YEAR:COLUMN`, replayed in order
    #[arg(long = "sort", value_parser = parse_sort_click, action = clap::ArgAction::Append)]
    pub sort: Vec<SortClick>,
    /// Colour the role columns using the style table
    #[arg(long)]
    pub color: bool,
}

#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Only show this contract year
    #[arg(long)]
    pub year: Option<i32>,
}

#[derive(Debug, Args)]
pub struct CalendarArgs {
    /// Year to show (defaults to this year, or the latest year with dates)
    #[arg(long)]
    pub year: Option<i32>,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Output directory, created when missing
    #[arg(short, long)]
    pub out: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortClick {
    pub year: i32,
    pub column: String,
}

fn parse_sort_click(value: &str) -> Result<SortClick, String> {
    let (year, column) = value
        .split_once(':')
        .ok_or_else(|| format!("expected YEAR:COLUMN, got '{value}'"))?;
    let year = year
        .trim()
        .parse::<i32>()
        .map_err(|_| format!("invalid year in '{value}'"))?;
    let column = column.trim();
    if column.is_empty() {
        return Err(format!("missing column in '{value}'"));
    }
    Ok(SortClick {
        year,
        column: column.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sort_clicks() {
        assert_eq!(
            parse_sort_click("2023:예상 가격"),
            Ok(SortClick {
                year: 2023,
                column: "예상 가격".to_string()
            })
        );
        assert!(parse_sort_click("예상 가격").is_err());
        assert!(parse_sort_click("next:가격").is_err());
        assert!(parse_sort_click("2023: ").is_err());
    }

    #[test]
    fn global_options_follow_subcommand() {
        let cli = Cli::try_parse_from([
            "publishing-dashboard",
            "table",
            "--input",
            "sheet.txt",
            "--sort",
            "2024:가격",
            "--sort",
            "2024:가격",
            "--email",
            "a@goldenrabbit.co.kr",
        ])
        .unwrap();
        assert_eq!(cli.input, Some(PathBuf::from("sheet.txt")));
        match cli.command {
            Commands::Table(args) => assert_eq!(args.sort.len(), 2),
            other => panic!("unexpected command {other:?}"),
        }
    }
}
