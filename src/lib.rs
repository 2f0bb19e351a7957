pub mod access;
pub mod calendar;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod dates;
pub mod error;
pub mod loader;
pub mod output;
pub mod projector;
pub mod reports;
pub mod types;
pub mod util;

use std::{env, fs, sync::OnceLock, time::Duration};

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use log::{debug, info, LevelFilter};

use crate::access::{AccessDecision, Session};
use crate::calendar::MonthGrid;
use crate::cli::{CalendarArgs, Cli, Commands, ExportArgs, StatsArgs, TableArgs};
use crate::config::DashboardConfig;
use crate::dashboard::Dashboard;
use crate::loader::LoadReport;
use crate::types::{SheetSnapshot, YearGroup, YearStatistics};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("publishing_dashboard", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let config = DashboardConfig::load(cli.config.as_deref()).context("Loading configuration")?;

    let session = cli.email.as_ref().map(|email| Session {
        name: cli.name.clone(),
        email: email.clone(),
    });
    let decision = access::evaluate(session, &config.allowed_email_suffix);
    if let Commands::Whoami = cli.command {
        print!("{}", render_identity(&decision));
        return Ok(());
    }
    match &decision {
        AccessDecision::SignInRequired => {
            bail!("Sign-in required: pass --email or set DASHBOARD_USER_EMAIL")
        }
        AccessDecision::Restricted(session) => bail!(
            "Access restricted: {} is not a {} account",
            session.email,
            config.allowed_email_suffix
        ),
        AccessDecision::Granted(session) => debug!("Access granted to {}", session.email),
    }

    let (snapshot, report) = load_snapshot(&cli, &config)?;
    info!(
        "Loaded {} row(s) with {} column(s); {} short row(s) padded",
        util::format_int(report.total_rows as u64),
        report.column_count,
        report.padded_rows
    );
    let today = Local::now().date_naive();
    let mut dashboard = Dashboard::new(config, snapshot, today);

    match cli.command {
        Commands::Table(args) => handle_table(&mut dashboard, &args),
        Commands::Stats(args) => handle_stats(&dashboard, &args),
        Commands::Calendar(args) => handle_calendar(&mut dashboard, &args, today),
        Commands::Export(args) => handle_export(&dashboard, &args),
        Commands::Whoami => Ok(()),
    }
}

fn load_snapshot(cli: &Cli, config: &DashboardConfig) -> Result<(SheetSnapshot, LoadReport)> {
    if let Some(path) = &cli.input {
        return loader::load_from_path(path)
            .with_context(|| format!("Loading sheet response from {:?}", path));
    }
    let url = cli.url.as_deref().unwrap_or(&config.sheet_url);
    loader::load_from_url(url, Duration::from_secs(config.request_timeout_secs))
        .context("Fetching the sheet")
}

fn render_identity(decision: &AccessDecision) -> String {
    match decision {
        AccessDecision::SignInRequired => "로그인이 필요합니다.\n".to_string(),
        AccessDecision::Restricted(session) | AccessDecision::Granted(session) => {
            let mut out = String::from("내 정보\n");
            if let Some(name) = &session.name {
                out.push_str(&format!("{}\n", name));
            }
            out.push_str(&format!("{}\n", session.email));
            if !decision.is_granted() {
                out.push_str("(접근 권한이 없는 계정입니다)\n");
            }
            out
        }
    }
}

fn select_groups(groups: Vec<YearGroup<'_>>, year: Option<i32>) -> Result<Vec<YearGroup<'_>>> {
    let Some(year) = year else {
        return Ok(groups);
    };
    let selected: Vec<YearGroup<'_>> = groups.into_iter().filter(|g| g.year == year).collect();
    if selected.is_empty() {
        bail!("No contracts found for {}", year);
    }
    Ok(selected)
}

fn handle_table(dashboard: &mut Dashboard, args: &TableArgs) -> Result<()> {
    for click in &args.sort {
        dashboard.click_header(click.year, &click.column);
    }
    let dashboard = &*dashboard;
    let columns = dashboard.visible_columns();
    let stat_columns = dashboard.stat_columns();
    let styles = args.color.then_some(&dashboard.config().styles);
    let groups = select_groups(dashboard.year_groups(), args.year)?;
    if groups.is_empty() {
        println!("(no rows)");
    }
    for group in &groups {
        let rows = dashboard.sorted_rows(group);
        print!(
            "{}",
            output::render_year_table(
                group.year,
                &rows,
                &columns,
                dashboard.sort_key(group.year),
                styles
            )
        );
        println!(
            "{}",
            output::render_statistics(
                group.year,
                &reports::compute_statistics(&group.rows, &stat_columns),
                &stat_columns
            )
        );
    }
    Ok(())
}

fn handle_stats(dashboard: &Dashboard, args: &StatsArgs) -> Result<()> {
    let stat_columns = dashboard.stat_columns();
    let groups = select_groups(dashboard.year_groups(), args.year)?;
    for group in &groups {
        println!(
            "{}",
            output::render_statistics(group.year, &dashboard.statistics(group), &stat_columns)
        );
    }
    Ok(())
}

fn handle_calendar(dashboard: &mut Dashboard, args: &CalendarArgs, today: NaiveDate) -> Result<()> {
    if let Some(year) = args.year {
        if !dashboard.select_year(year) {
            bail!("No pre-order or release dates in {}", year);
        }
    }
    let Some(year) = dashboard.selected_year() else {
        println!("No pre-order or release dates found.");
        return Ok(());
    };
    let years = dashboard.calendar().years();
    if years.len() > 1 {
        let listed: Vec<String> = years.iter().map(|y| format!("{}년", y)).collect();
        println!("연도: {}\n", listed.join(" · "));
    }
    for month in 1..=12 {
        if let Some(grid) = MonthGrid::new(year, month) {
            println!("{}", output::render_month(&grid, dashboard.calendar(), today));
        }
    }
    Ok(())
}

fn handle_export(dashboard: &Dashboard, args: &ExportArgs) -> Result<()> {
    fs::create_dir_all(&args.out)
        .with_context(|| format!("Creating output directory {:?}", args.out))?;
    let columns = dashboard.visible_columns();
    let headers: Vec<&str> = std::iter::once(output::ROW_KEY_HEADER)
        .chain(columns.iter().copied())
        .collect();
    let stat_columns = dashboard.stat_columns();
    let mut statistics = Vec::new();
    for group in dashboard.year_groups() {
        let rows = dashboard.sorted_rows(&group);
        let path = args.out.join(format!("contracts_{}.csv", group.year));
        let cells = output::keyed_table_cells(
            &rows,
            &columns,
            &dashboard.config().title_column,
            group.year,
        );
        output::write_table_csv(&path, &headers, &cells)?;
        debug!("Wrote {} row(s) to {:?}", rows.len(), path);
        statistics.push(YearStatistics {
            year: group.year,
            sales_column: stat_columns.sales.clone(),
            price_column: stat_columns.price.clone(),
            count_column: stat_columns.count.clone(),
            statistics: reports::compute_statistics(&group.rows, &stat_columns),
        });
    }
    output::write_json(&args.out.join("statistics.json"), &statistics)?;
    output::write_json(&args.out.join("calendar.json"), &dashboard.calendar().export())?;
    info!(
        "Exported {} year table(s) with statistics and calendar to {:?}",
        statistics.len(),
        args.out
    );
    Ok(())
}
