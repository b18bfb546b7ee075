//! Command-line front end for the org chart store.
//!
//! # Responsibility
//! - Map subcommands onto core services over one SQLite file.
//! - Print charts as indented text or JSON for external renderers.
//!
//! Errors go to stderr with a non-zero exit code.

use clap::{Args, Parser, Subcommand};
use orgchart_core::enrich::{build_search_sql, search_body, PeopleSearchRequest};
use orgchart_core::transfer::csv::{read_contact_csv, write_contact_csv};
use orgchart_core::{
    default_log_level, init_logging, open_db, ChartService, ContactService, HierarchyNode,
    LayoutConfig, OrgChart, OrganizationService, SqliteContactRepository,
    SqliteOrganizationRepository, SqliteProjectRepository,
};
use rusqlite::{Connection, TransactionBehavior};
use serde_json::json;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

type CliResult = Result<(), Box<dyn Error>>;

#[derive(Parser)]
#[command(name = "orgchart", version, about = "Industrial org chart store")]
struct Cli {
    /// SQLite database file
    #[arg(long, global = true, env = "ORGCHART_DB", default_value = "orgchart.db")]
    db: PathBuf,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, global = true, env = "ORGCHART_LOG_DIR")]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List organizations
    Orgs,
    /// Print the reporting chart of one organization
    Chart {
        org_id: Uuid,
        /// vertical or horizontal
        #[arg(long, default_value = "vertical")]
        orientation: String,
        /// Only contacts on this project, plus their managers
        #[arg(long)]
        project: Option<Uuid>,
        /// Print hierarchy and layout as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the JSON account brief of one organization
    Export { org_id: Uuid },
    /// Import contacts from a CSV file
    ImportCsv { org_id: Uuid, file: PathBuf },
    /// Write contacts of one organization as CSV to stdout
    ExportCsv { org_id: Uuid },
    /// Print the person search query body for the enrichment provider
    SearchQuery(SearchArgs),
}

#[derive(Args)]
struct SearchArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    last_name: Option<String>,
    #[arg(long)]
    company: Option<String>,
    #[arg(long)]
    company_domain: Option<String>,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    seniority: Option<String>,
    #[arg(long)]
    location: Option<String>,
    #[arg(long)]
    limit: Option<u32>,
}

impl From<SearchArgs> for PeopleSearchRequest {
    fn from(args: SearchArgs) -> Self {
        Self {
            name: args.name,
            first_name: args.first_name,
            last_name: args.last_name,
            company: args.company,
            company_domain: args.company_domain,
            title: args.title,
            seniority: args.seniority,
            location: args.location,
            limit: args.limit,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("warning: logging disabled: {err}");
        }
    }

    if let Err(err) = run(cli) {
        log::error!("event=cli_command module=cli status=error");
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> CliResult {
    match cli.command {
        Command::SearchQuery(args) => print_search_query(args.into()),
        command => run_with_db(&cli.db, command),
    }
}

fn run_with_db(db: &Path, command: Command) -> CliResult {
    let mut conn = open_db(db)?;
    match command {
        Command::Orgs => list_orgs(&conn),
        Command::Chart {
            org_id,
            orientation,
            project,
            json,
        } => {
            let config = LayoutConfig::from_orientation_str(&orientation)?;
            let chart = chart_service(&conn).org_layout(org_id, project, &config)?;
            if json {
                print_chart_json(&chart)
            } else {
                print_chart_text(&chart);
                Ok(())
            }
        }
        Command::Export { org_id } => {
            let brief = chart_service(&conn).account_brief(org_id)?;
            println!("{}", brief.to_json_pretty()?);
            Ok(())
        }
        Command::ImportCsv { org_id, file } => import_csv(&mut conn, org_id, file),
        Command::ExportCsv { org_id } => {
            let contacts = ContactService::new(
                SqliteContactRepository::new(&conn),
                SqliteOrganizationRepository::new(&conn),
            )
            .list_contacts(org_id)?;
            let stdout = io::stdout();
            write_contact_csv(stdout.lock(), &contacts)?;
            Ok(())
        }
        Command::SearchQuery(args) => print_search_query(args.into()),
    }
}

type SqliteChartService<'conn> = ChartService<
    SqliteOrganizationRepository<'conn>,
    SqliteContactRepository<'conn>,
    SqliteProjectRepository<'conn>,
>;

fn chart_service(conn: &Connection) -> SqliteChartService<'_> {
    ChartService::new(
        SqliteOrganizationRepository::new(conn),
        SqliteContactRepository::new(conn),
        SqliteProjectRepository::new(conn),
    )
}

fn list_orgs(conn: &Connection) -> CliResult {
    let organizations =
        OrganizationService::new(SqliteOrganizationRepository::new(conn)).list_organizations()?;
    if organizations.is_empty() {
        println!("(no organizations)");
        return Ok(());
    }
    for organization in organizations {
        println!(
            "{}  {}  [{}]",
            organization.id, organization.name, organization.industry
        );
    }
    Ok(())
}

fn print_chart_text(chart: &OrgChart) {
    if chart.forest.is_empty() {
        println!("(no contacts)");
        return;
    }
    for root in chart.forest.to_tree() {
        print_subtree(chart, &root, 0);
    }
    for detachment in chart.forest.detached() {
        println!("! {} placed at root: {:?}", detachment.contact_id, detachment.reason);
    }
}

fn print_subtree(chart: &OrgChart, node: &HierarchyNode, depth: usize) {
    let title = node.contact.title.as_deref().unwrap_or("-");
    let at = chart
        .layout
        .position_of(node.contact.id)
        .map(|point| format!("({:.0}, {:.0})", point.x, point.y))
        .unwrap_or_default();
    println!(
        "{:indent$}{} | {} | L{} {}",
        "",
        node.full_name,
        title,
        node.contact.level,
        at,
        indent = depth * 2
    );
    for child in &node.subordinates {
        print_subtree(chart, child, depth + 1);
    }
}

fn print_chart_json(chart: &OrgChart) -> CliResult {
    let document = json!({
        "hierarchy": chart.forest.to_tree(),
        "layout": chart.layout,
    });
    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}

fn import_csv(conn: &mut Connection, org_id: Uuid, file: PathBuf) -> CliResult {
    let rows = read_contact_csv(BufReader::new(File::open(&file)?))?;

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let report = ContactService::new(
        SqliteContactRepository::new(&tx),
        SqliteOrganizationRepository::new(&tx),
    )
    .import_rows(org_id, rows)?;
    tx.commit()?;

    println!("imported {} contact(s)", report.created.len());
    let mut stderr = io::stderr().lock();
    for failure in &report.errors {
        writeln!(stderr, "row {}: {}", failure.row, failure.error)?;
    }
    Ok(())
}

fn print_search_query(request: PeopleSearchRequest) -> CliResult {
    log::debug!(
        "event=search_query module=cli status=ok sql_len={}",
        build_search_sql(&request).len()
    );
    println!("{}", serde_json::to_string_pretty(&search_body(&request))?);
    Ok(())
}
