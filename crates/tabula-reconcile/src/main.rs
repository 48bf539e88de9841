//! tabula CLI
//!
//! Parses `CREATE TABLE` dumps and reconciles a live database with them.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use sqlx::mysql::MySqlPoolOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use tabula_ddl::dialect::{DdlDialect, MySqlDialect, SqliteDialect};
use tabula_ddl::diff::DiffOptions;
use tabula_ddl::model::TableDefinition;
use tabula_ddl::parser::parse_document;
use tabula_reconcile::catalog::{MySqlCatalog, SchemaCatalog, SqliteCatalog};
use tabula_reconcile::input::read_sql_file;
use tabula_reconcile::{ReconcileError, ReconcileOptions, Reconciler};

/// DDL parsing and schema reconciliation.
#[derive(Parser)]
#[command(name = "tabula")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database URL (`sqlite:` path or `mysql://` connection string).
    #[arg(short, long, env = "DATABASE_URL", default_value = "sqlite:tabula.sqlite3")]
    database: String,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    /// Also treat length changes (e.g. `VARCHAR(50)` to `VARCHAR(100)`) as
    /// modifications.
    #[arg(long)]
    compare_length: bool,

    /// Table options appended to MySQL `CREATE TABLE` (empty to disable).
    #[arg(long)]
    mysql_table_options: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a SQL file and print the table definitions as JSON.
    Parse {
        /// SQL file.
        file: PathBuf,

        /// Pretty-print the JSON.
        #[arg(long)]
        pretty: bool,
    },

    /// Show the DDL that `apply` would run.
    Plan {
        /// SQL file.
        file: PathBuf,

        /// Only these tables (all if not specified).
        #[arg(short, long)]
        table: Vec<String>,
    },

    /// Create or alter tables to match the SQL file.
    Apply {
        /// SQL file.
        file: PathBuf,

        /// Only these tables (all if not specified).
        #[arg(short, long)]
        table: Vec<String>,

        /// Report without executing (dry run).
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the live columns of a table.
    Inspect {
        /// Table name.
        table: String,

        /// Schema (defaults to the connection's).
        #[arg(short, long)]
        schema: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Engine {
    MySql,
    Sqlite,
}

fn engine_for(url: &str) -> Result<Engine, ReconcileError> {
    if url.starts_with("mysql:") || url.starts_with("mariadb:") {
        Ok(Engine::MySql)
    } else if url.starts_with("sqlite:") {
        Ok(Engine::Sqlite)
    } else {
        Err(ReconcileError::UnsupportedDatabaseUrl(url.to_string()))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Parsing needs no database
    if let Commands::Parse { file, pretty } = &cli.command {
        return print_definitions(file, *pretty);
    }

    let diff = if cli.compare_length {
        DiffOptions::new().compare_lengths()
    } else {
        DiffOptions::new()
    };

    match engine_for(&cli.database)? {
        Engine::MySql => {
            let pool = MySqlPoolOptions::new()
                .max_connections(5)
                .connect(&cli.database)
                .await
                .context("Failed to connect to MySQL")?;
            let dialect = match cli.mysql_table_options {
                Some(options) => MySqlDialect::new().with_table_options(options),
                None => MySqlDialect::new(),
            };
            run(MySqlCatalog::new(pool), dialect, diff, cli.command).await
        }
        Engine::Sqlite => {
            let options = SqliteConnectOptions::from_str(&cli.database)?.create_if_missing(true);
            let pool = SqlitePoolOptions::new()
                .max_connections(5)
                .connect_with(options)
                .await
                .context("Failed to open SQLite database")?;
            run(SqliteCatalog::new(pool), SqliteDialect::new(), diff, cli.command).await
        }
    }
}

async fn run<C: SchemaCatalog, D: DdlDialect>(
    catalog: C,
    dialect: D,
    diff: DiffOptions,
    command: Commands,
) -> anyhow::Result<()> {
    info!(engine = catalog.engine(), dialect = dialect.name(), "Connected");
    let options = ReconcileOptions::new().diff(diff);

    match command {
        Commands::Parse { file, pretty } => print_definitions(&file, pretty)?,

        Commands::Plan { file, table } => {
            let tables = load_tables(&file, &table)?;
            let reconciler = Reconciler::new(catalog, dialect).with_options(options);

            let mut failures = 0;
            for definition in &tables {
                match reconciler.plan(definition).await {
                    Ok(plan) => {
                        println!("-- {}: {}", plan.table_name, plan.action);
                        for sql in &plan.statements {
                            println!("{sql};");
                        }
                        for column in &plan.drop_candidates {
                            println!("-- not in definition, kept: {}.{column}", plan.table_name);
                        }
                        println!();
                    }
                    Err(err) => {
                        failures += 1;
                        warn!(table = %definition.table_name, error = %err, "Cannot plan table");
                    }
                }
            }
            if failures > 0 {
                bail!("{failures} table(s) could not be planned");
            }
        }

        Commands::Apply {
            file,
            table,
            dry_run,
        } => {
            let tables = load_tables(&file, &table)?;
            if dry_run {
                info!("Dry run mode - statements will be reported but not executed.");
            }
            let mut reconciler =
                Reconciler::new(catalog, dialect).with_options(options.dry_run(dry_run));

            let batch = reconciler.reconcile_all(&tables).await;
            println!("{}", serde_json::to_string_pretty(&batch)?);
            if batch.failure_count > 0 {
                bail!(
                    "{} of {} table(s) failed to reconcile",
                    batch.failure_count,
                    batch.total_count
                );
            }
        }

        Commands::Inspect { table, schema } => {
            let reconciler = Reconciler::new(catalog, dialect);
            let columns = reconciler.inspect(schema.as_deref(), &table).await?;
            println!("{}", serde_json::to_string_pretty(&columns)?);
        }
    }

    Ok(())
}

fn print_definitions(file: &Path, pretty: bool) -> anyhow::Result<()> {
    let tables = load_tables(file, &[])?;
    let json = if pretty {
        serde_json::to_string_pretty(&tables)?
    } else {
        serde_json::to_string(&tables)?
    };
    println!("{json}");
    Ok(())
}

/// Reads and parses `file`, keeping only `only` when it is non-empty.
fn load_tables(file: &Path, only: &[String]) -> anyhow::Result<Vec<TableDefinition>> {
    let sql =
        read_sql_file(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let document = parse_document(&sql);
    info!(
        tables = document.tables.len(),
        diagnostics = document.diagnostics.len(),
        "Parsed SQL file"
    );

    for name in only {
        if document.table(name).is_none() {
            warn!(table = %name, "Requested table not found in file");
        }
    }

    let tables: Vec<TableDefinition> = document
        .tables
        .into_iter()
        .filter(|t| only.is_empty() || only.iter().any(|n| n.eq_ignore_ascii_case(&t.table_name)))
        .collect();

    if tables.is_empty() {
        bail!("No CREATE TABLE statements found in {}", file.display());
    }
    Ok(tables)
}
