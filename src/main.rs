use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use dishboard::config::{ConfigOverrides, ServerConfig};
use dishboard::database::{establish_connection, get_database_url, seed_data, setup_database};
use dishboard::server::{self, MigrateDirection};
use dishboard::services::report_service::{ReportKind, ReportParams};
use dishboard::services::ReportService;

#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    #[clap(short, long, global = true)]
    log_level: Option<String>,
    /// YAML file with port, database, cors_origin and log_level
    #[clap(short, long, global = true)]
    config: Option<PathBuf>,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP/GraphQL server
    Serve {
        #[clap(short, long)]
        port: Option<u16>,
        #[clap(short, long)]
        database: Option<String>,
        #[clap(long)]
        cors_origin: Option<String>,
    },
    /// Database management
    Db {
        #[clap(subcommand)]
        command: DbCommands,
    },
    /// Run one report and print its rows as JSON
    Report {
        name: ReportKind,
        #[clap(long)]
        category: Option<String>,
        #[clap(long)]
        score: Option<f64>,
        #[clap(long)]
        restaurant: Option<String>,
        #[clap(long)]
        category_id: Option<i32>,
        #[clap(short, long)]
        database: Option<String>,
    },
}

#[derive(Subcommand)]
enum DbCommands {
    /// Create the schema
    Init {
        #[clap(short, long)]
        database: Option<String>,
    },
    /// Apply or roll back migrations
    Migrate {
        #[clap(subcommand)]
        direction: MigrateDirection,
        #[clap(short, long)]
        database: Option<String>,
    },
    /// Load a YAML fixture into an empty directory
    Seed {
        #[clap(short, long)]
        file: PathBuf,
        #[clap(short, long)]
        database: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    let overrides = ConfigOverrides {
        log_level: args.log_level.clone(),
        ..Default::default()
    };
    let base = ServerConfig::load(args.config.as_deref(), overrides)?;
    setup_logging(&base.log_level);

    match args.command {
        Commands::Serve {
            port,
            database,
            cors_origin,
        } => {
            let config = base.merge(ConfigOverrides {
                port,
                database,
                cors_origin,
                log_level: None,
            });
            info!("Starting server on port {}", config.port);
            server::start_server(config.port, &config.database, config.cors_origin.as_deref())
                .await?;
        }
        Commands::Db { command } => match command {
            DbCommands::Init { database } => {
                let database = database.unwrap_or(base.database);
                let db = establish_connection(&get_database_url(Some(&database))).await?;
                setup_database(&db).await?;
                info!("Database initialized at {}", database);
            }
            DbCommands::Migrate {
                direction,
                database,
            } => {
                let database = database.unwrap_or(base.database);
                server::migrate_database(&database, direction).await?;
            }
            DbCommands::Seed { file, database } => {
                let database = database.unwrap_or(base.database);
                let db = establish_connection(&get_database_url(Some(&database))).await?;
                setup_database(&db).await?;
                let summary = seed_data::load_seed_file(&db, &file).await?;
                info!("Seeded {}: {:?}", database, summary);
            }
        },
        Commands::Report {
            name,
            category,
            score,
            restaurant,
            category_id,
            database,
        } => {
            let database = database.unwrap_or(base.database);
            let db = establish_connection(&get_database_url(Some(&database))).await?;
            setup_database(&db).await?;

            let request = ReportParams {
                category,
                score,
                restaurant,
                category_id,
            }
            .into_request(name)?;

            let output = ReportService::new(db)
                .run(request)
                .await
                .with_context(|| format!("Report {} failed", name))?;
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

fn setup_logging(log_level: &Option<String>) {
    let log_level = match log_level
        .as_ref()
        .unwrap_or(&"info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!("sqlx=warn,{}", log_level)))
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}
