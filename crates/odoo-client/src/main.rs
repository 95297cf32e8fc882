//! Odoo Client - command-line access to an Odoo server over XML-RPC
//!
//! Prints the server version, authenticates and runs model methods.

use clap::{Parser, Subcommand};
use colored::Colorize;
use odoo_client::{ClientConfig, Domain, Kwargs, OdooClient, Result, SearchOptions, Value};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "odoo.toml")]
    config: PathBuf,

    /// Server base URL
    #[arg(long)]
    url: Option<String>,

    /// Database name
    #[arg(short, long)]
    database: Option<String>,

    /// Login
    #[arg(short, long)]
    username: Option<String>,

    /// Password or API key
    #[arg(short, long)]
    password: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the server version, authenticate and list company partners
    Demo {
        /// Number of partners to list
        #[arg(short, long, default_value_t = 5)]
        limit: i64,
    },

    /// Show server version information
    Version,

    /// Search and read records
    SearchRead {
        /// Model name (e.g. res.partner)
        #[arg(short, long)]
        model: String,

        /// Domain as JSON (e.g. '[["is_company", "=", true]]')
        #[arg(long, default_value = "[]")]
        domain: String,

        /// Comma-separated field names (all fields if omitted)
        #[arg(short, long, value_delimiter = ',')]
        fields: Vec<String>,

        /// Maximum number of records
        #[arg(short, long)]
        limit: Option<i64>,
    },

    /// Call any model method
    Call {
        /// Model name (e.g. res.partner)
        #[arg(short, long)]
        model: String,

        /// Method name (e.g. search_count)
        #[arg(long)]
        method: String,

        /// Positional arguments as a JSON array
        #[arg(long, default_value = "[]")]
        args: String,

        /// Named arguments as a JSON object
        #[arg(long, default_value = "{}")]
        kwargs: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    // Load configuration (defaults if the file is absent; nothing is written)
    if args.config.exists() {
        info!("Loading configuration from {:?}", args.config);
    } else {
        info!(
            "Configuration file {:?} not found, using defaults and command-line settings",
            args.config
        );
    }
    let mut config = ClientConfig::load_or_default(&args.config)?;

    // Override connection settings if provided via CLI
    if let Some(url) = args.url {
        config.url = url;
    }
    if let Some(database) = args.database {
        config.database = database;
    }
    if let Some(username) = args.username {
        config.username = username;
    }
    if let Some(password) = args.password {
        config.password = password;
    }

    config.ensure_complete()?;

    info!("Server: {} (database {:?})", config.base_url(), config.database);

    let client = OdooClient::new(config)?;

    match args.command.unwrap_or(Command::Demo { limit: 5 }) {
        Command::Demo { limit } => run_demo(&client, limit).await,
        Command::Version => print_version(&client).await,
        Command::SearchRead {
            model,
            domain,
            fields,
            limit,
        } => {
            let domain = parse_json(&domain)?;
            let field_refs: Vec<&str> = fields.iter().map(String::as_str).collect();
            let fields = (!field_refs.is_empty()).then_some(field_refs.as_slice());

            let mut options = SearchOptions::new();
            if let Some(limit) = limit {
                options = options.limit(limit);
            }

            client.authenticate().await?;
            let records = client.search_read(&model, domain, fields, options).await?;

            for record in records {
                println!("{}", Value::Struct(record).to_json());
            }
            Ok(())
        }
        Command::Call {
            model,
            method,
            args,
            kwargs,
        } => {
            let args = parse_json(&args)?.into_array()?;
            let kwargs: Kwargs = parse_json(&kwargs)?.into_struct()?;

            client.authenticate().await?;
            let result = client.execute(&model, &method, args, kwargs).await?;

            println!("{}", serde_json::to_string_pretty(&result.to_json())?);
            Ok(())
        }
    }
}

/// Version, authentication and a short partner listing
async fn run_demo(client: &OdooClient, limit: i64) -> Result<()> {
    print_version(client).await?;

    let uid = client.authenticate().await?;
    println!("{} {}", "Authenticated as user ID:".bold(), uid);

    let partners = client
        .search_read(
            "res.partner",
            Domain::new().filter("is_company", "=", true),
            Some(&["name", "email", "phone"][..]),
            SearchOptions::new().limit(limit),
        )
        .await?;

    println!(
        "\n{}",
        format!("First {} company partners:", limit).bold().green()
    );
    for partner in partners {
        let name = partner.get("name").map(Value::to_string).unwrap_or_default();
        println!("  - {}", name);
    }

    Ok(())
}

async fn print_version(client: &OdooClient) -> Result<()> {
    let version = client.version().await?;

    println!(
        "{} {}",
        "Odoo Server Version:".bold(),
        version.server_version().unwrap_or("unknown").cyan()
    );
    if let Some(protocol) = version.protocol_version() {
        println!("{} {}", "Protocol Version:".bold(), protocol);
    }

    Ok(())
}

fn parse_json(text: &str) -> Result<Value> {
    let json: serde_json::Value = serde_json::from_str(text)?;
    Ok(Value::from(json))
}
