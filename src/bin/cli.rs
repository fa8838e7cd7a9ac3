//! Daybook CLI
//!
//! Command-line client for a running Daybook API:
//! - Log metric values
//! - Show daily series
//! - Page through foods, tags and entries

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "daybook")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Daily health tracking from the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL
    #[arg(long, default_value = "http://localhost:8086", global = true)]
    pub api_url: String,

    /// Caller identity sent as x-user-id
    #[arg(short, long, default_value = "default-user", global = true)]
    pub user: String,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log a metric value
    Log {
        /// Metric name (water, exercise, calories, weight)
        metric: String,
        /// Value in the metric's unit
        value: f64,
        /// Day the value belongs to (yyyy-MM-dd, default: today)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Show a metric's daily series
    Range {
        /// Metric name
        metric: String,
        /// First day (yyyy-MM-dd)
        #[arg(long)]
        from: Option<String>,
        /// Last day (yyyy-MM-dd, default: today)
        #[arg(long)]
        to: Option<String>,
    },

    /// List foods, newest first
    Foods {
        #[command(flatten)]
        page: PageArgs,
    },

    /// List tags
    Tags {
        #[command(flatten)]
        page: PageArgs,
    },

    /// List logged entries, newest first
    Entries {
        #[command(flatten)]
        page: PageArgs,
    },

    /// Check API status
    Status,

    /// Generate default configuration
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(clap::Args)]
pub struct PageArgs {
    /// Page size
    #[arg(short, long)]
    limit: Option<i64>,
    /// Cursor from a previous page
    #[arg(short, long)]
    cursor: Option<String>,
    /// Follow cursors until the last page
    #[arg(long)]
    all: bool,
}

struct Client {
    http: reqwest::Client,
    base: String,
    user: String,
}

impl Client {
    fn new(cli: &Cli) -> Self {
        Self {
            http: reqwest::Client::new(),
            base: cli.api_url.trim_end_matches('/').to_string(),
            user: cli.user.clone(),
        }
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        let response = self
            .http
            .get(format!("{}{}", self.base, path))
            .header("x-user-id", &self.user)
            .query(query)
            .send()
            .await
            .with_context(|| format!("Cannot connect to Daybook API at {}", self.base))?;
        read_body(response).await
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value> {
        let response = self
            .http
            .post(format!("{}{}", self.base, path))
            .header("x-user-id", &self.user)
            .json(body)
            .send()
            .await
            .with_context(|| format!("Cannot connect to Daybook API at {}", self.base))?;
        read_body(response).await
    }
}

async fn read_body(response: reqwest::Response) -> Result<Value> {
    let status = response.status();
    let body: Value = response.json().await.context("Invalid JSON from API")?;
    if !status.is_success() {
        let message = body["error"]["message"].as_str().unwrap_or("unknown error");
        bail!("Request failed ({}): {}", status, message);
    }
    Ok(body)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = Client::new(&cli);
    let json = cli.format == "json";

    match &cli.command {
        Commands::Log {
            metric,
            value,
            date,
        } => {
            let body = serde_json::json!({ "value": value, "date": date });
            let entry = client
                .post(&format!("/api/v1/metrics/{}/records", metric), &body)
                .await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&entry)?);
            } else {
                println!(
                    "Logged {} {} for {}",
                    metric,
                    value,
                    entry["date"].as_str().unwrap_or("today")
                );
            }
        }

        Commands::Range { metric, from, to } => {
            let mut query = Vec::new();
            if let Some(from) = from {
                query.push(("from", from.clone()));
            }
            if let Some(to) = to {
                query.push(("to", to.clone()));
            }
            let data = client
                .get(&format!("/api/v1/metrics/{}/range", metric), &query)
                .await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else {
                print_series(&data);
            }
        }

        Commands::Foods { page } => {
            walk_pages(&client, "/api/v1/foods", page, json, |item| {
                format!(
                    "{:<6} {:<30} {} kcal",
                    item["id"],
                    item["name"].as_str().unwrap_or(""),
                    item["kcalPerServing"]
                )
            })
            .await?;
        }

        Commands::Tags { page } => {
            walk_pages(&client, "/api/v1/tags", page, json, |item| {
                format!("{:<6} {}", item["id"], item["name"].as_str().unwrap_or(""))
            })
            .await?;
        }

        Commands::Entries { page } => {
            walk_pages(&client, "/api/v1/entries", page, json, |item| {
                format!(
                    "{:<6} {:<10} {:<10} {}",
                    item["id"],
                    item["date"].as_str().unwrap_or(""),
                    item["metric"].as_str().unwrap_or(""),
                    item["value"]
                )
            })
            .await?;
        }

        Commands::Status => {
            let health = client.get("/health", &[]).await?;

            println!("Daybook v{}", env!("CARGO_PKG_VERSION"));
            println!();
            println!(
                "API Status: {}",
                health["status"].as_str().unwrap_or("unknown")
            );
            println!(
                "Data source: {}",
                health["source"].as_str().unwrap_or("unknown")
            );
            if let Some(uptime) = health["uptime_seconds"].as_u64() {
                println!("Uptime: {}", format_duration(uptime));
            }
        }

        Commands::Config { output } => {
            let config = daybook::config::generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(path, &config)
                        .with_context(|| format!("Cannot write {:?}", path))?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

/// Print one page, or every page with `--all`
async fn walk_pages(
    client: &Client,
    path: &str,
    args: &PageArgs,
    json: bool,
    row: impl Fn(&Value) -> String,
) -> Result<()> {
    let mut cursor = args.cursor.clone();
    let mut total = 0;

    loop {
        let mut query = Vec::new();
        if let Some(limit) = args.limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(cursor) = &cursor {
            query.push(("cursor", cursor.clone()));
        }

        let page = client.get(path, &query).await?;
        let items = page["items"].as_array().cloned().unwrap_or_default();
        total += items.len();

        if json {
            println!("{}", serde_json::to_string(&page)?);
        } else {
            for item in &items {
                println!("{}", row(item));
            }
        }

        let next = page["nextCursor"].as_str().map(str::to_string);
        match next {
            Some(next) if args.all => cursor = Some(next),
            Some(next) => {
                if !json {
                    println!();
                    println!("More results: --cursor {}", next);
                }
                break;
            }
            None => break,
        }
    }

    if !json && args.all {
        println!("{} item(s)", total);
    }
    Ok(())
}

fn print_series(data: &Value) {
    let unit = data["unit"].as_str().unwrap_or("");
    println!("{:<12} {:>12}", "Date", unit);
    println!("{}", "-".repeat(25));

    if let Some(items) = data["items"].as_array() {
        for item in items {
            let value = match item["value"].as_f64() {
                Some(v) => format!("{:.1}", v),
                None => "-".to_string(),
            };
            println!("{:<12} {:>12}", item["date"].as_str().unwrap_or(""), value);
        }
    }

    println!("{}", "-".repeat(25));
    println!(
        "{} to {}: average {:.1} over {} active day(s)",
        data["from"].as_str().unwrap_or(""),
        data["to"].as_str().unwrap_or(""),
        data["average"].as_f64().unwrap_or(0.0),
        data["activeDays"].as_u64().unwrap_or(0)
    );
}

fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else if seconds < 86400 {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    } else {
        format!("{}d {}h", seconds / 86400, (seconds % 86400) / 3600)
    }
}
