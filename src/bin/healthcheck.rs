// src/bin/healthcheck.rs
// DOCUMENTATION: Container health check
// PURPOSE: Check the web server and database, exit 0 when healthy and 1 otherwise
use anyhow::{bail, Context, Result};
use dotenv::dotenv;
use reqwest::Client;
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::process;
use std::time::Duration;

// --- ANSI colors ---
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";

const WEB_TIMEOUT: Duration = Duration::from_secs(5);
const DB_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug)]
enum Check {
    Passed,
    Skipped(&'static str),
    Failed(String),
}

impl Check {
    fn is_healthy(&self) -> bool {
        !matches!(self, Check::Failed(_))
    }

    fn report(&self, name: &str) {
        match self {
            Check::Passed => println!("{}✅ {} check passed{}", GREEN, name, RESET),
            Check::Skipped(reason) => {
                println!("{}⚠️  {} check skipped: {}{}", YELLOW, name, reason, RESET)
            }
            Check::Failed(err) => eprintln!("{}❌ {} check failed: {}{}", RED, name, err, RESET),
        }
    }
}

impl From<Result<()>> for Check {
    fn from(result: Result<()>) -> Self {
        match result {
            Ok(()) => Check::Passed,
            Err(e) => Check::Failed(format!("{:#}", e)),
        }
    }
}

async fn check_web(port: &str) -> Result<()> {
    let client = Client::builder()
        .timeout(WEB_TIMEOUT)
        .build()
        .context("building HTTP client")?;

    let url = format!("http://localhost:{}/api/health", port);
    let response = client
        .get(&url)
        .send()
        .await
        .with_context(|| format!("GET {}", url))?;

    let status = response.status();
    if !status.is_success() {
        bail!("status code {}", status);
    }
    Ok(())
}

async fn check_database(database_url: &str) -> Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(DB_TIMEOUT)
        .connect(database_url)
        .await
        .context("connecting to database")?;

    let row: (i32,) = sqlx::query_as("SELECT 1")
        .fetch_one(&pool)
        .await
        .context("running SELECT 1")?;
    pool.close().await;

    if row.0 != 1 {
        bail!("unexpected response {}", row.0);
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let port = env::var("PORT")
        .or_else(|_| env::var("SERVER_PORT"))
        .unwrap_or_else(|_| "5000".to_string());
    let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.is_empty());

    println!("{}🔍 Starting health check...{}", BOLD, RESET);

    let database_check = async {
        match &database_url {
            Some(url) => Check::from(check_database(url).await),
            None => Check::Skipped("DATABASE_URL not set"),
        }
    };
    let (web, database) = tokio::join!(
        async { Check::from(check_web(&port).await) },
        database_check
    );

    web.report("Web server");
    database.report("Database");

    if web.is_healthy() && database.is_healthy() {
        println!("{}✅ All health checks passed{}", GREEN, RESET);
        process::exit(0);
    }
    eprintln!("{}❌ One or more health checks failed{}", RED, RESET);
    process::exit(1);
}
