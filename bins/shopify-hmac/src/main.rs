//! shopify-hmac - sign and verify Shopify HMACs from the command line
//!
//! Useful for reproducing a denial seen in production: feed it the exact
//! query string or body bytes and the same settings file the app uses.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use shopify_guards::{
    sign_body, sign_query, verification_metrics, verify_body, verify_query, verify_query_at,
    QueryParams, RequestDescriptor, VerificationOutcome,
};
use shopify_guards_cli::output::{self, Status};
use shopify_guards_core::config::{Config, Settings, SettingsOverrides};
use shopify_guards_core::error::exit_codes;
use shopify_guards_core::validation::validate_settings;
use shopify_guards_core::Error;
use shopify_guards_telemetry::TelemetryConfig;
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "shopify-hmac")]
#[command(about = "Sign and verify Shopify request HMACs")]
#[command(version)]
struct Cli {
    /// Settings file (defaults to .shopify-guards.toml and friends)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// App secret; overrides the settings file
    #[arg(long, global = true, env = "SHOPIFY_API_SECRET", hide_env_values = true)]
    secret: Option<String>,

    /// Machine-readable output
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the hex HMAC for a query string
    SignQuery {
        /// Raw query string, e.g. "shop=a.myshopify.com&code=123"
        query: String,
    },

    /// Verify a signed query string as a GET request
    VerifyQuery {
        /// Raw query string including the hmac parameter
        query: String,

        /// Verify as of this unix time instead of now
        #[arg(long)]
        now: Option<i64>,

        /// Require shop to match *.myshopify.com when no pattern is configured
        #[arg(long)]
        shop_pattern: bool,
    },

    /// Print the base64 HMAC of a webhook body
    SignBody {
        /// Body file, or - for stdin
        input: PathBuf,
    },

    /// Verify a webhook body against its header value
    VerifyBody {
        /// Body file, or - for stdin
        input: PathBuf,

        /// Value of the HMAC header
        #[arg(long)]
        hmac: String,
    },

    /// Load and validate the settings
    CheckConfig,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        shopify_guards_telemetry::init_with_config(TelemetryConfig::verbose())?;
    } else {
        shopify_guards_telemetry::init()?;
    }

    let exit_code = run(cli)?;

    tracing::debug!(metrics = %verification_metrics().export_json(), "Verification counters");
    std::process::exit(exit_code);
}

fn run(cli: Cli) -> Result<i32> {
    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => return Ok(config_error(&e)),
    };
    if let Some(path) = &config.path {
        tracing::debug!(path = %path.display(), "Loaded settings file");
    }

    let mut overrides = config.overrides.clone();
    if let Some(secret) = cli.secret.clone() {
        overrides = overrides.merge(SettingsOverrides::new().api_secret_key(secret));
    }

    match cli.command {
        Commands::SignQuery { query } => run_sign_query(&query, overrides.resolve(), cli.json),
        Commands::VerifyQuery {
            query,
            now,
            shop_pattern,
        } => {
            if shop_pattern && overrides.shop_regex.is_none() {
                overrides = overrides.default_shop_regex();
            }
            let req = RequestDescriptor::get().with_raw_query(&query);
            let settings = overrides.resolve();
            let outcome = match now {
                Some(now) => verify_query_at(&req, &settings, now),
                None => verify_query(&req, &settings),
            };
            Ok(print_outcome(outcome, cli.json))
        }
        Commands::SignBody { input } => {
            let body = read_input(&input)?;
            run_sign_body(&body, overrides.resolve(), cli.json)
        }
        Commands::VerifyBody { input, hmac } => {
            let body = read_input(&input)?;
            let settings = overrides.resolve();
            let req = RequestDescriptor::post()
                .with_raw_body(body)
                .with_header(settings.header_hmac(), hmac);
            Ok(print_outcome(verify_body(&req, &settings), cli.json))
        }
        Commands::CheckConfig => run_check_config(&config, overrides.resolve(), cli.json),
    }
}

fn run_sign_query(query: &str, settings: Settings, json: bool) -> Result<i32> {
    if settings.api_secret_key().is_empty() {
        return Ok(config_error(&Error::missing_secret()));
    }

    let params = QueryParams::parse(query);
    let hmac = sign_query(&params, settings.api_secret_key().as_bytes(), settings.query_hmac());

    if json {
        let canonical = shopify_guards::canonical_query(&params, settings.query_hmac());
        println!(
            "{}",
            serde_json::json!({ "hmac": hmac, "canonical": canonical })
        );
    } else {
        println!("{}", hmac);
    }
    Ok(exit_codes::SUCCESS)
}

fn run_sign_body(body: &[u8], settings: Settings, json: bool) -> Result<i32> {
    if settings.api_secret_key().is_empty() {
        return Ok(config_error(&Error::missing_secret()));
    }

    let hmac = sign_body(body, settings.api_secret_key().as_bytes());
    if json {
        println!(
            "{}",
            serde_json::json!({ "hmac": hmac, "header": settings.header_hmac() })
        );
    } else {
        println!("{}", hmac);
    }
    Ok(exit_codes::SUCCESS)
}

fn run_check_config(config: &Config, settings: Settings, json: bool) -> Result<i32> {
    let result = validate_settings(&settings);

    if json {
        let report = serde_json::json!({
            "path": config.path.as_ref().map(|p| p.display().to_string()),
            "settings": settings.summary(),
            "valid": result.is_valid(),
            "errors": result.errors(),
            "warnings": result.warnings(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let summary = settings.summary();
        Status::header("Shopify HMAC settings");
        Status::field(
            "source",
            &config
                .path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "defaults".to_string()),
        );
        Status::field("api_secret_key", &output::describe_secret(settings.api_secret_key().len()));
        Status::field("header_hmac", &summary.header_hmac);
        Status::field("query_hmac", &summary.query_hmac);
        Status::field("timestamp_leeway", &output::format_leeway(summary.timestamp_leeway_secs));
        Status::field("shop_regex", summary.shop_regex.as_deref().unwrap_or("(none)"));
        println!();

        output::report_validation(&result);
        if result.is_valid() {
            Status::success(&format!("Settings valid ({})", output::validation_summary(&result)));
        } else {
            Status::error(&format!("Settings invalid ({})", output::validation_summary(&result)));
        }
    }

    Ok(if result.is_valid() {
        exit_codes::SUCCESS
    } else {
        exit_codes::VALIDATION_ERROR
    })
}

fn print_outcome(outcome: VerificationOutcome, json: bool) -> i32 {
    if json {
        let report = serde_json::json!({
            "allowed": outcome.is_allowed(),
            "reason": outcome.denial_reason(),
            "message": outcome.denial_reason().map(|r| r.message()),
        });
        println!("{}", report);
    } else {
        match outcome.denial_reason() {
            None => Status::success("Signature verified"),
            Some(reason) => Status::error(&format!("{} ({})", reason.message(), reason)),
        }
    }

    if outcome.is_allowed() {
        exit_codes::SUCCESS
    } else {
        exit_codes::SECURITY_ERROR
    }
}

fn config_error(err: &Error) -> i32 {
    output::report_error(err);
    exit_codes::CONFIG_ERROR
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
    if path.as_os_str() == "-" {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .context("Failed to read body from stdin")?;
        Ok(buf)
    } else {
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
    }
}
