//! Command-line entry point: migrate every token in the input file and echo the results.

// std
use std::{path::PathBuf, sync::Arc, time::Duration};
// crates.io
use clap::{Parser, ValueEnum};
use color_eyre::{Result, eyre};
use tracing_subscriber::{EnvFilter, fmt};
use url::Url;
// self
use oauth1_migrate::{
	batch::{BatchOptions, BatchReport, BatchRunner, FailurePolicy},
	client::ReqwestMigrationClient,
	config::{self, DEFAULT_ENDPOINT, MigrationConfig},
	oauth1::{SigningKey, TimestampMode},
};

/// Log output format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum LogFormat {
	#[default]
	Text,
	Json,
}

/// Migrate OAuth 1.0a access tokens to OAuth 2.0 credentials.
#[derive(Debug, Parser)]
#[command(name = "oauth1-migrate", version, about)]
struct Cli {
	/// OAuth 1.0a consumer key.
	#[arg(long, env = "OAUTH1_MIGRATE_CONSUMER_KEY")]
	consumer_key: Option<String>,

	/// Space-delimited OAuth 2.0 scopes to request.
	#[arg(long, env = "OAUTH1_MIGRATE_SCOPE")]
	scope: Option<String>,

	/// OAuth 2.0 client ID.
	#[arg(long, env = "OAUTH1_MIGRATE_CLIENT_ID")]
	client_id: Option<String>,

	/// OAuth 2.0 client secret.
	#[arg(long, env = "OAUTH1_MIGRATE_CLIENT_SECRET", hide_env_values = true)]
	client_secret: Option<String>,

	/// PEM-encoded RSA private key (PKCS#1 or PKCS#8).
	#[arg(long, env = "OAUTH1_MIGRATE_PRIVATE_KEY", default_value = "./privatekey.pem")]
	private_key: PathBuf,

	/// JSON array of `{"token": "..."}` objects.
	#[arg(long, env = "OAUTH1_MIGRATE_INPUT", default_value = "./oauth1_tokens.json")]
	input: PathBuf,

	/// Where migration results are written.
	#[arg(long, env = "OAUTH1_MIGRATE_OUTPUT", default_value = "./oauth2_tokens.json")]
	output: PathBuf,

	/// Where tokens that failed to migrate are written, in input format.
	#[arg(long, env = "OAUTH1_MIGRATE_FAILED_OUTPUT")]
	failed_output: Option<PathBuf>,

	/// Migration endpoint.
	#[arg(long, env = "OAUTH1_MIGRATE_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
	endpoint: Url,

	/// Per-request timeout in seconds; waits indefinitely when unset.
	#[arg(long, env = "OAUTH1_MIGRATE_TIMEOUT_SECS")]
	timeout_secs: Option<u64>,

	/// Sign every request with one timestamp captured at startup.
	#[arg(long)]
	fixed_timestamp: bool,

	/// Stop at the first failure and write no output.
	#[arg(long)]
	fail_fast: bool,

	/// Do not echo the results to stdout.
	#[arg(long)]
	no_echo: bool,

	/// Log output format (logs go to stderr).
	#[arg(long, env = "OAUTH1_MIGRATE_LOG_FORMAT", value_enum, default_value_t)]
	log_format: LogFormat,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let cli = Cli::parse();

	init_tracing(cli.log_format);

	let echo = !cli.no_echo;
	let report = run(cli).await?;

	if echo {
		println!("{}", report.rendered);
	}
	if !report.is_complete() {
		eyre::bail!("{} of {} tokens failed to migrate.", report.failed, report.processed);
	}

	Ok(())
}

fn init_tracing(format: LogFormat) {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
	let builder = fmt().with_env_filter(filter).with_writer(std::io::stderr);

	match format {
		LogFormat::Json => builder.json().init(),
		LogFormat::Text => builder.init(),
	}
}

async fn run(cli: Cli) -> Result<BatchReport> {
	let timestamp =
		if cli.fixed_timestamp { TimestampMode::fixed_now() } else { TimestampMode::PerCall };
	let config = MigrationConfig::builder()
		.consumer_key(cli.consumer_key.unwrap_or_default())
		.scope(cli.scope.unwrap_or_default())
		.client_id(cli.client_id.unwrap_or_default())
		.client_secret(cli.client_secret.unwrap_or_default())
		.endpoint(cli.endpoint)
		.timeout(cli.timeout_secs.map(Duration::from_secs))
		.timestamp(timestamp)
		.build()?;
	let policy = if cli.fail_fast { FailurePolicy::Abort } else { FailurePolicy::Continue };
	let mut options = BatchOptions::new(cli.input, cli.output).with_policy(policy);

	if let Some(path) = cli.failed_output {
		options = options.with_failed_output(path);
	}

	config::require_path("private_key", &cli.private_key)?;
	options.validate()?;

	let signing_key = Arc::new(SigningKey::from_file(&cli.private_key)?);
	let client = ReqwestMigrationClient::new(config, signing_key)?;
	let endpoint = client.config.endpoint.clone();
	let runner = BatchRunner::new(client, options);

	tracing::info!(
		%endpoint,
		input = %runner.options().input.display(),
		policy = ?runner.options().policy,
		"starting migration batch"
	);

	Ok(runner.run().await?)
}
