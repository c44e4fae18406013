mod admin_routes;
mod badges;
mod banking;
mod banking_routes;
mod booking_routes;
mod bookings;
mod config;
mod crypto;
mod db;
mod error;
mod gateway;
mod handler;
mod midware;
mod models;
mod payout_routes;
mod payouts;
mod provider_routes;
mod providers;
mod repo;
mod schema;
mod state;
#[cfg(test)]
mod tests;
mod verification;
mod wallet;
mod wallet_routes;

use actix_cors::Cors;
use actix_web::{App, HttpServer};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::AppConfig;
use crypto::FieldEncryptor;
use env_logger::Env;
use gateway::{PaymentGateway, StripeClient, UnconfiguredGateway};
use midware::jwt::{AuthConfig, DEFAULT_TOKEN_HOURS, JWT};
use repo::PgRepo;
use state::AppState;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Parser)]
#[command(version, about = "Creator payouts and service marketplace API")]
struct Cli {
	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
	/// Run the HTTP server (default).
	Serve,
	/// Print a bearer token for a user, signed with JWT_SECRET.
	IssueToken {
		#[arg(long)]
		user: Uuid,
		#[arg(long, default_value_t = DEFAULT_TOKEN_HOURS)]
		hours: i64,
	},
}

fn build_state(config: &AppConfig) -> Result<AppState> {
	let pool = db::get_db_pool(&config.database_url)?;
	db::init(&pool)?;
	let repo = Arc::new(PgRepo::new(pool));

	let encryptor = match &config.bank_data_key {
		Some(key) => FieldEncryptor::from_base64(key).context("BANK_DATA_KEY is invalid")?,
		None => {
			log::warn!("BANK_DATA_KEY is not set, sensitive banking fields are stored unencrypted");
			FieldEncryptor::passthrough()
		},
	};
	let gateway: Arc<dyn PaymentGateway> = match &config.stripe_secret_key {
		Some(key) => Arc::new(
			StripeClient::new(
				key.clone(),
				config.stripe_api_base.clone(),
				config.public_app_url.clone(),
			)
			.context("Failed to build Stripe client")?,
		),
		None => {
			log::warn!("STRIPE_SECRET_KEY is not set, Stripe routes will answer 503");
			Arc::new(UnconfiguredGateway)
		},
	};

	Ok(AppState {
		bank_accounts: repo.clone(),
		wallets: repo.clone(),
		payouts: repo.clone(),
		providers: repo.clone(),
		bookings: repo.clone(),
		verification: repo,
		gateway,
		encryptor,
		auth: AuthConfig {
			jwt_secret: config.jwt_secret.clone(),
			admin_ids: config.admin_user_ids.clone(),
		},
	})
}

async fn serve(config: AppConfig) -> Result<()> {
	let state = build_state(&config)?;
	log::info!("Listening on: {}..", config.socket_url);

	HttpServer::new(move || {
		App::new()
			.configure(|cfg| state.install(cfg))
			.wrap(
				Cors::default()
					.allow_any_origin()
					.allow_any_method()
					.allow_any_header()
					.max_age(3600),
			)
			.wrap(actix_web::middleware::Logger::default())
			.configure(banking_routes::init)
			.configure(wallet_routes::init)
			.configure(payout_routes::init)
			.configure(provider_routes::init)
			.configure(booking_routes::init)
			.configure(admin_routes::init)
	})
	.bind(&config.socket_url)
	.with_context(|| format!("can not bind {}", config.socket_url))?
	.run()
	.await?;
	Ok(())
}

#[actix_web::main]
async fn main() -> Result<()> {
	env_logger::init_from_env(Env::default().default_filter_or("info"));
	let cli = Cli::parse();
	let config = AppConfig::from_env()?;

	match cli.command.unwrap_or(Command::Serve) {
		Command::Serve => serve(config).await,
		Command::IssueToken { user, hours } => {
			let token = JWT::new(&config.jwt_secret).create_jwt(user, hours)?;
			println!("{token}");
			Ok(())
		},
	}
}
