use anyhow::{anyhow, Context, Result};
use diesel::{
	prelude::*,
	r2d2::{self, ConnectionManager},
};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

pub type DbPool = r2d2::Pool<ConnectionManager<PgConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub fn get_db_pool(database_url: &str) -> Result<DbPool> {
	let manager = ConnectionManager::<PgConnection>::new(database_url);
	r2d2::Pool::builder().build(manager).context("Failed to create pool")
}

pub fn init(pool: &DbPool) -> Result<()> {
	let mut conn = pool.get().context("can not get a connection from the pool")?;
	let applied = conn
		.run_pending_migrations(MIGRATIONS)
		.map_err(|e| anyhow!("Unable to run migrations: {e}"))?;
	for version in applied {
		log::info!("Applied migration {}", version);
	}
	Ok(())
}
