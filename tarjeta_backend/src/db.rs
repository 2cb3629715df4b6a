use super::*;
use diesel::Connection as _;
use diesel::r2d2::Pool;

embed_migrations!();

pub fn db_connect(database_url: &str) -> Result<PgConnection> {
    PgConnection::establish(database_url)
        .chain_err(|| "Error connecting to database!")
}

pub fn create_pool(database_url: &str, max_size: u32) -> Result<Pool<ConnManager>> {
    let manager = ConnManager::new(database_url);
    Ok(Pool::builder()
        .max_size(max_size)
        .build(manager)
        .chain_err(|| "Failed to create the connection pool!")?)
}

pub fn run_db_migrations(conn: &PgConnection) -> Result<()> {
    embedded_migrations::run(conn)?;
    info!("Migrations checked.");
    Ok(())
}

/// Runs the pending migrations and tells whether there are any users yet.
pub fn check_db(conn: &PgConnection) -> Result<bool> {
    run_db_migrations(conn).chain_err(|| "Couldn't run the migrations.")?;
    is_installed(conn)
}

pub fn is_installed(conn: &PgConnection) -> Result<bool> {
    let count: i64 = schema::users::table
        .count()
        .get_result(conn)?;

    Ok(count > 0)
}
