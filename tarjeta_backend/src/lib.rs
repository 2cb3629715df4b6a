#![recursion_limit = "512"]

#[macro_use]
pub extern crate diesel;
#[macro_use]
extern crate diesel_migrations;
#[macro_use]
extern crate error_chain;
#[macro_use]
extern crate log;
#[macro_use]
extern crate lazy_static;

pub extern crate chrono;
extern crate crypto;
extern crate data_encoding;
extern crate rand;
extern crate serde;
extern crate serde_json;
extern crate unicode_normalization;
extern crate ureq;

pub use diesel::pg::PgConnection;
pub use diesel::prelude::*;

pub type ConnManager = diesel::r2d2::ConnectionManager<PgConnection>;
pub type Connection = diesel::r2d2::PooledConnection<ConnManager>;

lazy_static! {
    pub static ref PERF_TRACE: bool = {
        dotenv::dotenv().ok();
        std::env::var("TARJETA_PERF_TRACE")
            .map(|s| s.parse().unwrap_or(false))
            .unwrap_or(false)
    };
}

#[macro_export]
macro_rules! time_it {
    ($comment:expr , $code:expr) => {{
        let start = std::time::Instant::now();
        let result = $code;
        if *$crate::PERF_TRACE {
            log::debug!("{}: {:?}", $comment, start.elapsed());
        }
        result
    }};
}

pub mod errors;
pub use errors::*;

pub mod schema;
pub mod models;
pub use models::*;

pub mod db;
pub mod password;
pub mod token;
pub mod user;
pub mod training;
pub mod card;
pub mod numbers;
pub mod writing;
pub mod llm;
