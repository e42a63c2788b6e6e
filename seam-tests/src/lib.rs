mod mock;
mod schema;
mod user;

pub use mock::*;
pub use user::USER_PROFILE;

use log::LevelFilter;
use schema::schema;
use seam::Executor;
use std::env;
use user::users;

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

/// Run the driver agnostic suite against a live database.
///
/// Everything is created inside the `seam_testing` schema, which is dropped and recreated first.
pub async fn execute_tests<E: Executor>(mut executor: E) {
    users(&mut executor).await;
    schema(&mut executor).await;
}

/// Run the statements one at a time, panicking on the first failure.
pub async fn execute_all<E: Executor>(executor: &mut E, statements: &[&str]) {
    for sql in statements {
        if let Err(e) = executor.execute((*sql).into()).await {
            panic!("Failed to execute `{}`: {:#}", sql, e);
        }
    }
}

#[macro_export]
macro_rules! silent_logs {
    ($($code:tt)+) => {{
        let level = log::max_level();
        log::set_max_level(log::LevelFilter::Off);
        $($code)+
        log::set_max_level(level);
    }};
}
