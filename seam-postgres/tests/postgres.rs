#[cfg(test)]
mod tests {
    use seam_core::{Connection, Executor, Value, stream::TryStreamExt};
    use seam_postgres::PostgresConnection;
    use seam_tests::{execute_tests, init_logs, silent_logs};
    use std::{env, sync::Mutex};
    use tokio_postgres::error::SqlState;

    static MUTEX: Mutex<()> = Mutex::new(());

    /// Live database url, the tests needing one are skipped without it.
    fn database_url() -> Option<String> {
        let url = env::var("SEAM_POSTGRES_URL").ok();
        if url.is_none() {
            log::warn!("SEAM_POSTGRES_URL is not set, skipping the Postgres integration tests");
        }
        url
    }

    #[tokio::test]
    async fn postgres() {
        init_logs();
        let Some(url) = database_url() else {
            return;
        };
        let _guard = MUTEX.lock().unwrap();
        let error_msg = format!("Could not connect to `{url}`");
        let connection = PostgresConnection::connect(url.into())
            .await
            .expect(&error_msg);
        execute_tests(connection).await;
    }

    #[tokio::test]
    async fn session_timezone() {
        init_logs();
        let Some(url) = database_url() else {
            return;
        };
        let mut connection = PostgresConnection::connect(url.into())
            .await
            .expect("Could not connect");
        let rows = connection
            .fetch("SELECT current_setting('TimeZone') AS tz;".into())
            .try_collect::<Vec<_>>()
            .await
            .expect("Failed to read the time zone");
        assert_eq!(
            rows[0].get_column("tz"),
            Some(&Value::Varchar(Some("UTC".into())))
        );
    }

    #[tokio::test]
    async fn statement_error_keeps_the_driver_error() {
        init_logs();
        let Some(url) = database_url() else {
            return;
        };
        let mut connection = PostgresConnection::connect(url.into())
            .await
            .expect("Could not connect");
        let error;
        silent_logs! {
            error = connection
                .execute("DELETE FROM seam_missing_table;".into())
                .await
                .expect_err("The table does not exist");
        }
        let driver = error
            .downcast_ref::<tokio_postgres::Error>()
            .expect("The driver error is still reachable");
        assert_eq!(driver.code(), Some(&SqlState::UNDEFINED_TABLE));
        assert!(format!("{:#}", error).starts_with("While running the query:\nDELETE FROM"));
    }

    #[tokio::test]
    async fn wrong_url() {
        silent_logs! {
            assert!(
                PostgresConnection::connect("mysql://some_url".into())
                    .await
                    .is_err()
            );
        }
    }
}
