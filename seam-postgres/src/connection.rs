use crate::{PostgresDriver, util::stream_postgres_rows_to_query_result};
use openssl::ssl::{SslConnector, SslFiletype, SslMethod, SslVerifyMode};
use postgres_openssl::MakeTlsConnector;
use seam_core::{
    Connection, Context, Driver, Error, Executor, Query, QueryResult, Result,
    stream::{Stream, TryStreamExt},
};
use std::{borrow::Cow, env, path::Path, sync::Arc};
use tokio::spawn;
use tokio_postgres::NoTls;
use url::Url;
use urlencoding::{decode, encode};

pub struct PostgresConnection {
    pub(crate) client: tokio_postgres::Client,
}

impl PostgresConnection {
    /// Connect using `SEAM_DATABASE_URL`, or a url built from the standard `PG*` variables.
    pub async fn connect_env() -> Result<Self> {
        let url = match env::var("SEAM_DATABASE_URL") {
            Ok(url) => url,
            Err(..) => {
                let var = |name: &str, default: &str| {
                    env::var(name).unwrap_or_else(|_| default.to_string())
                };
                let user = var("PGUSER", "postgres");
                let password = env::var("PGPASSWORD").ok();
                let credentials = match password {
                    Some(password) => format!("{}:{}", encode(&user), encode(&password)),
                    None => encode(&user).into_owned(),
                };
                format!(
                    "postgres://{}@{}:{}/{}",
                    credentials,
                    var("PGHOST", "localhost"),
                    var("PGPORT", "5432"),
                    var("PGDATABASE", "postgres"),
                )
            }
        };
        Self::connect(url.into()).await
    }
}

impl Executor for PostgresConnection {
    type Driver = PostgresDriver;

    fn driver(&self) -> &Self::Driver {
        &PostgresDriver {}
    }

    fn run(&mut self, query: Query) -> impl Stream<Item = Result<QueryResult>> + Send {
        let context = Arc::new(format!("While running the query:\n{}", query));
        let Query { sql } = query;
        stream_postgres_rows_to_query_result(async move || {
            self.client
                .query_raw(sql.as_str(), Vec::<String>::new())
                .await
                .map_err(Into::into)
        })
        .map_err(move |e: Error| {
            let e = e.context(context.clone());
            log::error!("{:#}", e);
            e
        })
    }
}

impl Connection for PostgresConnection {
    #[allow(refining_impl_trait)]
    async fn connect(url: Cow<'static, str>) -> Result<PostgresConnection> {
        let context = || format!("While trying to connect to `{}`", url);
        let url = decode(&url).with_context(context)?;
        let prefix = format!("{}://", <Self::Driver as Driver>::NAME);
        if !url.starts_with(&prefix) {
            let error = Error::msg(format!(
                "Postgres connection url must start with `{}`",
                &prefix
            ))
            .context(context());
            log::error!("{:#}", error);
            return Err(error);
        }
        let mut url = Url::parse(&url).with_context(context)?;
        let mut take_url_param = |key: &str, env_var: &str| {
            let mut value = None;
            let mut pairs: Vec<(String, String)> = url
                .query_pairs()
                .map(|(k, v)| (k.into(), v.into()))
                .collect();
            if let Some(pos) = pairs.iter().position(|(k, _)| k == key) {
                let (_, v) = pairs.remove(pos);
                value = Some(v);
            }
            if pairs.is_empty() {
                url.set_query(None);
            } else {
                url.query_pairs_mut()
                    .clear()
                    .extend_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
            }
            value.or_else(|| env::var(env_var).ok())
        };
        let sslmode = take_url_param("sslmode", "PGSSLMODE").unwrap_or("disable".into());
        let client = if sslmode == "disable" {
            let (client, connection) = tokio_postgres::connect(url.as_str(), NoTls)
                .await
                .with_context(context)?;
            spawn(async move {
                if let Err(e) = connection.await
                    && !e.is_closed()
                {
                    log::error!("Postgres connection error: {:#}", e);
                }
            });
            client
        } else {
            let mut builder = SslConnector::builder(SslMethod::tls())?;
            if let Some(path) = take_url_param("sslrootcert", "PGSSLROOTCERT")
                .as_deref()
                .map(Path::new)
                && path.exists()
            {
                builder.set_ca_file(path)?;
            }
            if let Some(path) = take_url_param("sslcert", "PGSSLCERT")
                .as_deref()
                .map(Path::new)
                && path.exists()
            {
                builder.set_certificate_chain_file(path)?;
            }
            if let Some(path) = take_url_param("sslkey", "PGSSLKEY")
                .as_deref()
                .map(Path::new)
                && path.exists()
            {
                builder.set_private_key_file(path, SslFiletype::PEM)?;
            }
            builder.set_verify(match &*sslmode {
                "require" | "prefer" | "allow" => SslVerifyMode::NONE,
                _ => SslVerifyMode::PEER,
            });
            let connector = MakeTlsConnector::new(builder.build());
            let (client, connection) = tokio_postgres::connect(url.as_str(), connector)
                .await
                .with_context(context)?;
            spawn(async move {
                if let Err(e) = connection.await
                    && !e.is_closed()
                {
                    log::error!("Postgres connection error: {:#}", e);
                }
            });
            client
        };
        // Dates are exchanged as UTC
        client
            .batch_execute("SET timezone = 'UTC';")
            .await
            .with_context(context)?;
        log::debug!("Connected to {}", url.host_str().unwrap_or_default());
        Ok(Self { client })
    }
}
