use futures::stream;
use seam::{
    Driver, Error, Executor, GenericSqlWriter, Query, QueryResult, Result, RowLabeled,
    RowsAffected, Value,
    stream::{Stream, StreamExt},
};
use std::{
    collections::VecDeque,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

pub struct MockDriver {}

impl Driver for MockDriver {
    type SqlWriter = GenericSqlWriter;

    const NAME: &'static str = "mock";

    fn sql_writer(&self) -> GenericSqlWriter {
        GenericSqlWriter::new()
    }
}

/// Canned outcome of the next query run by a [`MockExecutor`].
#[derive(Debug, Clone)]
pub enum MockResponse {
    Rows(Vec<RowLabeled>),
    Affected(u64),
    Error(String),
}

/// In memory executor: records the SQL it is asked to run and replays queued responses.
///
/// Queries without a queued response affect zero rows.
pub struct MockExecutor {
    driver: MockDriver,
    responses: VecDeque<MockResponse>,
    queries: Vec<String>,
    pulled: Arc<AtomicUsize>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self {
            driver: MockDriver {},
            responses: VecDeque::new(),
            queries: Vec::new(),
            pulled: Default::default(),
        }
    }

    pub fn respond(&mut self, response: MockResponse) -> &mut Self {
        self.responses.push_back(response);
        self
    }

    pub fn respond_rows(&mut self, rows: impl IntoIterator<Item = RowLabeled>) -> &mut Self {
        self.respond(MockResponse::Rows(rows.into_iter().collect()))
    }

    pub fn respond_affected(&mut self, rows: u64) -> &mut Self {
        self.respond(MockResponse::Affected(rows))
    }

    pub fn respond_error(&mut self, message: impl Into<String>) -> &mut Self {
        self.respond(MockResponse::Error(message.into()))
    }

    /// Every query run so far, in order.
    pub fn queries(&self) -> &[String] {
        &self.queries
    }

    pub fn last_query(&self) -> Option<&str> {
        self.queries.last().map(String::as_str)
    }

    /// Number of rows consumers pulled out of the result streams.
    pub fn pulled(&self) -> usize {
        self.pulled.load(Ordering::Relaxed)
    }
}

impl Default for MockExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl Executor for MockExecutor {
    type Driver = MockDriver;

    fn driver(&self) -> &Self::Driver {
        &self.driver
    }

    fn run(&mut self, query: Query) -> impl Stream<Item = Result<QueryResult>> + Send {
        log::debug!("Mock query:\n{}", query);
        self.queries.push(query.sql);
        let items: Vec<Result<QueryResult>> = match self.responses.pop_front() {
            Some(MockResponse::Rows(rows)) => {
                let affected = RowsAffected {
                    rows_affected: rows.len() as u64,
                    last_affected_id: None,
                };
                rows.into_iter()
                    .map(|row| Ok(row.into()))
                    .chain([Ok(affected.into())])
                    .collect()
            }
            Some(MockResponse::Affected(rows)) => vec![Ok(RowsAffected {
                rows_affected: rows,
                last_affected_id: None,
            }
            .into())],
            None => vec![Ok(RowsAffected::default().into())],
            Some(MockResponse::Error(message)) => vec![Err(Error::msg(message))],
        };
        let pulled = self.pulled.clone();
        stream::iter(items).inspect(move |item| {
            if let Ok(QueryResult::Row(..)) = item {
                pulled.fetch_add(1, Ordering::Relaxed);
            }
        })
    }
}

/// Build a labeled row out of `(column, value)` pairs.
pub fn row<const N: usize>(values: [(&str, Value); N]) -> RowLabeled {
    values.into_iter().collect()
}
