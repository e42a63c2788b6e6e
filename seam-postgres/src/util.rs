use crate::ValueHolder;
use async_stream::try_stream;
use seam_core::{
    Error, QueryResult, RowLabeled, RowNames, RowsAffected,
    stream::{Stream, StreamExt},
};
use std::pin::pin;
use tokio_postgres::RowStream;

pub(crate) fn row_to_seam_row(row: tokio_postgres::Row) -> seam_core::Result<seam_core::Row> {
    (0..row.len())
        .map(|i| match row.try_get::<_, ValueHolder>(i) {
            Ok(v) => Ok(v.0),
            Err(e) => {
                let col = &row.columns()[i];
                Err(Error::new(e).context(format!(
                    "Could not deserialize column {} `{}`: {}",
                    i,
                    col.name(),
                    col.type_()
                )))
            }
        })
        .collect()
}

/// Yields every row as it arrives, then the number of rows affected by the statement.
pub(crate) fn stream_postgres_rows_to_query_result(
    stream: impl AsyncFnOnce() -> seam_core::Result<RowStream>,
) -> impl Stream<Item = seam_core::Result<QueryResult>> {
    try_stream! {
        let stream = stream().await?;
        let mut stream = pin!(stream);
        let mut labels: Option<RowNames> = None;
        while let Some(row) = stream.next().await.transpose()? {
            let labels = labels.get_or_insert_with(|| {
                row.columns().iter().map(|c| c.name().to_string()).collect()
            });
            yield RowLabeled {
                labels: labels.clone(),
                values: row_to_seam_row(row)?,
            }
            .into();
        }
        yield RowsAffected {
            rows_affected: stream.rows_affected().unwrap_or_default(),
            last_affected_id: None,
        }
        .into();
    }
}
