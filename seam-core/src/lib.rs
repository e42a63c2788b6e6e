mod as_value;
mod catalog;
mod column;
mod connection;
mod driver;
mod entity;
mod error;
mod executor;
mod query;
mod reconcile;
mod record;
mod sql_writer;
mod statement;
mod table_ref;
mod util;
mod value;
pub mod wrap;

pub use ::anyhow::Context;
pub use as_value::*;
pub use catalog::*;
pub use column::*;
pub use connection::*;
pub use driver::*;
pub use entity::*;
pub use error::*;
pub use executor::*;
pub use query::*;
pub use reconcile::*;
pub use record::*;
pub use sql_writer::*;
pub use statement::*;
pub use table_ref::*;
pub use util::*;
pub use value::*;
pub use wrap::{Kind, ValidValue, WrapError};
pub mod stream {
    pub use ::futures::stream::*;
}
pub use ::futures::future;

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;
