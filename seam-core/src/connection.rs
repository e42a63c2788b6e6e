use crate::{Executor, Result};
use std::{borrow::Cow, future::Future};

pub trait Connection: Executor {
    /// Establish a connection to the given URL.
    fn connect(url: Cow<'static, str>) -> impl Future<Output = Result<Self>>;
}
