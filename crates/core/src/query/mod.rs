mod descriptor;
mod error;
mod keys;
mod status;

pub use descriptor::{ApiRequest, Method, QueryDescriptor, QueryOptions};
pub use error::{QueryError, Result};
pub use keys::{derive_key, Arguments, BaseKey, KeyPart, QueryKey, Scalar};
pub use status::{aggregate, AggregateState, QueryState, QueryStatus};
