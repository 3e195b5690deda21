//! Redis Enterprise lifecycle (`Microsoft.Cache/redisEnterprise`)

mod workflows;

pub use workflows::*;
