//! Managed application lifecycle (`Microsoft.Solutions`)

mod workflows;

pub use workflows::*;
