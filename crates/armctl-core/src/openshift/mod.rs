//! Azure Red Hat OpenShift lifecycle (`Microsoft.RedHatOpenShift`)

mod workflows;

pub use workflows::*;
