use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
#[error("Unknown status: `{0}`")]
pub struct UnknownStatusError(pub String);
