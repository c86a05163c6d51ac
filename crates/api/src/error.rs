use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum SchedulerError {
    #[error("Unable to access storage. Error message: `{0}`")]
    StorageError(String),
    #[error("Unable to fetch single-sign-on configuration. Error message: `{0}`")]
    SsoConfigUnavailable(String),
    #[error("Stage `{0}` panicked: `{1}`")]
    Panicked(&'static str, String),
}
