use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum TimeError {
    #[error("Invalid time correction '{0}', expected [±]H:MM")]
    InvalidCorrectionFormat(String),
}
