#[derive(Debug, thiserror::Error)]
pub enum ReferralError {
    #[error("transcript is empty")]
    EmptyTranscript,
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid text: {0}")]
    InvalidText(#[from] referral_types::TextError),

    #[error("invalid reference data: {0}")]
    InvalidReferenceData(String),
    #[error(
        "failed to read reference data file (path: {path}): {source}",
        path = path.display()
    )]
    ReferenceDataRead {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse reference data: {0}")]
    ReferenceDataParse(serde_yaml::Error),

    #[error("invalid webhook url: {0}")]
    InvalidWebhookUrl(String),
    #[error("failed to build http client: {0}")]
    HttpClient(reqwest::Error),
}

pub type ReferralResult<T> = std::result::Result<T, ReferralError>;
