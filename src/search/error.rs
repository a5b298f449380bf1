use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Invalid value for '{name}': {value}")]
    Criteria { name: &'static str, value: String },

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl SearchError {
    pub fn criteria(name: &'static str, value: impl Into<String>) -> Self {
        SearchError::Criteria { name, value: value.into() }
    }
}
