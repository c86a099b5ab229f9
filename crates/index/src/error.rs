use thiserror::Error;

pub type Result<T> = std::result::Result<T, IndexError>;

#[derive(Error, Debug)]
pub enum IndexError {
    /// Nothing to analyze: coverage over zero agents would be meaningless
    #[error("No agent contracts to analyze")]
    NoContracts,
}
