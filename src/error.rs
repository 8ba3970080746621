pub type Result<T> = std::result::Result<T, HuffmanError>;

#[derive(PartialEq, Eq, Debug, Clone, thiserror::Error)]
pub enum HuffmanError {
    #[error("Symbol {symbol} is not in the code table")]
    UnknownSymbol { symbol: String },

    #[error("End of stream reached after {bit_count} bits")]
    EndOfStream { bit_count: usize },

    #[error("Corrupt stream: {reason}")]
    CorruptStream { reason: String },

    #[error("Cannot build code: {reason}")]
    Construction { reason: String },

    #[error("Invalid character {character:?} at position {position} in bit string")]
    InvalidBitString { character: char, position: usize },
}

impl HuffmanError {
    pub fn raise_unknown_symbol<T>(symbol: &impl std::fmt::Debug) -> Result<T> {
        Err(HuffmanError::UnknownSymbol {
            symbol: format!("{:?}", symbol),
        })
    }

    pub fn raise_end_of_stream<T>(bit_count: usize) -> Result<T> {
        Err(HuffmanError::EndOfStream { bit_count })
    }

    pub fn raise_corrupt_stream<T>(reason: impl Into<String>) -> Result<T> {
        Err(HuffmanError::CorruptStream {
            reason: reason.into(),
        })
    }

    pub fn raise_construction<T>(reason: impl Into<String>) -> Result<T> {
        Err(HuffmanError::Construction {
            reason: reason.into(),
        })
    }
}
