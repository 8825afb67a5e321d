use crate::any::TypeInfo;

#[derive(thiserror::Error, Debug)]
pub enum InstantiateErrorKind {
    #[error("Argument at position {position} not found. Constructor asked for more arguments than declared")]
    MissingArgument { position: usize },
    #[error("Incorrect argument type at position {position}. Expected: {}", expected.name)]
    IncorrectArgumentType { position: usize, expected: TypeInfo },
    #[error(transparent)]
    Custom(#[from] anyhow::Error),
}
