/// Errors for fact input that must never reach a store.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ValidationError {
    #[error("fact content is empty")]
    EmptyContent,

    #[error("fact {id} has updatedAt before createdAt")]
    TimestampOrder { id: String },

    #[error("fact id {id} already exists in the store")]
    DuplicateId { id: String },

    #[error("fact id is empty")]
    EmptyId,
}
