use thiserror::Error;

#[derive(Debug, Error)]
pub enum BptError {
    #[error("scratch arena exhausted (capacity {capacity} bytes)")]
    ArenaExhausted { capacity: usize },
    #[error("hit point references object {object} but the scene holds {count} objects")]
    ObjectMismatch { object: u32, count: usize },
    #[error("invalid render settings: {0}")]
    InvalidSettings(String),
    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),
    #[error("checkpoint export failed: {0}")]
    Checkpoint(String)
}
