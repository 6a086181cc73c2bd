// Resume analysis pipeline: upload gate -> text extraction -> rubric -> feedback.
// Extraction is CPU-bound and runs inside tokio::task::spawn_blocking.

pub mod extract;
pub mod feedback;
pub mod handlers;
pub mod rubric;
pub mod upload;
