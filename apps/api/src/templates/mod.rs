// Template catalog and download tracking.
// Downloads are append-only; premium templates need a session before one is recorded.

pub mod handlers;
