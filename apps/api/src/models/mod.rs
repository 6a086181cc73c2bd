// Row types as stored in PostgreSQL plus the typed in-memory views built from them.
// List-valued columns are TEXT[] and decode straight into Vec<String>.

pub mod analysis;
pub mod linkedin;
pub mod resume;
pub mod subscription;
pub mod template;
pub mod user;
