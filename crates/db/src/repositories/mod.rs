//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods.
//! Methods that take an executor (`E: PgExecutor`) run equally against the
//! pool or inside a transaction (`&mut *tx`); multi-statement writes that
//! must be atomic take `&PgPool` and open their own transaction.

pub mod content_repo;
pub mod context_repo;
pub mod form_repo;
pub mod gender_repo;
pub mod section_repo;
pub mod sequence_repo;
pub mod tag_repo;
pub mod track_repo;
pub mod user_repo;

pub use content_repo::ContentRepo;
pub use context_repo::ContextRepo;
pub use form_repo::FormRepo;
pub use gender_repo::GenderRepo;
pub use section_repo::SectionRepo;
pub use sequence_repo::SequenceRepo;
pub use tag_repo::TagRepo;
pub use track_repo::TrackRepo;
pub use user_repo::UserRepo;
