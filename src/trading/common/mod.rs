pub mod guard;

pub use guard::SubmissionGuard;
