pub mod summary_repo;

pub use summary_repo::SummaryRepo;
