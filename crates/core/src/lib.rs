pub mod error;
pub mod fake_bool;
pub mod hashing;
pub mod licence;
pub mod pagination;
pub mod processing;
pub mod slug;
pub mod storage;
pub mod types;
