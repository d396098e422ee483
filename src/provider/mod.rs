pub mod gh;

pub use gh::{GhCloneExecutor, GhRepoDirectory, RepoDirectory};
