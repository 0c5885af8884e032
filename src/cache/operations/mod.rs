// Cache operation traits and implementations
pub mod cleanup;
pub mod delete;
pub mod locate;

pub use cleanup::Cleaner;
pub use delete::Deleter;
pub use locate::Locator;
