pub mod context;
pub mod entry;
pub mod prompts;

pub use context::CliContext;
pub use entry::{Args, Command, GlobalOptions, run, run_with_prompt};
pub use prompts::Prompt;
