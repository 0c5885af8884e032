use crate::cache::WalkOptions;
use crate::config::{self, Config};
use crate::error::Result;

use super::entry::{Args, Command, GlobalOptions};
use super::prompts::Prompt;

pub struct CliContext {
    options: GlobalOptions,
    command: Command,
    config: Config,
    prompt: Prompt,
}

impl CliContext {
    pub fn from_args(args: Args, prompt: Prompt) -> Result<Self> {
        let config = config::load(args.global.config.as_deref())?;

        Ok(Self {
            options: args.global,
            command: args.command,
            config,
            prompt,
        })
    }

    pub fn command(&self) -> &Command {
        &self.command
    }

    pub fn prompt(&self) -> &Prompt {
        &self.prompt
    }

    pub fn is_non_interactive(&self) -> bool {
        self.options.non_interactive
    }

    pub fn global_options(&self) -> &GlobalOptions {
        &self.options
    }

    /// Walk flags, with the config file as fallback for unset CLI flags.
    pub fn walk_options(&self) -> WalkOptions {
        WalkOptions {
            recursive: self.options.recursive || self.config.defaults.recursive,
            hidden: self.options.all || self.config.defaults.all,
        }
    }

    /// Cleanup globs: configured patterns first, then command-line ones.
    pub fn cleanup_globs(&self, extra: &[String]) -> Vec<String> {
        let mut globs = self.config.cleanup.globs.clone();
        globs.extend_from_slice(extra);
        globs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context_with(config: Config, options: GlobalOptions) -> CliContext {
        CliContext {
            options,
            command: Command::Locate(crate::cli::entry::LocateArgs {
                file: "/tmp/x".into(),
            }),
            config,
            prompt: Prompt::NonInteractive,
        }
    }

    #[test]
    fn configured_globs_come_before_command_line_ones() {
        let mut config = Config::default();
        config.cleanup.globs = vec!["!**/*.tmp".to_string()];
        let ctx = context_with(config, GlobalOptions::default());

        let globs = ctx.cleanup_globs(&["!**/*.log".to_string()]);
        assert_eq!(globs, vec!["!**/*.tmp", "!**/*.log"]);

        let unchanged = context_with(Config::default(), GlobalOptions::default());
        assert!(unchanged.cleanup_globs(&[]).is_empty());
    }

    #[test]
    fn config_defaults_back_unset_walk_flags() {
        let mut config = Config::default();
        config.defaults.recursive = true;
        let ctx = context_with(config, GlobalOptions::default());

        let walk = ctx.walk_options();
        assert!(walk.recursive);
        assert!(!walk.hidden);

        let mut options = GlobalOptions::default();
        options.all = true;
        let ctx = context_with(Config::default(), options);
        assert!(ctx.walk_options().hidden);
        assert!(!ctx.walk_options().recursive);
    }
}
