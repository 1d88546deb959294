use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vgdeck")]
#[command(author, version, about)]
#[command(long_about = "A slide deck presenter for XML deck files.\n\n\
    Slides are described declaratively (lists, text, images placed in percent\n\
    of the canvas) and shown fullscreen, driven by keystrokes in the terminal.\n\n\
    Examples:\n  \
    vgdeck talk.xml              Present a deck (fullscreen)\n  \
    vgdeck talk.xml --windowed   Present in a window\n  \
    vgdeck a.xml b.xml           Present decks one after another\n  \
    vgdeck talk.xml --dump       Print the decoded deck and its draw list")]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Deck files to present, in order
    pub files: Vec<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Launch in a window instead of fullscreen
    #[arg(long, global = false)]
    pub windowed: bool,

    /// Start on a specific slide (1-indexed)
    #[arg(long, global = false)]
    pub slide: Option<usize>,

    /// Canvas width for decks that do not declare one
    #[arg(long, global = false)]
    pub width: Option<u32>,

    /// Canvas height for decks that do not declare one
    #[arg(long, global = false)]
    pub height: Option<u32>,

    /// Print the decoded decks and their draw commands instead of presenting
    #[arg(long, global = false)]
    pub dump: bool,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// View and modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Display current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g. defaults.width, defaults.windowed, defaults.line_spacing)
        key: String,

        /// Value to set
        value: String,
    },
}

#[derive(Clone, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

impl Cli {
    /// Verbosity as a tracing filter directive; `RUST_LOG` still wins when set.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }

    pub fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Commands::Config { command }) => crate::commands::config::run(command),
            Some(Commands::Completion { shell }) => {
                crate::commands::completion::run(shell);
                Ok(())
            }
            Some(Commands::Version) => {
                println!("vgdeck {}", env!("CARGO_PKG_VERSION"));
                Ok(())
            }
            None => {
                if self.files.is_empty() {
                    use clap::CommandFactory;
                    let mut cmd = Self::command();
                    cmd.print_help()?;
                    println!();
                    return Ok(());
                }
                if let Some(missing) = self.files.iter().find(|f| !f.exists()) {
                    anyhow::bail!("File not found: {}", missing.display());
                }
                if self.slide == Some(0) {
                    anyhow::bail!("Slides are numbered from 1");
                }

                let config = crate::config::Config::load_or_default();
                let mut fallback = config.fallback_canvas();
                if let Some(width) = self.width {
                    fallback.width = width;
                }
                if let Some(height) = self.height {
                    fallback.height = height;
                }

                if self.dump {
                    return crate::commands::dump::run(&self.files, fallback, config.spacing());
                }

                let options = crate::app::Options {
                    windowed: self.windowed || config.windowed(),
                    start: self.slide.map(|n| n - 1),
                    fallback,
                    spacing: config.spacing(),
                    prefer_native: self.width.is_none() && self.height.is_none(),
                };
                crate::app::run(self.files, options)
            }
        }
    }
}
