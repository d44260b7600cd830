//! Command-line argument definitions for the Wardley CLI.
//!
//! [`Args`] holds the options shared by every command; [`Command`] selects
//! what to do with the input map.

use clap::{Parser, Subcommand};

/// Command-line arguments for the Wardley map tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse a map and report every malformed line
    Check {
        /// Path to the input map
        input: String,
    },

    /// Render a map to SVG
    Render {
        /// Path to the input map
        input: String,

        /// Path to the output SVG file
        #[arg(short, long, default_value = "out.svg")]
        output: String,
    },

    /// Move an element by rewriting its coordinates
    Move {
        /// Path to the input map
        input: String,

        /// Name of the component, anchor, submap, accelerator or note
        name: String,

        #[arg(allow_negative_numbers = true)]
        visibility: f64,

        #[arg(allow_negative_numbers = true)]
        maturity: f64,

        /// Write the edited map here instead of in place
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Change the maturity of an `evolve` statement
    Evolve {
        /// Path to the input map
        input: String,

        /// Name of the evolving element
        name: String,

        #[arg(allow_negative_numbers = true)]
        maturity: f64,

        /// Write the edited map here instead of in place
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Re-render the map whenever the file changes
    Watch {
        /// Path to the input map
        input: String,

        /// Path to the output SVG file
        #[arg(short, long, default_value = "out.svg")]
        output: String,
    },
}

impl Command {
    /// The map file the command reads.
    pub fn input(&self) -> &str {
        match self {
            Command::Check { input }
            | Command::Render { input, .. }
            | Command::Move { input, .. }
            | Command::Evolve { input, .. }
            | Command::Watch { input, .. } => input,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_accepts_global_options_after_command() {
        let args = Args::try_parse_from([
            "wardley", "move", "tea.owm", "Cup of Tea", "0.5", "0.25", "--log-level", "debug",
        ])
        .unwrap();

        assert_eq!(args.log_level, "debug");
        match args.command {
            Command::Move { name, visibility, maturity, output, .. } => {
                assert_eq!(name, "Cup of Tea");
                assert_eq!(visibility, 0.5);
                assert_eq!(maturity, 0.25);
                assert!(output.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_render_defaults() {
        let args = Args::try_parse_from(["wardley", "render", "tea.owm"]).unwrap();
        assert_eq!(args.log_level, "info");
        assert!(args.config.is_none());
        assert_eq!(args.command.input(), "tea.owm");
        assert!(matches!(args.command, Command::Render { ref output, .. } if output == "out.svg"));
    }

    #[test]
    fn test_missing_command_is_rejected() {
        assert!(Args::try_parse_from(["wardley", "tea.owm"]).is_err());
    }
}
