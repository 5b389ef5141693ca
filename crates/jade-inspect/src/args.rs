//! Command-line arguments.
//!
//! ```text
//! jade-inspect [--config FILE] [--language NAME] [--ontology NAME] [FILE]
//! ```
//!
//! Content is read from `FILE`, or from standard input when no file is
//! given. Flags override the `inspect` section of the configuration.

use std::path::PathBuf;

use clap::Parser;

/// Decode, validate and print the content of a JADE message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Parser)]
#[command(name = "jade-inspect")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the configuration file
    #[arg(short, long, env = "JADE_CONTENT_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Content language of the input (overrides `inspect.language`)
    #[arg(short, long, env = "JADE_INSPECT_LANGUAGE", value_name = "NAME")]
    pub language: Option<String>,

    /// Ontology declared on the decoded message
    #[arg(short, long, value_name = "NAME")]
    pub ontology: Option<String>,

    /// Input file; standard input when absent
    #[arg(value_name = "FILE")]
    pub input: Option<PathBuf>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("jade-inspect").chain(args.iter().copied()))
    }

    #[test]
    fn command_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn flags_and_input() {
        let args = parse(&["--language", "json", "-o", "shop", "content.sl"]).unwrap();
        assert_eq!(args.language.as_deref(), Some("json"));
        assert_eq!(args.ontology.as_deref(), Some("shop"));
        assert_eq!(args.input, Some(PathBuf::from("content.sl")));
    }

    #[test]
    fn bad_command_lines() {
        assert!(parse(&["--language"]).is_err());
        assert!(parse(&["--verbose"]).is_err());
        assert!(parse(&["a.sl", "b.sl"]).is_err());
    }
}
