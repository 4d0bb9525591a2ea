use clap::{Parser, Subcommand};
use jotter::error::{JotError, Result};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "jot", version)]
#[command(about = "Keep notes in books from the command line", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Data directory (defaults to $JOTTER_HOME, then the platform data dir)
    #[arg(long, global = true, value_name = "DIR")]
    pub home: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Upgrade the data directory to the latest schema
    Migrate,

    /// List books
    #[command(alias = "b")]
    Books,

    /// List the notes in a book
    #[command(alias = "v")]
    View {
        /// Book to show (defaults to the current book)
        book: Option<String>,
    },

    /// Add a note to a book (defaults to the current book)
    #[command(alias = "a")]
    Add {
        /// [BOOK] CONTENT
        #[arg(required = true, num_args = 1..=2, value_name = "ARGS")]
        args: Vec<String>,
    },

    /// Replace the content of a note
    #[command(alias = "e")]
    Edit {
        /// [BOOK] INDEX, where INDEX is 1-based as shown by `view`
        #[arg(required = true, num_args = 1..=2, value_name = "TARGET")]
        target: Vec<String>,

        /// New content
        #[arg(short, long)]
        content: String,
    },

    /// Remove a note
    #[command(alias = "rm")]
    Remove {
        /// [BOOK] INDEX, where INDEX is 1-based as shown by `view`
        #[arg(required = true, num_args = 1..=2, value_name = "TARGET")]
        target: Vec<String>,
    },

    /// Find notes containing every search term
    #[command(alias = "f")]
    Find {
        query: String,

        /// Only search this book
        #[arg(short, long)]
        book: Option<String>,
    },

    /// Show or change configuration
    Config {
        /// Configuration key (book, editor, api_key)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}

/// Split `[BOOK] LAST` into an optional book and the last argument.
pub fn split_book(args: &[String]) -> (Option<&str>, &str) {
    match args {
        [book, last] => (Some(book.as_str()), last.as_str()),
        [last] => (None, last.as_str()),
        _ => (None, ""),
    }
}

/// `[BOOK] INDEX` with a 1-based index.
pub fn parse_target(target: &[String]) -> Result<(Option<&str>, usize)> {
    let (book, index) = split_book(target);
    let index = index
        .parse()
        .map_err(|_| JotError::Api(format!("Invalid index: {}", index)))?;
    Ok((book, index))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_edit_with_content_flag() {
        let cli = Cli::try_parse_from(["jot", "edit", "js", "2", "-c", "new"]).unwrap();
        match cli.command {
            Some(Commands::Edit { target, content }) => {
                assert_eq!(parse_target(&target).unwrap(), (Some("js"), 2));
                assert_eq!(content, "new");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn edit_and_remove_accept_index_alone() {
        let cli = Cli::try_parse_from(["jot", "edit", "3", "-c", "x"]).unwrap();
        match cli.command {
            Some(Commands::Edit { target, .. }) => {
                assert_eq!(parse_target(&target).unwrap(), (None, 3));
            }
            other => panic!("unexpected command: {:?}", other),
        }

        let cli = Cli::try_parse_from(["jot", "rm", "1"]).unwrap();
        match cli.command {
            Some(Commands::Remove { target }) => {
                assert_eq!(parse_target(&target).unwrap(), (None, 1));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn add_takes_optional_book() {
        let cli = Cli::try_parse_from(["jot", "add", "hello"]).unwrap();
        match cli.command {
            Some(Commands::Add { args }) => assert_eq!(split_book(&args), (None, "hello")),
            other => panic!("unexpected command: {:?}", other),
        }

        let cli = Cli::try_parse_from(["jot", "add", "js", "hello"]).unwrap();
        match cli.command {
            Some(Commands::Add { args }) => {
                assert_eq!(split_book(&args), (Some("js"), "hello"))
            }
            other => panic!("unexpected command: {:?}", other),
        }

        assert!(Cli::try_parse_from(["jot", "add", "a", "b", "c"]).is_err());
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let cli = Cli::try_parse_from(["jot", "books", "--home", "/tmp/j", "-v"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.home, Some(PathBuf::from("/tmp/j")));
    }

    #[test]
    fn rejects_non_numeric_index() {
        let target = vec!["js".to_string(), "one".to_string()];
        let err = parse_target(&target).unwrap_err();
        assert_eq!(err.to_string(), "Invalid index: one");
    }
}
