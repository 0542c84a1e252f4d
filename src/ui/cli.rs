use clap::{Parser, Subcommand};

/// jotter - Small local notes with live search
#[derive(Parser, Debug)]
#[command(name = "jotter")]
#[command(about = "A small local note-taking utility with live search and highlighting", long_about = None)]
#[command(version)]
#[command(subcommand_required = false)]
#[command(arg_required_else_help = false)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Custom base directory (default: $JOTTER_HOME or ~/.jotter)
    #[arg(long, global = true)]
    pub base_dir: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the data directory and note database
    Init,
    /// List all notes, most recently modified first
    List {
        /// Print notes as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show notes whose title or content contains a term
    Search {
        /// Search term (case-insensitive)
        term: String,
    },
    /// Create a note
    Add {
        /// Note title (may be empty)
        #[arg(short, long, default_value = "")]
        title: String,
        /// Note content
        #[arg(short, long)]
        content: String,
    },
    /// Change a note's title and/or content
    Edit {
        /// Note id
        id: i64,
        /// New title (keeps the current one when omitted)
        #[arg(short, long)]
        title: Option<String>,
        /// New content (keeps the current one when omitted)
        #[arg(short, long)]
        content: Option<String>,
    },
    /// Delete a note
    Delete {
        /// Note id
        id: i64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_opens_interactive() {
        let cli = Cli::try_parse_from(["jotter"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.base_dir.is_none());
    }

    #[test]
    fn test_add_defaults_to_empty_title() {
        let cli = Cli::try_parse_from(["jotter", "add", "--content", "groceries"]).unwrap();
        match cli.command {
            Some(Commands::Add { title, content }) => {
                assert_eq!(title, "");
                assert_eq!(content, "groceries");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_base_dir_after_subcommand() {
        let cli = Cli::try_parse_from(["jotter", "search", "bud", "--base-dir", "/tmp/j"]).unwrap();
        assert_eq!(cli.base_dir.as_deref(), Some("/tmp/j"));
        assert!(matches!(cli.command, Some(Commands::Search { ref term }) if term == "bud"));
    }

    #[test]
    fn test_edit_fields_are_optional() {
        let cli = Cli::try_parse_from(["jotter", "edit", "3", "-c", "new body"]).unwrap();
        match cli.command {
            Some(Commands::Edit { id, title, content }) => {
                assert_eq!(id, 3);
                assert!(title.is_none());
                assert_eq!(content.as_deref(), Some("new body"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
