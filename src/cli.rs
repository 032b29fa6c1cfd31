use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::models::TagType;

#[derive(Parser)]
#[command(name = "eventadmin")]
#[command(about = "Review event responses and manage event tags from the terminal")]
#[command(version)]
pub struct Cli {
    /// Backend base URL (overrides EVENTADMIN_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Event to administer (overrides EVENTADMIN_EVENT_ID)
    #[arg(long, global = true)]
    pub event_id: Option<i64>,

    /// Event key used for response page links (overrides EVENTADMIN_EVENT_KEY)
    #[arg(long, global = true)]
    pub event_key: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the response table
    Responses {
        /// Question ids whose answers become columns (comma separated)
        #[arg(short, long, value_delimiter = ',')]
        select: Vec<i64>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Also write the table to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Include responses that were started but never submitted
        #[arg(long)]
        include_unsubmitted: bool,
    },

    /// List the questions of the event
    Questions,

    /// Manage event tags
    Tags {
        #[command(subcommand)]
        action: TagCommand,
    },

    /// Launch the terminal UI
    Tui,
}

#[derive(Subcommand)]
pub enum TagCommand {
    /// List tags
    List,

    /// Create a tag
    Add {
        /// Tag type (response, registration)
        #[arg(short = 't', long = "type")]
        tag_type: String,

        /// Name per language, as LANG=TEXT (repeatable)
        #[arg(short, long)]
        name: Vec<String>,

        /// Description per language, as LANG=TEXT (repeatable)
        #[arg(short, long)]
        description: Vec<String>,
    },

    /// Replace an existing tag
    Update {
        /// Tag id
        id: i64,

        /// Tag type (response, registration)
        #[arg(short = 't', long = "type")]
        tag_type: String,

        /// Name per language, as LANG=TEXT (repeatable)
        #[arg(short, long)]
        name: Vec<String>,

        /// Description per language, as LANG=TEXT (repeatable)
        #[arg(short, long)]
        description: Vec<String>,
    },

    /// Delete a tag
    Delete {
        /// Tag id
        id: i64,
    },
}

/// How the response table is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl Commands {
    pub fn parse_output_format(format: &str) -> Result<OutputFormat> {
        match format.to_lowercase().as_str() {
            "text" | "table" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(anyhow::anyhow!(
                "Unsupported output format: {}. Supported formats: text, json",
                other
            )),
        }
    }
}

impl TagCommand {
    pub fn parse_tag_type(tag_type: &str) -> Result<TagType> {
        TagType::parse(&tag_type.to_uppercase()).ok_or_else(|| {
            anyhow::anyhow!(
                "Unsupported tag type: {}. Supported types: response, registration",
                tag_type
            )
        })
    }

    /// Split `LANG=TEXT` arguments into language code and text
    pub fn parse_translations(values: &[String]) -> Result<Vec<(String, String)>> {
        values
            .iter()
            .map(|value| {
                let (lang, text) = value
                    .split_once('=')
                    .ok_or_else(|| anyhow::anyhow!("Expected LANG=TEXT, got: {}", value))?;
                let lang = lang.trim();
                if lang.is_empty() {
                    return Err(anyhow::anyhow!("Missing language code in: {}", value));
                }
                Ok((lang.to_string(), text.to_string()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_responses_command() {
        let cli = Cli::parse_from([
            "eventadmin",
            "--event-id",
            "12",
            "responses",
            "--select",
            "3,8",
            "--include-unsubmitted",
        ]);
        assert_eq!(cli.event_id, Some(12));
        match cli.command {
            Commands::Responses { select, format, csv, include_unsubmitted } => {
                assert_eq!(select, vec![3, 8]);
                assert_eq!(format, "text");
                assert!(csv.is_none());
                assert!(include_unsubmitted);
            }
            _ => panic!("expected responses command"),
        }
    }

    #[test]
    fn test_parse_tag_add() {
        let cli = Cli::parse_from([
            "eventadmin",
            "tags",
            "add",
            "--type",
            "registration",
            "--name",
            "en=Speaker",
            "--name",
            "fr=Orateur",
        ]);
        match cli.command {
            Commands::Tags { action: TagCommand::Add { tag_type, name, description } } => {
                assert_eq!(TagCommand::parse_tag_type(&tag_type).unwrap(), TagType::Registration);
                let names = TagCommand::parse_translations(&name).unwrap();
                assert_eq!(names[1], ("fr".to_string(), "Orateur".to_string()));
                assert!(description.is_empty());
            }
            _ => panic!("expected tags add command"),
        }
    }

    #[test]
    fn test_parse_helpers_reject_bad_input() {
        assert_eq!(Commands::parse_output_format("JSON").unwrap(), OutputFormat::Json);
        assert!(Commands::parse_output_format("xml").is_err());
        assert!(TagCommand::parse_tag_type("label").is_err());
        assert!(TagCommand::parse_translations(&["Speaker".to_string()]).is_err());
        assert!(TagCommand::parse_translations(&["=Speaker".to_string()]).is_err());
        assert_eq!(
            TagCommand::parse_translations(&["en=a=b".to_string()]).unwrap(),
            vec![("en".to_string(), "a=b".to_string())]
        );
    }
}
