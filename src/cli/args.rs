use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = None
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Model name passed to the completion service
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    /// Prompt language: zh or en
    #[arg(short, long, global = true)]
    pub language: Option<String>,

    /// Sanitization policy for intake values: identity or escape-control
    #[arg(long, global = true)]
    pub sanitize: Option<String>,

    /// Directory that receives one JSON audit record per submission
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[arg(long, global = true)]
    pub api_base_url: Option<String>,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    pub generate_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Stream a physiotherapy assessment for an intake file
    Assess {
        /// Intake file (TOML, or JSON with a .json extension)
        #[arg(short, long)]
        intake: PathBuf,

        /// Also write the final assessment text to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the prompt built from an intake file without submitting it
    Prompt {
        #[arg(short, long)]
        intake: PathBuf,
    },
    /// Print an intake file skeleton listing every field and its choices
    IntakeTemplate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assess_args() {
        let args = Args::try_parse_from([
            "physio-assess",
            "-v",
            "--language",
            "en",
            "assess",
            "--intake",
            "intake.toml",
            "-o",
            "out.md",
        ])
        .unwrap();

        assert_eq!(args.verbosity, 1);
        assert_eq!(args.language.as_deref(), Some("en"));
        match args.command {
            Some(Commands::Assess { intake, output }) => {
                assert_eq!(intake, PathBuf::from("intake.toml"));
                assert_eq!(output, Some(PathBuf::from("out.md")));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = Args::try_parse_from([
            "physio-assess",
            "prompt",
            "--intake",
            "intake.json",
            "--sanitize",
            "escape-control",
        ])
        .unwrap();
        assert_eq!(args.sanitize.as_deref(), Some("escape-control"));
        assert!(matches!(args.command, Some(Commands::Prompt { .. })));
    }

    #[test]
    fn test_intake_required() {
        assert!(Args::try_parse_from(["physio-assess", "assess"]).is_err());
    }

    #[test]
    fn test_generate_config_without_command() {
        let args = Args::try_parse_from(["physio-assess", "--generate-config"]).unwrap();
        assert!(args.generate_config);
        assert!(args.command.is_none());
    }
}
