use anyhow::Result;
use clap::CommandFactory;
use std::collections::HashMap;

use crate::cli::args::{Args, Commands};
use crate::cli::commands::{run_assess_command, run_prompt_command, run_template_command};
use crate::config::PhysioConfig;

pub struct RootCommand;

impl RootCommand {
    pub async fn execute(args: Args) -> Result<()> {
        if args.generate_config {
            println!("{}", PhysioConfig::generate_default_config());
            return Ok(());
        }

        let Some(command) = &args.command else {
            Args::command().print_help()?;
            return Ok(());
        };

        let env_vars: HashMap<String, String> = std::env::vars().collect();
        let config = PhysioConfig::load_with_precedence(args.config.as_deref(), &args, &env_vars)?;

        match command {
            Commands::Assess { intake, output } => {
                eprintln!(
                    r#"
     ┌─┐
     │+│   P H Y S I O - A S S E S S
     └─┘   v{}
"#,
                    env!("CARGO_PKG_VERSION")
                );
                run_assess_command(&config, intake, output.as_deref()).await
            }
            Commands::Prompt { intake } => run_prompt_command(&config, intake),
            Commands::IntakeTemplate => run_template_command(&config),
        }
    }
}
