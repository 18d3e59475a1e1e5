use clap::{Args, Subcommand};

use msgsync::config::Config;

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show the store settings in effect and where each came from
    Show {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

impl ConfigCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let ConfigSubcommand::Show { json } = &self.command;

        if *json {
            println!("{}", serde_json::to_string_pretty(config)?);
            return Ok(());
        }

        match &config.config_file {
            Some(path) => println!("config file:  {}", path.display()),
            None => println!(
                "config file:  {} (not found)",
                Config::default_config_path().display()
            ),
        }
        println!(
            "server_url:   {} ({})",
            config.server_url.value, config.server_url.source
        );
        println!(
            "timeout_secs: {} ({})",
            config.timeout_secs.value, config.timeout_secs.source
        );
        Ok(())
    }
}
