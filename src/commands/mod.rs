// Commands module - handles CLI command execution

use anyhow::Result;
use std::path::Path;

use crate::config::{self, Config};
use crate::host::HostFormat;

pub mod render;
pub mod run;

pub use render::{handle_render, render_stream};
pub use run::handle_run;

/// Host format from the command line, then the config file, then the default
pub fn resolve_format(cli_format: Option<&str>, file: Option<&Config>) -> Result<HostFormat> {
    let name = cli_format
        .map(String::from)
        .or_else(|| file.map(|c| c.run.format.clone()))
        .unwrap_or_else(config::default_format);

    Ok(name.parse()?)
}

/// Write the default configuration file
pub fn handle_init_config(path: &Path) -> Result<()> {
    let toml_content = Config::default().to_toml();
    std::fs::write(path, toml_content)?;
    println!("Configuration file created: {}", path.display());
    println!("\nConfiguration precedence:");
    println!("  1. Command-line arguments (highest)");
    println!("  2. Configuration file");
    println!("  3. Host format defaults (lowest)");
    Ok(())
}

/// Handle shell completion
pub fn handle_completion(shell_type: &str) -> Result<()> {
    use clap::CommandFactory;
    use clap_complete::{Shell, generate};

    let shell = match shell_type.to_lowercase().as_str() {
        "bash" => Shell::Bash,
        "zsh" => Shell::Zsh,
        "fish" => Shell::Fish,
        "elvish" => Shell::Elvish,
        "powershell" => Shell::PowerShell,
        _ => {
            anyhow::bail!(
                "Unsupported shell: {}. Supported: bash, zsh, fish, elvish, powershell",
                shell_type
            );
        }
    };

    let mut cmd = crate::cli::Cli::command();
    let name = cmd.get_name().to_string();
    let mut stdout = std::io::stdout();

    generate(shell, &mut cmd, name, &mut stdout);

    Ok(())
}
