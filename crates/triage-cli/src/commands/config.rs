//! Config command implementation.

use anyhow::Result;

use crate::config::Config;

/// Print the effective configuration.
pub fn show(config: &Config) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(config)?);
    println!();
    println!(
        "credential: {} ({})",
        if config.has_credential() {
            "present"
        } else {
            "absent"
        },
        config.credentials().var()
    );
    if let Some(path) = Config::config_file_path() {
        let state = if path.exists() { "" } else { " (not found)" };
        println!("config file: {}{}", path.display(), state);
    }
    Ok(())
}
