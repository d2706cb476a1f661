//! One-shot classification from the command line.

use anyhow::Result;
use triage_classifier::Classifier;

use crate::config::Config;

/// Classify `description` and print the result as JSON on stdout.
pub async fn execute(config: &Config, description: &str) -> Result<()> {
    let classifier = Classifier::from_config(config.classifier.clone());
    let classification = classifier.classify(description).await?;
    println!("{}", serde_json::to_string(&classification)?);
    Ok(())
}
