//! Stats command implementation

use super::{build_engine, load_settings, mapping_path, EXIT_CONFIG_ERROR, EXIT_SUCCESS};
use crate::anonymization::engine::TOTAL_KEY;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the stats command
#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Mapping file to summarize
    #[arg(short, long)]
    pub mapping: Option<PathBuf>,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

impl StatsArgs {
    /// Execute the stats command
    pub fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let Some(config) = load_settings(config_path) else {
            return Ok(EXIT_CONFIG_ERROR);
        };

        let mapping = mapping_path(&self.mapping, &config);
        if !mapping.exists() {
            println!("❌ Mapping file not found: {}", mapping.display());
            return Ok(EXIT_CONFIG_ERROR);
        }

        let Some(mut engine) = build_engine(&config) else {
            return Ok(EXIT_CONFIG_ERROR);
        };
        if let Err(e) = engine.load_mapping(&mapping) {
            println!("❌ Failed to load mapping {}", mapping.display());
            println!("   Error: {e}");
            return Ok(EXIT_CONFIG_ERROR);
        }

        let stats = engine.statistics();
        if self.json {
            println!("{}", serde_json::to_string_pretty(&stats)?);
            return Ok(EXIT_SUCCESS);
        }

        println!("📊 Mapping Statistics: {}", mapping.display());
        println!();
        println!("{:<24} {:>8}", "Type", "Values");
        println!("{}", "-".repeat(33));
        for (pii_type, count) in stats.iter().filter(|(k, _)| k.as_str() != TOTAL_KEY) {
            println!("{pii_type:<24} {count:>8}");
        }
        println!("{}", "-".repeat(33));
        println!("{:<24} {:>8}", TOTAL_KEY, stats.get(TOTAL_KEY).copied().unwrap_or(0));
        println!();

        Ok(EXIT_SUCCESS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::PiiMapping;
    use tempfile::tempdir;

    #[test]
    fn test_stats_from_mapping() {
        let dir = tempdir().unwrap();
        let mapping_file = dir.path().join("mapping.json");
        let mut mapping = PiiMapping::new();
        mapping.insert("a@b.io", "<EMAIL_0a1b2c3d>").unwrap();
        mapping.save(&mapping_file).unwrap();

        let args = StatsArgs {
            mapping: Some(mapping_file),
            json: true,
        };
        let config = dir.path().join("absent.toml");
        assert_eq!(args.execute(config.to_str().unwrap()).unwrap(), EXIT_SUCCESS);
    }
}
