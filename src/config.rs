//! Runtime configuration for the key search.

use std::time::Duration;

use clap::Parser;

use crate::coordinator::SearchSettings;
use crate::scorer::SearchMode;

/// Largest meaningful leading-zero-bit target (the key width).
pub const MAX_TARGET_ZERO_BITS: u32 = 256;

/// Yggdrasil key generator: searches Ed25519 keys for short IPv6 addresses
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Number of worker threads (0 = number of CPU cores)
    #[arg(short = 't', long, default_value = "0")]
    pub threads: usize,

    /// Maximum execution time in seconds (0 = no limit)
    #[arg(short = 'T', long, default_value = "0")]
    pub timeout: u64,

    /// Stop once a key has this many leading zero bits (0 = no target)
    #[arg(short = 'z', long, default_value = "0")]
    pub target_zeros: u32,

    /// Enable verbose output with additional statistics
    #[arg(short = 'v', long, default_value = "false")]
    pub verbose: bool,

    /// Search for zero groups in the IPv6 address instead of leading zero bits
    #[arg(long, default_value = "false")]
    pub ipv6_nice: bool,
}

impl Config {
    /// Returns the selected search mode
    pub fn mode(&self) -> SearchMode {
        if self.ipv6_nice {
            SearchMode::MostZeroAddressGroups
        } else {
            SearchMode::HighestLeadingZeroBits
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_zeros > MAX_TARGET_ZERO_BITS {
            return Err(ConfigError::InvalidTarget(format!(
                "{} exceeds the {}-bit key width",
                self.target_zeros, MAX_TARGET_ZERO_BITS
            )));
        }

        Ok(())
    }

    /// Converts the command line into search settings
    pub fn search_settings(&self) -> SearchSettings {
        SearchSettings {
            workers: self.threads,
            time_budget: (self.timeout > 0).then(|| Duration::from_secs(self.timeout)),
            target_zero_bits: (self.target_zeros > 0).then_some(self.target_zeros),
            mode: self.mode(),
            verbose: self.verbose,
            ..SearchSettings::default()
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid target: {0}")]
    InvalidTarget(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        Config::try_parse_from(std::iter::once("ygg_genkeys").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]);
        assert!(config.validate().is_ok());

        let settings = config.search_settings();
        assert_eq!(settings.workers, 0);
        assert_eq!(settings.worker_count(), num_cpus::get());
        assert_eq!(settings.time_budget, None);
        assert_eq!(settings.target_zero_bits, None);
        assert_eq!(settings.mode, SearchMode::HighestLeadingZeroBits);
        assert!(!settings.verbose);
    }

    #[test]
    fn test_all_flags() {
        let config = parse(&["-t", "3", "-T", "60", "-z", "24", "-v", "--ipv6-nice"]);
        assert!(config.validate().is_ok());

        let settings = config.search_settings();
        assert_eq!(settings.workers, 3);
        assert_eq!(settings.worker_count(), 3);
        assert_eq!(settings.time_budget, Some(Duration::from_secs(60)));
        assert_eq!(settings.target_zero_bits, Some(24));
        assert_eq!(settings.mode, SearchMode::MostZeroAddressGroups);
        assert!(settings.verbose);
    }

    #[test]
    fn test_invalid_target() {
        let config = parse(&["--target-zeros", "300"]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_unknown_flag() {
        assert!(Config::try_parse_from(["ygg_genkeys", "--bogus"]).is_err());
        assert!(Config::try_parse_from(["ygg_genkeys", "-t", "many"]).is_err());
    }
}
