//! Progress reports printed for every improvement of the global best.

use std::fmt;
use std::time::Duration;

use crate::scorer::Candidate;

/// A snapshot of the search taken when the global best improves.
#[derive(Debug, Clone, Copy)]
pub struct Report<'a> {
    /// Time since the search started
    pub elapsed: Duration,
    /// Keys generated across all workers
    pub total_keys: u64,
    /// Whether to include the generation rate
    pub verbose: bool,
    /// The new global best
    pub best: &'a Candidate,
}

impl Report<'_> {
    /// Returns keys per whole second elapsed, or `None` before the first second.
    pub fn rate(&self) -> Option<u64> {
        match self.elapsed.as_secs() {
            0 => None,
            secs => Some(self.total_keys / secs),
        }
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "----- {} --- {} keys tried",
            format_duration(self.elapsed),
            self.total_keys
        )?;
        if self.verbose {
            if let Some(rate) = self.rate() {
                writeln!(f, "----- generation speed {} keys per second", rate)?;
            }
        }

        let keypair = self.best.keypair();
        writeln!(f, "Priv: {}", keypair.secret_key().to_hex())?;
        writeln!(f, "Pub: {}", keypair.public_key().to_hex())?;
        write!(f, "IP: {}", self.best.address())
    }
}

/// Formats a duration the way Go's `time.Duration` prints, e.g. `1h2m3.5s`,
/// `1.25s`, `350ms`, `12µs`.
pub fn format_duration(duration: Duration) -> String {
    const NS_PER_US: u128 = 1_000;
    const NS_PER_MS: u128 = 1_000_000;
    const NS_PER_SEC: u128 = 1_000_000_000;
    const NS_PER_MIN: u128 = 60 * NS_PER_SEC;
    const NS_PER_HOUR: u128 = 60 * NS_PER_MIN;

    let ns = duration.as_nanos();
    if ns == 0 {
        return "0s".into();
    }
    if ns < NS_PER_US {
        return format!("{}ns", ns);
    }
    if ns < NS_PER_MS {
        return format!("{}{}µs", ns / NS_PER_US, fraction(ns % NS_PER_US, 3));
    }
    if ns < NS_PER_SEC {
        return format!(
            "{}{}ms",
            ns / NS_PER_MS,
            fraction((ns % NS_PER_MS) / NS_PER_US, 3)
        );
    }

    let mut out = String::new();
    let mut rest = ns;
    if rest >= NS_PER_HOUR {
        out.push_str(&format!("{}h", rest / NS_PER_HOUR));
        rest %= NS_PER_HOUR;
    }
    if !out.is_empty() || rest >= NS_PER_MIN {
        out.push_str(&format!("{}m", rest / NS_PER_MIN));
        rest %= NS_PER_MIN;
    }
    out.push_str(&format!(
        "{}{}s",
        rest / NS_PER_SEC,
        fraction(rest % NS_PER_SEC, 9)
    ));
    out
}

/// Renders `value` as a `digits`-wide decimal fraction with trailing zeros removed.
fn fraction(value: u128, digits: usize) -> String {
    if value == 0 {
        return String::new();
    }
    let padded = format!("{:0width$}", value, width = digits);
    format!(".{}", padded.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{generate, Seed};

    fn candidate() -> Candidate {
        let seed = Seed::from_hex("ef04f3926ed9959d407ab2c14c04fe4742cdf833bad31ea8c797b6ee10e7a5e2")
            .unwrap();
        Candidate::new(generate(&seed))
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::ZERO), "0s");
        assert_eq!(format_duration(Duration::from_nanos(850)), "850ns");
        assert_eq!(format_duration(Duration::from_nanos(12_500)), "12.5µs");
        assert_eq!(format_duration(Duration::from_millis(350)), "350ms");
        assert_eq!(format_duration(Duration::from_micros(1_250)), "1.25ms");
        assert_eq!(format_duration(Duration::from_millis(1_500)), "1.5s");
        assert_eq!(format_duration(Duration::from_secs(42)), "42s");
        assert_eq!(format_duration(Duration::from_secs(60)), "1m0s");
        assert_eq!(format_duration(Duration::from_millis(62_500)), "1m2.5s");
        assert_eq!(format_duration(Duration::from_secs(3_600)), "1h0m0s");
        assert_eq!(format_duration(Duration::from_secs(3_723)), "1h2m3s");
    }

    #[test]
    fn test_report_block() {
        let best = candidate();
        let report = Report {
            elapsed: Duration::from_millis(2_500),
            total_keys: 1_000,
            verbose: false,
            best: &best,
        };

        let expected = "----- 2.5s --- 1000 keys tried\n\
             Priv: ef04f3926ed9959d407ab2c14c04fe4742cdf833bad31ea8c797b6ee10e7a5e2c14f47307e7b1a45df5ba772fe1f36249996df3cd346e192f0e9eff49fa4c506\n\
             Pub: c14f47307e7b1a45df5ba772fe1f36249996df3cd346e192f0e9eff49fa4c506\n\
             IP: 200:7d61:719f:309:cb74:4148:b11a:3c1";
        assert_eq!(report.to_string(), expected);
    }

    #[test]
    fn test_verbose_report_includes_rate() {
        let best = candidate();
        let report = Report {
            elapsed: Duration::from_millis(2_500),
            total_keys: 1_000,
            verbose: true,
            best: &best,
        };
        assert_eq!(report.rate(), Some(500));
        assert!(report
            .to_string()
            .contains("----- generation speed 500 keys per second\n"));
    }

    #[test]
    fn test_rate_omitted_in_first_second() {
        let best = candidate();
        let report = Report {
            elapsed: Duration::from_millis(400),
            total_keys: 10,
            verbose: true,
            best: &best,
        };
        assert_eq!(report.rate(), None);
        assert!(!report.to_string().contains("generation speed"));
    }
}
