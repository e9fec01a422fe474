use crate::analysis::HistoricalStatistics;
use crate::consts::{
    DEFAULT_ATTEMPT_BUDGET, DEFAULT_MAX_WARNINGS, DEFAULT_PROGRESS_INTERVAL, DEFAULT_WEIGHTED_POOL,
    TICKET_SIZE, UNIVERSE,
};
use crate::error::{LfResult, LotoError};
use crate::features::Feature;
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use strum::IntoEnumIterator;

#[derive(Args, Debug, Clone, Default)]
pub struct Config {
    #[command(flatten)]
    pub generation: GenerationParams,
    #[command(flatten)]
    pub search: SearchParams,
    #[command(flatten)]
    pub criteria: BalanceCriteria,
}

#[derive(Args, Debug, Clone)]
pub struct GenerationParams {
    /// Tickets to generate
    #[arg(short = 'n', long, default_value_t = 5)]
    pub count: usize,
    /// Size of the most-frequent pool used by the weighted strategy
    #[arg(long, default_value_t = DEFAULT_WEIGHTED_POOL)]
    pub pool_size: usize,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            count: 5,
            pool_size: DEFAULT_WEIGHTED_POOL,
        }
    }
}

impl GenerationParams {
    pub fn validate(&self) -> LfResult<()> {
        validate_count(self.count)?;
        if self.pool_size == 0 {
            return Err(LotoError::validation("pool_size", "must be at least 1"));
        }
        Ok(())
    }
}

#[derive(Args, Debug, Clone)]
pub struct SearchParams {
    /// Balanced search attempts per ticket before falling back to random
    #[arg(long, default_value_t = DEFAULT_ATTEMPT_BUDGET)]
    pub attempts: usize,
    /// Attempts between progress reports
    #[arg(long, default_value_t = DEFAULT_PROGRESS_INTERVAL)]
    pub progress_interval: usize,
    /// Exhaustion warnings surfaced per batch
    #[arg(long, default_value_t = DEFAULT_MAX_WARNINGS)]
    pub max_warnings: usize,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_ATTEMPT_BUDGET,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            max_warnings: DEFAULT_MAX_WARNINGS,
        }
    }
}

impl SearchParams {
    pub fn validate(&self) -> LfResult<()> {
        if self.attempts == 0 {
            return Err(LotoError::validation("attempts", "must be at least 1"));
        }
        if self.progress_interval == 0 {
            return Err(LotoError::validation(
                "progress_interval",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Inclusive feature ranges a balanced ticket must satisfy.
#[derive(Args, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceCriteria {
    #[arg(long, default_value_t = 2000)]
    pub sum_min: u32,
    #[arg(long, default_value_t = 3000)]
    pub sum_max: u32,

    #[arg(long, default_value_t = 20)]
    pub even_min: u32,
    #[arg(long, default_value_t = 30)]
    pub even_max: u32,

    #[arg(long, default_value_t = 20)]
    pub odd_min: u32,
    #[arg(long, default_value_t = 30)]
    pub odd_max: u32,

    #[arg(long, default_value_t = 12)]
    pub frame_min: u32,
    #[arg(long, default_value_t = 22)]
    pub frame_max: u32,

    #[arg(long, default_value_t = 28)]
    pub core_min: u32,
    #[arg(long, default_value_t = 38)]
    pub core_max: u32,

    #[arg(long, default_value_t = 10)]
    pub prime_min: u32,
    #[arg(long, default_value_t = 18)]
    pub prime_max: u32,

    /// Longest run of consecutive numbers allowed
    #[arg(long, default_value_t = 3)]
    pub max_consecutive: usize,
}

impl Default for BalanceCriteria {
    fn default() -> Self {
        Self {
            sum_min: 2000,
            sum_max: 3000,
            even_min: 20,
            even_max: 30,
            odd_min: 20,
            odd_max: 30,
            frame_min: 12,
            frame_max: 22,
            core_min: 28,
            core_max: 38,
            prime_min: 10,
            prime_max: 18,
            max_consecutive: 3,
        }
    }
}

impl BalanceCriteria {
    /// Fixed run cap applied when ranges come from history.
    pub const SUGGESTED_MAX_CONSECUTIVE: usize = 3;

    pub fn range(&self, feature: Feature) -> (u32, u32) {
        match feature {
            Feature::Sum => (self.sum_min, self.sum_max),
            Feature::Even => (self.even_min, self.even_max),
            Feature::Odd => (self.odd_min, self.odd_max),
            Feature::Frame => (self.frame_min, self.frame_max),
            Feature::Core => (self.core_min, self.core_max),
            Feature::Prime => (self.prime_min, self.prime_max),
        }
    }

    pub fn set_range(&mut self, feature: Feature, min: u32, max: u32) {
        let (lo, hi) = match feature {
            Feature::Sum => (&mut self.sum_min, &mut self.sum_max),
            Feature::Even => (&mut self.even_min, &mut self.even_max),
            Feature::Odd => (&mut self.odd_min, &mut self.odd_max),
            Feature::Frame => (&mut self.frame_min, &mut self.frame_max),
            Feature::Core => (&mut self.core_min, &mut self.core_max),
            Feature::Prime => (&mut self.prime_min, &mut self.prime_max),
        };
        *lo = min;
        *hi = max;
    }

    #[inline(always)]
    pub fn in_range(&self, feature: Feature, value: u32) -> bool {
        let (lo, hi) = self.range(feature);
        lo <= value && value <= hi
    }

    /// Rejects inverted ranges. Out-of-domain ranges are allowed: they are
    /// merely unsatisfiable.
    pub fn validate(&self) -> LfResult<()> {
        for feature in Feature::iter() {
            let (lo, hi) = self.range(feature);
            if lo > hi {
                return Err(LotoError::validation(
                    format!("{}_min", feature),
                    format!("minimum {} is greater than maximum {}", lo, hi),
                ));
            }
        }
        Ok(())
    }

    /// Range pairs that cannot add up to a full ticket.
    pub fn feasibility_warnings(&self) -> Vec<String> {
        let mut out = Vec::new();
        let total = TICKET_SIZE as u32;
        for (a, b) in [(Feature::Even, Feature::Odd), (Feature::Frame, Feature::Core)] {
            let (a_lo, a_hi) = self.range(a);
            let (b_lo, b_hi) = self.range(b);
            if a_lo.saturating_add(b_lo) > total || a_hi.saturating_add(b_hi) < total {
                out.push(format!(
                    "{} ({}-{}) and {} ({}-{}) cannot add up to {} numbers",
                    a, a_lo, a_hi, b, b_lo, b_hi, total
                ));
            }
        }
        out
    }

    /// Ranges of mean ± c·std per feature, clipped to the feature's domain.
    pub fn suggested(stats: &HistoricalStatistics) -> LfResult<Self> {
        if stats.is_empty() {
            return Err(LotoError::NoData(
                "no historical statistics available for suggestions".into(),
            ));
        }
        let mut criteria = Self::default();
        for feature in Feature::iter() {
            let stat = stats.get(feature).ok_or_else(|| {
                LotoError::NoData(format!("missing statistics for '{}'", feature))
            })?;
            let (lower, upper) = feature.domain();
            let spread = feature.suggestion_spread() * stat.std_dev;
            let lo = ((stat.mean - spread).trunc() as i64).max(lower as i64);
            let hi = ((stat.mean + spread).trunc() as i64).min(upper as i64);
            criteria.set_range(feature, lo as u32, hi.max(0) as u32);
        }
        criteria.max_consecutive = Self::SUGGESTED_MAX_CONSECUTIVE;
        Ok(criteria)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> LfResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| LotoError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Copies every criteria flag the user typed explicitly onto `self`.
    pub fn merge_from_cli(&mut self, cli: &BalanceCriteria, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$field = cli.$field;
                }
            };
        }

        update_if_present!(sum_min);
        update_if_present!(sum_max);
        update_if_present!(even_min);
        update_if_present!(even_max);
        update_if_present!(odd_min);
        update_if_present!(odd_max);
        update_if_present!(frame_min);
        update_if_present!(frame_max);
        update_if_present!(core_min);
        update_if_present!(core_max);
        update_if_present!(prime_min);
        update_if_present!(prime_max);
        update_if_present!(max_consecutive);
    }
}

pub fn validate_count(count: usize) -> LfResult<()> {
    if count == 0 {
        return Err(LotoError::validation("count", "must be at least 1"));
    }
    Ok(())
}

/// Parses a comma separated list such as `"01, 5,99"`, dropping duplicates.
pub fn parse_number_list(input: &str, field: &str) -> LfResult<Vec<u8>> {
    let mut seen = [false; UNIVERSE];
    let mut out = Vec::new();
    for part in input.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let n: usize = part.parse().map_err(|_| {
            LotoError::validation(field, format!("'{}' is not a number", part))
        })?;
        if n >= UNIVERSE {
            return Err(LotoError::validation(
                field,
                format!("{} is outside 0-{}", n, UNIVERSE - 1),
            ));
        }
        if !seen[n] {
            seen[n] = true;
            out.push(n as u8);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::FeatureStat;

    #[test]
    fn test_defaults_match_clap_defaults() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            config: Config,
        }

        let parsed = Wrapper::parse_from(["test"]).config;
        let default = Config::default();
        assert_eq!(parsed.criteria, default.criteria);
        assert_eq!(parsed.search.attempts, default.search.attempts);
        assert_eq!(parsed.generation.pool_size, default.generation.pool_size);
    }

    #[test]
    fn test_merge_only_explicit_flags() {
        use clap::{CommandFactory, FromArgMatches, Parser};

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            criteria: BalanceCriteria,
        }

        let matches =
            Wrapper::command().get_matches_from(["test", "--prime-max", "12", "--sum-min", "100"]);
        let cli = Wrapper::from_arg_matches(&matches).unwrap().criteria;

        let mut base = BalanceCriteria {
            even_min: 1,
            ..Default::default()
        };
        base.merge_from_cli(&cli, &matches);
        assert_eq!(base.prime_max, 12);
        assert_eq!(base.sum_min, 100);
        assert_eq!(base.even_min, 1, "default-valued flag overwrote file value");
    }

    #[test]
    fn test_suggestion_clips_to_domain() {
        let mut stats = HistoricalStatistics {
            samples: 10,
            ..Default::default()
        };
        for feature in Feature::iter() {
            stats.features.insert(
                feature,
                FeatureStat {
                    mean: 5.0,
                    std_dev: 10.0,
                },
            );
        }
        stats.features.insert(
            Feature::Sum,
            FeatureStat {
                mean: 990.0,
                std_dev: 100.0,
            },
        );
        let c = BalanceCriteria::suggested(&stats).unwrap();
        assert_eq!((c.sum_min, c.sum_max), (790, 1190));
        assert_eq!((c.even_min, c.even_max), (0, 15));
        assert_eq!(c.max_consecutive, 3);
    }

    #[test]
    fn test_suggestion_needs_data() {
        let err = BalanceCriteria::suggested(&HistoricalStatistics::default());
        assert!(matches!(err, Err(LotoError::NoData(_))));
    }

    #[test]
    fn test_feasibility_warnings() {
        assert!(BalanceCriteria::default().feasibility_warnings().is_empty());
        let c = BalanceCriteria {
            even_min: 30,
            odd_min: 30,
            ..Default::default()
        };
        assert_eq!(c.feasibility_warnings().len(), 1);
    }

    #[test]
    fn test_feasibility_with_extreme_bounds() {
        let c = BalanceCriteria {
            even_min: u32::MAX,
            even_max: u32::MAX,
            ..Default::default()
        };
        assert!(c.validate().is_ok());
        let warnings = c.feasibility_warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("even"));

        use crate::generator::balanced::{BalancedSearch, CancellationToken, SearchOptions};
        assert!(BalancedSearch::new(c, SearchOptions::default(), CancellationToken::new()).is_ok());
    }

    #[test]
    fn test_parse_number_list() {
        assert_eq!(parse_number_list("01, 5,99,5", "include").unwrap(), vec![1, 5, 99]);
        assert!(parse_number_list("", "include").unwrap().is_empty());
        match parse_number_list("3,abc", "exclude") {
            Err(LotoError::Validation { field, .. }) => assert_eq!(field, "exclude"),
            other => panic!("unexpected: {:?}", other),
        }
        assert!(parse_number_list("100", "include").is_err());
    }
}
