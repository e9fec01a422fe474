use crate::consts::{DRAW_SIZE, UNIVERSE};
use crate::error::{LfResult, LotoError};
use crate::types::Draw;
use rayon::prelude::*;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Past draws keyed by contest number. Iteration is always oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoricalArchive {
    draws: BTreeMap<u32, Draw>,
}

impl HistoricalArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, contest: u32, draw: Draw) -> LfResult<()> {
        if contest == 0 {
            return Err(LotoError::validation("contest", "contest ids start at 1"));
        }
        self.draws.insert(contest, draw);
        Ok(())
    }

    pub fn get(&self, contest: u32) -> Option<&Draw> {
        self.draws.get(&contest)
    }

    pub fn len(&self) -> usize {
        self.draws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    pub fn latest_contest(&self) -> Option<u32> {
        self.draws.keys().next_back().copied()
    }

    /// All draws, oldest to newest.
    pub fn draws(&self) -> Vec<Draw> {
        self.draws.values().copied().collect()
    }

    /// The newest `size` draws (or all of them), oldest to newest.
    pub fn recent(&self, size: usize) -> Vec<Draw> {
        let skip = self.draws.len().saturating_sub(size);
        self.draws.values().skip(skip).copied().collect()
    }

    /// Generates `count` uniformly random draws numbered 1..=count.
    pub fn simulate(count: usize, seed: Option<u64>) -> Self {
        let base = seed.unwrap_or_else(|| fastrand::u64(..));
        let draws: BTreeMap<u32, Draw> = (0..count)
            .into_par_iter()
            .map(|i| {
                let mut rng = fastrand::Rng::with_seed(base.wrapping_add(i as u64));
                let mut pool: Vec<u8> = (0..UNIVERSE as u8).collect();
                for j in 0..DRAW_SIZE {
                    let pick = rng.usize(j..UNIVERSE);
                    pool.swap(j, pick);
                }
                let mut numbers = [0u8; DRAW_SIZE];
                numbers.copy_from_slice(&pool[..DRAW_SIZE]);
                numbers.sort_unstable();
                ((i + 1) as u32, Draw::from_sorted_unchecked(numbers))
            })
            .collect();
        debug!("Simulated {} draws", draws.len());
        Self { draws }
    }

    /// Loads an archive from JSON (`{"1": [..], ...}`) or CSV
    /// (`contest,n1,..,n20`), chosen by file extension.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> LfResult<Self> {
        let path = path.as_ref();
        let is_csv = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);

        let archive = if is_csv {
            let file = fs::File::open(path)?;
            Self::from_csv_reader(file)?
        } else {
            let content = fs::read_to_string(path)?;
            Self::from_json_str(&content)?
        };
        info!(
            "📂 Loaded {} draws from {}",
            archive.len(),
            path.display()
        );
        Ok(archive)
    }

    pub fn from_json_str(content: &str) -> LfResult<Self> {
        let raw: HashMap<String, Value> = serde_json::from_str(content)?;
        let mut archive = Self::new();
        for (key, value) in raw {
            let contest = match key.trim().parse::<u32>() {
                Ok(c) if c > 0 => c,
                _ => {
                    warn!("Skipping entry with invalid contest id '{}'", key);
                    continue;
                }
            };
            let draw = json_numbers(&value)
                .map_err(LotoError::InvalidDraw)
                .and_then(|numbers| Draw::new(&numbers));
            match draw {
                Ok(draw) => archive.insert(contest, draw)?,
                Err(e) => warn!("Skipping contest {}: {}", contest, e),
            }
        }
        Ok(archive)
    }

    pub fn from_csv_reader<R: std::io::Read>(reader: R) -> LfResult<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut archive = Self::new();
        for (line, record) in rdr.records().enumerate() {
            let record = record?;
            let first = record.get(0).unwrap_or("");
            let contest = match first.parse::<u32>() {
                Ok(c) if c > 0 => c,
                // Header rows and blank lines
                _ if line == 0 => continue,
                _ => {
                    warn!("Skipping line {}: invalid contest id '{}'", line + 1, first);
                    continue;
                }
            };
            let numbers: Result<Vec<u8>, _> = record
                .iter()
                .skip(1)
                .filter(|f| !f.is_empty())
                .map(|f| f.parse::<u8>())
                .collect();
            let draw = match numbers {
                Ok(n) => Draw::new(&n),
                Err(e) => Err(LotoError::InvalidDraw(e.to_string())),
            };
            match draw {
                Ok(d) => archive.insert(contest, d)?,
                Err(e) => warn!("Skipping contest {}: {}", contest, e),
            }
        }
        Ok(archive)
    }
}

/// Numbers of one JSON entry. Values that cannot be a draw number are
/// reported instead of failing the whole file.
fn json_numbers(value: &Value) -> Result<Vec<u8>, String> {
    let items = value
        .as_array()
        .ok_or_else(|| format!("expected a list of numbers, got {}", value))?;
    items
        .iter()
        .map(|v| {
            v.as_u64()
                .and_then(|n| u8::try_from(n).ok())
                .ok_or_else(|| format!("'{}' is not a valid number", v))
        })
        .collect()
}

impl FromIterator<(u32, Draw)> for HistoricalArchive {
    fn from_iter<I: IntoIterator<Item = (u32, Draw)>>(iter: I) -> Self {
        Self {
            draws: iter.into_iter().filter(|(c, _)| *c > 0).collect(),
        }
    }
}
