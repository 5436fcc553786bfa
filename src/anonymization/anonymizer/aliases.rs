//! Semantic alias generation
//!
//! Names, organizations, products and places get readable stand-ins drawn
//! from word pools: `ACME_CORP`, `JANE_SMITH`, `PROSUITE`, `LOCATION_3`.
//! Aliases are unique per type within a generator's lifetime and never
//! collide with a placeholder the caller reports as taken.

use crate::anonymization::models::PiiType;
use anyhow::Result;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Word pools for semantic aliases
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AliasPools {
    pub company_prefixes: Vec<String>,
    pub company_suffixes: Vec<String>,
    pub first_names: Vec<String>,
    pub last_names: Vec<String>,
    pub product_prefixes: Vec<String>,
    pub product_types: Vec<String>,
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

impl Default for AliasPools {
    fn default() -> Self {
        Self {
            company_prefixes: words(&[
                "Acme", "Global", "Tech", "Digital", "Smart", "Mega", "Prime", "Alpha", "Beta",
                "Omega", "Nexus", "Quantum", "Cyber", "Dynamic",
            ]),
            company_suffixes: words(&[
                "Corp", "Inc", "LLC", "Industries", "Solutions", "Systems", "Technologies",
                "Enterprises", "Group", "Partners", "Ventures",
            ]),
            first_names: words(&[
                "John", "Jane", "Michael", "Sarah", "David", "Emily", "Robert", "Lisa", "James",
                "Maria", "William", "Patricia", "Richard", "Jennifer", "Thomas", "Linda",
                "Charles", "Susan",
            ]),
            last_names: words(&[
                "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis",
                "Rodriguez", "Martinez", "Wilson", "Anderson", "Taylor", "Thomas", "Moore",
                "Jackson", "Martin", "Lee",
            ]),
            product_prefixes: words(&[
                "Pro", "Ultra", "Super", "Mega", "Premium", "Elite", "Advanced", "Smart", "Turbo",
                "Power", "Max", "Plus",
            ]),
            product_types: words(&[
                "Suite", "Platform", "System", "Tool", "App", "Service", "Solution", "Engine",
                "Framework", "Hub", "Portal", "Cloud",
            ]),
        }
    }
}

impl AliasPools {
    /// Reject empty pools and words that would break the alias shape
    pub fn validate(&self) -> Result<()> {
        let pools = [
            ("company_prefixes", &self.company_prefixes),
            ("company_suffixes", &self.company_suffixes),
            ("first_names", &self.first_names),
            ("last_names", &self.last_names),
            ("product_prefixes", &self.product_prefixes),
            ("product_types", &self.product_types),
        ];

        for (name, pool) in pools {
            if pool.is_empty() {
                anyhow::bail!("Alias pool '{name}' must not be empty");
            }
            if let Some(bad) = pool
                .iter()
                .find(|w| w.is_empty() || !w.chars().all(|c| c.is_ascii_alphanumeric()))
            {
                anyhow::bail!("Alias pool '{name}' contains invalid word '{bad}'");
            }
        }
        Ok(())
    }
}

/// Draws semantic aliases and tracks which ones were issued
#[derive(Debug, Clone)]
pub struct SemanticAliasGenerator {
    pools: AliasPools,
    rng: StdRng,
    counters: HashMap<PiiType, usize>,
    used: HashMap<PiiType, HashSet<String>>,
}

impl SemanticAliasGenerator {
    /// Create a generator; a seed makes the draws reproducible
    pub fn new(pools: AliasPools, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            pools,
            rng,
            counters: HashMap::new(),
            used: HashMap::new(),
        }
    }

    /// Generate an alias for a semantic type
    ///
    /// Returns `None` for types without a semantic shape. `is_taken` reports
    /// placeholders already live elsewhere (the reverse map); those are
    /// skipped like the generator's own earlier aliases.
    pub fn generate<F>(&mut self, pii_type: &PiiType, is_taken: F) -> Option<String>
    where
        F: Fn(&str) -> bool,
    {
        let base = match pii_type {
            PiiType::Organization => {
                let prefix = pick(&self.pools.company_prefixes, &mut self.rng);
                let suffix = pick(&self.pools.company_suffixes, &mut self.rng);
                format!("{prefix}_{suffix}").to_uppercase()
            }
            PiiType::Name => {
                let first = pick(&self.pools.first_names, &mut self.rng);
                let last = pick(&self.pools.last_names, &mut self.rng);
                format!("{first}_{last}").to_uppercase()
            }
            PiiType::Product => {
                let prefix = pick(&self.pools.product_prefixes, &mut self.rng);
                let kind = pick(&self.pools.product_types, &mut self.rng);
                format!("{prefix}{kind}").to_uppercase()
            }
            PiiType::Location => {
                let counter = self.counters.entry(PiiType::Location).or_insert(0);
                *counter += 1;
                format!("LOCATION_{counter}")
            }
            _ => return None,
        };

        let used = self.used.entry(pii_type.clone()).or_default();
        let mut alias = base.clone();
        let mut suffix = 1;
        while used.contains(&alias) || is_taken(&alias) {
            alias = format!("{base}_{suffix}");
            suffix += 1;
        }
        used.insert(alias.clone());

        Some(alias)
    }

    /// Recover the type of a semantic alias from its shape
    pub fn classify_alias(&self, alias: &str) -> Option<PiiType> {
        if let Some(rest) = alias.strip_prefix("LOCATION_") {
            let mut parts = rest.split('_');
            let numeric = parts.all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()));
            return numeric.then_some(PiiType::Location);
        }

        let core = strip_collision_suffix(alias);
        let pools = &self.pools;

        if let Some((left, right)) = core.split_once('_') {
            if in_pool(&pools.company_prefixes, left) && in_pool(&pools.company_suffixes, right) {
                return Some(PiiType::Organization);
            }
            if in_pool(&pools.first_names, left) && in_pool(&pools.last_names, right) {
                return Some(PiiType::Name);
            }
            return None;
        }

        pools
            .product_prefixes
            .iter()
            .filter_map(|prefix| core.strip_prefix(prefix.to_uppercase().as_str()))
            .any(|kind| in_pool(&pools.product_types, kind))
            .then_some(PiiType::Product)
    }

    /// Forget counters and issued aliases
    pub fn reset(&mut self) {
        self.counters.clear();
        self.used.clear();
    }

    /// Number of aliases issued for a type
    pub fn issued(&self, pii_type: &PiiType) -> usize {
        self.used.get(pii_type).map_or(0, HashSet::len)
    }
}

fn pick<'a>(pool: &'a [String], rng: &mut StdRng) -> &'a str {
    pool.choose(rng).map_or("", String::as_str)
}

fn in_pool(pool: &[String], word: &str) -> bool {
    pool.iter().any(|w| w.to_uppercase() == word)
}

/// `ACME_CORP_2` -> `ACME_CORP`
fn strip_collision_suffix(alias: &str) -> &str {
    match alias.rsplit_once('_') {
        Some((head, tail)) if !tail.is_empty() && tail.chars().all(|c| c.is_ascii_digit()) => head,
        _ => alias,
    }
}
