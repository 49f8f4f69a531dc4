use anyhow::{Context, Result, bail, ensure};
use std::collections::BTreeSet;

const DEFAULT_SEED: u64 = 1337;
const MAX_RANGE_LEN: u64 = 10_000;

/// Resolve CLI seed tokens into a sorted, de-duplicated seed list.
///
/// Accepts literal integers (negative values fold to their magnitude) and
/// inclusive ranges written `start..end`.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<u64>> {
    let mut seeds = BTreeSet::new();

    for token in tokens {
        if token.is_empty() {
            continue;
        }

        if let Some((start, end)) = token.split_once("..") {
            let start = parse_seed(start).with_context(|| format!("range start in {token}"))?;
            let end = parse_seed(end).with_context(|| format!("range end in {token}"))?;
            ensure!(start <= end, "seed range {token} runs backwards");
            ensure!(
                end - start < MAX_RANGE_LEN,
                "seed range {token} expands past {MAX_RANGE_LEN} seeds"
            );
            seeds.extend(start..=end);
            continue;
        }

        seeds.insert(parse_seed(token)?);
    }

    if seeds.is_empty() {
        seeds.insert(DEFAULT_SEED);
    }

    Ok(seeds.into_iter().collect())
}

fn parse_seed(token: &str) -> Result<u64> {
    let token = token.trim();
    if let Ok(value) = token.parse::<u64>() {
        return Ok(value);
    }
    if let Ok(value) = token.parse::<i64>() {
        return Ok(value.unsigned_abs());
    }
    bail!("Unrecognized seed token: {token}");
}
