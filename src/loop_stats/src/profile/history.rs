//! Effective-at index over profile versions.
//!
//! Versions are indexed per profile name in a `BTreeMap<effective_at, position>`, so
//! "which version of `Default` was in force at `t`" is a floor query
//! (`range(..=t).next_back()`) rather than a scan of the whole history.
//!
//! - A version only answers for the names it actually stores; a newer version that
//!   dropped "Exercise" does not hide an older one that had it.
//! - When two versions share an `effective_at`, the one later in the input wins.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};

use crate::profile::ProfileVersion;

/// Time-ordered profile versions plus a per-name lookup index.
#[derive(Debug, Clone, Default)]
pub struct ProfileHistory {
    versions: Vec<ProfileVersion>,
    by_name: HashMap<String, BTreeMap<DateTime<Utc>, usize>>,
}

impl ProfileHistory {
    /// Index `versions`. Input order only matters for ties on `effective_at`.
    pub fn new(versions: Vec<ProfileVersion>) -> Self {
        let mut by_name: HashMap<String, BTreeMap<DateTime<Utc>, usize>> = HashMap::new();
        for (pos, v) in versions.iter().enumerate() {
            for name in v.named_profiles.keys() {
                by_name
                    .entry(name.clone())
                    .or_default()
                    .insert(v.effective_at, pos);
            }
        }
        tracing::debug!(
            versions = versions.len(),
            profile_names = by_name.len(),
            "indexed profile history"
        );
        Self { versions, by_name }
    }

    /// Number of versions held.
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    /// True if no versions are held.
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// Versions in input order.
    pub fn versions(&self) -> &[ProfileVersion] {
        &self.versions
    }

    /// Most recent version with `effective_at <= at` that stores `profile_name`.
    pub fn version_at(&self, profile_name: &str, at: DateTime<Utc>) -> Option<&ProfileVersion> {
        let (_, &pos) = self.by_name.get(profile_name)?.range(..=at).next_back()?;
        self.versions.get(pos)
    }

    /// Latest version overall (greatest `effective_at`; later input wins ties).
    pub fn latest(&self) -> Option<&ProfileVersion> {
        self.versions
            .iter()
            .enumerate()
            .max_by_key(|(pos, v)| (v.effective_at, *pos))
            .map(|(_, v)| v)
    }
}

impl From<Vec<ProfileVersion>> for ProfileHistory {
    fn from(versions: Vec<ProfileVersion>) -> Self {
        Self::new(versions)
    }
}

impl FromIterator<ProfileVersion> for ProfileHistory {
    fn from_iter<I: IntoIterator<Item = ProfileVersion>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
