use std::{collections::HashMap, fs, path::Path, sync::Arc};

use anyhow::{bail, Context, Result};
use shared::{
    domain::{CompanyId, CompanyStatus, StatusFilter},
    protocol::Company,
};

mod generator;

pub use generator::{generate_companies, DEFAULT_MOCK_COMPANY_COUNT};

/// Frozen, process-wide company table.
///
/// Records are seeded once at construction and never change afterwards, so
/// clones share the same backing slice and every query is a pure read.
#[derive(Clone)]
pub struct CompanyStore {
    companies: Arc<[Company]>,
    by_id: Arc<HashMap<CompanyId, usize>>,
}

impl CompanyStore {
    pub fn from_records(companies: Vec<Company>) -> Result<Self> {
        let mut by_id = HashMap::with_capacity(companies.len());
        for (index, company) in companies.iter().enumerate() {
            if by_id.insert(company.id, index).is_some() {
                bail!("duplicate company id {}", company.id);
            }
        }
        Ok(Self {
            companies: companies.into(),
            by_id: Arc::new(by_id),
        })
    }

    pub fn generated(count: usize, seed: u64) -> Result<Self> {
        Self::from_records(generate_companies(count, seed))
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read dataset '{}'", path.display()))?;
        let companies: Vec<Company> = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse dataset '{}'", path.display()))?;
        Self::from_records(companies)
            .with_context(|| format!("invalid dataset '{}'", path.display()))
    }

    pub fn len(&self) -> usize {
        self.companies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.companies.is_empty()
    }

    /// Returns at most `limit` companies starting at the `offset`-th match,
    /// in insertion order. Offsets past the end yield an empty page.
    pub fn list_companies(&self, offset: usize, limit: usize, filter: &StatusFilter) -> Vec<Company> {
        if limit == 0 {
            return Vec::new();
        }
        self.companies
            .iter()
            .filter(|company| filter.matches(company.status))
            .skip(offset)
            .take(limit)
            .cloned()
            .collect()
    }

    pub fn company_by_id(&self, id: CompanyId) -> Option<Company> {
        self.by_id
            .get(&id)
            .map(|&index| self.companies[index].clone())
    }

    pub fn status_counts(&self) -> Vec<(CompanyStatus, usize)> {
        CompanyStatus::ALL
            .into_iter()
            .map(|status| {
                let count = self
                    .companies
                    .iter()
                    .filter(|company| company.status == status)
                    .count();
                (status, count)
            })
            .collect()
    }
}

pub fn write_dataset(path: impl AsRef<Path>, companies: &[Company]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| {
            format!("failed to create parent directory '{}'", parent.display())
        })?;
    }
    let raw = serde_json::to_string_pretty(companies)?;
    fs::write(path, raw).with_context(|| format!("failed to write dataset '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
