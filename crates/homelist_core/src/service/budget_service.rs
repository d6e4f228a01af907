//! Shared budget target.
//!
//! The budget lives in `app_metadata` under `budget` as a decimal string.
//! A missing, unparsable or zero value reads as [`DEFAULT_BUDGET`].

use crate::repo::item_repo::RepoError;
use crate::repo::metadata_repo::{MetadataRepository, BUDGET_KEY};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Budget used until the household stores its own target (CLP).
pub const DEFAULT_BUDGET: i64 = 5_000_000;

#[derive(Debug)]
pub enum BudgetError {
    /// Budget targets must be strictly positive.
    NonPositive(i64),
    Repo(RepoError),
}

impl Display for BudgetError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonPositive(value) => write!(f, "budget must be > 0, got {value}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BudgetError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::NonPositive(_) => None,
        }
    }
}

impl From<RepoError> for BudgetError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

pub struct BudgetService<M: MetadataRepository> {
    metadata: M,
}

impl<M: MetadataRepository> BudgetService<M> {
    pub fn new(metadata: M) -> Self {
        Self { metadata }
    }

    /// Current budget target.
    pub fn budget(&self) -> Result<i64, BudgetError> {
        let Some(raw) = self.metadata.get_value(BUDGET_KEY)? else {
            return Ok(DEFAULT_BUDGET);
        };

        match raw.trim().parse::<i64>() {
            Ok(value) if value > 0 => Ok(value),
            Ok(_) => Ok(DEFAULT_BUDGET),
            Err(_) => {
                warn!("event=budget_read module=service status=fallback reason=unparsable");
                Ok(DEFAULT_BUDGET)
            }
        }
    }

    /// Replaces the budget target.
    pub fn set_budget(&self, value: i64) -> Result<i64, BudgetError> {
        if value <= 0 {
            return Err(BudgetError::NonPositive(value));
        }
        self.metadata.set_value(BUDGET_KEY, &value.to_string())?;
        info!("event=budget_set module=service status=ok value={}", value);
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{BudgetError, BudgetService, DEFAULT_BUDGET};
    use crate::db::open_db_in_memory;
    use crate::repo::metadata_repo::{MetadataRepository, SqliteMetadataRepository, BUDGET_KEY};

    #[test]
    fn missing_or_garbage_budget_reads_as_default() {
        let conn = open_db_in_memory().unwrap();
        let service = BudgetService::new(SqliteMetadataRepository::try_new(&conn).unwrap());
        assert_eq!(service.budget().unwrap(), DEFAULT_BUDGET);

        let metadata = SqliteMetadataRepository::try_new(&conn).unwrap();
        metadata.set_value(BUDGET_KEY, "lots").unwrap();
        assert_eq!(service.budget().unwrap(), DEFAULT_BUDGET);
        metadata.set_value(BUDGET_KEY, "0").unwrap();
        assert_eq!(service.budget().unwrap(), DEFAULT_BUDGET);
    }

    #[test]
    fn set_budget_rejects_non_positive_values() {
        let conn = open_db_in_memory().unwrap();
        let service = BudgetService::new(SqliteMetadataRepository::try_new(&conn).unwrap());

        assert!(matches!(
            service.set_budget(-1),
            Err(BudgetError::NonPositive(-1))
        ));
        assert!(matches!(service.set_budget(0), Err(BudgetError::NonPositive(0))));
        assert_eq!(service.set_budget(7_250_000).unwrap(), 7_250_000);
        assert_eq!(service.budget().unwrap(), 7_250_000);
    }
}
