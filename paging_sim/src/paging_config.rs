/*
 *  Copyright (C) 2025  Markus Elias Gerber
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  You should have received a copy of the GNU General Public License
 *  along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

use core::{
    fmt::{self, Display},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

pub(crate) const DEFAULT_SEED: u64 = 5446535461589659585;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    Fifo,
    Lru,
}

impl FromStr for PolicyKind {
    type Err = ConfigurationError;

    /// Accepts the policy names (case insensitive) and the menu numbers `1` (FIFO) and `2` (LRU)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fifo" | "1" => Ok(PolicyKind::Fifo),
            "lru" | "2" => Ok(PolicyKind::Lru),
            _ => Err(ConfigurationError::UnknownPolicy(s.to_string())),
        }
    }
}

impl Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyKind::Fifo => write!(f, "FIFO"),
            PolicyKind::Lru => write!(f, "LRU"),
        }
    }
}

/// Bounds and knobs of one simulation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PagingConfig {
    /// Capacity of physical memory in size units
    pub max_memory_size: usize,

    /// Capacity of the backing store in size units
    pub max_virtual_memory_size: usize,

    pub page_size: usize,

    pub policy: PolicyKind,

    /// Length of generated reference sequences
    pub reference_count: usize,

    /// Seed for generated reference sequences
    pub seed: u64,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            max_memory_size: 16,
            max_virtual_memory_size: 64,
            page_size: 4,
            policy: PolicyKind::Fifo,
            reference_count: 32,
            seed: DEFAULT_SEED,
        }
    }
}

impl PagingConfig {
    /// Builds a config from unchecked input, e.g. values typed in by a user.
    ///
    /// Reference count and seed keep their default values.
    pub fn from_raw(
        max_memory_size: i64,
        max_virtual_memory_size: i64,
        page_size: i64,
        policy: &str,
    ) -> Result<Self, ConfigurationError> {
        let config = Self {
            max_memory_size: positive("max memory size", max_memory_size)?,
            max_virtual_memory_size: positive("max virtual memory size", max_virtual_memory_size)?,
            page_size: positive("page size", page_size)?,
            policy: policy.parse()?,
            ..Default::default()
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        non_zero("max memory size", self.max_memory_size)?;
        non_zero("max virtual memory size", self.max_virtual_memory_size)?;
        non_zero("page size", self.page_size)?;

        if self.page_size > self.max_memory_size {
            return Err(ConfigurationError::PageLargerThanTier {
                page_size: self.page_size,
                tier: "memory",
                bound: self.max_memory_size,
            });
        }

        if self.page_size > self.max_virtual_memory_size {
            return Err(ConfigurationError::PageLargerThanTier {
                page_size: self.page_size,
                tier: "virtual memory",
                bound: self.max_virtual_memory_size,
            });
        }

        Ok(())
    }
}

fn positive(name: &'static str, value: i64) -> Result<usize, ConfigurationError> {
    if value <= 0 {
        return Err(ConfigurationError::NonPositiveSize { name, value });
    }

    usize::try_from(value).map_err(|_| ConfigurationError::SizeOutOfRange { name, value })
}

fn non_zero(name: &'static str, value: usize) -> Result<(), ConfigurationError> {
    if value == 0 {
        Err(ConfigurationError::NonPositiveSize { name, value: 0 })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_policy_tags() {
        assert_eq!("FIFO".parse::<PolicyKind>(), Ok(PolicyKind::Fifo));
        assert_eq!("1".parse::<PolicyKind>(), Ok(PolicyKind::Fifo));
        assert_eq!(" lru ".parse::<PolicyKind>(), Ok(PolicyKind::Lru));
        assert_eq!("2".parse::<PolicyKind>(), Ok(PolicyKind::Lru));
        assert_eq!(
            "clock".parse::<PolicyKind>(),
            Err(ConfigurationError::UnknownPolicy("clock".into()))
        );
    }

    #[test]
    fn test_from_raw() {
        let config = PagingConfig::from_raw(10, 20, 2, "lru").unwrap();
        assert_eq!(config.max_memory_size, 10);
        assert_eq!(config.max_virtual_memory_size, 20);
        assert_eq!(config.page_size, 2);
        assert_eq!(config.policy, PolicyKind::Lru);

        assert_eq!(
            PagingConfig::from_raw(0, 20, 2, "lru"),
            Err(ConfigurationError::NonPositiveSize {
                name: "max memory size",
                value: 0
            })
        );
        assert!(PagingConfig::from_raw(10, -1, 2, "lru").is_err());
        assert!(PagingConfig::from_raw(10, 20, 2, "random").is_err());
    }

    #[test]
    fn test_large_sizes() {
        #[cfg(target_pointer_width = "64")]
        assert_eq!(positive("max memory size", i64::MAX), Ok(i64::MAX as usize));

        #[cfg(target_pointer_width = "32")]
        assert_eq!(
            positive("max memory size", i64::MAX),
            Err(ConfigurationError::SizeOutOfRange {
                name: "max memory size",
                value: i64::MAX
            })
        );
    }

    #[test]
    fn test_page_larger_than_tier() {
        assert_eq!(
            PagingConfig::from_raw(4, 20, 8, "fifo"),
            Err(ConfigurationError::PageLargerThanTier {
                page_size: 8,
                tier: "memory",
                bound: 4
            })
        );
        assert!(PagingConfig::from_raw(20, 4, 8, "fifo").is_err());
    }

    #[test]
    fn test_validate_zero_page_size() {
        let config = PagingConfig {
            page_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
        assert!(PagingConfig::default().validate().is_ok());
    }
}
