//! Membership status of a collector.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, IntoStaticStr, VariantArray};

use crate::{Error, Result};

/// Where a collector stands with the organization.
///
/// There is no enforced transition graph: the status is set by
/// administrative action and is never derived from the expiration date.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
  Display,
  AsRefStr,
  EnumString,
  IntoStaticStr,
  VariantArray,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum CollectorStatus {
  #[default]
  Active,
  Expired,
  Removed,
}

impl CollectorStatus {
  /// Every status, in display order.
  pub const ALL: &'static [Self] = Self::VARIANTS;

  /// The human-readable label, also used for storage and CSV export.
  pub fn label(self) -> &'static str { self.into() }

  /// Parse a stored label, case-insensitively.
  pub fn parse(label: &str) -> Result<Self> {
    Self::from_str(label).map_err(|_| Error::UnknownStatus(label.to_owned()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_to_active() {
    assert_eq!(CollectorStatus::default(), CollectorStatus::Active);
  }

  #[test]
  fn labels_match_display() {
    for status in CollectorStatus::ALL {
      assert_eq!(status.to_string(), status.label());
      assert_eq!(status.as_ref(), status.label());
    }
    let labels: Vec<_> = CollectorStatus::ALL.iter().map(|s| s.label()).collect();
    assert_eq!(labels, ["Active", "Expired", "Removed"]);
  }

  #[test]
  fn parses_any_case() {
    assert_eq!(
      CollectorStatus::from_str("expired").unwrap(),
      CollectorStatus::Expired
    );
    assert_eq!(
      CollectorStatus::from_str("Removed").unwrap(),
      CollectorStatus::Removed
    );
    assert!(matches!(
      CollectorStatus::parse("lapsed"),
      Err(Error::UnknownStatus(label)) if label == "lapsed"
    ));
  }

  #[test]
  fn serializes_lowercase() {
    let json = serde_json::to_string(&CollectorStatus::Active).unwrap();
    assert_eq!(json, "\"active\"");
  }
}
