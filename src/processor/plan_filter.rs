//! Execution plan filter
//!
//! Restricts the host's execution plan to the migrations a deployment
//! phase is allowed to run. Vanilla migrations always run; the opposing
//! color is skipped.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{usage_error, Result};
use crate::processor::migration_processor::Migration;
use crate::processor::{BLUE_SUFFIX, GREEN_SUFFIX};

/// Deployment mode for an apply step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentMode {
    /// No filtering
    Unrestricted,
    /// Run blue and vanilla migrations, skip green
    Blue,
    /// Run green and vanilla migrations, skip blue
    Green,
}

impl DeploymentMode {
    /// Resolve the mode from the two mutually exclusive caller flags.
    /// Requesting both is a usage error, rejected before any planning.
    pub fn from_flags(blue: bool, green: bool) -> Result<Self> {
        match (blue, green) {
            (true, true) => Err(usage_error(
                "Cannot use blue and green modes together. Choose one deployment mode.",
            )),
            (true, false) => Ok(DeploymentMode::Blue),
            (false, true) => Ok(DeploymentMode::Green),
            (false, false) => Ok(DeploymentMode::Unrestricted),
        }
    }
}

/// One entry of the host planner's execution plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanItem {
    pub migration: Migration,
    /// Whether the planner scheduled this migration for unapply
    pub backwards: bool,
}

impl PlanItem {
    pub fn forwards(migration: Migration) -> Self {
        Self { migration, backwards: false }
    }
}

/// Filter for the migration execution plan in blue/green mode
pub struct PlanFilter {
    mode: DeploymentMode,
}

impl PlanFilter {
    pub fn new(mode: DeploymentMode) -> Self {
        Self { mode }
    }

    /// Filter the plan according to the deployment mode.
    ///
    /// Pure function of (plan, mode): blue drops green-suffixed items,
    /// green drops blue-suffixed items, unrestricted is the identity.
    pub fn filter_plan(&self, plan: Vec<PlanItem>) -> Vec<PlanItem> {
        let skip_suffix = match self.mode {
            DeploymentMode::Unrestricted => return plan,
            DeploymentMode::Blue => GREEN_SUFFIX,
            DeploymentMode::Green => BLUE_SUFFIX,
        };

        let original_count = plan.len();
        let filtered: Vec<PlanItem> = plan
            .into_iter()
            .filter(|item| !item.migration.name.ends_with(skip_suffix))
            .collect();

        if filtered.len() != original_count {
            info!(
                mode = ?self.mode,
                skipped = original_count - filtered.len(),
                "deployment mode filtered migration plan"
            );
        }

        filtered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BlueGreenError;
    use pretty_assertions::assert_eq;

    fn plan() -> Vec<PlanItem> {
        vec![
            PlanItem::forwards(Migration::new("shop", "0002_order_blue")),
            PlanItem::forwards(Migration::new("shop", "0002_order_green")),
            PlanItem::forwards(Migration::new("shop", "0003_vanilla")),
        ]
    }

    fn names(plan: &[PlanItem]) -> Vec<&str> {
        plan.iter().map(|i| i.migration.name.as_str()).collect()
    }

    #[test]
    fn test_blue_mode_skips_green() {
        let filtered = PlanFilter::new(DeploymentMode::Blue).filter_plan(plan());
        assert_eq!(names(&filtered), vec!["0002_order_blue", "0003_vanilla"]);
    }

    #[test]
    fn test_green_mode_skips_blue() {
        let filtered = PlanFilter::new(DeploymentMode::Green).filter_plan(plan());
        assert_eq!(names(&filtered), vec!["0002_order_green", "0003_vanilla"]);
    }

    #[test]
    fn test_unrestricted_mode_is_identity() {
        let original = plan();
        let filtered = PlanFilter::new(DeploymentMode::Unrestricted).filter_plan(plan());
        assert_eq!(filtered, original);
    }

    #[test]
    fn test_backwards_items_are_filtered_the_same_way() {
        let mut p = plan();
        p[1].backwards = true;
        let filtered = PlanFilter::new(DeploymentMode::Blue).filter_plan(p);
        assert_eq!(names(&filtered), vec!["0002_order_blue", "0003_vanilla"]);
    }

    #[test]
    fn test_mode_flags_mutually_exclusive() {
        assert_eq!(DeploymentMode::from_flags(true, false).unwrap(), DeploymentMode::Blue);
        assert_eq!(DeploymentMode::from_flags(false, true).unwrap(), DeploymentMode::Green);
        assert_eq!(
            DeploymentMode::from_flags(false, false).unwrap(),
            DeploymentMode::Unrestricted
        );
        assert!(matches!(
            DeploymentMode::from_flags(true, true).unwrap_err(),
            BlueGreenError::Usage(_)
        ));
    }
}
