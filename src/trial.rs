//! Hypothesis trials.
//!
//! A trial overlays one cyclic walk on the graph and walks the layers from
//! the top down to layer 1, checking each layer before collapsing it. The
//! graph is reset after every trial, so one checker can run any number of
//! orderings of the same string set.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::config::CheckerConfig;
use crate::generate::shuffled_order;
use crate::graph::LayeredGraph;
use crate::types::EdgeState;

/// Error type for trial operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrialError {
    /// The checker was given no strings.
    #[error("Cannot build a checker from an empty string set")]
    EmptyStringSet,
    /// The supplied order does not visit every cycle element exactly once.
    #[error("Order is not a permutation of the cycle elements: {0:?}")]
    NotAPermutation(Vec<String>),
}

/// Result of one trial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialOutcome {
    /// Cyclic order that was overlaid.
    pub order: Vec<String>,
    /// True if every layer passed its consistency check.
    pub passed: bool,
    /// Layer whose check failed.
    pub failed_layer: Option<usize>,
    /// Number of layers checked, the failing one included.
    pub layers_checked: usize,
    /// Edge multiplicities at the moment of failure.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub edge_state: Vec<EdgeState>,
}

/// Result of a batch of trials on one string set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialSummary {
    /// Number of trials run.
    pub trials: usize,
    /// First failing trial, if any. The batch stops there.
    pub failure: Option<TrialOutcome>,
}

impl TrialSummary {
    /// True if no trial failed.
    pub fn passed(&self) -> bool {
        self.failure.is_none()
    }
}

/// Runs hypothesis trials on a fixed string set.
#[derive(Debug, Clone)]
pub struct HypothesisChecker {
    graph: LayeredGraph,
    /// Cycle elements, sorted, for permutation checks.
    elements: Vec<String>,
}

impl HypothesisChecker {
    /// Build a checker for `strings`.
    ///
    /// With `include_empty_in_cycle` set, the empty string is a cycle
    /// element (and a root) of every trial.
    pub fn new<S: AsRef<str>>(strings: &[S], config: CheckerConfig) -> Result<Self, TrialError> {
        if strings.is_empty() {
            return Err(TrialError::EmptyStringSet);
        }

        let mut elements: Vec<String> = strings.iter().map(|s| s.as_ref().to_string()).collect();
        if config.include_empty_in_cycle {
            elements.push(String::new());
        }

        let graph = LayeredGraph::with_config(&elements, config);
        elements.sort();

        Ok(Self { graph, elements })
    }

    /// Cycle elements every order must permute, sorted.
    pub fn elements(&self) -> &[String] {
        &self.elements
    }

    /// The graph, in its cleared between-trials state.
    pub fn graph(&self) -> &LayeredGraph {
        &self.graph
    }

    /// Run one trial for the cyclic `order`.
    pub fn run_trial<S: AsRef<str>>(&mut self, order: &[S]) -> Result<TrialOutcome, TrialError> {
        let order: Vec<String> = order.iter().map(|s| s.as_ref().to_string()).collect();
        let mut sorted = order.clone();
        sorted.sort();
        if sorted != self.elements {
            return Err(TrialError::NotAPermutation(order));
        }

        trace!(order = ?order, "overlaying cycle");
        self.graph.add_cycle(&order);
        let outcome = self.descend(order);
        self.graph.clear();
        Ok(outcome)
    }

    /// Run trials in sequence, stopping at the first failure.
    pub fn run_trials<S: AsRef<str>>(&mut self, orders: &[Vec<S>]) -> Result<TrialSummary, TrialError> {
        for (i, order) in orders.iter().enumerate() {
            let outcome = self.run_trial(order)?;
            if !outcome.passed {
                return Ok(TrialSummary {
                    trials: i + 1,
                    failure: Some(outcome),
                });
            }
        }
        Ok(TrialSummary {
            trials: orders.len(),
            failure: None,
        })
    }

    /// Run `tries` trials on random orders drawn from `rng`.
    pub fn run_random_trials<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        tries: usize,
    ) -> Result<TrialSummary, TrialError> {
        for trial in 0..tries {
            let order = shuffled_order(rng, &self.elements);
            debug!(trial, order = ?order, "starting trial");

            let outcome = self.run_trial(&order)?;
            if !outcome.passed {
                return Ok(TrialSummary {
                    trials: trial + 1,
                    failure: Some(outcome),
                });
            }
        }
        Ok(TrialSummary {
            trials: tries,
            failure: None,
        })
    }

    fn descend(&mut self, order: Vec<String>) -> TrialOutcome {
        let mut layers_checked = 0;

        for l in (1..=self.graph.max_layer()).rev() {
            layers_checked += 1;
            if !self.graph.check_weak_components(l) {
                warn!(layer = l, order = ?order, "hypothesis failed");
                return TrialOutcome {
                    order,
                    passed: false,
                    failed_layer: Some(l),
                    layers_checked,
                    edge_state: self.graph.edge_state(),
                };
            }
            self.graph.collapse_layer(l);
        }

        TrialOutcome {
            order,
            passed: true,
            failed_layer: None,
            layers_checked,
            edge_state: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::seeded_rng;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_set_rejected() {
        let empty: [&str; 0] = [];
        let err = HypothesisChecker::new(&empty, CheckerConfig::default()).unwrap_err();
        assert_eq!(err, TrialError::EmptyStringSet);
    }

    #[test]
    fn test_elements_include_empty_string() {
        let checker = HypothesisChecker::new(&["bc", "ab"], CheckerConfig::default()).unwrap();
        assert_eq!(checker.elements(), strings(&["", "ab", "bc"]).as_slice());

        let config = CheckerConfig {
            include_empty_in_cycle: false,
            ..CheckerConfig::default()
        };
        let checker = HypothesisChecker::new(&["bc", "ab"], config).unwrap();
        assert_eq!(checker.elements(), strings(&["ab", "bc"]).as_slice());
    }

    #[test]
    fn test_rejects_non_permutation() {
        let mut checker = HypothesisChecker::new(&["ab", "bc"], CheckerConfig::default()).unwrap();

        let missing = checker.run_trial(&["ab", "bc"]);
        assert!(matches!(missing, Err(TrialError::NotAPermutation(_))));

        let foreign = checker.run_trial(&["ab", "bc", "zz"]);
        assert!(matches!(foreign, Err(TrialError::NotAPermutation(_))));

        // Nothing was overlaid
        assert_eq!(checker.graph().total_weight(), 0);
    }

    #[test]
    fn test_duplicates_are_a_multiset() {
        let mut checker = HypothesisChecker::new(&["ab", "ab"], CheckerConfig::default()).unwrap();
        assert!(checker.run_trial(&["ab", "", "ab"]).is_ok());
        assert!(checker.run_trial(&["ab", ""]).is_err());
    }

    #[test]
    fn test_triangle_trial_passes() {
        let mut checker = HypothesisChecker::new(&["ab", "bc", "ca"], CheckerConfig::default()).unwrap();
        let outcome = checker.run_trial(&["ab", "bc", "ca", ""]).unwrap();

        assert!(outcome.passed);
        assert_eq!(outcome.failed_layer, None);
        assert_eq!(outcome.layers_checked, 2);
        assert!(outcome.edge_state.is_empty());
        assert_eq!(checker.graph().total_weight(), 0);
    }

    #[test]
    fn test_undoubled_walk_fails_at_layer_one() {
        let config = CheckerConfig {
            path_multiplicity: 1,
            include_empty_in_cycle: false,
            ..CheckerConfig::default()
        };
        let mut checker = HypothesisChecker::new(&["ab", "ba"], config).unwrap();
        let outcome = checker.run_trial(&["ab", "ba"]).unwrap();

        assert!(!outcome.passed);
        assert_eq!(outcome.failed_layer, Some(1));
        assert_eq!(outcome.layers_checked, 2);
        assert!(outcome.edge_state.contains(&EdgeState::new("ab", 1, 1)));
        // Reset for the next trial even after a failure
        assert_eq!(checker.graph().total_weight(), 0);
    }

    #[test]
    fn test_run_trials_stops_at_first_failure() {
        let config = CheckerConfig {
            path_multiplicity: 1,
            include_empty_in_cycle: false,
            ..CheckerConfig::default()
        };
        let mut checker = HypothesisChecker::new(&["ab", "ba"], config).unwrap();
        let orders = vec![vec!["ab", "ba"], vec!["ba", "ab"]];

        let summary = checker.run_trials(&orders).unwrap();
        assert_eq!(summary.trials, 1);
        assert!(!summary.passed());
    }

    #[test]
    fn test_random_trials_leave_graph_cleared() {
        let mut checker = HypothesisChecker::new(&["ab", "bc", "ca"], CheckerConfig::default()).unwrap();
        let summary = checker.run_random_trials(&mut seeded_rng(5), 10).unwrap();

        assert!(summary.trials >= 1 && summary.trials <= 10);
        assert_eq!(summary.passed(), summary.trials == 10 && summary.failure.is_none());
        assert_eq!(checker.graph().total_weight(), 0);
    }
}
