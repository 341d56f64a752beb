//! Constraint violation reports.

use std::fmt;

use vartab_core::ModifierId;

use crate::maps::{mutex_key, ConstraintMaps};

/// Which kind of rule was broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    /// Both members of a mutex pair are present.
    Mutex,
    /// `source` is present together with a target it forbids.
    Forbids,
    /// `source` is present without a target it requires.
    Requires,
}

/// A single broken rule in a candidate set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub kind: ViolationKind,
    /// The id whose rule fired (the lower id for mutex pairs).
    pub source: ModifierId,
    pub target: ModifierId,
}

impl Violation {
    pub fn new(kind: ViolationKind, source: ModifierId, target: ModifierId) -> Self {
        Self {
            kind,
            source,
            target,
        }
    }

    pub fn mutex(a: ModifierId, b: ModifierId) -> Self {
        let (a, b) = mutex_key(a, b);
        Self::new(ViolationKind::Mutex, a, b)
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ViolationKind::Mutex => {
                write!(f, "{} and {} are mutually exclusive", self.source, self.target)
            }
            ViolationKind::Forbids => write!(f, "{} forbids {}", self.source, self.target),
            ViolationKind::Requires => write!(f, "{} requires {}", self.source, self.target),
        }
    }
}

/// Every rule `candidate` breaks, in candidate order.
///
/// Agrees with [`crate::violates_constraints`]: the list is empty iff that
/// returns false.
pub fn explain_violations(candidate: &[ModifierId], maps: &ConstraintMaps) -> Vec<Violation> {
    let mut violations = Vec::new();

    for (i, &a) in candidate.iter().enumerate() {
        for &b in &candidate[i + 1..] {
            if maps.is_mutex(a, b) {
                violations.push(Violation::mutex(a, b));
            }
        }

        if let Some(forbidden) = maps.forbids_of(a) {
            let mut hits: Vec<_> = candidate
                .iter()
                .copied()
                .filter(|c| *c != a && forbidden.contains(c))
                .collect();
            hits.sort();
            violations.extend(
                hits.into_iter()
                    .map(|b| Violation::new(ViolationKind::Forbids, a, b)),
            );
        }

        if let Some(required) = maps.requires_of(a) {
            let mut missing: Vec<_> = required
                .iter()
                .copied()
                .filter(|r| !candidate.contains(r))
                .collect();
            missing.sort();
            violations.extend(
                missing
                    .into_iter()
                    .map(|b| Violation::new(ViolationKind::Requires, a, b)),
            );
        }
    }

    violations
}
