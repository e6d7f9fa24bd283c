use std::fmt;

use gridstar_core::{Coord, Dims};

use crate::policy::Cost;

/// Which end of a search an endpoint error refers to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    Goal,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => f.write_str("start"),
            Self::Goal => f.write_str("goal"),
        }
    }
}

/// Why an endpoint was rejected.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EndpointIssue {
    OutOfBounds,
    Blocked,
}

impl fmt::Display for EndpointIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds => f.write_str("outside the grid"),
            Self::Blocked => f.write_str("cell is blocked"),
        }
    }
}

/// Rejected [`SearchConfig`](crate::SearchConfig) values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("tie-break bias must be finite and at least 1.0, got {0}")]
    Bias(f64),
    #[error("jitter must be between 0 and {max}, got {0}", max = crate::policy::MAX_JITTER)]
    Jitter(f64),
    #[error("step costs must be positive")]
    ZeroStepCost,
    #[error("diagonal step cost {diagonal} is below orthogonal cost {orthogonal}")]
    DiagonalBelowOrthogonal { orthogonal: Cost, diagonal: Cost },
    #[error("step cost {max_step} can overflow path costs on a {dims} grid")]
    CostOverflow { max_step: Cost, dims: Dims },
}

/// Errors raised by [`search`](crate::search) on caller misuse.
///
/// A search that finds no path is not an error; it returns
/// [`SearchStatus::Failed`](crate::SearchStatus::Failed).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SearchError {
    #[error("invalid {endpoint} {coord}: {reason}")]
    InvalidEndpoints {
        endpoint: Endpoint,
        coord: Coord,
        reason: EndpointIssue,
    },
    #[error("invalid search config: {0}")]
    InvalidConfig(#[from] ConfigError),
}
