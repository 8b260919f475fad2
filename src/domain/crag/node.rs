//! Routing table of the corrective-retrieval state machine

use serde::{Deserialize, Serialize};

use super::action::CragAction;
use crate::domain::DomainError;

/// A step of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineNode {
    Retrieve,
    Evaluate,
    Refine,
    Search,
    Generate,
    End,
}

impl PipelineNode {
    pub const START: PipelineNode = PipelineNode::Retrieve;

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Retrieve => "retrieve",
            Self::Evaluate => "evaluate",
            Self::Refine => "refine",
            Self::Search => "search",
            Self::Generate => "generate",
            Self::End => "end",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::End)
    }

    /// Successor of this node given the current action.
    ///
    /// Combinations outside the routing table are contract violations.
    pub fn next(&self, action: Option<CragAction>) -> Result<PipelineNode, DomainError> {
        use CragAction::*;
        use PipelineNode::*;

        match (self, action) {
            (Retrieve, _) => Ok(Evaluate),
            (Evaluate, Some(Correct | Ambiguous)) => Ok(Refine),
            (Evaluate, Some(Incorrect)) => Ok(Search),
            (Refine, Some(Ambiguous)) => Ok(Search),
            (Refine, Some(Correct)) => Ok(Generate),
            (Search, _) => Ok(Generate),
            (Generate, _) => Ok(End),
            (node, action) => Err(DomainError::contract(format!(
                "no transition from '{}' with action {}",
                node.as_str(),
                action.map(|a| a.as_str()).unwrap_or("<unset>")
            ))),
        }
    }
}

impl std::fmt::Display for PipelineNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
