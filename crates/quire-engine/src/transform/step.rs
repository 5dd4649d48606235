use quire_config::EngineConfig;
use serde::{Deserialize, Serialize};

use super::error::TransformError;
use super::replace::ReplaceStep;
use super::result::StepResult;
use super::style::StyleStep;
use crate::model::{Node, Pos};

/// One named, invertible edit.
///
/// Steps serialize with their name in a `name` field, so a stored step log
/// can be replayed against the document it was recorded on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "camelCase")]
pub enum Step {
    Replace(ReplaceStep),
    AddStyle(StyleStep),
    RemoveStyle(StyleStep),
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::Replace(_) => "replace",
            Step::AddStyle(_) => "addStyle",
            Step::RemoveStyle(_) => "removeStyle",
        }
    }

    /// The range the step covers in the document it applies to.
    pub fn range(&self) -> (&Pos, &Pos) {
        match self {
            Step::Replace(step) => (&step.from, &step.to),
            Step::AddStyle(step) | Step::RemoveStyle(step) => (&step.from, &step.to),
        }
    }

    pub fn apply(&self, doc: &Node, config: &EngineConfig) -> Result<StepResult, TransformError> {
        match self {
            Step::Replace(step) => step.apply(doc, config),
            Step::AddStyle(step) => step.apply_add(doc, config),
            Step::RemoveStyle(step) => step.apply_remove(doc, config),
        }
    }

    /// The step that undoes this one. `old_doc` is the document this step
    /// was applied to and `result` what applying it with `config` produced.
    pub fn invert(&self, old_doc: &Node, result: &StepResult, config: &EngineConfig) -> Step {
        match self {
            Step::Replace(step) => Step::Replace(step.invert(old_doc, result, config)),
            Step::AddStyle(step) => Step::RemoveStyle(StyleStep::new(
                step.from.clone(),
                result.map(&step.to).pos,
                step.style.clone(),
            )),
            Step::RemoveStyle(step) => Step::AddStyle(StyleStep::new(
                step.from.clone(),
                result.map(&step.to).pos,
                step.style.clone(),
            )),
        }
    }
}
