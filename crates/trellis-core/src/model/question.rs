use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// One selectable answer to a question.
///
/// An option may branch into its own sub-questions, which is how
/// skip-logic questionnaires are built. `has_sub_questions` must agree
/// with `sub_questions` being non-empty; the validator rejects forms
/// where the two disagree.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AnswerOption {
    /// Caller-supplied id, unique within the owning question.
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub has_sub_questions: bool,
    /// Nested follow-up questions, recursively, to unbounded depth.
    #[serde(default)]
    pub sub_questions: Vec<Question>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Question {
    /// Caller-supplied id, unique within the owning category, including
    /// every nested sub-question reachable from it.
    pub id: String,
    pub text: String,
    #[serde(rename = "type", default)]
    pub question_type: QuestionType,
    /// A question needs at least two options to be answerable.
    pub options: Vec<AnswerOption>,
}

/// Closed set of answer types. Only one variant exists today; modeled as
/// an enum so new types extend the wire contract rather than break it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum QuestionType {
    #[default]
    MultipleChoice,
}

/// A named grouping of questions within a form.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Category {
    /// Caller-supplied id, unique within the owning form.
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub questions: Vec<Question>,
}
