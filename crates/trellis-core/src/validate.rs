//! Structural and content validation over whole form trees.
//!
//! Validation never mutates its input and never stops at the first
//! problem: callers always receive the complete error list. An empty
//! list means the form is acceptable for persistence.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

use crate::model::{AnswerOption, AssessmentForm, Category, CreateFormInput, Question, UpdateFormInput};

/// One rule violation, carrying the path of the offending node.
///
/// `field` names the violated attribute (`"title"`, `"categoryName"`,
/// `"questionOptions"`, …); the id fields locate the node, outermost
/// first, and are `None` above the level where the violation occurred.
#[derive(Debug, Clone, Serialize, Deserialize, TS, Error)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
#[error("{message}")]
pub struct ValidationError {
    pub field: String,
    pub category_id: Option<String>,
    pub question_id: Option<String>,
    pub option_id: Option<String>,
    pub message: String,
}

#[derive(Clone, Default)]
struct Path {
    category_id: Option<String>,
    question_id: Option<String>,
    option_id: Option<String>,
}

impl Path {
    fn error(&self, field: &str, message: impl Into<String>) -> ValidationError {
        ValidationError {
            field: field.to_string(),
            category_id: self.category_id.clone(),
            question_id: self.question_id.clone(),
            option_id: self.option_id.clone(),
            message: message.into(),
        }
    }
}

/// Validate a complete form against every structural and content rule.
pub fn validate_form(form: &AssessmentForm) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let root = Path::default();
    if form.title.trim().is_empty() {
        errors.push(root.error("title", "Title is required"));
    }
    if form.description.trim().is_empty() {
        errors.push(root.error("description", "Description is required"));
    }
    if form.created_by.trim().is_empty() {
        errors.push(root.error("createdBy", "Creator ID is required"));
    }
    validate_categories(&form.categories, &mut errors);
    errors
}

/// Validate creation input. Same rules as [`validate_form`]; the
/// repository-assigned fields do not exist yet.
pub fn validate_create(input: &CreateFormInput) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let root = Path::default();
    if input.title.trim().is_empty() {
        errors.push(root.error("title", "Title is required"));
    }
    if input.description.trim().is_empty() {
        errors.push(root.error("description", "Description is required"));
    }
    if input.created_by.trim().is_empty() {
        errors.push(root.error("createdBy", "Creator ID is required"));
    }
    validate_categories(&input.categories, &mut errors);
    errors
}

/// Validate a partial update: absent fields are permitted, present
/// fields obey the full rules. A present `categories` array is validated
/// with the complete tree rules.
pub fn validate_update(input: &UpdateFormInput) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let root = Path::default();
    if let Some(title) = &input.title
        && title.trim().is_empty()
    {
        errors.push(root.error("title", "Title cannot be empty"));
    }
    if let Some(description) = &input.description
        && description.trim().is_empty()
    {
        errors.push(root.error("description", "Description cannot be empty"));
    }
    if let Some(categories) = &input.categories {
        validate_categories(categories, &mut errors);
    }
    errors
}

fn validate_categories(categories: &[Category], errors: &mut Vec<ValidationError>) {
    if categories.is_empty() {
        errors.push(Path::default().error("categories", "At least one category is required"));
        return;
    }

    let mut seen_category_ids = HashSet::new();
    for category in categories {
        let path = Path {
            category_id: Some(category.id.clone()),
            ..Path::default()
        };
        if !seen_category_ids.insert(category.id.as_str()) {
            errors.push(path.error("id", format!("Duplicate category id '{}'", category.id)));
        }
        if category.name.trim().is_empty() {
            errors.push(path.error("categoryName", "Category name is required"));
        }
        if category.questions.is_empty() {
            errors.push(path.error("questions", "Each category must have at least one question"));
        }
        validate_question_tree(category, errors);
    }
}

/// Walk every question in a category, including nested sub-questions at
/// every depth. The walk uses an explicit stack so pathological nesting
/// cannot exhaust the call stack.
fn validate_question_tree(category: &Category, errors: &mut Vec<ValidationError>) {
    let mut seen_question_ids = HashSet::new();
    let mut stack: Vec<&Question> = category.questions.iter().rev().collect();

    while let Some(question) = stack.pop() {
        let path = Path {
            category_id: Some(category.id.clone()),
            question_id: Some(question.id.clone()),
            option_id: None,
        };
        if !seen_question_ids.insert(question.id.as_str()) {
            errors.push(path.error("id", format!("Duplicate question id '{}'", question.id)));
        }
        if question.text.trim().is_empty() {
            errors.push(path.error("questionText", "Question text is required"));
        }
        if question.options.len() < 2 {
            errors.push(path.error(
                "questionOptions",
                "Each question must have at least 2 options",
            ));
        }

        let mut seen_option_ids = HashSet::new();
        for option in &question.options {
            validate_option(&path, option, &mut seen_option_ids, errors);
            for sub_question in option.sub_questions.iter().rev() {
                stack.push(sub_question);
            }
        }
    }
}

fn validate_option<'a>(
    question_path: &Path,
    option: &'a AnswerOption,
    seen_option_ids: &mut HashSet<&'a str>,
    errors: &mut Vec<ValidationError>,
) {
    let path = Path {
        option_id: Some(option.id.clone()),
        ..question_path.clone()
    };
    if !seen_option_ids.insert(option.id.as_str()) {
        errors.push(path.error("id", format!("Duplicate option id '{}'", option.id)));
    }
    if option.text.trim().is_empty() {
        errors.push(path.error("optionText", "Option text is required"));
    }
    if option.has_sub_questions != !option.sub_questions.is_empty() {
        errors.push(path.error(
            "hasSubQuestions",
            "hasSubQuestions must match whether subQuestions is non-empty",
        ));
    }
}
