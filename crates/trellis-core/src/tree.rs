//! Operations over the form tree: the derived field count,
//! fresh-identity deep cloning, and shape comparison.

use uuid::Uuid;

use crate::model::{AssessmentForm, Category, FormStatus, Question};

/// The derived count of fillable prompts in a form.
///
/// Per category: the number of questions, plus `sub_questions.len()` for
/// every option (of any question in the category) that branches. This
/// counts exactly one level of sub-question expansion — grandchildren
/// sub-questions do not contribute. That is the counting rule the
/// authoring UI has always displayed, kept bit-for-bit.
pub fn field_count(form: &AssessmentForm) -> usize {
    let mut count = 0;
    for category in &form.categories {
        count += category.questions.len();
        for question in &category.questions {
            for option in &question.options {
                if option.has_sub_questions {
                    count += option.sub_questions.len();
                }
            }
        }
    }
    count
}

/// Top-level fields replaced on a fresh-identity clone. Everything else
/// is copied verbatim from the source form.
#[derive(Debug, Clone)]
pub struct CloneOverrides {
    pub title: String,
    pub created_by: String,
    pub status: FormStatus,
    pub usage_count: u32,
}

/// Deep-copy a form, assigning a new id to the form itself and to every
/// category, question, and option — including nested sub-questions and
/// their options at every depth, not just the top level.
///
/// `has_sub_questions` is recomputed from each cloned option's children,
/// so a clone can never carry a stale flag. Timestamps are copied; the
/// repository resets them when it persists the clone.
pub fn clone_with_fresh_ids(source: &AssessmentForm, overrides: CloneOverrides) -> AssessmentForm {
    let mut form = source.clone();
    form.id = Uuid::new_v4();
    form.title = overrides.title;
    form.created_by = overrides.created_by;
    form.status = overrides.status;
    form.usage_count = overrides.usage_count;

    for category in &mut form.categories {
        category.id = fresh_id();
        let mut stack: Vec<&mut Question> = category.questions.iter_mut().collect();
        while let Some(question) = stack.pop() {
            question.id = fresh_id();
            for option in question.options.iter_mut() {
                option.id = fresh_id();
                option.has_sub_questions = !option.sub_questions.is_empty();
                stack.extend(option.sub_questions.iter_mut());
            }
        }
    }
    form
}

fn fresh_id() -> String {
    Uuid::new_v4().to_string()
}

/// Structural equality ignoring generated ids and timestamps. Compares
/// the top-level fields and the full tree shape; intended for comparing
/// a clone against its source in tests.
pub fn shape_eq(a: &AssessmentForm, b: &AssessmentForm) -> bool {
    a.title == b.title
        && a.description == b.description
        && a.category == b.category
        && a.status == b.status
        && a.created_by == b.created_by
        && a.usage_count == b.usage_count
        && categories_shape_eq(&a.categories, &b.categories)
}

/// Tree-shape equality for category lists, ignoring node ids.
pub fn categories_shape_eq(a: &[Category], b: &[Category]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut stack: Vec<(&Question, &Question)> = Vec::new();
    for (ca, cb) in a.iter().zip(b) {
        if ca.name != cb.name
            || ca.description != cb.description
            || ca.questions.len() != cb.questions.len()
        {
            return false;
        }
        stack.extend(ca.questions.iter().zip(cb.questions.iter()));
    }

    while let Some((qa, qb)) = stack.pop() {
        if qa.text != qb.text
            || qa.question_type != qb.question_type
            || qa.options.len() != qb.options.len()
        {
            return false;
        }
        for (oa, ob) in qa.options.iter().zip(qb.options.iter()) {
            if oa.text != ob.text
                || oa.has_sub_questions != ob.has_sub_questions
                || oa.sub_questions.len() != ob.sub_questions.len()
            {
                return false;
            }
            stack.extend(oa.sub_questions.iter().zip(ob.sub_questions.iter()));
        }
    }
    true
}
