use jiff::Timestamp;
use uuid::Uuid;

use trellis_core::model::{
    AnswerOption, AssessmentForm, Category, FormCategory, FormStatus, Question, QuestionType,
};
use trellis_core::tree::{
    CloneOverrides, categories_shape_eq, clone_with_fresh_ids, field_count, shape_eq,
};

fn option(id: &str, text: &str) -> AnswerOption {
    AnswerOption {
        id: id.to_string(),
        text: text.to_string(),
        has_sub_questions: false,
        sub_questions: Vec::new(),
    }
}

fn branching(id: &str, text: &str, sub_questions: Vec<Question>) -> AnswerOption {
    AnswerOption {
        id: id.to_string(),
        text: text.to_string(),
        has_sub_questions: true,
        sub_questions,
    }
}

fn question(id: &str, text: &str, options: Vec<AnswerOption>) -> Question {
    Question {
        id: id.to_string(),
        text: text.to_string(),
        question_type: QuestionType::MultipleChoice,
        options,
    }
}

fn category(id: &str, name: &str, questions: Vec<Question>) -> Category {
    Category {
        id: id.to_string(),
        name: name.to_string(),
        description: String::new(),
        questions,
    }
}

fn form_with(categories: Vec<Category>) -> AssessmentForm {
    let now = Timestamp::now();
    AssessmentForm {
        id: Uuid::new_v4(),
        title: "Progress Review".to_string(),
        description: "Quarterly review".to_string(),
        category: FormCategory::Behavioral,
        status: FormStatus::Active,
        categories,
        created_by: "u1".to_string(),
        usage_count: 4,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

/// Every id in the tree, at every depth, including the form's own.
fn all_ids(form: &AssessmentForm) -> Vec<String> {
    let mut ids = vec![form.id.to_string()];
    for category in &form.categories {
        ids.push(category.id.clone());
        let mut stack: Vec<&Question> = category.questions.iter().collect();
        while let Some(q) = stack.pop() {
            ids.push(q.id.clone());
            for o in &q.options {
                ids.push(o.id.clone());
                stack.extend(o.sub_questions.iter());
            }
        }
    }
    ids
}

fn plain_question(id: &str) -> Question {
    question(id, "Q?", vec![
        option(&format!("{id}-a"), "A"),
        option(&format!("{id}-b"), "B"),
    ])
}

#[test]
fn field_count_adds_one_level_of_branching() {
    // Two categories: 2 questions, then 3 questions where one option
    // branches into 2 sub-questions. 2 + 3 + 2 = 7.
    let subs = vec![plain_question("sq1"), plain_question("sq2")];
    let branched = question("q3", "Q3?", vec![branching("b", "B", subs), option("c", "C")]);
    let form = form_with(vec![
        category("cat1", "First", vec![plain_question("q1"), plain_question("q2")]),
        category(
            "cat2",
            "Second",
            vec![branched, plain_question("q4"), plain_question("q5")],
        ),
    ]);

    assert_eq!(field_count(&form), 7);
}

#[test]
fn field_count_ignores_grandchildren() {
    let grandchildren = vec![plain_question("ssq1"), plain_question("ssq2")];
    let sub = question(
        "sq1",
        "Sub?",
        vec![branching("sb", "SB", grandchildren), option("sc", "SC")],
    );
    let top = question("q1", "Q?", vec![branching("b", "B", vec![sub]), option("c", "C")]);
    let form = form_with(vec![category("cat1", "Only", vec![top])]);

    // One top-level question plus one direct sub-question; the two
    // grandchildren do not contribute.
    assert_eq!(field_count(&form), 2);
}

fn identity_overrides(form: &AssessmentForm) -> CloneOverrides {
    CloneOverrides {
        title: form.title.clone(),
        created_by: form.created_by.clone(),
        status: form.status,
        usage_count: form.usage_count,
    }
}

fn deep_form() -> AssessmentForm {
    let deep = plain_question("sq2");
    let mid = question(
        "sq1",
        "Mid?",
        vec![branching("m", "M", vec![deep]), option("n", "N")],
    );
    let top = question("q1", "Top?", vec![branching("t", "T", vec![mid]), option("u", "U")]);
    form_with(vec![
        category("cat1", "Deep", vec![top]),
        category("cat2", "Flat", vec![plain_question("q2")]),
    ])
}

#[test]
fn clone_regenerates_ids_at_every_depth() {
    let source = deep_form();
    let clone = clone_with_fresh_ids(&source, identity_overrides(&source));

    let source_ids = all_ids(&source);
    let clone_ids = all_ids(&clone);
    assert_eq!(source_ids.len(), clone_ids.len());
    for id in &clone_ids {
        assert!(!source_ids.contains(id), "id '{id}' survived the clone");
    }
    assert!(shape_eq(&source, &clone));
}

#[test]
fn clone_applies_overrides() {
    let source = deep_form();
    let clone = clone_with_fresh_ids(
        &source,
        CloneOverrides {
            title: format!("{} (Copy)", source.title),
            created_by: "u9".to_string(),
            status: FormStatus::Draft,
            usage_count: 0,
        },
    );

    assert_eq!(clone.title, "Progress Review (Copy)");
    assert_eq!(clone.created_by, "u9");
    assert_eq!(clone.status, FormStatus::Draft);
    assert_eq!(clone.usage_count, 0);
    // Everything not overridden is copied verbatim.
    assert_eq!(clone.description, source.description);
    assert_eq!(clone.category, source.category);
    assert!(categories_shape_eq(&source.categories, &clone.categories));
}

#[test]
fn clone_recomputes_stale_sub_question_flag() {
    let mut source = form_with(vec![category("cat1", "Only", vec![plain_question("q1")])]);
    source.categories[0].questions[0].options[0].has_sub_questions = true;

    let clone = clone_with_fresh_ids(&source, identity_overrides(&source));
    assert!(!clone.categories[0].questions[0].options[0].has_sub_questions);
}

#[test]
fn shape_eq_sees_content_changes() {
    let source = deep_form();
    let mut other = source.clone();
    assert!(shape_eq(&source, &other));

    other.categories[0].questions[0].options[0].sub_questions[0].text = "Changed".to_string();
    assert!(!shape_eq(&source, &other));
}
