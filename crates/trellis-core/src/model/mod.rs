pub mod form;
pub mod input;
pub mod question;
pub mod stats;

pub use form::{AssessmentForm, FormCategory, FormStatus};
pub use input::{CreateFormInput, UpdateFormInput};
pub use question::{AnswerOption, Category, Question, QuestionType};
pub use stats::CategoryStats;
