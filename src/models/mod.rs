pub mod block;
pub mod loaders;
pub mod question;
pub mod question_id;

pub use block::{BlockMode, QuestionBlock};
pub use loaders::load_raw_batch;
pub use question::{
    Choice, CorrectAnswer, Creator, ExtractedFields, ExtractedQuestion, Feedback, ImageRefs,
    QuestionStatus, QuestionType, StatusCode,
};
pub use question_id::{IdPart, QuestionId, SubCount};
