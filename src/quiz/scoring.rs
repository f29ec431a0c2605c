use crate::quiz::mcq::SAMPLE_MCQ;
use crate::quiz::{Mode, Session};

pub const LEARNER_MESSAGE: &str =
    "✅ In Learner Mode, scores matter less. Focus on the explanations.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    pub points: usize,
    pub out_of: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSummary {
    pub score: Score,
    pub headline: String,
}

/// One point per non-blank answer plus one for the correct MCQ option.
/// Answers are not checked for correctness.
pub fn score(session: &Session) -> Score {
    let answered = (0..session.generated_questions.len())
        .filter(|&i| !session.answer(i).trim().is_empty())
        .count();
    let mcq = usize::from(SAMPLE_MCQ.is_correct(session.mcq_answer.as_deref()));

    Score {
        points: answered + mcq,
        out_of: session.num_questions.get() + 1,
    }
}

pub fn summarize(session: &Session) -> ResultSummary {
    let score = score(session);
    let headline = match session.mode {
        Mode::Learner => LEARNER_MESSAGE.to_string(),
        _ => format!("Your Score: {}/{}", score.points, score.out_of),
    };
    ResultSummary { score, headline }
}
