use log::{debug, warn};
use teloxide::utils::html::{bold, escape};

use crate::quiz::ai_helper::{generate_questions, QuestionGenerator};
use crate::quiz::mcq::SAMPLE_MCQ;
use crate::quiz::scoring::summarize;
use crate::quiz::{Mode, NumQuestions, Page, Session};

pub const TEST_MODE: &str = "Test Mode";
pub const LEARNER_MODE: &str = "Learner Mode";
pub const EXAM_MODE: &str = "Exam Mode";
pub const FUTURE_SCOPE: &str = "Future Scope";
pub const GENERATE_QUIZ: &str = "Generate Quiz";
pub const SUBMIT_QUIZ: &str = "Submit Quiz";
pub const SKIP: &str = "Skip";
pub const PREVIOUS: &str = "Previous";
pub const BACK_TO_HOME: &str = "Back to Home";

const QUESTION_HINT: &str = "Hint: Think about the basic principles of this topic.";
const QUESTION_EXPLANATION: &str = "Based on generated content and key concepts.";

/// Telegram refuses messages longer than this many characters.
pub const MESSAGE_LIMIT: usize = 4096;

// Caps on echoed free text so a full result page stays under MESSAGE_LIMIT.
const TOPIC_CLIP: usize = 100;
const QUESTION_CLIP: usize = 250;
const ANSWER_CLIP: usize = 250;
const QUIZ_QUESTION_CLIP: usize = 2000;

const LEADERBOARD: [&str; 3] = [
    "1. Student A – 3/3",
    "2. You – 2/3",
    "3. Student B – 1/3",
];

const FUTURE_ITEMS: [&str; 5] = [
    "<b>1. PDF-to-Quiz with RAG</b>: upload past papers and auto-generate quizzes",
    "<b>2. Advanced Descriptive Evaluation</b>: AI-based semantic grading",
    "<b>3. Real-Time Analytics Dashboard</b>: teacher insights and progress tracking",
    "<b>4. Multi-Platform Expansion</b>: mobile app and LMS integration",
    "<b>5. Scalability &amp; Security</b>: cloud infra and anti-cheating tools",
];

/// A user interaction, already interpreted for the page it arrived on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Render the current page without changing anything.
    Show,
    ChooseMode(Mode),
    OpenFuture,
    BackHome,
    Generate,
    SetCount(u8),
    Text(String),
    Skip,
    Previous,
    Submit,
}

impl Action {
    /// Reads a chat message against the buttons the current page offers.
    pub fn parse(page: Page, text: &str) -> Self {
        let text = text.trim();
        match page {
            Page::Home => match text {
                TEST_MODE => Action::ChooseMode(Mode::Test),
                LEARNER_MODE => Action::ChooseMode(Mode::Learner),
                EXAM_MODE => Action::ChooseMode(Mode::Exam),
                FUTURE_SCOPE => Action::OpenFuture,
                _ => Action::Show,
            },
            Page::Input => match text {
                GENERATE_QUIZ => Action::Generate,
                _ => match text.parse::<u8>() {
                    Ok(count) => Action::SetCount(count),
                    Err(_) => Action::Text(text.to_string()),
                },
            },
            Page::Quiz => match text {
                SUBMIT_QUIZ => Action::Submit,
                SKIP => Action::Skip,
                PREVIOUS => Action::Previous,
                BACK_TO_HOME => Action::BackHome,
                _ => Action::Text(text.to_string()),
            },
            Page::Result | Page::Future => match text {
                BACK_TO_HOME => Action::BackHome,
                _ => Action::Show,
            },
        }
    }
}

/// What a renderer wants shown: Telegram HTML plus keyboard rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Screen {
    pub text: String,
    pub keyboard: Vec<Vec<String>>,
}

impl Screen {
    fn new(text: String, keyboard: &[&[&str]]) -> Self {
        Self {
            text,
            keyboard: keyboard
                .iter()
                .map(|row| row.iter().map(|b| b.to_string()).collect())
                .collect(),
        }
    }

    fn then(self, next: Screen) -> Screen {
        let text = if self.text.is_empty() {
            next.text
        } else {
            format!("{}\n\n{}", self.text, next.text)
        };
        Screen {
            text,
            keyboard: next.keyboard,
        }
    }
}

fn clip(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(max.saturating_sub(1)).collect();
    clipped.push('…');
    clipped
}

/// Hands `action` to the renderer of the current page. When that renderer
/// moves to another page, the new page is rendered as well.
pub async fn dispatch(
    session: &mut Session,
    action: Action,
    generator: &dyn QuestionGenerator,
) -> Screen {
    let from = session.page;
    let screen = render(session, action, generator).await;
    if session.page == from {
        return screen;
    }
    let next = render(session, Action::Show, generator).await;
    screen.then(next)
}

async fn render(session: &mut Session, action: Action, generator: &dyn QuestionGenerator) -> Screen {
    match session.page {
        Page::Home => home(session, action),
        Page::Input => input(session, action, generator).await,
        Page::Quiz => quiz(session, action),
        Page::Result => result(session, action),
        Page::Future => future(session, action),
    }
}

pub fn home(session: &mut Session, action: Action) -> Screen {
    match action {
        Action::ChooseMode(mode) if mode != Mode::Unset => {
            session.mode = mode;
            session.go(Page::Input);
            return Screen::default();
        }
        Action::OpenFuture => {
            session.go(Page::Future);
            return Screen::default();
        }
        _ => {}
    }

    let text = format!(
        "{}\n<i>Personalized • Adaptive • Smart Learning</i>\n\n\
         Welcome to our prototype demo!\n\
         Choose a mode to continue:\n\
         📝 <b>Test Mode</b>: quick practice and small class tests\n\
         📘 <b>Learner Mode</b>: concept-building with hints and explanations\n\
         ⏳ <b>Exam Mode</b>: real exam simulation with leaderboard",
        bold("AI-Powered Quiz Platform 🎓")
    );
    Screen::new(
        text,
        &[&[TEST_MODE, LEARNER_MODE, EXAM_MODE], &[FUTURE_SCOPE]],
    )
}

pub async fn input(
    session: &mut Session,
    action: Action,
    generator: &dyn QuestionGenerator,
) -> Screen {
    let mut notice = None;
    match action {
        Action::Text(topic) => session.topic = topic,
        Action::SetCount(count) => match NumQuestions::new(count) {
            Some(count) => session.num_questions = count,
            None => {
                notice = Some(format!(
                    "⚠️ Number of questions must be between {} and {}.",
                    NumQuestions::MIN,
                    NumQuestions::MAX
                ))
            }
        },
        Action::Generate => {
            match generate_questions(generator, &session.topic, session.num_questions.get()).await
            {
                Ok(questions) => {
                    session.load_questions(questions);
                    session.go(Page::Quiz);
                    return Screen::default();
                }
                Err(err) => {
                    warn!("Question generation failed: {}", err);
                    notice = Some(format!(
                        "⚠️ Could not generate questions: {}",
                        escape(&err.to_string())
                    ));
                }
            }
        }
        _ => {}
    }

    let topic = if session.topic.is_empty() {
        "<i>not set</i>".to_string()
    } else {
        bold(&escape(&clip(&session.topic, TOPIC_CLIP)))
    };
    let mut text = format!(
        "{}\n\nTopic: {}\nNumber of questions: {}\n\n\
         Send a topic (e.g., Physics Motion), pick how many questions you want, \
         then press {}.",
        bold(&format!("Teacher Input ({} Mode)", session.mode_label())),
        topic,
        session.num_questions.get(),
        GENERATE_QUIZ
    );
    if let Some(notice) = notice {
        text = format!("{}\n\n{}", notice, text);
    }
    Screen::new(text, &[&["1", "2", "3", "4", "5"], &[GENERATE_QUIZ]])
}

pub fn quiz(session: &mut Session, action: Action) -> Screen {
    if session.generated_questions.is_empty() {
        if action == Action::BackHome {
            session.go(Page::Home);
            return Screen::default();
        }
        return Screen::new(
            "⚠️ No questions generated yet. Go back and generate a quiz.".to_string(),
            &[&[BACK_TO_HOME]],
        );
    }

    let total = session.generated_questions.len();
    let mut notice = None;
    match action {
        Action::Submit => {
            session.go(Page::Result);
            return Screen::default();
        }
        Action::Skip => session.cursor = (session.cursor + 1).min(total + 1),
        Action::Previous => session.cursor = session.cursor.saturating_sub(1),
        Action::Text(text) if session.cursor < total => {
            session.answers.insert(session.cursor, text);
            session.cursor += 1;
        }
        Action::Text(text) if session.cursor == total => match SAMPLE_MCQ.option(&text) {
            Some(option) => {
                session.mcq_answer = Some(option.to_string());
                session.cursor += 1;
            }
            None => notice = Some("Please pick one of the options.".to_string()),
        },
        _ => {}
    }

    let mut text = format!(
        "{}\nTopic: {}\n\n",
        bold(&format!("Student Quiz Attempt – {} Mode", session.mode_label())),
        bold(&escape(&clip(&session.topic, TOPIC_CLIP)))
    );
    if let Some(notice) = notice {
        text.push_str(&notice);
        text.push_str("\n\n");
    }
    let learner = session.mode == Mode::Learner;

    if session.cursor < total {
        let i = session.cursor;
        text.push_str(&format!(
            "{}\nQ{}: {}\n\nReply with your answer.",
            bold(&format!("AI-Generated Question {} of {}", i + 1, total)),
            i + 1,
            escape(&clip(&session.generated_questions[i], QUIZ_QUESTION_CLIP))
        ));
        if learner {
            text.push_str(&format!("\n<i>{}</i>", QUESTION_HINT));
        }
        let current = session.answer(i);
        if !current.trim().is_empty() {
            text.push_str(&format!(
                "\n\nCurrent answer: {}\nSend a new one to replace it.",
                escape(&clip(current, ANSWER_CLIP))
            ));
        }
        if i == 0 {
            return Screen::new(text, &[&[SKIP], &[SUBMIT_QUIZ]]);
        }
        return Screen::new(text, &[&[PREVIOUS, SKIP], &[SUBMIT_QUIZ]]);
    }

    if session.cursor == total {
        text.push_str(&format!(
            "{}\n{}",
            bold("Multiple Choice"),
            escape(SAMPLE_MCQ.question)
        ));
        if learner {
            text.push_str(&format!("\n<i>Hint: {}</i>", SAMPLE_MCQ.hint));
        }
        if let Some(choice) = &session.mcq_answer {
            text.push_str(&format!("\n\nCurrent answer: {}", escape(choice)));
        }
        return Screen::new(
            text,
            &[&SAMPLE_MCQ.options, &[PREVIOUS, SKIP], &[SUBMIT_QUIZ]],
        );
    }

    text.push_str(&format!("All questions done. Press {} to see your results.", SUBMIT_QUIZ));
    Screen::new(text, &[&[PREVIOUS], &[SUBMIT_QUIZ]])
}

pub fn result(session: &mut Session, action: Action) -> Screen {
    if action == Action::BackHome {
        session.go(Page::Home);
        return Screen::default();
    }

    let summary = summarize(session);
    debug!(
        "scored {}/{} in {:?} mode",
        summary.score.points, summary.score.out_of, session.mode
    );
    let mut lines = vec![
        bold(&format!("Results and Leaderboard – {} Mode", session.mode_label())),
        format!("Topic: {}", bold(&escape(&clip(&session.topic, TOPIC_CLIP)))),
        String::new(),
        summary.headline,
        String::new(),
        bold("Explanations:"),
    ];

    for (i, question) in session.generated_questions.iter().enumerate() {
        lines.push(format!("• Q{}: {}", i + 1, escape(&clip(question, QUESTION_CLIP))));
        lines.push(format!(
            "  - Your Answer: {}",
            escape(&clip(session.answer(i), ANSWER_CLIP))
        ));
        lines.push(format!("  - Explanation: {}", QUESTION_EXPLANATION));
    }

    lines.push(format!("• MCQ: {}", escape(SAMPLE_MCQ.question)));
    lines.push(format!(
        "  - Your Answer: {}",
        escape(session.mcq_answer.as_deref().unwrap_or("(none)"))
    ));
    lines.push(format!("  - Correct Answer: {}", SAMPLE_MCQ.answer));
    lines.push(format!("  - Explanation: {}", SAMPLE_MCQ.explanation));

    if session.mode == Mode::Exam {
        lines.push(String::new());
        lines.push(bold("Leaderboard (Demo)"));
        lines.extend(LEADERBOARD.iter().map(|row| row.to_string()));
    }

    Screen::new(lines.join("\n"), &[&[BACK_TO_HOME]])
}

pub fn future(session: &mut Session, action: Action) -> Screen {
    if action == Action::BackHome {
        session.go(Page::Home);
        return Screen::default();
    }

    let text = format!("{}\n\n{}", bold("Future Scope 🚀"), FUTURE_ITEMS.join("\n"));
    Screen::new(text, &[&[BACK_TO_HOME]])
}
