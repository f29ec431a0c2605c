pub mod ai_helper;
pub mod mcq;
pub mod pages;
pub mod scoring;

use std::collections::BTreeMap;

use log::error;

const FALLBACK_MODE_LABEL: &str = "General";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Page {
    #[default]
    Home,
    Input,
    Quiz,
    Result,
    Future,
}

impl Page {
    /// Edges of the page state machine. Everything else is unreachable.
    pub fn can_transition_to(self, next: Page) -> bool {
        matches!(
            (self, next),
            (Page::Home, Page::Input)
                | (Page::Home, Page::Future)
                | (Page::Input, Page::Quiz)
                | (Page::Quiz, Page::Result)
                | (Page::Quiz, Page::Home)
                | (Page::Result, Page::Home)
                | (Page::Future, Page::Home)
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Mode {
    #[default]
    Unset,
    Test,
    Learner,
    Exam,
}

impl Mode {
    pub fn label(&self) -> Option<&'static str> {
        match self {
            Mode::Unset => None,
            Mode::Test => Some("Test"),
            Mode::Learner => Some("Learner"),
            Mode::Exam => Some("Exam"),
        }
    }
}

/// Number of generated questions in a quiz, always within `MIN..=MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct NumQuestions(u8);

impl NumQuestions {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    pub fn get(self) -> usize {
        self.0 as usize
    }
}

impl Default for NumQuestions {
    fn default() -> Self {
        Self(3)
    }
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Session {
    pub page: Page,
    pub mode: Mode,
    pub topic: String,
    pub num_questions: NumQuestions,
    pub generated_questions: Vec<String>,
    pub answers: BTreeMap<usize, String>,
    pub mcq_answer: Option<String>,
    /// Quiz page only: the step being answered. Steps `0..n` are the
    /// generated questions, step `n` is the MCQ, anything past it is done.
    pub cursor: usize,
}

impl Session {
    pub fn go(&mut self, next: Page) {
        if self.page.can_transition_to(next) {
            log::debug!("page transition {:?} -> {:?}", self.page, next);
            self.page = next;
            return;
        }
        error!("refusing page transition {:?} -> {:?}", self.page, next);
        debug_assert!(false, "illegal page transition {:?} -> {:?}", self.page, next);
    }

    pub fn mode_label(&self) -> &'static str {
        match self.mode.label() {
            Some(label) => label,
            None => {
                error!("page {:?} rendered without a selected mode", self.page);
                debug_assert!(false, "page {:?} rendered without a selected mode", self.page);
                FALLBACK_MODE_LABEL
            }
        }
    }

    pub fn answer(&self, index: usize) -> &str {
        self.answers.get(&index).map(String::as_str).unwrap_or("")
    }

    /// Replaces the quiz with freshly generated questions, dropping every
    /// answer that belonged to the previous one.
    pub fn load_questions(&mut self, questions: Vec<String>) {
        self.generated_questions = questions;
        self.answers.clear();
        self.mcq_answer = None;
        self.cursor = 0;
    }
}
