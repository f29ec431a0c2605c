#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mcq {
    pub question: &'static str,
    pub options: [&'static str; 4],
    pub answer: &'static str,
    pub explanation: &'static str,
    pub hint: &'static str,
}

/// The one MCQ every quiz ends with.
pub const SAMPLE_MCQ: Mcq = Mcq {
    question: "What is the SI unit of force?",
    options: ["Newton", "Joule", "Watt", "Pascal"],
    answer: "Newton",
    explanation: "Force is measured in Newtons, named after Isaac Newton.",
    hint: "The answer is named after a famous scientist.",
};

impl Mcq {
    /// No selection never counts as correct.
    pub fn is_correct(&self, choice: Option<&str>) -> bool {
        choice == Some(self.answer)
    }

    pub fn option(&self, text: &str) -> Option<&'static str> {
        self.options.iter().copied().find(|option| *option == text.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_answer_is_correct() {
        assert!(SAMPLE_MCQ.is_correct(Some("Newton")));
        assert!(!SAMPLE_MCQ.is_correct(Some("Joule")));
        assert!(!SAMPLE_MCQ.is_correct(Some("newton")));
        assert!(!SAMPLE_MCQ.is_correct(None));
    }

    #[test]
    fn answer_is_one_of_the_options() {
        assert_eq!(SAMPLE_MCQ.option(SAMPLE_MCQ.answer), Some("Newton"));
        assert_eq!(SAMPLE_MCQ.option(" Watt "), Some("Watt"));
        assert_eq!(SAMPLE_MCQ.option("Kelvin"), None);
    }
}
