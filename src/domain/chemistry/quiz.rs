use serde::{Deserialize, Serialize};

use super::schema::{require_text, ResponseSchema};
use crate::domain::llm::PromptPair;
use crate::domain::DomainError;

pub const MAX_QUESTIONS: u32 = 50;
/// Longest chapter excerpt forwarded to a provider, in characters
pub const MAX_CHAPTER_CHARS: usize = 12_000;

const SYSTEM_PROMPT: &str = "You are an experienced chemistry teacher who writes multiple-choice \
tests. Every question has exactly four options labelled A, B, C and D with exactly one correct \
answer. Base every question strictly on the chapter text you are given. Reply with JSON only, \
no markdown, using this shape: {\"questions\":[{\"question\":\"...\",\"options\":{\"A\":\"...\",\
\"B\":\"...\",\"C\":\"...\",\"D\":\"...\"},\"correct\":\"A\",\"explanation\":\"...\"}]}";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    fn guidance(&self) -> &'static str {
        match self {
            Difficulty::Easy => "basic recall of definitions, formulas and facts stated in the text",
            Difficulty::Medium => "understanding and applying the concepts, simple calculations",
            Difficulty::Hard => {
                "multi-step reasoning, stoichiometry and comparing related concepts"
            }
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        };
        write!(f, "{}", s)
    }
}

/// Validated quiz generation request
#[derive(Debug, Clone)]
pub struct QuizTask {
    book_title: Option<String>,
    chapter_title: Option<String>,
    chapter_content: String,
    question_count: u32,
    difficulty: Difficulty,
}

impl QuizTask {
    pub fn new(
        chapter_content: impl Into<String>,
        question_count: u32,
        difficulty: Difficulty,
    ) -> Result<Self, DomainError> {
        let chapter_content = chapter_content.into();

        if chapter_content.trim().is_empty() {
            return Err(DomainError::missing_input("chapterContent is required"));
        }

        if question_count == 0 || question_count > MAX_QUESTIONS {
            return Err(DomainError::missing_input(format!(
                "questionCount must be between 1 and {}",
                MAX_QUESTIONS
            )));
        }

        Ok(Self {
            book_title: None,
            chapter_title: None,
            chapter_content,
            question_count,
            difficulty,
        })
    }

    pub fn with_book_title(mut self, title: Option<String>) -> Self {
        self.book_title = title.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn with_chapter_title(mut self, title: Option<String>) -> Self {
        self.chapter_title = title.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn question_count(&self) -> u32 {
        self.question_count
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn prompt(&self) -> PromptPair {
        let mut user = String::new();
        if let Some(book) = &self.book_title {
            user.push_str(&format!("Book: {}\n", book));
        }
        if let Some(chapter) = &self.chapter_title {
            user.push_str(&format!("Chapter: {}\n", chapter));
        }
        user.push_str(&format!(
            "Write {} {} questions ({}).\n\nChapter text:\n{}",
            self.question_count,
            self.difficulty,
            self.difficulty.guidance(),
            truncate_chars(&self.chapter_content, MAX_CHAPTER_CHARS)
        ));

        PromptPair::new(SYSTEM_PROMPT, user)
    }
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOptions {
    #[serde(rename = "A")]
    pub a: String,
    #[serde(rename = "B")]
    pub b: String,
    #[serde(rename = "C")]
    pub c: String,
    #[serde(rename = "D")]
    pub d: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: QuizOptions,
    pub correct: String,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizPayload {
    pub questions: Vec<QuizQuestion>,
}

impl QuizPayload {
    /// Drop extra questions when a provider wrote more than requested
    pub fn truncate(mut self, count: u32) -> Self {
        self.questions.truncate(count as usize);
        self
    }
}

impl ResponseSchema for QuizPayload {
    const NAME: &'static str = "quiz";

    fn validate(mut self) -> Result<Self, String> {
        if self.questions.is_empty() {
            return Err("quiz has no questions".to_string());
        }

        for (i, q) in self.questions.iter_mut().enumerate() {
            let n = i + 1;
            require_text(&format!("questions[{n}].question"), &q.question)?;

            for (label, option) in [
                ("A", &q.options.a),
                ("B", &q.options.b),
                ("C", &q.options.c),
                ("D", &q.options.d),
            ] {
                require_text(&format!("questions[{n}].options.{label}"), option)?;
            }

            let correct = q.correct.trim().to_ascii_uppercase();
            if !matches!(correct.as_str(), "A" | "B" | "C" | "D") {
                return Err(format!(
                    "questions[{n}].correct must be one of A, B, C, D (got '{}')",
                    q.correct
                ));
            }
            q.correct = correct;
        }

        Ok(self)
    }
}
