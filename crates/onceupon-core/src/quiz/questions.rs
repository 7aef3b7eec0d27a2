//! The fixed question table
//!
//! Score vectors are listed in canonical [`LiteraryType`] order:
//! romantic, detective, dreamer, rebel, architect, philosopher, observer,
//! entertainer.

use crate::LiteraryType;

/// Number of questions in the quiz
pub const QUESTION_COUNT: usize = 14;

/// Number of options offered by every question
pub const OPTIONS_PER_QUESTION: usize = 4;

/// A single answer choice and the points it awards to each type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizOption {
    pub text: &'static str,
    pub scores: [u8; 8],
}

impl QuizOption {
    const fn new(text: &'static str, scores: [u8; 8]) -> Self {
        Self { text, scores }
    }

    /// Points this option awards to `kind`
    pub fn score_for(&self, kind: LiteraryType) -> u8 {
        self.scores[kind.position()]
    }
}

/// A quiz question with its four options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizQuestion {
    /// 1-based question number
    pub id: u32,
    pub prompt: &'static str,
    pub options: [QuizOption; OPTIONS_PER_QUESTION],
}

/// All quiz questions, in presentation order
pub static QUESTIONS: [QuizQuestion; QUESTION_COUNT] = [
    QuizQuestion {
        id: 1,
        prompt: "When you pick up a book, what draws you in first?",
        options: [
            QuizOption::new("The emotional connection between characters", [3, 0, 2, 0, 0, 1, 1, 0]),
            QuizOption::new("A compelling mystery to solve", [0, 3, 0, 1, 2, 1, 2, 0]),
            QuizOption::new("Beautiful, imaginative world-building", [1, 0, 3, 0, 1, 1, 1, 2]),
            QuizOption::new("Characters who challenge the status quo", [1, 1, 1, 3, 0, 2, 1, 1]),
        ],
    },
    QuizQuestion {
        id: 2,
        prompt: "How do you prefer to read?",
        options: [
            QuizOption::new("Slowly, savoring every word and emotion", [2, 0, 2, 0, 0, 3, 2, 0]),
            QuizOption::new("Quickly, eager to solve the puzzle", [0, 3, 0, 1, 2, 0, 1, 2]),
            QuizOption::new("Immersively, losing myself completely", [2, 1, 3, 1, 0, 1, 1, 2]),
            QuizOption::new("Analytically, questioning everything", [0, 2, 0, 2, 3, 3, 3, 0]),
        ],
    },
    QuizQuestion {
        id: 3,
        prompt: "What type of ending satisfies you most?",
        options: [
            QuizOption::new("Love conquers all", [3, 0, 2, 0, 0, 0, 0, 2]),
            QuizOption::new("Justice is served", [0, 3, 0, 2, 2, 1, 1, 0]),
            QuizOption::new("Hope for a better world", [1, 0, 3, 2, 1, 2, 1, 1]),
            QuizOption::new("Thought-provoking ambiguity", [0, 1, 1, 1, 1, 3, 3, 0]),
        ],
    },
    QuizQuestion {
        id: 4,
        prompt: "In a book club discussion, you're most likely to:",
        options: [
            QuizOption::new("Share how the story made you feel", [3, 0, 2, 1, 0, 1, 2, 2]),
            QuizOption::new("Analyze plot structure and clues", [0, 3, 0, 0, 3, 2, 2, 0]),
            QuizOption::new("Imagine alternative storylines", [1, 1, 3, 2, 1, 1, 1, 3]),
            QuizOption::new("Question the author's choices", [0, 1, 0, 3, 2, 3, 2, 1]),
        ],
    },
    QuizQuestion {
        id: 5,
        prompt: "Which literary device appeals to you most?",
        options: [
            QuizOption::new("Metaphors about love and connection", [3, 0, 2, 0, 0, 2, 1, 1]),
            QuizOption::new("Foreshadowing and red herrings", [0, 3, 1, 1, 2, 1, 2, 1]),
            QuizOption::new("Vivid imagery and symbolism", [2, 0, 3, 1, 1, 2, 2, 2]),
            QuizOption::new("Unreliable narrators", [0, 2, 1, 3, 1, 2, 3, 2]),
        ],
    },
    QuizQuestion {
        id: 6,
        prompt: "What motivates you to finish a book?",
        options: [
            QuizOption::new("Caring deeply about the characters", [3, 1, 2, 1, 0, 1, 2, 2]),
            QuizOption::new("Needing to know 'whodunit'", [0, 3, 0, 1, 2, 0, 1, 1]),
            QuizOption::new("Being transported to another world", [1, 0, 3, 1, 0, 1, 1, 3]),
            QuizOption::new("Questioning everything I thought I knew", [0, 1, 1, 3, 2, 3, 2, 0]),
        ],
    },
    QuizQuestion {
        id: 7,
        prompt: "Your ideal reading environment is:",
        options: [
            QuizOption::new("A cozy nook with soft lighting", [3, 1, 2, 0, 0, 2, 2, 1]),
            QuizOption::new("A quiet study with good focus", [0, 3, 0, 0, 3, 3, 3, 0]),
            QuizOption::new("Anywhere with beautiful views", [2, 0, 3, 1, 1, 1, 2, 2]),
            QuizOption::new("A bustling café with energy", [1, 1, 1, 3, 1, 0, 2, 3]),
        ],
    },
    QuizQuestion {
        id: 8,
        prompt: "When recommending books, you focus on:",
        options: [
            QuizOption::new("The emotional journey", [3, 0, 2, 1, 0, 1, 2, 2]),
            QuizOption::new("The ingenious plot twists", [0, 3, 1, 1, 2, 1, 1, 2]),
            QuizOption::new("The beautiful writing style", [2, 0, 3, 0, 1, 2, 2, 1]),
            QuizOption::new("The important themes", [1, 1, 1, 3, 2, 3, 2, 0]),
        ],
    },
    QuizQuestion {
        id: 9,
        prompt: "You're drawn to characters who are:",
        options: [
            QuizOption::new("Passionate and emotionally complex", [3, 1, 2, 2, 0, 1, 2, 2]),
            QuizOption::new("Clever and methodical", [0, 3, 0, 0, 3, 2, 2, 0]),
            QuizOption::new("Imaginative and visionary", [1, 0, 3, 2, 1, 2, 1, 2]),
            QuizOption::new("Independent and unconventional", [1, 1, 2, 3, 1, 2, 2, 2]),
        ],
    },
    QuizQuestion {
        id: 10,
        prompt: "What type of conflict interests you most?",
        options: [
            QuizOption::new("Matters of the heart", [3, 0, 1, 1, 0, 1, 1, 2]),
            QuizOption::new("Puzzles and mysteries", [0, 3, 0, 0, 2, 1, 2, 1]),
            QuizOption::new("Good versus evil", [1, 1, 3, 2, 1, 1, 1, 2]),
            QuizOption::new("Individual versus society", [1, 1, 1, 3, 2, 3, 3, 0]),
        ],
    },
    QuizQuestion {
        id: 11,
        prompt: "Your approach to spoilers is:",
        options: [
            QuizOption::new("I avoid them completely - the journey matters most", [2, 1, 3, 1, 1, 2, 2, 2]),
            QuizOption::new("I don't mind them - I focus on how things happen", [1, 3, 0, 1, 3, 3, 3, 1]),
            QuizOption::new("Sometimes I seek them out to prepare emotionally", [3, 0, 1, 0, 0, 1, 2, 0]),
            QuizOption::new("I use them to decide if a book challenges conventions", [0, 2, 1, 3, 2, 2, 2, 1]),
        ],
    },
    QuizQuestion {
        id: 12,
        prompt: "When you disagree with a book's message, you:",
        options: [
            QuizOption::new("Focus on the emotional truth within the story", [3, 0, 2, 0, 0, 1, 2, 1]),
            QuizOption::new("Analyze the logic and evidence presented", [0, 3, 0, 1, 3, 2, 3, 0]),
            QuizOption::new("Appreciate the alternative perspective", [1, 1, 3, 1, 1, 3, 3, 2]),
            QuizOption::new("Use it as a starting point for debate", [0, 1, 0, 3, 2, 2, 1, 2]),
        ],
    },
    QuizQuestion {
        id: 13,
        prompt: "Your favorite part of storytelling is:",
        options: [
            QuizOption::new("The moments that make you feel deeply", [3, 0, 2, 1, 0, 1, 2, 2]),
            QuizOption::new("The carefully constructed plot revelations", [0, 3, 0, 0, 3, 1, 2, 1]),
            QuizOption::new("The creation of entire worlds", [1, 0, 3, 1, 2, 1, 1, 3]),
            QuizOption::new("The exploration of big ideas", [0, 1, 1, 3, 2, 3, 2, 0]),
        ],
    },
    QuizQuestion {
        id: 14,
        prompt: "You'd rather read a book that:",
        options: [
            QuizOption::new("Makes you believe in love again", [3, 0, 2, 0, 0, 0, 1, 2]),
            QuizOption::new("Keeps you guessing until the very end", [0, 3, 1, 1, 2, 0, 1, 2]),
            QuizOption::new("Transports you to magical places", [1, 0, 3, 1, 0, 1, 1, 3]),
            QuizOption::new("Changes how you see the world", [1, 1, 2, 3, 2, 3, 3, 0]),
        ],
    },
];

/// Look up a question by its zero-based position
pub fn question(index: usize) -> Option<&'static QuizQuestion> {
    QUESTIONS.get(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_shape() {
        for (i, q) in QUESTIONS.iter().enumerate() {
            assert_eq!(q.id as usize, i + 1);
            for option in &q.options {
                assert!(option.scores.iter().all(|&s| s <= 3));
            }
        }
    }

    #[test]
    fn test_question_lookup() {
        assert_eq!(question(0).map(|q| q.id), Some(1));
        assert_eq!(question(13).map(|q| q.id), Some(14));
        assert!(question(QUESTION_COUNT).is_none());
    }

    #[test]
    fn test_score_for_uses_canonical_position() {
        let option = &QUESTIONS[0].options[1];
        assert_eq!(option.score_for(LiteraryType::Detective), 3);
        assert_eq!(option.score_for(LiteraryType::Romantic), 0);
    }
}
