//! Literary type keys and their display metadata
//!
//! The declaration order of [`LiteraryType`] is the canonical order. It is
//! used when accumulating scores and when breaking ties between equal
//! totals, so it must never be reordered.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the eight literary personality types assigned by the quiz
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiteraryType {
    Romantic,
    Detective,
    Dreamer,
    Rebel,
    Architect,
    Philosopher,
    Observer,
    Entertainer,
}

impl LiteraryType {
    /// All types in canonical order
    pub const ALL: [LiteraryType; 8] = [
        LiteraryType::Romantic,
        LiteraryType::Detective,
        LiteraryType::Dreamer,
        LiteraryType::Rebel,
        LiteraryType::Architect,
        LiteraryType::Philosopher,
        LiteraryType::Observer,
        LiteraryType::Entertainer,
    ];

    /// Position in the canonical order
    pub fn position(self) -> usize {
        self as usize
    }

    /// The stable lowercase key used in storage
    pub fn key(self) -> &'static str {
        match self {
            LiteraryType::Romantic => "romantic",
            LiteraryType::Detective => "detective",
            LiteraryType::Dreamer => "dreamer",
            LiteraryType::Rebel => "rebel",
            LiteraryType::Architect => "architect",
            LiteraryType::Philosopher => "philosopher",
            LiteraryType::Observer => "observer",
            LiteraryType::Entertainer => "entertainer",
        }
    }

    /// Static display metadata for this type
    pub fn profile(self) -> &'static TypeProfile {
        &TYPE_PROFILES[self.position()]
    }
}

impl fmt::Display for LiteraryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for LiteraryType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        LiteraryType::ALL
            .into_iter()
            .find(|t| t.key() == s)
            .ok_or_else(|| Error::UnknownLiteraryType(s.to_string()))
    }
}

/// Presentation data attached to a literary type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeProfile {
    pub kind: LiteraryType,
    /// Display name, e.g. "The Romantic"
    pub name: &'static str,
    pub description: &'static str,
    pub core_drive: &'static str,
    /// Types this one pairs well with at events
    pub strong_pairings: [LiteraryType; 3],
    pub full_description: &'static str,
}

static TYPE_PROFILES: [TypeProfile; 8] = [
    TypeProfile {
        kind: LiteraryType::Romantic,
        name: "The Romantic",
        description: "You believe in the transformative power of love and human connection.",
        core_drive: "Seeking deep emotional resonance and authentic relationships",
        strong_pairings: [
            LiteraryType::Dreamer,
            LiteraryType::Observer,
            LiteraryType::Entertainer,
        ],
        full_description: "You are drawn to stories that explore the depths of human emotion and \
            connection. Love, in all its forms, captivates you - not just romantic love, but the \
            love between friends, family, and even the love of ideals. You believe that \
            relationships have the power to transform us, and you seek stories that honor this truth.",
    },
    TypeProfile {
        kind: LiteraryType::Detective,
        name: "The Detective",
        description: "You thrive on puzzles, mysteries, and the satisfaction of solving complex problems.",
        core_drive: "Uncovering truth through logic and careful observation",
        strong_pairings: [
            LiteraryType::Architect,
            LiteraryType::Observer,
            LiteraryType::Philosopher,
        ],
        full_description: "Your mind is naturally analytical, always seeking patterns and \
            connections others might miss. You love the intellectual challenge of a \
            well-constructed mystery and the satisfaction of piecing together clues. For you, \
            reading is an active process of deduction and discovery.",
    },
    TypeProfile {
        kind: LiteraryType::Dreamer,
        name: "The Dreamer",
        description: "You are captivated by imagination, beauty, and the infinite possibilities of storytelling.",
        core_drive: "Exploring boundless imagination and creative expression",
        strong_pairings: [
            LiteraryType::Romantic,
            LiteraryType::Entertainer,
            LiteraryType::Philosopher,
        ],
        full_description: "You possess a vivid imagination and are drawn to stories that expand \
            the boundaries of what's possible. Whether it's fantasy worlds, lyrical prose, or \
            innovative storytelling techniques, you appreciate the artistry and creativity that \
            goes into crafting something truly original.",
    },
    TypeProfile {
        kind: LiteraryType::Rebel,
        name: "The Rebel",
        description: "You question authority, challenge conventions, and champion the underdog.",
        core_drive: "Challenging systems and fighting for justice and change",
        strong_pairings: [
            LiteraryType::Philosopher,
            LiteraryType::Observer,
            LiteraryType::Architect,
        ],
        full_description: "You have a natural resistance to conformity and are drawn to stories \
            that question the status quo. You appreciate characters who stand up for what's \
            right, even when it's difficult, and narratives that explore themes of social \
            justice, rebellion, and transformation.",
    },
    TypeProfile {
        kind: LiteraryType::Architect,
        name: "The Architect",
        description: "You appreciate structure, craftsmanship, and the meticulous construction of narrative.",
        core_drive: "Understanding how things work and appreciating masterful construction",
        strong_pairings: [
            LiteraryType::Detective,
            LiteraryType::Philosopher,
            LiteraryType::Observer,
        ],
        full_description: "You have a deep appreciation for the craft of storytelling itself. You \
            notice how authors build their narratives, develop their themes, and construct their \
            prose. You're drawn to works that demonstrate exceptional skill in their execution \
            and appreciate the architecture behind great literature.",
    },
    TypeProfile {
        kind: LiteraryType::Philosopher,
        name: "The Philosopher",
        description: "You seek wisdom, explore big questions, and ponder the meaning of existence.",
        core_drive: "Exploring fundamental questions about life, meaning, and human nature",
        strong_pairings: [
            LiteraryType::Observer,
            LiteraryType::Architect,
            LiteraryType::Rebel,
        ],
        full_description: "You are drawn to literature that grapples with the big questions of \
            human existence. You enjoy books that make you think deeply about morality, meaning, \
            and the human condition. You're not afraid of complex, challenging works that \
            require reflection and contemplation.",
    },
    TypeProfile {
        kind: LiteraryType::Observer,
        name: "The Observer",
        description: "You notice subtleties, appreciate nuance, and excel at reading between the lines.",
        core_drive: "Understanding the subtle complexities of human nature and society",
        strong_pairings: [
            LiteraryType::Detective,
            LiteraryType::Philosopher,
            LiteraryType::Romantic,
        ],
        full_description: "You possess a keen eye for detail and subtext. You excel at picking up \
            on the subtle cues that reveal character motivation and thematic depth. You \
            appreciate authors who trust their readers to infer meaning and enjoy the process of \
            discovering layers within a narrative.",
    },
    TypeProfile {
        kind: LiteraryType::Entertainer,
        name: "The Entertainer",
        description: "You read for joy, escapism, and the pure pleasure of a well-told story.",
        core_drive: "Finding joy, humor, and delightful escape in storytelling",
        strong_pairings: [
            LiteraryType::Dreamer,
            LiteraryType::Romantic,
            LiteraryType::Detective,
        ],
        full_description: "You believe that one of literature's greatest gifts is its ability to \
            entertain and bring joy. You're drawn to stories that make you laugh, gasp, or lose \
            track of time. You appreciate authors who can spin a compelling yarn and create \
            characters you genuinely enjoy spending time with.",
    },
];
