//! Temporary insanity (bout of madness) table.

use std::fmt;

use rand::Rng;
use serde::Serialize;

/// One entry of the temporary insanity table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InsanityBout {
    /// Table index (1-10).
    pub index: u32,
    /// Short name of the bout.
    pub name: &'static str,
    /// What the investigator does while it lasts.
    pub description: &'static str,
}

/// Temporary insanity results, indexed by a d10 roll.
pub const TEMPORARY_INSANITY: [InsanityBout; 10] = [
    InsanityBout {
        index: 1,
        name: "Flee in Panic",
        description: "Flees in blind panic, avoiding every perceived threat and seeking escape.",
    },
    InsanityBout {
        index: 2,
        name: "Paralysis",
        description: "Rooted to the spot by terror and unable to act.",
    },
    InsanityBout {
        index: 3,
        name: "Violent Outburst",
        description: "Lashes out at anyone nearby, friend or foe.",
    },
    InsanityBout {
        index: 4,
        name: "Mania",
        description: "Gripped by an irrational fixation or euphoric compulsion.",
    },
    InsanityBout {
        index: 5,
        name: "Phobia",
        description: "Seized by a sudden phobic reaction to something close at hand.",
    },
    InsanityBout {
        index: 6,
        name: "Hysteria",
        description: "Overcome by uncontrollable weeping or laughter.",
    },
    InsanityBout {
        index: 7,
        name: "Amnesia",
        description: "Cannot recall recent events or even their own identity.",
    },
    InsanityBout {
        index: 8,
        name: "Psychosomatic Impairment",
        description: "Struck blind, deaf or mute without any physical cause.",
    },
    InsanityBout {
        index: 9,
        name: "Hallucinations",
        description: "Assailed by visions and voices that blur the line with reality.",
    },
    InsanityBout {
        index: 10,
        name: "Catatonia",
        description: "Withdraws into a non-responsive stupor.",
    },
];

/// A rolled bout of madness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoutOfMadness {
    /// The table entry.
    pub bout: &'static InsanityBout,
    /// Duration in rounds (1d10).
    pub rounds: u32,
}

impl fmt::Display for BoutOfMadness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}. {} ({} rounds): {}",
            self.bout.index, self.bout.name, self.rounds, self.bout.description
        )
    }
}

/// Roll 1d10 on the temporary insanity table and 1d10 for its duration.
pub fn roll_bout<R: Rng + ?Sized>(rng: &mut R) -> BoutOfMadness {
    let index = rng.random_range(0..TEMPORARY_INSANITY.len());
    let rounds = rng.random_range(1..=10);
    BoutOfMadness {
        bout: &TEMPORARY_INSANITY[index],
        rounds,
    }
}
