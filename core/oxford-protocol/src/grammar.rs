use core::fmt;
use core::str::FromStr;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Case {
    Nominative = 0,
    Genitive = 1,
    Dative = 2,
    Accusative = 3,
    Instrumental = 4,
    Prepositional = 5,
}

impl Case {
    pub const ALL: [Case; 6] = [
        Case::Nominative,
        Case::Genitive,
        Case::Dative,
        Case::Accusative,
        Case::Instrumental,
        Case::Prepositional,
    ];

    /// Single-letter abbreviation used by the Oxford dictionary, as in `(+ g.)`.
    pub fn oxford_abbreviation(self) -> char {
        match self {
            Case::Nominative => 'n',
            Case::Genitive => 'g',
            Case::Dative => 'd',
            Case::Accusative => 'a',
            Case::Instrumental => 'i',
            Case::Prepositional => 'p',
        }
    }

    pub fn from_oxford_abbreviation(c: char) -> Option<Case> {
        Case::ALL
            .into_iter()
            .find(|case| case.oxford_abbreviation() == c.to_ascii_lowercase())
    }

    pub fn flag(self) -> CaseSet {
        match self {
            Case::Nominative => CaseSet::NOMINATIVE,
            Case::Genitive => CaseSet::GENITIVE,
            Case::Dative => CaseSet::DATIVE,
            Case::Accusative => CaseSet::ACCUSATIVE,
            Case::Instrumental => CaseSet::INSTRUMENTAL,
            Case::Prepositional => CaseSet::PREPOSITIONAL,
        }
    }
}

bitflags! {
    /// Cases a headword governs. One marker can be ambiguous, hence a set.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
    pub struct CaseSet: u8 {
        const NOMINATIVE = 1;
        const GENITIVE = 2;
        const DATIVE = 4;
        const ACCUSATIVE = 8;
        const INSTRUMENTAL = 16;
        const PREPOSITIONAL = 32;
    }
}

impl CaseSet {
    pub fn cases(self) -> impl Iterator<Item = Case> {
        Case::ALL.into_iter().filter(move |case| self.contains(case.flag()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PartOfSpeech {
    Noun = 0,
    Adjective = 1,
    Verb = 2,
    Adverb = 3,
    Preposition = 4,
    Conjunction = 5,
    Pronoun = 6,
    Particle = 7,
    Numeral = 8,
    Interjection = 9,
}

impl PartOfSpeech {
    /// Tag name written into the `definitionTags` column.
    pub fn tag_name(self) -> &'static str {
        match self {
            PartOfSpeech::Noun => "noun",
            PartOfSpeech::Adjective => "adj",
            PartOfSpeech::Verb => "verb",
            PartOfSpeech::Adverb => "adv",
            PartOfSpeech::Preposition => "prep",
            PartOfSpeech::Conjunction => "conj",
            PartOfSpeech::Pronoun => "pron",
            PartOfSpeech::Particle => "part",
            PartOfSpeech::Numeral => "num",
            PartOfSpeech::Interjection => "int",
        }
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("unknown part-of-speech label `{0}`")]
    UnknownLabel(String),
}

/// Parses the abbreviations the Oxford dictionary prints in italics after a
/// headword. Gender and aspect labels imply the word class.
impl FromStr for PartOfSpeech {
    type Err = GrammarError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let pos = match label.trim() {
            "n." | "m." | "f." | "nt." | "m.pl." | "f.pl." | "nt.pl." | "pl." | "c.g." => {
                PartOfSpeech::Noun
            }
            "adj." | "a." | "comp." | "superl." => PartOfSpeech::Adjective,
            "v." | "v.t." | "v.i." | "pf." | "impf." | "impf.pf." | "pf.impf." | "v.aux." => {
                PartOfSpeech::Verb
            }
            "adv." => PartOfSpeech::Adverb,
            "prep." => PartOfSpeech::Preposition,
            "conj." => PartOfSpeech::Conjunction,
            "pron." => PartOfSpeech::Pronoun,
            "part." | "particle" => PartOfSpeech::Particle,
            "num." => PartOfSpeech::Numeral,
            "int." | "interj." => PartOfSpeech::Interjection,
            other => return Err(GrammarError::UnknownLabel(other.to_string())),
        };
        Ok(pos)
    }
}

/// A case-government annotation such as `о чём-л.` or `(+ d.)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Government {
    pub preposition: Option<String>,
    pub cases: CaseSet,
    /// The marker as it appears in the source, verbatim.
    pub text: String,
}

/// A source-language phrase paired with its translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    pub source: String,
    pub translation: String,
}
