use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use crate::error::{RouletteError, RouletteResult};

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Companion {
    pub name: String,
    /// ISO 3166-1 alpha-2 country code
    pub country: String,
}

impl Companion {
    pub fn new(name: &str, country: &str) -> Self {
        Self {
            name: name.to_string(),
            country: country.to_string(),
        }
    }
}

/// Fixed, ordered, non-empty list of companions. The first entry is always the winner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompanionPool {
    companions: Vec<Companion>,
}

impl CompanionPool {
    /// An empty list is rejected since a pool must have a winner.
    pub fn new(companions: Vec<Companion>) -> RouletteResult<Self> {
        if companions.is_empty() {
            return Err(RouletteError::EmptyCompanionPool);
        }
        Ok(Self { companions })
    }

    pub fn final_companion(&self) -> &Companion {
        &self.companions[0]
    }

    /// Everyone except the winner.
    pub fn runners_up(&self) -> &[Companion] {
        &self.companions[1..]
    }

    pub fn as_slice(&self) -> &[Companion] {
        &self.companions
    }
}

impl Default for CompanionPool {
    fn default() -> Self {
        Self {
            companions: vec![
                Companion::new("Haruto Sato", "JP"),
                Companion::new("Mei Lin", "TW"),
                Companion::new("Lucas Moreau", "FR"),
                Companion::new("Sofia Rossi", "IT"),
                Companion::new("Diego Alvarez", "AR"),
                Companion::new("Ji-woo Park", "KR"),
                Companion::new("Amara Okafor", "NG"),
                Companion::new("Liam O'Connor", "IE"),
            ],
        }
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RevealPhase {
    Idle,
    Spinning,
    FakeReveal,
    FinalReveal,
}

/// What the client should currently display for the companion reveal.
#[skip_serializing_none]
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct RevealFrame {
    pub phase: RevealPhase,
    pub candidate: Option<Companion>,
    pub status: String,
    /// Set only once the winner is locked in
    pub decided: bool,
}

impl RevealFrame {
    pub fn idle() -> Self {
        Self {
            phase: RevealPhase::Idle,
            candidate: None,
            status: "No player decided yet".to_string(),
            decided: false,
        }
    }

    pub fn spinning(candidate: &Companion) -> Self {
        Self {
            phase: RevealPhase::Spinning,
            candidate: Some(candidate.clone()),
            status: "Choosing...".to_string(),
            decided: false,
        }
    }

    pub fn fake_reveal(candidate: &Companion) -> Self {
        Self {
            phase: RevealPhase::FakeReveal,
            candidate: Some(candidate.clone()),
            status: format!("Is it {}...?", candidate.name),
            decided: false,
        }
    }

    pub fn final_reveal(candidate: &Companion) -> Self {
        Self {
            phase: RevealPhase::FinalReveal,
            candidate: Some(candidate.clone()),
            status: format!("{} ({}) is joining lunch!", candidate.name, candidate.country),
            decided: true,
        }
    }
}
