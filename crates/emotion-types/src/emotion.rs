//! Emotion classes and probability vectors

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Learning-relevant emotion classes produced by the upstream classifier.
///
/// Declaration order is the tie-break priority: when two classes share the
/// maximum probability, the one declared first is dominant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionClass {
    /// Baseline state; engaged with the material
    #[serde(alias = "Focused")]
    Focused,
    /// Struggling with the current material
    #[serde(alias = "Confused")]
    Confused,
    /// Disengaged from the material
    #[serde(alias = "Bored")]
    Bored,
    /// Fatigued
    #[serde(alias = "Tired")]
    Tired,
}

impl EmotionClass {
    /// Number of classes in the closed set
    pub const COUNT: usize = 4;

    /// All classes in tie-break priority order
    pub const ALL: [EmotionClass; Self::COUNT] = [
        EmotionClass::Focused,
        EmotionClass::Confused,
        EmotionClass::Bored,
        EmotionClass::Tired,
    ];

    /// Position of this class in probability vectors
    pub fn index(self) -> usize {
        match self {
            EmotionClass::Focused => 0,
            EmotionClass::Confused => 1,
            EmotionClass::Bored => 2,
            EmotionClass::Tired => 3,
        }
    }

    /// Get string representation
    pub fn as_str(self) -> &'static str {
        match self {
            EmotionClass::Focused => "focused",
            EmotionClass::Confused => "confused",
            EmotionClass::Bored => "bored",
            EmotionClass::Tired => "tired",
        }
    }

    /// Whether this state works against learning
    pub fn is_negative(self) -> bool {
        !matches!(self, EmotionClass::Focused)
    }

    /// Short learner-facing encouragement line for this state
    pub fn encouragement(self) -> &'static str {
        match self {
            EmotionClass::Focused => "You're staying focused! Great job maintaining your concentration.",
            EmotionClass::Confused => {
                "It's okay to feel unsure. New material takes time, and breaking it into smaller pieces helps."
            }
            EmotionClass::Bored => "Let's mix it up a little. A quick exercise can bring the topic back to life.",
            EmotionClass::Tired => "You've been working hard. A short rest will help the material stick.",
        }
    }
}

impl fmt::Display for EmotionClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmotionClass {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "focused" => Ok(EmotionClass::Focused),
            "confused" => Ok(EmotionClass::Confused),
            "bored" => Ok(EmotionClass::Bored),
            "tired" => Ok(EmotionClass::Tired),
            _ => Err(ParseError::UnknownEmotion(s.to_string())),
        }
    }
}

/// One value per emotion class, indexed by [`EmotionClass::index`].
///
/// Serialized as a map keyed by class name. Classes missing from the input
/// deserialize as 0.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "ScoresRepr", into = "ScoresRepr")]
pub struct EmotionScores([f64; EmotionClass::COUNT]);

impl EmotionScores {
    /// Build from raw values in class order
    pub fn new(values: [f64; EmotionClass::COUNT]) -> Self {
        Self(values)
    }

    /// Equal weight on every class
    pub fn uniform() -> Self {
        Self([1.0 / EmotionClass::COUNT as f64; EmotionClass::COUNT])
    }

    /// All weight on one class
    pub fn one_hot(class: EmotionClass) -> Self {
        let mut values = [0.0; EmotionClass::COUNT];
        values[class.index()] = 1.0;
        Self(values)
    }

    pub fn get(&self, class: EmotionClass) -> f64 {
        self.0[class.index()]
    }

    pub fn set(&mut self, class: EmotionClass, value: f64) {
        self.0[class.index()] = value;
    }

    /// Raw values in class order
    pub fn values(&self) -> &[f64; EmotionClass::COUNT] {
        &self.0
    }

    /// Iterate (class, value) in priority order
    pub fn iter(&self) -> impl Iterator<Item = (EmotionClass, f64)> + '_ {
        EmotionClass::ALL.iter().map(move |&class| (class, self.get(class)))
    }

    /// Sum over all classes
    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Class with the highest value; ties go to the higher-priority class
    pub fn dominant(&self) -> EmotionClass {
        let mut best = EmotionClass::ALL[0];
        for &class in EmotionClass::ALL.iter().skip(1) {
            if self.get(class) > self.get(best) {
                best = class;
            }
        }
        best
    }

    /// Difference between the highest and second-highest values
    pub fn margin(&self) -> f64 {
        let mut top = f64::MIN;
        let mut second = f64::MIN;
        for &v in &self.0 {
            if v > top {
                second = top;
                top = v;
            } else if v > second {
                second = v;
            }
        }
        top - second
    }

    /// Whether every value is finite and within [0, 1]
    pub fn is_well_formed(&self) -> bool {
        self.0.iter().all(|v| v.is_finite() && (0.0..=1.0).contains(v))
    }

    /// Copy with non-finite values set to 0 and the rest clamped to [0, 1]
    pub fn sanitized(&self) -> Self {
        let mut values = self.0;
        for v in values.iter_mut() {
            *v = if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 };
        }
        Self(values)
    }
}

/// Wire representation keyed by class name
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
struct ScoresRepr {
    #[serde(default, alias = "Focused")]
    focused: f64,
    #[serde(default, alias = "Confused")]
    confused: f64,
    #[serde(default, alias = "Bored")]
    bored: f64,
    #[serde(default, alias = "Tired")]
    tired: f64,
}

impl From<ScoresRepr> for EmotionScores {
    fn from(repr: ScoresRepr) -> Self {
        Self([repr.focused, repr.confused, repr.bored, repr.tired])
    }
}

impl From<EmotionScores> for ScoresRepr {
    fn from(scores: EmotionScores) -> Self {
        Self {
            focused: scores.get(EmotionClass::Focused),
            confused: scores.get(EmotionClass::Confused),
            bored: scores.get(EmotionClass::Bored),
            tired: scores.get(EmotionClass::Tired),
        }
    }
}
