use crate::registry::{Final, InitialClass, InitialKind, PositionedPhoneme, Registry, Role};
use crate::sounds::{Manner, Phoneme, Place};
use crate::{InvalidFeatureError, ValidationError};
use log::trace;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use strum_macros::EnumIter;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, Serialize, Deserialize)]
pub enum Tone {
    Level,
    Rising,
    Departing,
    /// Only found on syllables closed by a stop.
    Entering,
}

impl Tone {
    pub fn is_entering(&self) -> bool {
        *self == Tone::Entering
    }

    /// Baxter's tone letters. Level and entering tones are unmarked.
    pub fn mark(&self) -> &'static str {
        match self {
            Tone::Rising => "X",
            Tone::Departing => "H",
            Tone::Level | Tone::Entering => "",
        }
    }
}

impl Display for Tone {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Tone::Level => "level",
                Tone::Rising => "rising",
                Tone::Departing => "departing",
                Tone::Entering => "entering",
            }
        )
    }
}

impl TryFrom<&str> for Tone {
    type Error = InvalidFeatureError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Ok(match value.to_ascii_lowercase().as_str() {
            "level" | "ping" | "平" => Tone::Level,
            "rising" | "shang" | "上" => Tone::Rising,
            "departing" | "qu" | "去" => Tone::Departing,
            "entering" | "ru" | "入" => Tone::Entering,
            _ => {
                return Err(InvalidFeatureError::UnknownValue {
                    feature: "tone",
                    value: value.to_string(),
                })
            }
        })
    }
}

/// Candidate fillers for the `(Initial)(Medial)(Glide)Vowel(Coda)` template.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyllableSlots<'a> {
    pub initial: Option<&'a Phoneme>,
    pub medial: Option<&'a Phoneme>,
    pub glide: Option<&'a Phoneme>,
    pub nucleus: Option<&'a Phoneme>,
    pub coda: Option<&'a Phoneme>,
    pub tone: Option<Tone>,
}

impl<'a> SyllableSlots<'a> {
    pub fn new(nucleus: &'a Phoneme) -> Self {
        Self {
            nucleus: Some(nucleus),
            ..Default::default()
        }
    }

    pub fn initial(mut self, initial: &'a Phoneme) -> Self {
        self.initial = Some(initial);
        self
    }

    pub fn medial(mut self, medial: &'a Phoneme) -> Self {
        self.medial = Some(medial);
        self
    }

    pub fn glide(mut self, glide: &'a Phoneme) -> Self {
        self.glide = Some(glide);
        self
    }

    pub fn coda(mut self, coda: &'a Phoneme) -> Self {
        self.coda = Some(coda);
        self
    }

    pub fn tone(mut self, tone: Tone) -> Self {
        self.tone = Some(tone);
        self
    }
}

impl Display for SyllableSlots<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let slot = |p: Option<&Phoneme>| p.map(Phoneme::symbol).unwrap_or("-").to_string();
        write!(
            f,
            "({} {} {} {} {}",
            slot(self.initial),
            slot(self.medial),
            slot(self.glide),
            slot(self.nucleus),
            slot(self.coda)
        )?;
        match self.tone {
            Some(t) => write!(f, " {})", t),
            None => write!(f, ")"),
        }
    }
}

/// A syllable that passed validation. An open syllable carries the zero coda.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Syllable {
    initial: Option<PositionedPhoneme>,
    medial: Option<PositionedPhoneme>,
    glide: Option<PositionedPhoneme>,
    nucleus: PositionedPhoneme,
    coda: PositionedPhoneme,
    tone: Option<Tone>,
}

impl Syllable {
    pub fn initial(&self) -> Option<&PositionedPhoneme> {
        self.initial.as_ref()
    }

    pub fn medial(&self) -> Option<&PositionedPhoneme> {
        self.medial.as_ref()
    }

    pub fn glide(&self) -> Option<&PositionedPhoneme> {
        self.glide.as_ref()
    }

    pub fn nucleus(&self) -> &PositionedPhoneme {
        &self.nucleus
    }

    pub fn coda(&self) -> &PositionedPhoneme {
        &self.coda
    }

    pub fn tone(&self) -> Option<Tone> {
        self.tone
    }

    pub fn rhyme(&self) -> Final {
        Final {
            medial: self.medial.clone(),
            glide: self.glide.clone(),
            nucleus: self.nucleus.clone(),
            coda: self.coda.clone(),
        }
    }

    /// Closed by a stop.
    pub fn is_checked(&self) -> bool {
        self.coda.phoneme().map(Phoneme::is_stop).unwrap_or(false)
    }

    pub fn phonemes(&self) -> Vec<&Phoneme> {
        [
            self.initial.as_ref(),
            self.medial.as_ref(),
            self.glide.as_ref(),
            Some(&self.nucleus),
            Some(&self.coda),
        ]
        .into_iter()
        .flatten()
        .filter_map(PositionedPhoneme::phoneme)
        .collect()
    }
}

impl Display for Syllable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for p in self.phonemes() {
            write!(f, "{}", p.symbol())?;
        }
        write!(f, "{}", self.tone.map(|t| t.mark()).unwrap_or(""))
    }
}

/// Rhyme groups by coda.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, Serialize, Deserialize)]
pub enum RhymeClass {
    Open,
    PalatalGlide,
    LabioVelarGlide,
    Labial,
    Dental,
    Velar,
}

impl RhymeClass {
    pub fn of(coda: &PositionedPhoneme) -> Self {
        let c = match coda.phoneme().and_then(Phoneme::as_consonant) {
            Some(c) => c,
            // vowel codas count as open
            None => return RhymeClass::Open,
        };
        match c.place() {
            Place::Palatal if c.manner() == Manner::Approximant => RhymeClass::PalatalGlide,
            Place::LabioVelar => RhymeClass::LabioVelarGlide,
            Place::Bilabial | Place::LabioDental => RhymeClass::Labial,
            Place::Dental | Place::Alveolar | Place::Retroflex | Place::Palatal => {
                RhymeClass::Dental
            }
            Place::Velar | Place::Glottal => RhymeClass::Velar,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SyllableClass {
    pub initial_class: Option<InitialClass>,
    pub initial_kind: Option<InitialKind>,
    pub rhyme: RhymeClass,
    pub checked: bool,
}

impl Registry {
    pub fn validate(
        &self,
        initial: Option<&Phoneme>,
        medial: Option<&Phoneme>,
        nucleus: Option<&Phoneme>,
        coda: Option<&Phoneme>,
        tone: Option<Tone>,
    ) -> Result<Syllable, ValidationError> {
        self.validate_slots(&SyllableSlots {
            initial,
            medial,
            glide: None,
            nucleus,
            coda,
            tone,
        })
    }

    pub fn validate_slots(&self, slots: &SyllableSlots<'_>) -> Result<Syllable, ValidationError> {
        let result = self.check_slots(slots);
        if let Err(e) = &result {
            trace!("rejected {}: {}", slots, e);
        }
        result
    }

    fn check_slots(&self, slots: &SyllableSlots<'_>) -> Result<Syllable, ValidationError> {
        let nucleus_phoneme = slots.nucleus.ok_or(ValidationError::MissingNucleus(None))?;
        let nucleus = self
            .positioned(Role::Nucleus, nucleus_phoneme)
            .ok_or_else(|| ValidationError::MissingNucleus(Some(nucleus_phoneme.symbol().to_string())))?;

        let initial = slots
            .initial
            .map(|p| {
                self.positioned(Role::Initial, p)
                    .ok_or_else(|| ValidationError::UnknownInitial(p.symbol().to_string()))
            })
            .transpose()?;

        let medial = slots.medial.map(|p| self.medial_slot(p)).transpose()?;
        let glide = match (slots.glide, slots.medial) {
            (None, _) => None,
            (Some(g), Some(m)) if g != m => Some(self.medial_slot(g)?),
            (Some(g), _) => return Err(ValidationError::UnknownMedial(g.symbol().to_string())),
        };
        for m in [slots.medial, slots.glide].into_iter().flatten() {
            if self.is_excluded(m, nucleus_phoneme) {
                return Err(ValidationError::ChongniuExclusion {
                    medial: m.symbol().to_string(),
                    nucleus: nucleus_phoneme.symbol().to_string(),
                    interpretation: self.chongniu(),
                });
            }
        }

        let coda = match slots.coda {
            Some(p) => self
                .positioned(Role::Coda, p)
                .cloned()
                .ok_or_else(|| ValidationError::UnknownCoda(p.symbol().to_string()))?,
            None => PositionedPhoneme::zero(),
        };

        if let Some(tone) = slots.tone {
            let stop = slots.coda.map(|c| self.is_stop_coda(c)).unwrap_or(false);
            if tone.is_entering() != stop {
                return Err(ValidationError::ToneCodaMismatch {
                    tone,
                    coda: slots.coda.map(|c| c.symbol().to_string()),
                });
            }
        }

        Ok(Syllable {
            initial: initial.cloned(),
            medial: medial.cloned(),
            glide: glide.cloned(),
            nucleus: nucleus.clone(),
            coda,
            tone: slots.tone,
        })
    }

    fn medial_slot(&self, p: &Phoneme) -> Result<&PositionedPhoneme, ValidationError> {
        self.positioned(Role::Medial, p)
            .ok_or_else(|| ValidationError::UnknownMedial(p.symbol().to_string()))
    }

    pub fn classify(&self, syllable: &Syllable) -> SyllableClass {
        let initial = syllable.initial().and_then(PositionedPhoneme::phoneme);
        SyllableClass {
            initial_class: initial.map(InitialClass::of),
            initial_kind: initial.and_then(|p| self.initial_kind(p)),
            rhyme: RhymeClass::of(syllable.coda()),
            checked: syllable.is_checked(),
        }
    }
}
