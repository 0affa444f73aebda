#![warn(clippy::all, rust_2018_idioms)]

//! Middle Chinese phoneme inventory, natural classes and syllable validation.
//!
//! The built-in inventory follows Baxter's *Handbook of Old Chinese Phonology*
//! (1992). [`middle_chinese`] returns the shared, immutable registry; changes
//! for a session are made on a copy with [`Registry::extended`].

pub mod config;
mod raw_data;
pub mod registry;
pub mod sounds;
pub mod syllable;

pub use config::{ChongniuInterpretation, LaryngealInterpretation, RegistryConfig};
pub use registry::{
    middle_chinese, Final, InitialClass, InitialKind, PositionedPhoneme, Registry,
    RegistryBuilder, Role, Roles,
};
pub use sounds::Phoneme;
pub use syllable::{RhymeClass, Syllable, SyllableClass, SyllableSlots, Tone};

/// A feature table or feature name that does not fit the feature model.
/// Raised while a registry is being built, never while validating syllables.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InvalidFeatureError {
    #[error("unknown {feature} '{value}'")]
    UnknownValue { feature: &'static str, value: String },
    #[error("no {0} defined")]
    MissingField(&'static str),
    #[error("malformed feature table ({0})")]
    Table(String),
    #[error("'{0}' is not in the inventory")]
    UnknownSymbol(String),
}

pub type FeatureResult<T> = Result<T, InvalidFeatureError>;

/// Why a slot assignment is not a legal syllable.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{}", describe_nucleus(.0))]
    MissingNucleus(Option<String>),
    #[error("'{0}' is not an initial")]
    UnknownInitial(String),
    #[error("'{0}' is not a medial")]
    UnknownMedial(String),
    #[error("'{0}' is not a coda")]
    UnknownCoda(String),
    #[error("medial '{medial}' cannot precede '{nucleus}' under the {interpretation} reading of chongniu")]
    ChongniuExclusion {
        medial: String,
        nucleus: String,
        interpretation: ChongniuInterpretation,
    },
    #[error("{tone} tone cannot close with {}", describe_coda(.coda))]
    ToneCodaMismatch { tone: Tone, coda: Option<String> },
}

fn describe_nucleus(nucleus: &Option<String>) -> String {
    match nucleus {
        Some(s) => format!("'{}' is not a nucleus", s),
        None => "no nucleus".to_string(),
    }
}

fn describe_coda(coda: &Option<String>) -> String {
    match coda {
        Some(s) => format!("'{}'", s),
        None => "a zero coda".to_string(),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum QieyunError {
    #[error(transparent)]
    InvalidFeature(#[from] InvalidFeatureError),
    #[error("could not read configuration ({0})")]
    Config(#[from] serde_json::Error),
}

pub type QieyunResult<T> = Result<T, QieyunError>;
