use crate::{FeatureResult, InvalidFeatureError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::io;

pub use consonants::*;
pub use vowels::*;

/// A consonant or a vowel. Equality, ordering and hashing only look at the
/// feature fields, never at the symbol.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum Phoneme {
    Consonant(Consonant),
    Vowel(Vowel),
}

impl Phoneme {
    pub fn symbol(&self) -> &str {
        match self {
            Phoneme::Consonant(c) => c.symbol(),
            Phoneme::Vowel(v) => v.symbol(),
        }
    }

    pub fn is_consonant(&self) -> bool {
        matches!(self, Phoneme::Consonant(_))
    }

    pub fn is_vowel(&self) -> bool {
        matches!(self, Phoneme::Vowel(_))
    }

    pub fn as_consonant(&self) -> Option<&Consonant> {
        match self {
            Phoneme::Consonant(c) => Some(c),
            Phoneme::Vowel(_) => None,
        }
    }

    pub fn as_vowel(&self) -> Option<&Vowel> {
        match self {
            Phoneme::Vowel(v) => Some(v),
            Phoneme::Consonant(_) => None,
        }
    }

    pub fn is_stop(&self) -> bool {
        self.as_consonant()
            .map(|c| c.manner == Manner::Stop)
            .unwrap_or(false)
    }

    pub fn is_nasal(&self) -> bool {
        self.as_consonant()
            .map(|c| c.manner == Manner::Nasal)
            .unwrap_or(false)
    }

    pub fn is_approximant(&self) -> bool {
        self.as_consonant()
            .map(|c| c.manner == Manner::Approximant)
            .unwrap_or(false)
    }

    pub fn is_sibilant(&self) -> bool {
        self.as_consonant()
            .map(Consonant::is_sibilant)
            .unwrap_or(false)
    }

    /// Vowels, nasals and approximants.
    pub fn is_sonorant(&self) -> bool {
        self.is_vowel() || self.is_nasal() || self.is_approximant()
    }

    /// Same phoneme with a different display symbol.
    pub fn with_symbol(&self, symbol: impl Into<String>) -> Self {
        match self {
            Phoneme::Consonant(c) => Phoneme::Consonant(Consonant {
                symbol: symbol.into(),
                ..c.clone()
            }),
            Phoneme::Vowel(v) => Phoneme::Vowel(Vowel {
                symbol: symbol.into(),
                ..v.clone()
            }),
        }
    }
}

impl Display for Phoneme {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Phoneme::Consonant(c) => write!(f, "{} ({})", c.symbol, c),
            Phoneme::Vowel(v) => write!(f, "{} ({})", v.symbol, v),
        }
    }
}

impl From<Consonant> for Phoneme {
    fn from(value: Consonant) -> Self {
        Phoneme::Consonant(value)
    }
}

impl From<Vowel> for Phoneme {
    fn from(value: Vowel) -> Self {
        Phoneme::Vowel(value)
    }
}

/// Reads a feature table. Lines starting with `#` are citations and skipped.
pub fn parse_csv_to_map<R: io::Read>(reader: R) -> FeatureResult<Vec<HashMap<String, String>>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(reader);
    let headers = rdr.headers().map_err(table_error)?.clone();
    let mut records = vec![];
    for result in rdr.records() {
        let record = result.map_err(table_error)?;
        let map = headers
            .iter()
            .zip(record.iter())
            .map(|(header, value)| (header.to_string(), value.to_string()))
            .collect();
        records.push(map);
    }
    Ok(records)
}

fn table_error(e: csv::Error) -> InvalidFeatureError {
    InvalidFeatureError::Table(e.to_string())
}

pub(crate) fn field<'a>(map: &'a HashMap<String, String>, feature: &'static str) -> FeatureResult<&'a str> {
    map.get(feature)
        .map(String::as_str)
        .filter(|v| !v.is_empty())
        .ok_or(InvalidFeatureError::MissingField(feature))
}

fn unknown(feature: &'static str, value: &str) -> InvalidFeatureError {
    InvalidFeatureError::UnknownValue {
        feature,
        value: value.to_string(),
    }
}

/// Feature names are matched case-insensitively, with `_` and `-` treated alike.
fn normalize(value: &str) -> String {
    value.trim().to_ascii_lowercase().replace('_', "-")
}

mod vowels {
    use super::{field, normalize, parse_csv_to_map, unknown};
    use crate::{FeatureResult, InvalidFeatureError};
    use serde::{Deserialize, Serialize};
    use std::cmp::Ordering;
    use std::collections::HashMap;
    use std::fmt::{Display, Formatter};
    use std::hash::{Hash, Hasher};
    use std::io;
    use strum_macros::EnumIter;

    pub fn parse_vowels<R: io::Read>(input: R) -> FeatureResult<Vec<Vowel>> {
        parse_csv_to_map(input)?
            .iter()
            .map(Vowel::try_from_map)
            .collect()
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Vowel {
        pub(crate) height: Height,
        pub(crate) backness: Backness,
        pub(crate) rounded: bool,
        pub(crate) length: Length,
        pub(crate) symbol: String,
    }

    impl Vowel {
        pub fn new(
            height: Height,
            backness: Backness,
            rounded: bool,
            length: Length,
            symbol: impl Into<String>,
        ) -> Self {
            Self {
                height,
                backness,
                rounded,
                length,
                symbol: symbol.into(),
            }
        }

        pub fn try_from_map(map: &HashMap<String, String>) -> FeatureResult<Self> {
            let height = Height::try_from(field(map, "height")?)?;
            let backness = Backness::try_from(field(map, "backness")?)?;
            let rounded = match normalize(field(map, "roundedness")?).as_str() {
                "rounded" | "pos" => true,
                "unrounded" | "neg" => false,
                other => return Err(unknown("roundedness", other)),
            };
            let length = match map.get("length").filter(|l| !l.is_empty()) {
                Some(l) => Length::try_from(l.as_str())?,
                None => Length::Long,
            };
            let symbol = field(map, "symbol")?;
            Ok(Self::new(height, backness, rounded, length, symbol))
        }

        pub fn symbol(&self) -> &str {
            self.symbol.as_str()
        }

        pub fn height(&self) -> Height {
            self.height
        }

        pub fn backness(&self) -> Backness {
            self.backness
        }

        pub fn is_rounded(&self) -> bool {
            self.rounded
        }

        pub fn length(&self) -> Length {
            self.length
        }

        fn key(&self) -> (Height, Backness, bool, Length) {
            (self.height, self.backness, self.rounded, self.length)
        }
    }

    impl PartialEq for Vowel {
        fn eq(&self, other: &Self) -> bool {
            self.key() == other.key()
        }
    }

    impl Eq for Vowel {}

    impl Hash for Vowel {
        fn hash<H: Hasher>(&self, state: &mut H) {
            self.key().hash(state)
        }
    }

    impl PartialOrd for Vowel {
        fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
            Some(self.cmp(other))
        }
    }

    impl Ord for Vowel {
        fn cmp(&self, other: &Self) -> Ordering {
            self.key().cmp(&other.key())
        }
    }

    impl Display for Vowel {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            write!(
                f,
                "{} {} {} {}",
                self.length,
                self.height,
                self.backness,
                if self.rounded { "rounded" } else { "unrounded" }
            )
        }
    }

    #[derive(Debug, Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Hash, EnumIter, Serialize, Deserialize)]
    pub enum Height {
        Close,
        CloseMid,
        Mid,
        OpenMid,
        NearOpen,
        Open,
    }

    impl TryFrom<&str> for Height {
        type Error = InvalidFeatureError;

        fn try_from(value: &str) -> Result<Self, Self::Error> {
            use Height::*;
            Ok(match normalize(value).as_str() {
                "close" => Close,
                "close-mid" => CloseMid,
                "mid" => Mid,
                "open-mid" => OpenMid,
                "near-open" => NearOpen,
                "open" => Open,
                _ => return Err(unknown("height", value)),
            })
        }
    }

    impl Display for Height {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            write!(
                f,
                "{}",
                match self {
                    Height::Close => "close",
                    Height::CloseMid => "close-mid",
                    Height::Mid => "mid",
                    Height::OpenMid => "open-mid",
                    Height::NearOpen => "near-open",
                    Height::Open => "open",
                }
            )
        }
    }

    #[derive(Debug, Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Hash, EnumIter, Serialize, Deserialize)]
    pub enum Backness {
        Front,
        Central,
        Back,
    }

    impl TryFrom<&str> for Backness {
        type Error = InvalidFeatureError;

        fn try_from(value: &str) -> Result<Self, Self::Error> {
            use Backness::*;
            Ok(match normalize(value).as_str() {
                "front" => Front,
                "central" => Central,
                "back" => Back,
                _ => return Err(unknown("backness", value)),
            })
        }
    }

    impl Display for Backness {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            write!(
                f,
                "{}",
                match self {
                    Backness::Front => "front",
                    Backness::Central => "central",
                    Backness::Back => "back",
                }
            )
        }
    }

    #[derive(Debug, Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Hash, EnumIter, Serialize, Deserialize)]
    pub enum Length {
        Short,
        Long,
    }

    impl TryFrom<&str> for Length {
        type Error = InvalidFeatureError;

        fn try_from(value: &str) -> Result<Self, Self::Error> {
            Ok(match normalize(value).as_str() {
                "short" => Length::Short,
                "long" => Length::Long,
                _ => return Err(unknown("length", value)),
            })
        }
    }

    impl Display for Length {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            write!(
                f,
                "{}",
                match self {
                    Length::Short => "short",
                    Length::Long => "long",
                }
            )
        }
    }
}

mod consonants {
    use super::{field, normalize, parse_csv_to_map, unknown};
    use crate::{FeatureResult, InvalidFeatureError};
    use serde::{Deserialize, Serialize};
    use std::cmp::Ordering;
    use std::collections::HashMap;
    use std::fmt::{Display, Formatter};
    use std::hash::{Hash, Hasher};
    use std::io;
    use strum_macros::EnumIter;

    pub fn parse_consonants<R: io::Read>(input: R) -> FeatureResult<Vec<Consonant>> {
        parse_csv_to_map(input)?
            .iter()
            .map(Consonant::try_from_map)
            .collect()
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Consonant {
        pub(crate) place: Place,
        pub(crate) manner: Manner,
        pub(crate) voiced: bool,
        pub(crate) aspirated: Aspiration,
        pub(crate) symbol: String,
    }

    impl Consonant {
        pub fn new(place: Place, manner: Manner, voiced: bool, symbol: impl Into<String>) -> Self {
            Self {
                place,
                manner,
                voiced,
                aspirated: Aspiration::Unspecified,
                symbol: symbol.into(),
            }
        }

        pub fn aspirated(mut self, aspirated: Aspiration) -> Self {
            self.aspirated = aspirated;
            self
        }

        pub fn try_from_map(map: &HashMap<String, String>) -> FeatureResult<Self> {
            let place = Place::try_from(field(map, "place")?)?;
            let manner = Manner::try_from(field(map, "manner")?)?;
            let voiced = match normalize(field(map, "voice")?).as_str() {
                "voiced" => true,
                "voiceless" => false,
                other => return Err(unknown("voice", other)),
            };
            let aspirated = match map.get("aspirated") {
                Some(a) => Aspiration::try_from(a.as_str())?,
                None => Aspiration::Unspecified,
            };
            let symbol = field(map, "symbol")?;
            Ok(Self::new(place, manner, voiced, symbol).aspirated(aspirated))
        }

        pub fn symbol(&self) -> &str {
            self.symbol.as_str()
        }

        pub fn place(&self) -> Place {
            self.place
        }

        pub fn manner(&self) -> Manner {
            self.manner
        }

        pub fn is_voiced(&self) -> bool {
            self.voiced
        }

        pub fn aspiration(&self) -> Aspiration {
            self.aspirated
        }

        pub fn is_sibilant(&self) -> bool {
            matches!(self.manner, Manner::Affricate | Manner::Fricative)
                && matches!(
                    self.place,
                    Place::Dental | Place::Alveolar | Place::Retroflex | Place::Palatal
                )
        }

        fn key(&self) -> (Manner, Place, bool, Aspiration) {
            (self.manner, self.place, self.voiced, self.aspirated)
        }
    }

    impl PartialEq for Consonant {
        fn eq(&self, other: &Self) -> bool {
            self.key() == other.key()
        }
    }

    impl Eq for Consonant {}

    impl Hash for Consonant {
        fn hash<H: Hasher>(&self, state: &mut H) {
            self.key().hash(state)
        }
    }

    impl PartialOrd for Consonant {
        fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
            Some(self.cmp(other))
        }
    }

    impl Ord for Consonant {
        fn cmp(&self, other: &Self) -> Ordering {
            self.key().cmp(&other.key())
        }
    }

    impl Display for Consonant {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            let voice = if self.voiced { "voiced" } else { "voiceless" };
            let aspiration = match self.aspirated {
                Aspiration::Unspecified => String::new(),
                a => format!("{} ", a),
            };
            write!(f, "{} {}{} {}", voice, aspiration, self.place, self.manner)
        }
    }

    #[derive(Debug, Copy, Clone, PartialOrd, PartialEq, Ord, Eq, Hash, EnumIter, Serialize, Deserialize)]
    pub enum Place {
        Bilabial,
        LabioDental,
        Dental,
        Alveolar,
        Retroflex,
        Palatal,
        Velar,
        LabioVelar,
        Glottal,
    }

    impl Display for Place {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            write!(
                f,
                "{}",
                match self {
                    Place::Bilabial => "bilabial",
                    Place::LabioDental => "labio-dental",
                    Place::Dental => "dental",
                    Place::Alveolar => "alveolar",
                    Place::Retroflex => "retroflex",
                    Place::Palatal => "palatal",
                    Place::Velar => "velar",
                    Place::LabioVelar => "labio-velar",
                    Place::Glottal => "glottal",
                }
            )
        }
    }

    impl TryFrom<&str> for Place {
        type Error = InvalidFeatureError;

        fn try_from(value: &str) -> Result<Self, Self::Error> {
            Ok(match normalize(value).as_str() {
                "bilabial" => Self::Bilabial,
                "labio-dental" | "labiodental" => Self::LabioDental,
                "dental" => Self::Dental,
                "alveolar" => Self::Alveolar,
                "retroflex" => Self::Retroflex,
                "palatal" => Self::Palatal,
                "velar" => Self::Velar,
                "labio-velar" | "labiovelar" => Self::LabioVelar,
                "glottal" => Self::Glottal,
                _ => return Err(unknown("place", value)),
            })
        }
    }

    #[derive(Debug, Copy, Clone, PartialOrd, PartialEq, Ord, Eq, Hash, EnumIter, Serialize, Deserialize)]
    pub enum Manner {
        Nasal,
        Stop,
        Affricate,
        Fricative,
        Approximant,
    }

    impl Display for Manner {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            write!(
                f,
                "{}",
                match self {
                    Manner::Nasal => "nasal",
                    Manner::Stop => "stop",
                    Manner::Affricate => "affricate",
                    Manner::Fricative => "fricative",
                    Manner::Approximant => "approximant",
                }
            )
        }
    }

    impl TryFrom<&str> for Manner {
        type Error = InvalidFeatureError;

        fn try_from(value: &str) -> Result<Self, Self::Error> {
            Ok(match normalize(value).as_str() {
                "nasal" => Manner::Nasal,
                "stop" | "plosive" => Manner::Stop,
                "affricate" => Manner::Affricate,
                "fricative" => Manner::Fricative,
                "approximant" => Manner::Approximant,
                _ => return Err(unknown("manner", value)),
            })
        }
    }

    /// Aspiration is left unspecified unless a source marks it.
    #[derive(Debug, Copy, Clone, Default, PartialOrd, PartialEq, Ord, Eq, Hash, EnumIter, Serialize, Deserialize)]
    pub enum Aspiration {
        #[default]
        Unspecified,
        Positive,
        Negative,
    }

    impl Display for Aspiration {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            write!(
                f,
                "{}",
                match self {
                    Aspiration::Unspecified => "unspecified",
                    Aspiration::Positive => "aspirated",
                    Aspiration::Negative => "unaspirated",
                }
            )
        }
    }

    impl TryFrom<&str> for Aspiration {
        type Error = InvalidFeatureError;

        fn try_from(value: &str) -> Result<Self, Self::Error> {
            Ok(match normalize(value).as_str() {
                "" | "unspecified" => Aspiration::Unspecified,
                "pos" | "aspirated" => Aspiration::Positive,
                "neg" | "unaspirated" => Aspiration::Negative,
                _ => return Err(unknown("aspirated", value)),
            })
        }
    }
}
