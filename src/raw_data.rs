//! Built-in Middle Chinese inventory, after Baxter (1992) and the
//! Wikipedia summary of Middle Chinese phonology.

pub use consonants::*;
pub use positions::*;
pub use vowels::*;

mod consonants {
    /// `j` repeats the features of `y`: it is the notation used for the glide
    /// as a medial or coda. Sonorants are listed voiceless, as in Baxter's
    /// feature sheet.
    ///
    /// Two places differ from that sheet, which would otherwise give equal
    /// features to distinct initials:
    /// - `t` and `tʰ` are alveolar, not labio-dental.
    /// - `tʂ tʂʰ dʐ ʂ ʐ` are retroflex, not dental.
    pub const CONSONANTS: &str = "\
symbol,place,voice,manner,aspirated
# Labials
p,bilabial,voiceless,stop,
pʰ,bilabial,voiceless,stop,pos
b,bilabial,voiced,stop,
m,bilabial,voiceless,nasal,
# Dentals
t,alveolar,voiceless,stop,
tʰ,alveolar,voiceless,stop,pos
d,alveolar,voiced,stop,
n,alveolar,voiceless,nasal,
l,dental,voiceless,approximant,
# Retroflex stops
ʈ,retroflex,voiceless,stop,
ʈʰ,retroflex,voiceless,stop,pos
ɖ,retroflex,voiced,stop,
ɳ,retroflex,voiceless,nasal,
# Dental sibilants
ts,dental,voiceless,affricate,
tsʰ,dental,voiceless,affricate,pos
dz,dental,voiced,affricate,
s,dental,voiceless,fricative,
z,dental,voiced,fricative,
# Retroflex sibilants
tʂ,retroflex,voiceless,affricate,
tʂʰ,retroflex,voiceless,affricate,pos
dʐ,retroflex,voiced,affricate,
ʂ,retroflex,voiceless,fricative,
ʐ,retroflex,voiced,fricative,
# Palatals
tɕ,palatal,voiceless,affricate,
tɕʰ,palatal,voiceless,affricate,pos
dʑ,palatal,voiced,affricate,
ɲ,palatal,voiceless,nasal,
ɕ,palatal,voiceless,fricative,
ʑ,palatal,voiced,fricative,
y,palatal,voiceless,approximant,
# Velars
k,velar,voiceless,stop,
kʰ,velar,voiceless,stop,pos
g,velar,voiced,stop,
ŋ,velar,voiceless,nasal,
# Laryngeals
ʔ,glottal,voiceless,stop,
x,glottal,voiceless,fricative,
ɣ,glottal,voiced,fricative,
# Glides
j,palatal,voiceless,approximant,
w,labio-velar,voiceless,approximant,";

    /// Dialectal notation and the symbol it merges into when the laryngeal
    /// fricatives are read as one phoneme.
    pub const LARYNGEAL_VARIANT: (&str, &str) = ("ɣ", "x");

    /// Baxter's spelling of the retroflex sibilant affricates, accepted as
    /// aliases of the symbols the table uses.
    pub const SPELLING_VARIANTS: &[(&str, &str)] = &[("ʈʂ", "tʂ"), ("ʈʂʰ", "tʂʰ"), ("ɖʐ", "dʐ")];
}

mod vowels {
    pub const VOWELS: &str = "\
symbol,height,backness,roundedness,length
i,close,front,unrounded,long
ɨ,close,central,unrounded,long
u,close,back,unrounded,long
e,close-mid,front,unrounded,long
o,mid,back,unrounded,long
ɛ,open-mid,front,unrounded,long
æ,near-open,front,unrounded,long
a,open,front,unrounded,long";
}

mod positions {
    /// Roles are space separated. `kind` only applies to initials.
    pub const POSITIONS: &str = "\
symbol,roles,kind
# Simple initials
p,initial final,simple
pʰ,initial,simple
b,initial,simple
m,initial final,simple
t,initial final,simple
tʰ,initial,simple
d,initial,simple
n,initial final,simple
l,initial,simple
ts,initial,simple
tsʰ,initial,simple
dz,initial,simple
s,initial,simple
k,initial final,simple
kʰ,initial,simple
ŋ,initial final,simple
ʔ,initial,simple
x,initial,simple
ɣ,initial,simple
# Complex initials
ʈ,initial,complex
ʈʰ,initial,complex
ɖ,initial,complex
ɳ,initial,complex
z,initial,complex
tʂ,initial,complex
tʂʰ,initial,complex
dʐ,initial,complex
ʂ,initial,complex
ʐ,initial,complex
tɕ,initial,complex
tɕʰ,initial,complex
dʑ,initial,complex
ɲ,initial,complex
ɕ,initial,complex
ʑ,initial,complex
y,initial,complex
g,initial,complex
# Glides
j,medial final,
w,medial final,
# Nuclei
i,nucleus,
ɨ,nucleus,
u,nucleus,
e,nucleus,
o,nucleus,
ɛ,nucleus,
æ,nucleus,
a,nucleus,";

    /// Under the medial-based reading type-B chongniu carries its own glide.
    pub const CHONGNIU_MEDIALS: &str = "\
symbol,roles,kind
ɨ,medial,";

    pub const MEDIAL_BASED_EXCLUSIONS: &str = "\
medial,nucleus
j,ɨ
ɨ,i
ɨ,ɨ";

    pub const VOWEL_BASED_EXCLUSIONS: &str = "\
medial,nucleus
w,ɨ";
}
