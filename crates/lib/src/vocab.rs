//! # Vocabulary Canonicalization
//!
//! Maps free-text user input for the three categorical features onto the
//! exact label strings the classifier was trained on. The tables are static
//! data, not configuration: the classifier memorized these strings verbatim,
//! so the display capitalization here must match the training vocabulary
//! exactly.

/// The three categorical feature domains with a closed vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryKind {
    DopamineFactor,
    DominantColor,
    VideoCategory,
}

/// Training vocabulary for `key_dopamine_factor`, keyed by lower-case form.
static DOPAMINE_FACTORS: &[(&str, &str)] = &[
    ("no dominant factor", "No Dominant Factor"),
    ("repetitive music/audio", "Repetitive Music/Audio"),
    ("catchy/melodic music", "Catchy/Melodic Music"),
    ("element of surprise", "Element of Surprise"),
    ("on-screen positive feedback", "On-screen Positive Feedback"),
    ("game-like progression", "Game-like Progression"),
    ("familiar characters", "Familiar Characters"),
    ("distinctive sound effects", "Distinctive Sound Effects"),
    ("engaging narrative", "Engaging Narrative"),
    ("visual effects", "Visual Effects"),
    ("unique animation style", "Unique Animation Style"),
    ("creative elements", "Creative Elements"),
];

/// Training vocabulary for `dominant_color`.
static DOMINANT_COLORS: &[(&str, &str)] = &[
    ("no dominant color", "No Dominant Color"),
    ("multi colors", "Multi Colors"),
    ("blue", "Blue"),
    ("pink", "Pink"),
    ("white", "White"),
    ("violet", "Violet"),
    ("peach", "Peach"),
    ("green", "Green"),
    ("red", "Red"),
    ("yellow", "Yellow"),
    ("orange", "Orange"),
    ("brown", "Brown"),
    ("black", "Black"),
    ("grey", "Grey"),
    ("purple", "Purple"),
];

/// Training vocabulary for `video_category`.
static VIDEO_CATEGORIES: &[(&str, &str)] = &[
    ("missing", "Missing"),
    ("advertisement", "Advertisement"),
    ("country vlog", "Country Vlog"),
    ("documentary", "Documentary"),
    ("education", "Education"),
    ("entertainment", "Entertainment"),
    ("food vlog", "Food Vlog"),
    ("gaming", "Gaming"),
    ("informative", "Informative"),
    ("inspiration", "Inspiration"),
    ("motivation", "Motivation"),
    ("music", "Music"),
    ("nature", "Nature"),
    ("nursery rhymes", "Nursery Rhymes"),
    ("short story", "Short Story"),
    ("shots", "Shots"),
    ("tourism", "Tourism"),
    ("travel vlog", "Travel Vlog"),
    ("vlog", "Vlog"),
];

impl CategoryKind {
    fn table(self) -> &'static [(&'static str, &'static str)] {
        match self {
            CategoryKind::DopamineFactor => DOPAMINE_FACTORS,
            CategoryKind::DominantColor => DOMINANT_COLORS,
            CategoryKind::VideoCategory => VIDEO_CATEGORIES,
        }
    }

    /// The sentinel member substituted for unrecognized or missing input.
    pub fn default_label(self) -> &'static str {
        match self {
            CategoryKind::DopamineFactor => "No Dominant Factor",
            CategoryKind::DominantColor => "No Dominant Color",
            CategoryKind::VideoCategory => "Missing",
        }
    }
}

/// Resolves a free-text category value to its canonical training label.
///
/// The input is trimmed and lower-cased before lookup. Anything outside the
/// table maps to the kind's default member, so this function is total and
/// never returns a value outside the enumerated set.
pub fn canonicalize(kind: CategoryKind, raw: &str) -> &'static str {
    let lowered = raw.trim().to_lowercase();
    kind.table()
        .iter()
        .find(|(key, _)| *key == lowered)
        .map(|(_, label)| *label)
        .unwrap_or_else(|| kind.default_label())
}
