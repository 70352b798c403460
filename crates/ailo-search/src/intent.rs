//! Lexical question-intent classifier.
//!
//! Trigger groups are checked in a fixed priority order and the first group
//! with any match decides the intent. Questions often carry cues for several
//! intents ("hva koster det å studere til lege" has both salary and education
//! cues); the order below is what makes the result reproducible:
//! salary > education_path > job_duties > comparison > definition > location > duration.

use ailo_core::Intent;

use crate::terms::normalize;

/// Triggers are matched against the normalized question padded with one space
/// on each side, so a leading or trailing space in a trigger demands a word
/// boundary.
pub const TRIGGER_GROUPS: &[(Intent, &[&str])] = &[
    (Intent::Salary, &["lønn", "lonn", "tjener", "tjene ", "koster", "betaler", "betalt", "inntekt"]),
    (Intent::EducationPath, &["hvordan bli", "hva skal til", "hva kreves", "utdanning", "studere til", "utdanne"]),
    (Intent::JobDuties, &["hva gjør", "oppgaver", "jobber med", "ansvar", "arbeidsdag"]),
    (Intent::Comparison, &["forskjell", "kontra", "sammenlign", " eller ", " vs "]),
    (Intent::Definition, &["hva betyr", " hva er ", "definisjon", "menes med"]),
    (Intent::Location, &["hvor kan", "hvor jobber", "hvor studere", "hvilke skoler", "hvor ligger"]),
    (Intent::Duration, &["hvor lang", "hvor mange år", "studiepoeng", "hvor lenge", "varighet"]),
];

pub fn classify(question: &str) -> Intent {
    let padded = format!(" {} ", normalize(question));
    TRIGGER_GROUPS
        .iter()
        .find(|(_, triggers)| triggers.iter().any(|t| padded.contains(t)))
        .map_or(Intent::General, |(intent, _)| *intent)
}
