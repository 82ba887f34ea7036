//! Static slang dictionary for the language normalizer.
//!
//! Maps informal/regional Indonesian tokens (chat abbreviations, Jakartan
//! and Sundanese colloquialisms) to their formal equivalents so that
//! downstream language detection and translation see standard vocabulary.
//! Matching is lowercase and ignores trailing punctuation; replacement
//! preserves an initial capital.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Informal token → formal equivalent.
pub static SLANG_MAP: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        // First/second person
        ("aing", "saya"),
        ("gue", "saya"),
        ("gua", "saya"),
        ("gw", "saya"),
        ("ane", "saya"),
        ("aku", "saya"),
        ("ak", "saya"),
        ("lo", "kamu"),
        ("lu", "kamu"),
        ("loe", "kamu"),
        ("elo", "kamu"),
        ("ente", "kamu"),
        ("km", "kamu"),
        ("sia", "kamu"),
        // Negation
        ("ga", "tidak"),
        ("gak", "tidak"),
        ("gk", "tidak"),
        ("ngga", "tidak"),
        ("nggak", "tidak"),
        ("kagak", "tidak"),
        ("kaga", "tidak"),
        ("tdk", "tidak"),
        ("tak", "tidak"),
        ("ora", "tidak"),
        ("moal", "tidak"),
        ("gapapa", "tidak apa-apa"),
        ("gpp", "tidak apa-apa"),
        // Aspect / time
        ("udah", "sudah"),
        ("udh", "sudah"),
        ("dah", "sudah"),
        ("sdh", "sudah"),
        ("belom", "belum"),
        ("blm", "belum"),
        ("lg", "lagi"),
        ("lgi", "lagi"),
        ("ntar", "nanti"),
        ("entar", "nanti"),
        ("skrg", "sekarang"),
        ("kmrn", "kemarin"),
        ("bsk", "besok"),
        ("bntr", "sebentar"),
        // Question words
        ("gimana", "bagaimana"),
        ("gmn", "bagaimana"),
        ("knp", "mengapa"),
        ("napa", "mengapa"),
        ("ngapain", "mengapa"),
        ("kpn", "kapan"),
        ("dmn", "di mana"),
        ("mana", "di mana"),
        // Intensifiers / qualifiers
        ("bgt", "sangat"),
        ("banget", "sangat"),
        ("bngt", "sangat"),
        ("pisan", "sangat"),
        ("bener", "benar"),
        ("bnr", "benar"),
        ("emang", "memang"),
        ("emg", "memang"),
        ("aja", "saja"),
        ("aj", "saja"),
        ("doang", "saja"),
        ("wae", "saja"),
        ("jg", "juga"),
        ("jgn", "jangan"),
        ("jngn", "jangan"),
        // Connectives / particles
        ("yg", "yang"),
        ("krn", "karena"),
        ("karna", "karena"),
        ("soalnya", "karena"),
        ("tp", "tetapi"),
        ("tapi", "tetapi"),
        ("dgn", "dengan"),
        ("dg", "dengan"),
        ("utk", "untuk"),
        ("buat", "untuk"),
        ("dr", "dari"),
        ("dlm", "dalam"),
        ("kalo", "kalau"),
        ("klo", "kalau"),
        ("kl", "kalau"),
        ("trs", "terus"),
        ("trus", "terus"),
        // Verbs / misc
        ("pgn", "ingin"),
        ("pengen", "ingin"),
        ("pengin", "ingin"),
        ("hayang", "ingin"),
        ("bs", "bisa"),
        ("tau", "tahu"),
        ("liat", "lihat"),
        ("denger", "dengar"),
        ("ngomong", "berbicara"),
        ("bilang", "berkata"),
        ("dateng", "datang"),
        ("bgs", "bagus"),
        ("keren", "bagus"),
        ("cape", "lelah"),
        ("capek", "lelah"),
        ("galau", "sedih"),
        ("baper", "terbawa perasaan"),
        ("mager", "malas bergerak"),
        ("santuy", "santai"),
        ("gabut", "bosan"),
        ("bokap", "ayah"),
        ("nyokap", "ibu"),
        ("temen", "teman"),
        ("org", "orang"),
        ("rmh", "rumah"),
        ("mkn", "makan"),
        ("bljr", "belajar"),
        ("krja", "bekerja"),
        ("duit", "uang"),
    ])
});

/// Apply the slang map to `text`.
///
/// Tokenizes on whitespace, matches each token lowercased with trailing
/// punctuation stripped, and re-attaches the punctuation after replacement.
/// An initial capital on the original token is preserved on the
/// replacement. Tokens are re-joined with single spaces.
pub fn apply(text: &str) -> String {
    text.split_whitespace()
        .map(replace_token)
        .collect::<Vec<_>>()
        .join(" ")
}

fn replace_token(token: &str) -> String {
    let trailing_start = token
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_punctuation())
        .map(|(i, _)| i)
        .last()
        .unwrap_or(token.len());
    let (core, trailing) = token.split_at(trailing_start);

    let lowered = core.to_lowercase();
    match SLANG_MAP.get(lowered.as_str()) {
        Some(formal) => {
            let mut replaced = if core.chars().next().is_some_and(|c| c.is_uppercase()) {
                capitalize(formal)
            } else {
                (*formal).to_string()
            };
            replaced.push_str(trailing);
            replaced
        }
        None => token.to_string(),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
