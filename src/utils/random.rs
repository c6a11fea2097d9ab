// src/utils/random.rs
//! Random identifiers and datatoken names.
//!
//! Every generator takes its randomness from a caller-supplied [`rand::Rng`] so
//! tests can seed it. The `thread_rng` conveniences are thin wrappers.

use ethers_core::utils::hex;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Bytes drawn from the RNG per iteration of [`generate_id_with`].
const CHUNK_BYTES: usize = 32;

/// Generates a lowercase hex identifier of exactly `length` characters.
///
/// Used for nonces and other throwaway identifiers.
pub fn generate_id(length: usize) -> String {
    generate_id_with(&mut rand::thread_rng(), length)
}

/// Like [`generate_id`], drawing from `rng`.
pub fn generate_id_with<R: Rng + ?Sized>(rng: &mut R, length: usize) -> String {
    let mut id = String::with_capacity(length + CHUNK_BYTES * 2);
    while id.len() < length {
        let chunk: [u8; CHUNK_BYTES] = rng.gen();
        id.push_str(&hex::encode(chunk));
    }
    id.truncate(length);
    id
}

/// Vocabulary for generated datatoken names.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct WordList {
    pub adjectives: Vec<String>,
    pub nouns: Vec<String>,
}

const ADJECTIVES: &[&str] = &[
    "adamant", "adroit", "amatory", "animistic", "antic", "arcadian", "baleful", "bellicose",
    "bilious", "boorish", "calamitous", "caustic", "cerulean", "comely", "concomitant",
    "contumacious", "corpulent", "crapulous", "defamatory", "didactic", "dilatory", "dowdy",
    "efficacious", "effulgent", "egregious", "endemic", "equanimous", "execrable", "fastidious",
    "feckless", "fecund", "friable", "fulsome", "garrulous", "guileless", "gustatory", "heuristic",
    "histrionic", "hubristic", "incendiary", "insidious", "insolent", "intransigent", "inveterate",
    "invidious", "irksome", "jejune", "jocular", "judicious", "lachrymose", "limpid", "loquacious",
    "luminous", "mannered", "mendacious", "meretricious", "minatory", "mordant", "munificent",
    "nefarious", "noxious", "obtuse", "parsimonious", "pendulous", "pernicious", "pervasive",
    "petulant", "platitudinous", "precipitate", "propitious", "puckish", "querulous", "quiescent",
    "rebarbative", "recalcitrant", "redolent", "rhadamanthine", "risible", "ruminative",
    "sagacious", "salubrious", "sartorial", "sclerotic", "serpentine", "spasmodic", "strident",
    "taciturn", "tenacious", "tremulous", "trenchant", "turbulent", "turgid", "ubiquitous",
    "uxorious", "verdant", "voluble", "voracious", "wheedling", "withering", "zealous",
];

const NOUNS: &[&str] = &[
    "ninja", "chair", "pancake", "statue", "unicorn", "rainbows", "laser", "senor", "bunny",
    "captain", "nibblets", "cupcake", "carrot", "gnomes", "glitter", "potato", "salad", "toejam",
    "curtains", "beets", "toilet", "exorcism", "stick figures", "mermaid eggs", "sea barnacles",
    "dragons", "jellybeans", "snakes", "dolls", "bushes", "cookies", "apples", "ice cream",
    "ukulele", "kazoo", "banjo", "opera singer", "circus", "trampoline", "carousel", "carnival",
    "locomotive", "hot air balloon", "praying mantis", "animator", "artisan", "artist",
    "colorist", "inker", "coppersmith", "director", "designer", "flatter", "stylist", "leadman",
    "limner", "make-up artist", "model", "musician", "penciller", "producer", "scenographer",
    "set decorator", "silversmith", "teacher", "auto mechanic", "beader", "bobbin boy",
    "clerk of the chapel", "filling station attendant", "foreman", "maintenance engineering",
    "mechanic", "miller", "moldmaker", "panel beater", "patternmaker", "plant operator",
    "plumber", "sawfiler", "shop foreman", "soaper", "stationary engineer", "wheelwright",
    "woodworkers",
];

impl Default for WordList {
    fn default() -> Self {
        Self {
            adjectives: ADJECTIVES.iter().map(|w| w.to_string()).collect(),
            nouns: NOUNS.iter().map(|w| w.to_string()).collect(),
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// A generated datatoken name and symbol.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DatatokenName {
    pub name: String,
    pub symbol: String,
}

/// Picks a random `"<Adjective> <Noun> Token"` name.
///
/// The symbol is the first three letters of the adjective and of the noun,
/// uppercased, followed by a dash and a two-digit number, e.g. `"CERNIN-07"`.
/// Falls back to the built-in vocabulary if either list in `words` is empty.
pub fn generate_dt_name<R: Rng + ?Sized>(rng: &mut R, words: &WordList) -> DatatokenName {
    let fallback;
    let words = if words.adjectives.is_empty() || words.nouns.is_empty() {
        fallback = WordList::default();
        &fallback
    } else {
        words
    };

    let adjective = capitalize(&words.adjectives[rng.gen_range(0..words.adjectives.len())]);
    let noun = capitalize(&words.nouns[rng.gen_range(0..words.nouns.len())]);
    let number: u8 = rng.gen_range(0..100);

    let prefix: String = adjective.chars().take(3).chain(noun.chars().take(3)).collect();
    DatatokenName {
        name: format!("{adjective} {noun} Token"),
        symbol: format!("{}-{:02}", prefix.to_uppercase(), number),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn is_lower_hex(s: &str) -> bool {
        s.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f'))
    }

    #[test]
    fn test_generate_id_has_exact_length() {
        for length in [0, 1, 63, 64, 65, 130] {
            let id = generate_id(length);
            assert_eq!(id.len(), length);
            assert!(is_lower_hex(&id));
        }
    }

    #[test]
    fn test_generate_id_is_seedable() {
        let a = generate_id_with(&mut StdRng::seed_from_u64(7), 130);
        let b = generate_id_with(&mut StdRng::seed_from_u64(7), 130);
        assert_eq!(a, b);
        assert_ne!(a, generate_id_with(&mut StdRng::seed_from_u64(8), 130));
    }

    #[test]
    fn test_dt_name_shape() {
        let words = WordList {
            adjectives: vec!["cerulean".into()],
            nouns: vec!["ninja".into()],
        };
        let generated = generate_dt_name(&mut StdRng::seed_from_u64(1), &words);
        assert_eq!(generated.name, "Cerulean Ninja Token");
        assert!(generated.symbol.starts_with("CERNIN-"));
        let suffix = &generated.symbol["CERNIN-".len()..];
        assert_eq!(suffix.len(), 2);
        assert!(suffix.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_dt_name_is_deterministic_for_a_seed() {
        let words = WordList::default();
        let a = generate_dt_name(&mut StdRng::seed_from_u64(42), &words);
        let b = generate_dt_name(&mut StdRng::seed_from_u64(42), &words);
        assert_eq!(a, b);
        assert!(a.name.ends_with(" Token"));
    }

    #[test]
    fn test_empty_word_list_falls_back_to_defaults() {
        let empty = WordList { adjectives: vec![], nouns: vec![] };
        let generated = generate_dt_name(&mut StdRng::seed_from_u64(3), &empty);
        assert!(generated.name.ends_with(" Token"));
    }
}
