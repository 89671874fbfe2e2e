//! Normalisation des noms de praticiens saisis en texte libre.

use crate::model::ClinicianKey;

/// Table fixe de repli des diacritiques (appliquée après passage en majuscules).
const FOLD_TABLE: &[(char, char)] = &[
    ('İ', 'I'),
    ('Ğ', 'G'),
    ('Ü', 'U'),
    ('Ş', 'S'),
    ('Ö', 'O'),
    ('Ç', 'C'),
    ('Â', 'A'),
    ('À', 'A'),
    ('Á', 'A'),
    ('Ä', 'A'),
    ('É', 'E'),
    ('È', 'E'),
    ('Ê', 'E'),
    ('Ë', 'E'),
    ('Î', 'I'),
    ('Ï', 'I'),
    ('Í', 'I'),
    ('Ô', 'O'),
    ('Ó', 'O'),
    ('Û', 'U'),
    ('Ù', 'U'),
    ('Ú', 'U'),
    ('Ñ', 'N'),
];

/// Jetons produits par les tableurs pour une cellule vide.
const MISSING_TOKENS: &[&str] = &["nan", "nat", "none", "null"];

fn fold_char(c: char) -> char {
    FOLD_TABLE
        .iter()
        .find(|(from, _)| *from == c)
        .map_or(c, |(_, to)| *to)
}

/// Clé canonique d'un nom : majuscules, diacritiques repliés, espaces
/// réduits. Idempotente.
pub fn normalize_name(raw: &str) -> String {
    raw.split_whitespace()
        .map(|word| {
            word.chars()
                .flat_map(char::to_uppercase)
                .map(fold_char)
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_missing_token(fragment: &str) -> bool {
    MISSING_TOKENS
        .iter()
        .any(|token| fragment.eq_ignore_ascii_case(token))
}

/// Découpe une cellule (`/` ou retour à la ligne) en fragments de noms.
pub fn split_names(cell: &str) -> Vec<&str> {
    cell.split(['/', '\n', '\r'])
        .map(str::trim)
        .filter(|f| !f.is_empty() && !is_missing_token(f))
        .collect()
}

/// Fragments d'une cellule accompagnés de leur clé.
pub fn extract_clinicians(cell: &str) -> Vec<(ClinicianKey, &str)> {
    split_names(cell)
        .into_iter()
        .map(|raw| (ClinicianKey::new(raw), raw))
        .filter(|(key, _)| !key.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn turkish_spellings_collapse_to_one_key() {
        let a = normalize_name("Şükrü Öztürk");
        let b = normalize_name("  ŞÜKRÜ   ÖZTÜRK ");
        let c = normalize_name("sukru ozturk");
        assert_eq!(a, "SUKRU OZTURK");
        assert_eq!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn dotless_and_dotted_i_fold_to_ascii() {
        assert_eq!(normalize_name("ışık"), "ISIK");
        assert_eq!(normalize_name("İlker"), "ILKER");
        assert_eq!(normalize_name("Çağrı"), "CAGRI");
    }

    #[test]
    fn split_drops_empty_and_nan_fragments() {
        let names = split_names("Ana / nan\nBora//  \r\nNaN / Cem");
        assert_eq!(names, vec!["Ana", "Bora", "Cem"]);
        assert!(split_names("nan").is_empty());
        assert!(split_names("").is_empty());
    }

    #[test]
    fn extract_pairs_raw_with_key() {
        let found = extract_clinicians("Ayşe Demir/ayse demir");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].0, found[1].0);
        assert_eq!(found[0].1, "Ayşe Demir");
        assert_eq!(found[1].1, "ayse demir");
    }

    proptest! {
        #[test]
        fn normalization_is_idempotent(raw in "[a-zA-ZçğıöşüÇĞİÖŞÜéèâ \\-]{0,24}") {
            let once = normalize_name(&raw);
            prop_assert_eq!(normalize_name(&once), once);
        }
    }
}
