//! Case- and compatibility-insensitive text folding.

use caseless::Caseless;
use unicode_normalization::UnicodeNormalization;

/// Name under which [`fold`] is registered as an SQL function
pub const SQL_FUNCTION: &str = "tes_fold";

/// NFKC-normalize the text, then apply full Unicode case folding.
pub fn fold(text: &str) -> String {
    text.nfkc().default_case_fold().collect()
}

#[cfg(test)]
mod test {
    use super::fold;

    #[test]
    fn fold_latin_and_cyrillic() {
        assert_eq!(fold("DRAGON Priest"), "dragon priest");
        assert_eq!(fold("ДРАКОН"), "дракон");
    }

    #[test]
    fn fold_full_case_mapping() {
        assert_eq!(fold("Straße"), fold("STRASSE"));
        assert_eq!(fold("ΣΊΣΥΦΟΣ"), fold("σίσυφος"));
    }

    #[test]
    fn fold_compatibility_forms() {
        assert_eq!(fold("ﬁre"), "fire");
        assert_eq!(fold("Ｄｒａｇｏｎ"), "dragon");
    }
}
