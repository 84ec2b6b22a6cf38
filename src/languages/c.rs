use super::LanguageGrammar;

pub struct CGrammar;

impl LanguageGrammar for CGrammar {
    fn name(&self) -> &'static str {
        "c"
    }

    // Headers parse as C unless `-x c++` says otherwise.
    fn file_extensions(&self) -> &[&'static str] {
        &["c", "h"]
    }

    fn language_flags(&self) -> &[&'static str] {
        &["c", "c-header"]
    }

    fn language(&self) -> tree_sitter::Language {
        tree_sitter_c::LANGUAGE.into()
    }
}
