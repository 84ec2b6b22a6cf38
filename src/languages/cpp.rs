use super::LanguageGrammar;

pub struct CppGrammar;

impl LanguageGrammar for CppGrammar {
    fn name(&self) -> &'static str {
        "cpp"
    }

    fn file_extensions(&self) -> &[&'static str] {
        &["cpp", "cc", "cxx", "hpp", "hh", "hxx"]
    }

    fn language_flags(&self) -> &[&'static str] {
        &["c++", "c++-header", "cpp"]
    }

    fn language(&self) -> tree_sitter::Language {
        tree_sitter_cpp::LANGUAGE.into()
    }

    fn predefined_macros(&self) -> &[&'static str] {
        &["__cplusplus"]
    }
}
