use std::cell::Cell;
use std::rc::Rc;

/// Supported languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Lang {
    #[default]
    Fr,
    En,
}

impl Lang {
    pub fn code(self) -> &'static str {
        match self {
            Lang::Fr => "fr",
            Lang::En => "en",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "fr" => Some(Lang::Fr),
            "en" => Some(Lang::En),
            _ => None,
        }
    }

    /// Anything that is not exactly `en` is French.
    pub fn from_code_or_default(code: &str) -> Self {
        Self::from_code(code).unwrap_or_default()
    }

    /// Browser locale such as `en-US`: only the two-letter prefix counts.
    pub fn from_locale(locale: &str) -> Self {
        let prefix: String = locale.trim().chars().take(2).collect();
        if prefix.eq_ignore_ascii_case("en") {
            Lang::En
        } else {
            Lang::Fr
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Lang::Fr => Lang::En,
            Lang::En => Lang::Fr,
        }
    }

    pub fn pick<'a>(self, fr: &'a str, en: &'a str) -> &'a str {
        match self {
            Lang::Fr => fr,
            Lang::En => en,
        }
    }
}

/// Shared handle on the active language.
///
/// The switcher owns the authoritative copy; other behaviours hold clones
/// and only read it.
#[derive(Debug, Clone, Default)]
pub struct LanguageState(Rc<Cell<Lang>>);

impl LanguageState {
    pub fn new(lang: Lang) -> Self {
        Self(Rc::new(Cell::new(lang)))
    }

    pub fn get(&self) -> Lang {
        self.0.get()
    }

    pub(crate) fn set(&self, lang: Lang) {
        self.0.set(lang);
    }
}

/// Built-in strings used when the markup carries no bilingual marker.
/// Falls back to French, then to the key itself.
pub fn t(lang: Lang, key: &str) -> String {
    match (lang, key) {
        (Lang::Fr, "form.sending") => "envoi en cours…".to_string(),
        (Lang::En, "form.sending") => "sending…".to_string(),
        (Lang::Fr, "form.success") => "Merci ! Votre message a bien été envoyé.".to_string(),
        (Lang::En, "form.success") => "Thank you! Your message has been sent.".to_string(),
        (Lang::Fr, "form.error") => {
            "Une erreur est survenue. Merci de réessayer plus tard.".to_string()
        }
        (Lang::En, "form.error") => "Something went wrong. Please try again later.".to_string(),
        (Lang::En, k) => t(Lang::Fr, k),
        (Lang::Fr, _) => key.to_string(),
    }
}
