//! Platform-independent behaviours of the site.
//!
//! Everything here works against the [`dom::Dom`] trait; the `web` crate
//! supplies the browser implementation and binds the behaviours to events.

pub mod config;
pub mod contact;
pub mod dom;
pub mod header;
pub mod nav;
pub mod page;
pub mod reveal;
pub mod tilt;

mod i18n;
pub use i18n::{t, Lang, LanguageState};

mod switcher;
pub use switcher::{
    LanguageStore, LanguageSwitcher, OriginalCache, TextKind, TextPair, TOGGLE_SELECTOR,
};

pub use config::SiteConfig;
pub use contact::{ContactForm, ContactTransport, SubmitOutcome};

#[cfg(test)]
mod test_support;
