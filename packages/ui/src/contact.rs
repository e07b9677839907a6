//! Contact form submission.
//!
//! The form posts its fields to its own `action` and reports the result in
//! the `.form-feedback` region, in the active language. While a request is
//! in flight the submit button is disabled and further submissions are
//! refused.

use std::cell::Cell;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::dom::{non_empty_attribute, set_flag, Dom};
use crate::i18n::{t, Lang, LanguageState};
use crate::switcher::TextPair;

pub const FORM_SELECTOR: &str = "[data-form]";
pub const SUBMIT_SELECTOR: &str = r#"button[type="submit"]"#;
pub const FEEDBACK_SELECTOR: &str = ".form-feedback";

/// Sends the encoded form. Any non-success HTTP status is an error.
#[async_trait(?Send)]
pub trait ContactTransport {
    async fn post_form(&self, action: &str, fields: &[(String, String)]) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Sent,
    Failed,
    /// A previous submission has not settled yet.
    Busy,
    /// The form has no submit button; nothing is sent.
    NoSubmitControl,
}

#[derive(Debug)]
pub struct ContactForm<N> {
    form: N,
    submit: Option<N>,
    feedback: Option<N>,
    in_flight: Cell<bool>,
}

/// Clears the in-flight flag however the submission ends.
struct InFlight<'a>(&'a Cell<bool>);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl<N: Clone> ContactForm<N> {
    pub fn discover<D: Dom<Node = N>>(dom: &D) -> Option<Self> {
        let form = dom.query(FORM_SELECTOR)?;
        let submit = dom.query_first_within(&form, SUBMIT_SELECTOR);
        let feedback = dom.query_first_within(&form, FEEDBACK_SELECTOR);
        Some(Self {
            form,
            submit,
            feedback,
            in_flight: Cell::new(false),
        })
    }

    pub fn form(&self) -> &N {
        &self.form
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.get()
    }

    /// `pair_of` yields the French/English inner HTML of a node (the
    /// language switcher's view of it), used for the button label and the
    /// success message. Sending labels and error messages are plain text.
    pub async fn submit<D, T, F>(
        &self,
        dom: &D,
        transport: &T,
        lang: &LanguageState,
        pair_of: F,
    ) -> SubmitOutcome
    where
        D: Dom<Node = N>,
        T: ContactTransport + ?Sized,
        F: Fn(&N) -> TextPair,
    {
        let Some(button) = self.submit.as_ref() else {
            debug!("contact.submit: no submit button");
            return SubmitOutcome::NoSubmitControl;
        };
        if self.in_flight.replace(true) {
            debug!("contact.submit: already in flight");
            return SubmitOutcome::Busy;
        }
        let _in_flight = InFlight(&self.in_flight);

        let label = pair_of(button);
        let sending = TextPair {
            fr: non_empty_attribute(dom, button, "data-i18n-fr-sending")
                .unwrap_or_else(|| t(Lang::Fr, "form.sending")),
            en: non_empty_attribute(dom, button, "data-i18n-en-sending")
                .unwrap_or_else(|| t(Lang::En, "form.sending")),
        };
        let started_in = lang.get();

        set_flag(dom, button, "disabled", true);
        dom.set_text_content(button, sending.get(started_in));
        if let Some(feedback) = &self.feedback {
            set_flag(dom, feedback, "hidden", true);
        }

        let action = dom.form_action(&self.form);
        let fields = dom.form_fields(&self.form);
        info!("contact.submit: action={action} fields={}", fields.len());

        let outcome = match transport.post_form(&action, &fields).await {
            Ok(()) => {
                dom.reset_form(&self.form);
                if let Some(feedback) = &self.feedback {
                    let message = with_builtin(pair_of(feedback), "form.success");
                    dom.set_inner_html(feedback, message.get(started_in));
                    show_feedback(dom, feedback, "success");
                }
                info!("contact.submit: sent");
                SubmitOutcome::Sent
            }
            Err(e) => {
                warn!("contact.submit: failed: {e:#}");
                if let Some(feedback) = &self.feedback {
                    let message = with_builtin(
                        TextPair::from_markers(
                            dom,
                            feedback,
                            "data-i18n-fr-error",
                            "data-i18n-en-error",
                            || dom.text_content(feedback).trim().to_string(),
                        ),
                        "form.error",
                    );
                    dom.set_text_content(feedback, message.get(lang.get()));
                    show_feedback(dom, feedback, "error");
                }
                SubmitOutcome::Failed
            }
        };

        set_flag(dom, button, "disabled", false);
        // Same markup the language switcher writes, icons included.
        dom.set_inner_html(button, label.get(lang.get()));
        outcome
    }
}

fn with_builtin(pair: TextPair, key: &str) -> TextPair {
    if pair.fr.is_empty() {
        TextPair {
            fr: t(Lang::Fr, key),
            en: t(Lang::En, key),
        }
    } else {
        pair
    }
}

fn show_feedback<D: Dom>(dom: &D, feedback: &D::Node, state: &str) {
    set_flag(dom, feedback, "hidden", false);
    dom.set_attribute(feedback, "data-state", state);
}
