// Submission controller - drives one submit attempt end to end
//
// Validate, then either accept (success region + toast + reset) or reject
// (summary toast + focus the first failing field). The default form action
// never runs; the engine owns submission entirely.

use super::{rules, Field, ValidationResult};
use crate::notify::Notifier;
use crate::shell::Shell;
use std::time::Duration;

/// How long the success region stays visible before auto-hiding
pub const SUCCESS_REGION_TTL: Duration = Duration::from_millis(3500);

/// Toast dismiss timeout for both outcomes
const TOAST_TTL: Duration = Duration::from_millis(3000);

const MSG_ACCEPTED: &str = "Cadastro realizado com sucesso!";
const MSG_REJECTED: &str = "Existem erros no formulário. Verifique os campos marcados.";

/// What one submit attempt did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The record was accepted; when the fragment has a success region,
    /// `banner_generation` identifies the reveal for its auto-hide timer
    Accepted { banner_generation: Option<u64> },
    /// One or more rules failed; `focused` is the first failing field whose
    /// control exists
    Rejected { focused: Option<Field> },
    /// No form to submit (nothing mounted)
    NoForm,
}

/// Handle a submit event against the shell's registration form.
///
/// `target` is the element id the event came from; an event from outside
/// any form falls back to the registration form.
pub fn handle_submit(
    shell: &mut Shell,
    target: Option<&str>,
    notifier: &dyn Notifier,
) -> (SubmitOutcome, ValidationResult) {
    let Some(form) = shell.resolve_form(target) else {
        tracing::debug!("submit ignored: no form mounted");
        return (SubmitOutcome::NoForm, ValidationResult::default());
    };

    let result = rules::validate(&form.snapshot());
    form.apply_result(&result);

    if result.valid {
        form.reset();
        let banner_generation = shell.show_success();
        notifier.notify(MSG_ACCEPTED, TOAST_TTL);
        tracing::info!(fields = result.data.len(), "registration accepted");
        (SubmitOutcome::Accepted { banner_generation }, result)
    } else {
        notifier.notify(MSG_REJECTED, TOAST_TTL);
        tracing::info!(errors = result.errors.len(), "registration rejected");
        let focused = first_focusable(shell, &result);
        if let Some(field) = focused {
            shell.focus(field);
        }
        (SubmitOutcome::Rejected { focused }, result)
    }
}

/// First failing field that has a control to receive focus
fn first_focusable(shell: &mut Shell, result: &ValidationResult) -> Option<Field> {
    let form = shell.resolve_form(None)?;
    result
        .errors
        .first()
        .map(|e| e.field)
        .filter(|f| form.has_control(f.element_id()))
}
