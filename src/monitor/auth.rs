//! Auth recovery sub-machine: idle -> in progress -> success | failure.
//!
//! Runs the external sign-in flow and, on success, reports
//! [`AuthDelegate::Authenticated`] to the parent as a follow-up action.
//! The parent owns what happens next.

use super::actions::{Action, AuthAction, AuthDelegate};
use super::effects::Effect;
use super::state::{AuthPhase, AuthState};

pub fn reduce(state: &mut AuthState, action: AuthAction) -> Vec<Effect> {
    match action {
        AuthAction::SignInTapped => match state.phase {
            AuthPhase::Idle | AuthPhase::Failure => {
                state.phase = AuthPhase::InProgress;
                state.error = None;
                vec![Effect::RunSignIn]
            }
            AuthPhase::InProgress | AuthPhase::Success => vec![],
        },

        AuthAction::SignInResponse(result) => {
            if state.phase != AuthPhase::InProgress {
                return vec![];
            }
            match result {
                Ok(()) => {
                    state.phase = AuthPhase::Success;
                    vec![Effect::Send(Action::Auth(AuthAction::Delegate(
                        AuthDelegate::Authenticated,
                    )))]
                }
                Err(e) => {
                    state.phase = AuthPhase::Failure;
                    state.error = Some(e.to_string());
                    vec![]
                }
            }
        }

        // Handled by the parent before it reaches here.
        AuthAction::Delegate(_) => vec![],
    }
}
