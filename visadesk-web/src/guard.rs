//! Pre-transition navigation guard.
//!
//! The guard only reads already-resident session fields; it never performs I/O
//! and never fails. Checks run in a fixed order and the first redirect wins.

use crate::routes::{Route, RouteAccessPolicy, landing_route};
use crate::session::Session;
use shared::models::Role;

/// Read-only view of the session the guard needs.
pub trait SessionView {
    fn is_authenticated(&self) -> bool;
    fn role(&self) -> Option<Role>;
}

impl SessionView for Session {
    fn is_authenticated(&self) -> bool {
        Session::is_authenticated(self)
    }

    fn role(&self) -> Option<Role> {
        Session::role(self)
    }
}

/// A pending route change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Option<Route>,
    pub to: Route,
}

impl Transition {
    pub fn to(route: Route) -> Self {
        Self {
            from: None,
            to: route,
        }
    }
}

/// Outcome of a guard evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Proceed,
    Redirect(Route),
}

/// Evaluate `transition` against the target route's declared policy.
pub fn evaluate<S: SessionView + ?Sized>(session: &S, transition: &Transition) -> GuardDecision {
    let decision = decide(session, transition.to, transition.to.access_policy());
    log::debug!(
        "guard {:?} -> {:?}: {:?}",
        transition.from,
        transition.to,
        decision
    );
    decision
}

/// Core decision for `target` under an explicit `policy`.
pub fn decide<S: SessionView + ?Sized>(
    session: &S,
    target: Route,
    policy: RouteAccessPolicy,
) -> GuardDecision {
    let authenticated = session.is_authenticated();

    if policy.requires_auth && !authenticated && target != Route::Login {
        return GuardDecision::Redirect(Route::Login);
    }

    if target.is_entry() && authenticated {
        if let Some(decision) = redirect_unless_target(landing_route(session.role()), target) {
            return decision;
        }
    }

    if policy.declares_roles() && !policy.permits(session.role()) {
        if let Some(decision) = redirect_unless_target(landing_route(session.role()), target) {
            return decision;
        }
    }

    GuardDecision::Proceed
}

fn redirect_unless_target(landing: Route, target: Route) -> Option<GuardDecision> {
    (landing != target).then_some(GuardDecision::Redirect(landing))
}
