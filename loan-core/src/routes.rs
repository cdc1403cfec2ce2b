//! Navigation targets and the sign-in guard.

use crate::models::Role;
use crate::session::SessionContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Landing,
    Login,
    Register,
    BorrowerDashboard,
    ApplyLoan,
    EligibleLenders,
    MyApplications,
    LoanCalculator,
    LenderDashboard,
    CreateRule,
    MyRules,
    IncomingApplications,
}

impl Route {
    pub const ALL: [Route; 12] = [
        Route::Landing,
        Route::Login,
        Route::Register,
        Route::BorrowerDashboard,
        Route::ApplyLoan,
        Route::EligibleLenders,
        Route::MyApplications,
        Route::LoanCalculator,
        Route::LenderDashboard,
        Route::CreateRule,
        Route::MyRules,
        Route::IncomingApplications,
    ];

    /// Resolves a path. Query strings, fragments and surrounding slashes are
    /// ignored; unknown paths resolve to [`Route::Landing`].
    ///
    /// ```
    /// use loan_core::Route;
    ///
    /// assert_eq!(Route::parse("/borrower/my-applications/"), Route::MyApplications);
    /// assert_eq!(Route::parse("/nowhere"), Route::Landing);
    /// ```
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        match path.trim_matches('/') {
            "login" => Self::Login,
            "register" => Self::Register,
            "borrower" => Self::BorrowerDashboard,
            "borrower/apply-loan" => Self::ApplyLoan,
            "borrower/eligible-lenders" => Self::EligibleLenders,
            "borrower/my-applications" => Self::MyApplications,
            "borrower/loan-calculator" => Self::LoanCalculator,
            "lender" => Self::LenderDashboard,
            "lender/create-rule" => Self::CreateRule,
            "lender/my-rules" => Self::MyRules,
            "lender/incoming-applications" => Self::IncomingApplications,
            _ => Self::Landing,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Self::Landing => "/",
            Self::Login => "/login",
            Self::Register => "/register",
            Self::BorrowerDashboard => "/borrower",
            Self::ApplyLoan => "/borrower/apply-loan",
            Self::EligibleLenders => "/borrower/eligible-lenders",
            Self::MyApplications => "/borrower/my-applications",
            Self::LoanCalculator => "/borrower/loan-calculator",
            Self::LenderDashboard => "/lender",
            Self::CreateRule => "/lender/create-rule",
            Self::MyRules => "/lender/my-rules",
            Self::IncomingApplications => "/lender/incoming-applications",
        }
    }

    /// Dashboard and its sub-pages need a signed-in user.
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Self::Landing | Self::Login | Self::Register)
    }

    /// Where a user lands after signing in.
    pub fn dashboard_for(role: Role) -> Self {
        match role {
            Role::Borrower => Self::BorrowerDashboard,
            Role::Lender => Self::LenderDashboard,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Allow(Route),
    Redirect(Route),
}

impl RouteDecision {
    /// The route that ends up shown.
    pub fn target(&self) -> Route {
        match self {
            Self::Allow(route) | Self::Redirect(route) => *route,
        }
    }
}

/// Lets a signed-in user through and sends anyone else to the login page.
pub fn guard(
    route: Route,
    session: &SessionContext,
) -> RouteDecision {
    if route.requires_auth() && !session.is_logged_in() {
        RouteDecision::Redirect(Route::Login)
    } else {
        RouteDecision::Allow(route)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn every_route_round_trips_through_its_path() {
        for route in Route::ALL {
            assert_eq!(Route::parse(route.path()), route, "{}", route.path());
        }
    }

    #[test]
    fn unknown_and_empty_paths_go_to_landing() {
        assert_eq!(Route::parse(""), Route::Landing);
        assert_eq!(Route::parse("/admin"), Route::Landing);
        assert_eq!(Route::parse("/borrower/apply-loan/extra"), Route::Landing);
    }

    #[test]
    fn query_and_fragment_are_ignored() {
        assert_eq!(Route::parse("/login?next=/lender"), Route::Login);
        assert_eq!(Route::parse("lender/my-rules#top"), Route::MyRules);
    }

    #[test]
    fn public_routes() {
        assert!(!Route::Landing.requires_auth());
        assert!(!Route::Login.requires_auth());
        assert!(!Route::Register.requires_auth());
        assert!(Route::LoanCalculator.requires_auth());
        assert!(Route::IncomingApplications.requires_auth());
    }

    #[test]
    fn anonymous_user_is_redirected_to_login() {
        let session = SessionContext::in_memory();

        assert_eq!(
            guard(Route::MyApplications, &session),
            RouteDecision::Redirect(Route::Login)
        );
        assert_eq!(guard(Route::Register, &session), RouteDecision::Allow(Route::Register));
    }

    #[test]
    fn signed_in_user_is_allowed() {
        let session = SessionContext::in_memory();
        session.set_token("t").unwrap();

        assert_eq!(
            guard(Route::CreateRule, &session),
            RouteDecision::Allow(Route::CreateRule)
        );
    }

    #[test]
    fn role_picks_dashboard() {
        assert_eq!(Route::dashboard_for(Role::Borrower).path(), "/borrower");
        assert_eq!(Route::dashboard_for(Role::Lender).path(), "/lender");
    }
}
