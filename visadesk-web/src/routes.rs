//! Route table and per-route access policies.
//!
//! Every route belongs to a [`Section`]; the section decides the
//! [`RouteAccessPolicy`] the navigation guard checks before a transition
//! commits.

use crate::{
    containers::layout::Layout,
    guard::{self, GuardDecision, Transition},
    models::app_state::AppState,
    pages::{ErrorPage, ForgotPasswordPage, LoginPage, RegisterPage, SectionPage},
};
use shared::models::Role;
use strum::{EnumIter, IntoEnumIterator};
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::use_selector;

/// The application routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Routable, EnumIter)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/about")]
    About,
    #[at("/contact")]
    Contact,
    #[at("/auth/login")]
    Login,
    #[at("/auth/register")]
    Register,
    #[at("/auth/forgotpassword")]
    ForgotPassword,

    #[at("/custom/dashboard")]
    CustomDashboard,
    #[at("/custom/appointment")]
    CustomAppointment,
    #[at("/custom/chat")]
    CustomChat,
    #[at("/custom/documents")]
    CustomDocuments,
    #[at("/custom/notification")]
    CustomNotification,
    #[at("/custom/payment")]
    CustomPayment,
    #[at("/custom/profile")]
    CustomProfile,
    #[at("/custom/requestvisa")]
    CustomRequestVisa,

    #[at("/admin/dashboard")]
    AdminDashboard,
    #[at("/admin/users")]
    AdminUsers,
    #[at("/admin/documents")]
    AdminDocuments,
    #[at("/admin/payment")]
    AdminPayment,
    #[at("/admin/country")]
    AdminCountry,
    #[at("/admin/visa")]
    AdminVisa,
    #[at("/admin/visarequest")]
    AdminVisaRequest,
    #[at("/admin/visatype")]
    AdminVisaType,
    #[at("/admin/notification")]
    AdminNotification,
    #[at("/admin/faq")]
    AdminFaq,
    #[at("/admin/appointment")]
    AdminAppointment,
    #[at("/admin/profile")]
    AdminProfile,

    #[at("/agent/document")]
    AgentDocument,
    #[at("/agent/visarequest")]
    AgentVisaRequest,
    #[at("/agent/appointment")]
    AgentAppointment,
    #[at("/agent/notification")]
    AgentNotification,
    #[at("/agent/chat")]
    AgentChat,

    #[not_found]
    #[at("/404")]
    NotFound,
}

/// Subtree a route is declared under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    /// Reachable by anyone.
    Public,
    /// Login and registration; authenticated users are sent to their landing route.
    Entry,
    /// Dashboard pages owned by one role.
    Dashboard(Role),
}

/// Access requirements attached to a route at definition time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteAccessPolicy {
    pub requires_auth: bool,
    /// Empty means any authenticated role.
    pub allowed_roles: &'static [Role],
}

impl RouteAccessPolicy {
    pub const PUBLIC: Self = Self {
        requires_auth: false,
        allowed_roles: &[],
    };

    pub const AUTHENTICATED: Self = Self {
        requires_auth: true,
        allowed_roles: &[],
    };

    pub const fn restricted_to(allowed_roles: &'static [Role]) -> Self {
        Self {
            requires_auth: true,
            allowed_roles,
        }
    }

    /// Whether the policy names roles at all.
    pub fn declares_roles(&self) -> bool {
        !self.allowed_roles.is_empty()
    }

    /// Whether `role` passes the role restriction. A missing role never does
    /// when roles are declared.
    pub fn permits(&self, role: Option<Role>) -> bool {
        if !self.declares_roles() {
            return true;
        }
        role.is_some_and(|role| self.allowed_roles.contains(&role))
    }
}

const fn only(role: Role) -> &'static [Role] {
    match role {
        Role::Admin => &[Role::Admin],
        Role::Agent => &[Role::Agent],
        Role::Custom => &[Role::Custom],
    }
}

impl Route {
    pub fn section(self) -> Section {
        match self {
            Self::Home
            | Self::About
            | Self::Contact
            | Self::ForgotPassword
            | Self::NotFound => Section::Public,
            Self::Login | Self::Register => Section::Entry,
            Self::CustomDashboard
            | Self::CustomAppointment
            | Self::CustomChat
            | Self::CustomDocuments
            | Self::CustomNotification
            | Self::CustomPayment
            | Self::CustomProfile
            | Self::CustomRequestVisa => Section::Dashboard(Role::Custom),
            Self::AdminDashboard
            | Self::AdminUsers
            | Self::AdminDocuments
            | Self::AdminPayment
            | Self::AdminCountry
            | Self::AdminVisa
            | Self::AdminVisaRequest
            | Self::AdminVisaType
            | Self::AdminNotification
            | Self::AdminFaq
            | Self::AdminAppointment
            | Self::AdminProfile => Section::Dashboard(Role::Admin),
            Self::AgentDocument
            | Self::AgentVisaRequest
            | Self::AgentAppointment
            | Self::AgentNotification
            | Self::AgentChat => Section::Dashboard(Role::Agent),
        }
    }

    pub fn access_policy(self) -> RouteAccessPolicy {
        match self.section() {
            Section::Public | Section::Entry => RouteAccessPolicy::PUBLIC,
            Section::Dashboard(role) => RouteAccessPolicy::restricted_to(only(role)),
        }
    }

    /// Login and registration pages.
    pub fn is_entry(self) -> bool {
        self.section() == Section::Entry
    }

    /// Routes shown in the navigation bar for `role`.
    pub fn menu_for(role: Role) -> Vec<Route> {
        Route::iter()
            .filter(|route| route.section() == Section::Dashboard(role))
            .collect()
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::About => "About",
            Self::Contact => "Contact",
            Self::Login => "Sign in",
            Self::Register => "Create an account",
            Self::ForgotPassword => "Forgot password",
            Self::CustomDashboard | Self::AdminDashboard => "Dashboard",
            Self::CustomAppointment | Self::AdminAppointment | Self::AgentAppointment => {
                "Appointments"
            }
            Self::CustomChat | Self::AgentChat => "Messages",
            Self::CustomDocuments | Self::AdminDocuments | Self::AgentDocument => "Documents",
            Self::CustomNotification | Self::AdminNotification | Self::AgentNotification => {
                "Notifications"
            }
            Self::CustomPayment | Self::AdminPayment => "Payments",
            Self::CustomProfile | Self::AdminProfile => "Profile",
            Self::CustomRequestVisa => "Request a visa",
            Self::AdminUsers => "Users",
            Self::AdminCountry => "Countries",
            Self::AdminVisa => "Visas",
            Self::AdminVisaRequest | Self::AgentVisaRequest => "Visa requests",
            Self::AdminVisaType => "Visa types",
            Self::AdminFaq => "FAQ",
            Self::NotFound => "Page not found",
        }
    }
}

/// Default destination after authentication.
pub fn landing_route(role: Option<Role>) -> Route {
    match role {
        Some(Role::Admin) => Route::AdminDashboard,
        Some(Role::Agent) => Route::AgentVisaRequest,
        Some(Role::Custom) => Route::CustomDashboard,
        None => Route::Login,
    }
}

#[derive(Properties, PartialEq)]
pub struct GuardedRouteProps {
    pub route: Route,
}

/// Runs the navigation guard before rendering the matched page.
#[function_component(GuardedRoute)]
fn guarded_route(props: &GuardedRouteProps) -> Html {
    let session = use_selector(|state: &AppState| state.session.clone());
    let previous = use_mut_ref(|| None::<Route>);
    let transition = Transition {
        from: *previous.borrow(),
        to: props.route,
    };

    match guard::evaluate(&*session, &transition) {
        GuardDecision::Redirect(to) => html! { <Redirect<Route> {to} /> },
        GuardDecision::Proceed => {
            *previous.borrow_mut() = Some(props.route);
            render_page(props.route)
        }
    }
}

fn render_page(route: Route) -> Html {
    match route {
        Route::Login => html! { <LoginPage /> },
        Route::Register => html! { <RegisterPage /> },
        Route::ForgotPassword => html! { <ForgotPasswordPage /> },
        Route::NotFound => html! {
            <Layout current_route={Some(route)}>
                <ErrorPage />
            </Layout>
        },
        _ => html! {
            <Layout current_route={Some(route)}>
                <SectionPage {route} />
            </Layout>
        },
    }
}

/// Switch function for the application routes.
pub fn switch(route: Route) -> Html {
    log::debug!("switching to route {route:?}");
    html! { <GuardedRoute {route} /> }
}
