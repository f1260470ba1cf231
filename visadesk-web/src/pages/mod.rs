mod error;
mod forgot_password;
mod login;
mod register;
mod section;

pub use error::ErrorPage;
pub use forgot_password::ForgotPasswordPage;
pub use login::LoginPage;
pub use register::RegisterPage;
pub use section::SectionPage;
