// Adapters layer: concrete clients for the remote services behind the domain ports.

pub mod credentials;
pub mod mailtrap;
pub mod recaptcha;

pub use mailtrap::MailtrapClient;
pub use recaptcha::RecaptchaClient;
