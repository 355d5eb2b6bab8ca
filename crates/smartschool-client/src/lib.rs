//! # smartschool-client
//!
//! Authenticated session against a Smartschool portal and typed accessors for
//! its resources.
//!
//! The portal speaks three dialects, all handled behind [`Smartschool`]:
//! - JSON REST endpoints (results, courses, planner, reports)
//! - the XML dispatcher (agenda, message boxes)
//! - HTML pages (login forms, course document folders)
//!
//! Signing in happens lazily: any request that lands on the login page walks
//! the sign-in steps once (password, optional birthday verification, optional
//! two-factor code) and is then replayed.
//!
//! # Usage
//!
//! ```no_run
//! use smartschool_client::Smartschool;
//! use smartschool_config::SmartschoolConfig;
//!
//! # async fn run() -> Result<(), smartschool_client::ClientError> {
//! let config = SmartschoolConfig::load_with_dotenv()?;
//! let session = Smartschool::connect(&config).await?;
//! for course in session.courses().await? {
//!     println!("{}", course.name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod agenda;
pub mod auth;
pub mod courses;
pub mod documents;
pub mod messages;
pub mod periods;
pub mod planner;
pub mod reports;
pub mod results;
pub mod student_support;
pub mod tasks;
pub mod user;

mod cookies;
mod error;
mod html;
mod http;
mod session;
mod trace;
mod xml;

pub use auth::MfaProvider;
pub use error::ClientError;
pub use messages::MessageQuery;
pub use session::Smartschool;

pub use smartschool_config::{Credentials, SessionConfig, SmartschoolConfig};
pub use smartschool_core::{entities, enums};
