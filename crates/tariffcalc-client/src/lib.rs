pub mod client;
pub mod error;
pub mod loader;
pub mod session;
pub mod types;

pub use client::TariffClient;
pub use error::{ClientError, SessionError};
pub use loader::load_availability;
pub use session::TariffSession;
pub use types::TariffQuote;
