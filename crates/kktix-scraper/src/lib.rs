pub mod collector;
pub mod dom;
pub mod enrich;
pub mod error;
pub mod extract;
pub mod output;
pub mod pagination;
pub mod session;
pub mod types;
pub mod webdriver;

pub use collector::{CollectOptions, Collection, Collector, StopReason};
pub use error::{ScraperError, SessionError};
pub use output::{orders_filename, read_orders, run_dir_name, to_json, write_orders};
pub use session::Session;
pub use types::{ActionButton, DetailValue, Details, OrderRecord};
pub use webdriver::{BrowserOptions, WebDriverSession};
