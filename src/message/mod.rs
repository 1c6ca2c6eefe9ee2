mod nom_parser;
pub mod tags;
mod types;

pub use self::nom_parser::{ParsedPrivmsg, PLATFORM_HOST_SUFFIX};
pub use self::tags::Badge;
pub use self::types::Message;
