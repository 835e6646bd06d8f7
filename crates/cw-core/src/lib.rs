//! cw-core: ChatWork bridge core library
//!
//! Token resolution, time bound parsing, message normalization, the read
//! pipeline and the outbound body composer. Network access goes through the
//! [`RemoteAccess`] trait.

pub mod compose;
pub mod config;
pub mod credential;
pub mod error;
pub mod normalize;
pub mod port;
pub mod read;
pub mod time;
pub mod types;

pub use compose::{WriteOptions, compose_body};
pub use config::{ApiConfig, Config};
pub use credential::{CredentialSources, load_env_file};
pub use error::{Error, Result};
pub use normalize::{STRIP_RULES, StripRule, normalize, strip_tags};
pub use port::RemoteAccess;
pub use read::{DEFAULT_LIMIT, MAX_LIMIT, ReadOptions, read_messages, select_messages};
pub use time::parse_time_bound;
pub use types::{Account, CanonicalMessage, PostedMessage, RawAccount, RawMessage, Room};
