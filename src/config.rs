pub use self::parser::{
    Config, LedgerConfig, LoggingConfig, MatchPolicy, RosterConfig, ServerConfig, SheetConfig,
    TimetableSourceConfig,
};
pub use self::validator::ConfigError;

mod parser;
mod validator;
