mod search_cmd;

pub use search_cmd::CodecArgs;
pub use search_cmd::DetectArgs;
pub use search_cmd::ParseArgs;
pub use search_cmd::SearchCli;
pub use search_cmd::SearchSubcommand;
pub use search_cmd::StringifyArgs;
