pub mod extractor;
pub mod oracle;
pub mod prompt;
pub mod record;
pub mod retry;
pub mod san;
pub mod session;
pub mod utils;
