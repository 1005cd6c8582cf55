//! Login and signup handshakes.

pub mod extractor;
pub mod negotiator;
pub mod signup;

pub use extractor::{PageStateExtractor, ScriptLiteralExtractor};
pub use negotiator::AuthChallenge;
