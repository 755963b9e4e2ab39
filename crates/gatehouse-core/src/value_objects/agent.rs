//! Coarse device descriptors derived from raw `User-Agent` strings

use woothee::parser::Parser;
use woothee::woothee::VALUE_UNKNOWN;

/// Descriptor used when the browser or operating system cannot be determined
pub const UNKNOWN_AGENT: &str = "unknown agent";

/// Build a `"<browser> on <OS>"` descriptor for a raw user agent.
///
/// Falls back to [`UNKNOWN_AGENT`] when either part is missing and for
/// crawlers, e.g. `curl/8.4.0` or `Googlebot/2.1`.
pub fn describe_agent(raw: &str) -> String {
    let Some(parsed) = Parser::new().parse(raw) else {
        return UNKNOWN_AGENT.to_string();
    };

    if parsed.category == "crawler" || parsed.name == VALUE_UNKNOWN || parsed.os == VALUE_UNKNOWN {
        return UNKNOWN_AGENT.to_string();
    }

    format!("{} on {}", parsed.name, parsed.os)
}
