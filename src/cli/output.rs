//! Output and reporting for starwars

use crate::catalog::MovieRecord;
use crate::invocation::ModuleResponse;
use colored::Colorize;
use std::fmt::Write as _;

/// Host name shown in human output; the module always runs locally
const HOST: &str = "localhost";

/// Render a module response for a terminal
pub fn render_response(response: &ModuleResponse) -> String {
    if response.failed() {
        return failed(HOST, response.msg().unwrap_or("Module failed"));
    }

    let title = response
        .get("title")
        .and_then(|v| v.as_str())
        .unwrap_or_default();
    if title.is_empty() {
        // Check mode: nothing was looked up
        return format!("{} (check mode)", ok(HOST));
    }

    let trilogy = response
        .get("trilogy")
        .and_then(|v| v.as_str())
        .unwrap_or_default();
    let sequence = response
        .get("trilogy_sequence")
        .and_then(|v| v.as_i64())
        .unwrap_or_default();

    format!(
        "{} => {} ({} #{})",
        ok(HOST),
        title.bright_white().bold(),
        trilogy,
        sequence
    )
}

/// Render the catalog in a scheme's order
pub fn render_list<'a>(
    scheme: &str,
    movies: impl IntoIterator<Item = (usize, &'a MovieRecord)>,
) -> String {
    let header = format!("MOVIES [{}]", scheme);
    let stars = "*".repeat(80_usize.saturating_sub(header.len()));
    let mut out = format!("{} {}\n", header.bright_white().bold(), stars.bright_black());

    for (position, movie) in movies {
        let _ = writeln!(
            out,
            "{:>2}. {:<40} {:<8} #{}",
            position, movie.title, movie.trilogy, movie.sequence
        );
    }
    out
}

/// An ok result prefix
pub fn ok(host: &str) -> String {
    format!("{}: [{}]", "ok".green(), host.bright_white().bold())
}

/// A failed result line
pub fn failed(host: &str, msg: &str) -> String {
    format!(
        "{}: [{}] => {}",
        "failed".red().bold(),
        host.bright_white().bold(),
        msg
    )
}
