use crate::config::ALLOWED_QUALIFIER_PREFIXES;

/// Second `/`-separated token of a `Q)` line, e.g. `QRTCA` in
/// `Q) LJLA/QRTCA/IV/BO/W/000/095/4613N01433E005`.
pub fn qualifier_code(q_line: &str) -> Option<&str> {
    q_line.split('/').nth(1).map(str::trim)
}

pub fn is_allowed(q_line: &str) -> bool {
    qualifier_code(q_line).is_some_and(|code| {
        ALLOWED_QUALIFIER_PREFIXES
            .iter()
            .any(|prefix| code.starts_with(prefix))
    })
}
