/// Replace `${VAR}` and `${VAR:-default}` placeholders with environment
/// values.
///
/// Unset variables without a default are left as-is so the parse error (if
/// any) points at the literal placeholder.
pub fn substitute_env(input: &str) -> String {
    substitute_with(input, |name| std::env::var(name).ok())
}

fn substitute_with(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut result = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            // Unterminated: emit the remainder verbatim.
            result.push_str(&rest[start..]);
            return result;
        };
        let body = &after[..end];
        let (name, default) = match body.split_once(":-") {
            Some((name, default)) => (name, Some(default)),
            None => (body, None),
        };
        match (name.is_empty(), lookup(name), default) {
            (false, Some(val), _) => result.push_str(&val),
            (false, None, Some(default)) => result.push_str(default),
            _ => {
                result.push_str("${");
                result.push_str(body);
                result.push('}');
            },
        }
        rest = &after[end + 1..];
    }

    result.push_str(rest);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake(name: &str) -> Option<String> {
        (name == "WS_SESSION_LEVEL").then(|| "debug".to_string())
    }

    #[test]
    fn substitutes_known_var() {
        assert_eq!(
            substitute_with("level=${WS_SESSION_LEVEL}", fake),
            "level=debug"
        );
    }

    #[test]
    fn reads_process_env() {
        // cargo sets this for every test binary it runs.
        assert_eq!(
            substitute_env("${CARGO_PKG_NAME}"),
            env!("CARGO_PKG_NAME")
        );
    }

    #[test]
    fn leaves_unknown_var() {
        assert_eq!(
            substitute_with("${WS_SESSION_NONEXISTENT}", fake),
            "${WS_SESSION_NONEXISTENT}"
        );
    }

    #[test]
    fn falls_back_to_default() {
        assert_eq!(substitute_with("${MISSING:-warn}", fake), "warn");
        assert_eq!(substitute_with("${WS_SESSION_LEVEL:-warn}", fake), "debug");
        assert_eq!(substitute_with("${MISSING:-}", fake), "");
    }

    #[test]
    fn malformed_placeholders() {
        assert_eq!(substitute_with("a ${ b", fake), "a ${ b");
        assert_eq!(substitute_with("${}", fake), "${}");
    }

    #[test]
    fn no_placeholders() {
        assert_eq!(substitute_with("plain $text {x}", fake), "plain $text {x}");
    }
}
