pub(crate) fn is_http_token(value: &str) -> bool {
    !value.is_empty()
        && value.bytes().all(|byte| {
            matches!(
                byte,
                b'0'..=b'9'
                    | b'A'..=b'Z'
                    | b'a'..=b'z'
                    | b'!'
                    | b'#'
                    | b'$'
                    | b'%'
                    | b'&'
                    | b'\''
                    | b'*'
                    | b'+'
                    | b'-'
                    | b'.'
                    | b'^'
                    | b'_'
                    | b'`'
                    | b'|'
                    | b'~'
            )
        })
}

/// Sorts, deduplicates, and comma-joins a list of already-normalized elements.
pub(crate) fn join_sorted(mut values: Vec<String>) -> String {
    values.sort_unstable();
    values.dedup();
    values.join(",")
}

#[cfg(test)]
#[path = "util_test.rs"]
mod util_test;
