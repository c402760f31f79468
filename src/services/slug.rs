/// URL slug for workspace urls and issue paths.
///
/// Lower-cases, turns spaces into dashes, drops anything outside `[a-z0-9-]`,
/// collapses dash runs and strips a single leading dash.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    for c in input.to_lowercase().chars() {
        let c = if c == ' ' { '-' } else { c };
        if !(c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-') {
            continue;
        }
        if c == '-' && slug.ends_with('-') {
            continue;
        }
        slug.push(c);
    }
    match slug.strip_prefix('-') {
        Some(rest) => rest.to_string(),
        None => slug,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugifies_titles() {
        assert_eq!(slugify("Fix Login Bug"), "fix-login-bug");
        assert_eq!(slugify("Acme, Inc."), "acme-inc");
        assert_eq!(slugify("a  -  b"), "a-b");
        assert_eq!(slugify(" leading"), "leading");
        assert_eq!(slugify("trailing "), "trailing-");
        assert_eq!(slugify("Ünïcode"), "ncode");
        assert_eq!(slugify("!!!"), "");
    }
}
