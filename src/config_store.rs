//! Reads/writes the linter's YAML-like config, specifically the
//! `Checks:` line, and maintains the ignore set.

use indexmap::IndexSet;

const CHECKS_PREFIX: &str = "Checks:";

/// Insertion-ordered set of check identifiers to suppress on future runs.
pub type IgnoreSet = IndexSet<String>;

/// The linter config's raw lines plus the derived ignore set.
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    lines: Vec<String>,
    checks_line: Option<usize>,
    ignore_set: IgnoreSet,
}

impl ConfigStore {
    /// Parse `text` line by line. The line starting with `Checks:` has its
    /// single-quoted payload (between the first and last `'`) split on
    /// `,`; each token beginning with `-` (after trimming leading ASCII
    /// whitespace) is inserted into the ignore set, minus its leading
    /// `-`. All lines, including `Checks:`, are retained verbatim until
    /// `save` rewrites that one line.
    pub fn load(text: &str) -> Self {
        let mut lines = Vec::new();
        let mut checks_line = None;
        let mut ignore_set = IgnoreSet::new();

        for (i, line) in text.lines().enumerate() {
            if line.starts_with(CHECKS_PREFIX) {
                checks_line = Some(i);
                if let (Some(first), Some(last)) = (line.find('\''), line.rfind('\'')) {
                    if first < last {
                        let payload = &line[first + 1..last];
                        for token in payload.split(',') {
                            let token = token.trim_start_matches(|c: char| c.is_ascii_whitespace());
                            if let Some(name) = token.strip_prefix('-') {
                                ignore_set.insert(name.to_string());
                            }
                        }
                    }
                }
            }
            lines.push(line.to_string());
        }

        Self {
            lines,
            checks_line,
            ignore_set,
        }
    }

    /// The current ignore set, in insertion order.
    pub fn ignore_set(&self) -> &IgnoreSet {
        &self.ignore_set
    }

    /// Insert `check` into the ignore set.
    pub fn ignore(&mut self, check: impl Into<String>) {
        self.ignore_set.insert(check.into());
    }

    /// Render the config, with the `Checks:` line rewritten from the
    /// current ignore set (`Checks: '*'` when empty, otherwise
    /// `Checks: '*, -<c1>, -<c2>, …'` in insertion order) and every other
    /// line emitted unchanged, in order.
    pub fn render(&self) -> String {
        let checks_line = if self.ignore_set.is_empty() {
            "Checks: '*'".to_string()
        } else {
            let mut payload = String::from("*");
            for name in &self.ignore_set {
                payload.push_str(", -");
                payload.push_str(name);
            }
            format!("Checks: '{payload}'")
        };

        let mut out: Vec<String> = self.lines.clone();
        match self.checks_line {
            Some(i) => out[i] = checks_line,
            None => out.push(checks_line),
        }
        let mut rendered = out.join("\n");
        rendered.push('\n');
        rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignore_config_round_trip_preserves_insertion_order() {
        let original = "Checks: '*, -readability-foo, -modernize-bar'\n";
        let store = ConfigStore::load(original);
        assert_eq!(
            store.ignore_set().iter().collect::<Vec<_>>(),
            vec!["readability-foo", "modernize-bar"]
        );
        assert_eq!(store.render(), original);
    }

    #[test]
    fn empty_ignore_set_normalizes_to_star() {
        let store = ConfigStore::load("Checks: '*'\nHeaderFilterRegex: '.*'\n");
        assert_eq!(store.render(), "Checks: '*'\nHeaderFilterRegex: '.*'\n");
    }

    #[test]
    fn rendering_a_loaded_config_reproduces_it_byte_for_byte() {
        let original = "HeaderFilterRegex: '.*'\nChecks: '*, -bugprone-foo'\nWarningsAsErrors: ''\n";
        let store = ConfigStore::load(original);
        assert_eq!(store.render(), original);
    }

    #[test]
    fn ignoring_a_new_check_is_appended() {
        let mut store = ConfigStore::load("Checks: '*, -foo'\n");
        store.ignore("bar");
        assert_eq!(store.render(), "Checks: '*, -foo, -bar'\n");
    }

    #[test]
    fn missing_checks_line_is_appended_on_save() {
        let store = ConfigStore::load("HeaderFilterRegex: '.*'\n");
        assert_eq!(store.render(), "HeaderFilterRegex: '.*'\nChecks: '*'\n");
    }

    lazy_static::lazy_static! {
        static ref ROUND_TRIP_FIXTURES: std::collections::HashMap<&'static str, Vec<&'static str>> = maplit::hashmap! {
            "Checks: '*'\n" => vec![],
            "Checks: '*, -foo'\n" => vec!["foo"],
            "Checks: '*, -foo, -bar, -baz'\n" => vec!["foo", "bar", "baz"],
        };
    }

    #[test]
    fn round_trip_fixture_table() {
        for (input, names) in ROUND_TRIP_FIXTURES.iter() {
            let store = ConfigStore::load(input);
            assert_eq!(store.ignore_set().iter().collect::<Vec<_>>(), *names);
            assert_eq!(&store.render(), input);
        }
    }
}
