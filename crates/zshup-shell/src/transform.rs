//! Pure line-sequence transforms applied to `.zshrc`.
//!
//! Each function takes the current lines and returns the new lines; nothing
//! here touches the filesystem. [`crate::ZshrcConfig::plan`] chains them in
//! order: directive, completion init, stale source removal, guarded sources.

use std::path::Path;

pub const PLUGINS_DIRECTIVE_PREFIX: &str = "plugins=(";
pub const COMPLETION_INIT_MARKER: &str = "compinit";
pub const COMPLETION_INIT_COMMENT: &str = "# Initialize zsh completion system";
pub const COMPLETION_INIT_LINE: &str = "autoload -Uz compinit && compinit";

#[must_use]
pub fn split_lines(content: &str) -> Vec<String> {
    content.lines().map(str::to_string).collect()
}

/// Joins lines with a trailing newline; no lines gives an empty file.
#[must_use]
pub fn join_lines(lines: &[String]) -> String {
    if lines.is_empty() {
        return String::new();
    }
    let mut content = lines.join("\n");
    content.push('\n');
    content
}

#[must_use]
pub fn plugins_directive<S: AsRef<str>>(enabled: &[S]) -> String {
    let names: Vec<&str> = enabled.iter().map(AsRef::as_ref).collect();
    format!("{PLUGINS_DIRECTIVE_PREFIX}{})", names.join(" "))
}

#[must_use]
pub fn is_plugins_directive(line: &str) -> bool {
    line.trim_start().starts_with(PLUGINS_DIRECTIVE_PREFIX)
}

/// Index of the line that closes the array opened at `start`. A directive
/// whose `)` never appears is treated as a single line.
fn directive_end(lines: &[String], start: usize) -> usize {
    let opening = lines[start].trim_start();
    if opening[PLUGINS_DIRECTIVE_PREFIX.len()..].contains(')') {
        return start;
    }
    lines[start + 1..]
        .iter()
        .position(|line| line.contains(')'))
        .map_or(start, |offset| start + 1 + offset)
}

/// Replaces the first directive in place and drops any later ones, so a
/// stale assignment cannot override it. A multi-line `plugins=(` array is
/// replaced through its closing `)`. Without a directive, the directive and
/// a blank line are prepended.
#[must_use]
pub fn upsert_plugins_directive(lines: &[String], directive: &str) -> Vec<String> {
    let mut result = Vec::with_capacity(lines.len() + 2);
    let mut replaced = false;
    let mut index = 0;

    while index < lines.len() {
        if is_plugins_directive(&lines[index]) {
            if !replaced {
                result.push(directive.to_string());
                replaced = true;
            }
            index = directive_end(lines, index) + 1;
            continue;
        }
        result.push(lines[index].clone());
        index += 1;
    }

    if !replaced {
        result.insert(0, String::new());
        result.insert(0, directive.to_string());
    }
    result
}

#[must_use]
pub fn ensure_completion_init(lines: &[String]) -> Vec<String> {
    let mut result = lines.to_vec();
    if result
        .iter()
        .any(|line| line.contains(COMPLETION_INIT_MARKER))
    {
        return result;
    }

    result.push(String::new());
    result.push(COMPLETION_INIT_COMMENT.to_string());
    result.push(COMPLETION_INIT_LINE.to_string());
    result
}

#[must_use]
pub fn remove_lines_containing<S: AsRef<str>>(lines: &[String], needles: &[S]) -> Vec<String> {
    lines
        .iter()
        .filter(|line| !needles.iter().any(|needle| line.contains(needle.as_ref())))
        .cloned()
        .collect()
}

/// `[ -f "<script>" ] && source "<script>"`
#[must_use]
pub fn guarded_source_line(script: &Path) -> String {
    let script = script.display();
    format!("[ -f \"{script}\" ] && source \"{script}\"")
}

/// Drops trailing blank lines, then appends one blank separator and a guarded
/// source line per script, in the given order.
#[must_use]
pub fn append_guarded_sources<P: AsRef<Path>>(lines: &[String], scripts: &[P]) -> Vec<String> {
    let mut result = lines.to_vec();
    while result.last().is_some_and(|line| line.trim().is_empty()) {
        result.pop();
    }
    if scripts.is_empty() {
        return result;
    }

    result.push(String::new());
    result.extend(
        scripts
            .iter()
            .map(|script| guarded_source_line(script.as_ref())),
    );
    result
}
