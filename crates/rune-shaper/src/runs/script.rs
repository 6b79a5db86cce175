use core::str::CharIndices;

use unicode_script::{Script, UnicodeScript};

use super::ScriptRun;

/// Script stream derived from the Unicode Script property.
///
/// Common, Inherited and Unknown codepoints carry no script of their own:
/// they join the run they appear in, and leading ones join the first real
/// script that follows. Text made only of such codepoints is a single
/// `Common` run.
#[derive(Debug, Clone)]
pub struct UnicodeScriptRuns<'a> {
    text: &'a str,
    chars: CharIndices<'a>,
    start: usize,
    current: Option<Script>,
    done: bool,
}

impl<'a> UnicodeScriptRuns<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            chars: text.char_indices(),
            start: 0,
            current: None,
            done: text.is_empty(),
        }
    }
}

fn is_neutral(script: Script) -> bool {
    matches!(script, Script::Common | Script::Inherited | Script::Unknown)
}

impl Iterator for UnicodeScriptRuns<'_> {
    type Item = ScriptRun;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        for (idx, ch) in self.chars.by_ref() {
            let script = ch.script();
            if is_neutral(script) {
                continue;
            }
            match self.current {
                None => self.current = Some(script),
                Some(current) if current == script => {}
                Some(current) => {
                    let run = ScriptRun::new(self.start..idx, current);
                    self.start = idx;
                    self.current = Some(script);
                    return Some(run);
                }
            }
        }
        self.done = true;
        Some(ScriptRun::new(
            self.start..self.text.len(),
            self.current.unwrap_or(Script::Common),
        ))
    }
}
