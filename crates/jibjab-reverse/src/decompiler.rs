//! Line-oriented reconstruction of canonical JibJab from target source.
//!
//! Each prepared line is tried against the profile's recognizers in a fixed
//! order. Nesting depth is tracked per line; canonical output indents two
//! spaces per level and every opened block is closed by the end.

use crate::canonical;
use crate::prepare::prepare;
use crate::rewriter::Rewriter;
use jibjab_languages::{BlockStyle, LanguageProfile, Recognizers, TargetId, profile};
use regex::{Captures, Regex};
use serde::Serialize;
use tracing::debug;

/// Outcome of a decompilation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum Decompiled {
    /// Canonical text ending in exactly one newline.
    Canonical(String),
    /// Nothing recognizable; callers keep their previous canonical text.
    Nothing,
}

impl Decompiled {
    pub fn text(&self) -> Option<&str> {
        match self {
            Decompiled::Canonical(text) => Some(text),
            Decompiled::Nothing => None,
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            Decompiled::Canonical(text) => Some(text),
            Decompiled::Nothing => None,
        }
    }
}

/// Reads one target language back into canonical form.
pub struct Decompiler {
    profile: &'static LanguageProfile,
    recognizers: &'static Recognizers,
    rewriter: Rewriter,
}

#[derive(Default)]
struct DecompileState {
    depth: usize,
    lines: Vec<String>,
    /// Depths at which a main wrapper was opened.
    wrappers: Vec<usize>,
    /// Canonical return held back until we know whether the wrapper closes next.
    pending_exit: Option<String>,
    /// Blank lines not yet written, so that closers land before them.
    blanks: usize,
}

impl DecompileState {
    fn write(&mut self, text: &str) {
        self.lines
            .push(format!("{}{text}", canonical::INDENT.repeat(self.depth)));
    }

    fn push(&mut self, text: &str) {
        for _ in 0..std::mem::take(&mut self.blanks) {
            self.lines.push(String::new());
        }
        self.write(text);
    }

    fn open(&mut self, text: &str) {
        self.push(text);
        self.depth += 1;
    }

    fn close(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.write(canonical::END);
    }

    /// Leave a block whose end is implied by the next clause.
    fn close_silently(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn in_wrapper_body(&self) -> bool {
        self.wrappers.last() == Some(&self.depth)
    }

    fn finish(mut self) -> Decompiled {
        if let Some(exit) = self.pending_exit.take()
            && !self.in_wrapper_body()
        {
            self.push(&exit);
        }
        while self.depth > 0 {
            self.close();
        }
        let text = self.lines.join("\n");
        let text = text.trim();
        if text.is_empty() {
            Decompiled::Nothing
        } else {
            Decompiled::Canonical(format!("{text}\n"))
        }
    }
}

impl Decompiler {
    /// The decompiler for `target`, if the language can be read back.
    pub fn for_target(target: TargetId) -> Option<Self> {
        let profile = profile(target);
        let recognizers = profile.recognizers.as_ref()?;
        Some(Self {
            profile,
            recognizers,
            rewriter: Rewriter::new(profile),
        })
    }

    pub fn target(&self) -> TargetId {
        self.profile.target
    }

    /// Reconstruct canonical text from `source`.
    pub fn decompile(&self, source: &str) -> Decompiled {
        let mut state = DecompileState::default();
        for line in prepare(self.profile, source) {
            self.step(&mut state, &line);
        }
        state.finish()
    }

    fn step(&self, state: &mut DecompileState, line: &str) {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            state.blanks += 1;
            return;
        }

        if let Some(exit) = state.pending_exit.take() {
            if self.closes_wrapper(state, trimmed) {
                state.wrappers.pop();
                return;
            }
            state.push(&exit);
        }

        if self.profile.block_style == BlockStyle::Indentation {
            self.dedent(state, line, trimmed);
        }

        if let Some(wrapper) = &self.profile.main_wrapper {
            if wrapper.openers.iter().any(|re| re.is_match(trimmed)) {
                state.wrappers.push(state.depth);
                return;
            }
            if let Some(exit) = &wrapper.exit
                && state.in_wrapper_body()
                && exit.is_match(trimmed)
            {
                state.pending_exit = Some(self.exit_line(trimmed));
                return;
            }
        }
        if self.closes_wrapper(state, trimmed) {
            state.wrappers.pop();
            return;
        }

        let r = self.recognizers;
        if r.closer.as_ref().is_some_and(|re| re.is_match(trimmed)) {
            state.close();
            return;
        }
        if let Some(text) = trimmed.strip_prefix(self.profile.comment_prefix) {
            state.push(&canonical::comment(text));
            return;
        }
        if r.try_open.as_ref().is_some_and(|re| re.is_match(trimmed)) {
            state.open(canonical::TRY);
            return;
        }
        if let Some(caps) = r.catch.as_ref().and_then(|re| re.captures(trimmed)) {
            self.close_clause(state, &caps);
            state.open(&canonical::oops(caps.name("var").map(|m| m.as_str())));
            return;
        }
        if let Some(caps) = r.func_def.captures(trimmed) {
            let params = self.profile.param_style.names(&caps["params"]);
            state.open(&canonical::morph(&caps["name"], &params));
            return;
        }
        if let Some(caps) = r.for_loop.captures(trimmed) {
            let start = caps
                .name("start")
                .map_or_else(|| "#0".to_string(), |m| self.rewriter.rewrite(m.as_str()));
            let end = self.rewriter.rewrite(&caps["end"]);
            state.open(&canonical::loop_range(&caps["var"], &start, &end));
            return;
        }
        if let Some(caps) = r.conditional.captures(trimmed) {
            state.open(&canonical::when(&self.rewriter.rewrite(&caps["cond"])));
            return;
        }
        if let Some(caps) = r.alternative.captures(trimmed) {
            self.close_clause(state, &caps);
            state.open(canonical::ELSE);
            return;
        }
        if let Some(caps) = r.returns.captures(trimmed) {
            state.push(&canonical::yeet(&self.rewriter.rewrite(&caps["value"])));
            return;
        }
        if let Some(caps) = first_match(&r.throw, trimmed) {
            state.push(&canonical::kaboom(&self.rewriter.rewrite(&caps["value"])));
            return;
        }
        if let Some(caps) = first_match(&r.emit, trimmed) {
            let expr = match (caps.name("value"), caps.name("text")) {
                (Some(value), _) => self.rewriter.rewrite(value.as_str()),
                (None, Some(text)) => format!("\"{}\"", text.as_str()),
                (None, None) => String::new(),
            };
            state.push(&canonical::emit(&expr));
            return;
        }
        if let Some(caps) = first_match(&r.bind, trimmed)
            && !self.profile.is_reserved(&caps["name"])
        {
            let value = self.rewriter.rewrite(&caps["value"]);
            state.push(&canonical::bind(&caps["name"], &value));
            return;
        }

        debug!(target_lang = %self.profile.target, line = trimmed, "no recognizer matched, rewriting as expression");
        let stmt = trimmed.strip_suffix(';').unwrap_or(trimmed);
        state.push(&self.rewriter.rewrite(stmt));
    }

    /// Close blocks whose indentation has ended. A clause line (`else:`,
    /// `except:`) stays one level deeper so it can close its own block silently.
    fn dedent(&self, state: &mut DecompileState, line: &str, trimmed: &str) {
        let r = self.recognizers;
        let clause = r.alternative.is_match(trimmed)
            || r.catch.as_ref().is_some_and(|re| re.is_match(trimmed));
        let level = indent_level(line, self.profile.indent_width);
        let keep = if clause { level + 1 } else { level };
        while state.depth > keep {
            state.close();
        }
    }

    /// An `else`/`catch` line ends the block before it without a close marker.
    fn close_clause(&self, state: &mut DecompileState, caps: &Captures<'_>) {
        let closes = match self.profile.block_style {
            BlockStyle::Braces => caps.name("close").is_some(),
            BlockStyle::Indentation | BlockStyle::EndKeyword => true,
        };
        if closes {
            state.close_silently();
        }
    }

    fn closes_wrapper(&self, state: &DecompileState, trimmed: &str) -> bool {
        state.in_wrapper_body()
            && self
                .recognizers
                .closer
                .as_ref()
                .is_some_and(|re| re.is_match(trimmed))
    }

    fn exit_line(&self, trimmed: &str) -> String {
        let value = self
            .recognizers
            .returns
            .captures(trimmed)
            .map_or_else(|| "#0".to_string(), |caps| self.rewriter.rewrite(&caps["value"]));
        canonical::yeet(&value)
    }
}

fn first_match<'h>(patterns: &[Regex], line: &'h str) -> Option<Captures<'h>> {
    patterns.iter().find_map(|re| re.captures(line))
}

/// Nesting level of an indented line. A tab counts as one level.
fn indent_level(line: &str, width: usize) -> usize {
    let mut columns = 0;
    let mut tabs = 0;
    for c in line.chars() {
        match c {
            ' ' => columns += 1,
            '\t' => tabs += 1,
            _ => break,
        }
    }
    tabs + columns / width.max(1)
}

/// Decompile `source` written in `target`.
///
/// Targets without a decompiler produce [`Decompiled::Nothing`].
pub fn decompile(target: TargetId, source: &str) -> Decompiled {
    match Decompiler::for_target(target) {
        Some(decompiler) => decompiler.decompile(source),
        None => Decompiled::Nothing,
    }
}
