//! Line diff between two recipe texts, rendered as parallel HTML fragments.
//!
//! The alignment is a longest-common-subsequence over whole lines, grouped
//! into opcodes (`Equal`, `Replace`, `Delete`, `Insert`) that cover both
//! inputs contiguously. Each side of the output keeps its source line order.

use crate::markdown::{render_block, render_inline};
use serde::Serialize;
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OpTag {
    Equal,
    Replace,
    Delete,
    Insert,
}

/// A span of the before sequence mapped onto a span of the after sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opcode {
    pub tag: OpTag,
    pub before: Range<usize>,
    pub after: Range<usize>,
}

impl Opcode {
    fn new(tag: OpTag, before: Range<usize>, after: Range<usize>) -> Self {
        Self { tag, before, after }
    }
}

/// Compute the opcodes that turn `before` into `after`.
///
/// When several alignments are equally long, deleting from `before` is
/// preferred over inserting from `after`, so the output is deterministic.
///
/// The alignment table is quadratic in the lines after the common prefix,
/// which suits recipe-sized texts rather than arbitrary documents.
pub fn opcodes<T: PartialEq>(before: &[T], after: &[T]) -> Vec<Opcode> {
    let (n, m) = (before.len(), after.len());

    // The LCS walk always takes a leading match, so the common prefix
    // needs no table.
    let prefix = before.iter().zip(after).take_while(|(b, a)| b == a).count();
    let mut matches: Vec<(usize, usize)> = (0..prefix).map(|k| (k, k)).collect();
    matches.extend(
        lcs_matches(&before[prefix..], &after[prefix..])
            .into_iter()
            .map(|(i, j)| (i + prefix, j + prefix)),
    );

    let mut codes = Vec::new();
    let (mut bi, mut aj) = (0, 0);
    let mut k = 0;
    while k < matches.len() {
        let (mi, mj) = matches[k];
        push_gap(&mut codes, bi..mi, aj..mj);

        // Extend over consecutive matches.
        let mut len = 1;
        while k + len < matches.len() && matches[k + len] == (mi + len, mj + len) {
            len += 1;
        }
        codes.push(Opcode::new(OpTag::Equal, mi..mi + len, mj..mj + len));

        bi = mi + len;
        aj = mj + len;
        k += len;
    }
    push_gap(&mut codes, bi..n, aj..m);

    codes
}

fn lcs_matches<T: PartialEq>(before: &[T], after: &[T]) -> Vec<(usize, usize)> {
    let (n, m) = (before.len(), after.len());

    // lcs[i][j] = length of the LCS of before[i..] and after[j..]
    let mut lcs = vec![vec![0usize; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            lcs[i][j] = if before[i] == after[j] {
                lcs[i + 1][j + 1] + 1
            } else {
                lcs[i + 1][j].max(lcs[i][j + 1])
            };
        }
    }

    let mut matches = Vec::with_capacity(lcs[0][0]);
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if before[i] == after[j] {
            matches.push((i, j));
            i += 1;
            j += 1;
        } else if lcs[i + 1][j] >= lcs[i][j + 1] {
            i += 1;
        } else {
            j += 1;
        }
    }
    matches
}

fn push_gap(codes: &mut Vec<Opcode>, before: Range<usize>, after: Range<usize>) {
    let tag = match (before.is_empty(), after.is_empty()) {
        (false, false) => OpTag::Replace,
        (false, true) => OpTag::Delete,
        (true, false) => OpTag::Insert,
        (true, true) => return,
    };
    codes.push(Opcode::new(tag, before, after));
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FragmentKind {
    Unchanged,
    Inserted,
    Deleted,
}

/// One rendered slot of a diff column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fragment {
    pub kind: FragmentKind,
    pub html: String,
}

impl Fragment {
    pub fn unchanged(html: String) -> Self {
        Self {
            kind: FragmentKind::Unchanged,
            html,
        }
    }

    pub fn inserted(html: String) -> Self {
        Self {
            kind: FragmentKind::Inserted,
            html,
        }
    }

    pub fn deleted(html: String) -> Self {
        Self {
            kind: FragmentKind::Deleted,
            html,
        }
    }

    pub fn is_marked(&self) -> bool {
        self.kind != FragmentKind::Unchanged
    }

    pub fn to_html(&self) -> String {
        match self.kind {
            FragmentKind::Unchanged => self.html.clone(),
            FragmentKind::Inserted => format!("<ins>{}</ins>", self.html),
            FragmentKind::Deleted => format!("<del>{}</del>", self.html),
        }
    }
}

/// Concatenate a diff column into one HTML string, one fragment per line.
pub fn fragments_to_html(fragments: &[Fragment]) -> String {
    fragments
        .iter()
        .map(Fragment::to_html)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Blank lines are left out of the comparison so that spacing differences in
/// the Markdown do not show up as changes.
fn content_lines(text: &str) -> Vec<&str> {
    text.lines().filter(|line| !line.trim().is_empty()).collect()
}

/// Render `before_text` and `after_text` as two columns of fragments with
/// deleted lines marked on the left and inserted lines on the right.
pub fn render_diff(before_text: &str, after_text: &str) -> (Vec<Fragment>, Vec<Fragment>) {
    if before_text.trim() == after_text.trim() {
        return (
            vec![Fragment::unchanged(render_block(before_text))],
            vec![Fragment::unchanged(render_block(after_text))],
        );
    }

    let before_lines = content_lines(before_text);
    let after_lines = content_lines(after_text);

    let mut before_items = Vec::with_capacity(before_lines.len());
    let mut after_items = Vec::with_capacity(after_lines.len());

    for code in opcodes(&before_lines, &after_lines) {
        let removed = &before_lines[code.before.clone()];
        let added = &after_lines[code.after.clone()];

        match code.tag {
            OpTag::Equal => {
                for line in removed {
                    let html = render_inline(line);
                    before_items.push(Fragment::unchanged(html.clone()));
                    after_items.push(Fragment::unchanged(html));
                }
            }
            OpTag::Replace | OpTag::Delete | OpTag::Insert => {
                before_items.extend(removed.iter().map(|line| Fragment::deleted(render_inline(line))));
                after_items.extend(added.iter().map(|line| Fragment::inserted(render_inline(line))));
            }
        }
    }

    tracing::trace!(
        before = before_items.len(),
        after = after_items.len(),
        "rendered recipe diff"
    );

    (before_items, after_items)
}
