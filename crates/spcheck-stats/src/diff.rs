//! Line-level diff of two canonical statistics texts.

/// Lines of unchanged context shown around each change.
const CONTEXT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op<'a> {
    Keep(&'a str),
    Remove(&'a str),
    Add(&'a str),
}

/// Render a unified diff from `reference` to `candidate`.
///
/// Returns an empty string when the texts have identical lines.
pub fn unified_diff(
    reference: &str,
    candidate: &str,
    reference_label: &str,
    candidate_label: &str,
) -> String {
    let old: Vec<&str> = reference.lines().collect();
    let new: Vec<&str> = candidate.lines().collect();
    let ops = diff_ops(&old, &new);

    let changed: Vec<usize> = ops
        .iter()
        .enumerate()
        .filter(|(_, op)| !matches!(op, Op::Keep(_)))
        .map(|(i, _)| i)
        .collect();
    if changed.is_empty() {
        return String::new();
    }

    // (old line, new line) before each op, 0-based
    let mut positions = Vec::with_capacity(ops.len());
    let (mut old_line, mut new_line) = (0, 0);
    for op in &ops {
        positions.push((old_line, new_line));
        match op {
            Op::Keep(_) => {
                old_line += 1;
                new_line += 1;
            }
            Op::Remove(_) => old_line += 1,
            Op::Add(_) => new_line += 1,
        }
    }

    let mut hunks: Vec<(usize, usize)> = Vec::new();
    for &idx in &changed {
        let start = idx.saturating_sub(CONTEXT);
        let end = (idx + 1 + CONTEXT).min(ops.len());
        match hunks.last_mut() {
            Some(last) if start <= last.1 => last.1 = last.1.max(end),
            _ => hunks.push((start, end)),
        }
    }

    let mut out = format!("--- {reference_label}\n+++ {candidate_label}\n");
    for (start, end) in hunks {
        let (old_start, new_start) = positions[start];
        let slice = &ops[start..end];
        let old_len = slice.iter().filter(|op| !matches!(op, Op::Add(_))).count();
        let new_len = slice.iter().filter(|op| !matches!(op, Op::Remove(_))).count();
        out.push_str(&format!(
            "@@ -{},{old_len} +{},{new_len} @@\n",
            hunk_start(old_start, old_len),
            hunk_start(new_start, new_len)
        ));
        for op in slice {
            let (marker, line) = match op {
                Op::Keep(line) => (' ', line),
                Op::Remove(line) => ('-', line),
                Op::Add(line) => ('+', line),
            };
            out.push(marker);
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}

/// Edit script via longest common subsequence.
fn diff_ops<'a>(old: &[&'a str], new: &[&'a str]) -> Vec<Op<'a>> {
    let (n, m) = (old.len(), new.len());
    let mut lcs = vec![vec![0usize; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            lcs[i][j] = if old[i] == new[j] {
                lcs[i + 1][j + 1] + 1
            } else {
                lcs[i + 1][j].max(lcs[i][j + 1])
            };
        }
    }

    let mut ops = Vec::with_capacity(n + m);
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if old[i] == new[j] {
            ops.push(Op::Keep(old[i]));
            i += 1;
            j += 1;
        } else if lcs[i + 1][j] >= lcs[i][j + 1] {
            ops.push(Op::Remove(old[i]));
            i += 1;
        } else {
            ops.push(Op::Add(new[j]));
            j += 1;
        }
    }
    ops.extend(old[i..].iter().map(|&l| Op::Remove(l)));
    ops.extend(new[j..].iter().map(|&l| Op::Add(l)));
    ops
}

/// One-based start line of a hunk side; an empty side names the line it follows.
fn hunk_start(preceding: usize, len: usize) -> usize {
    if len == 0 {
        preceding
    } else {
        preceding + 1
    }
}
