// Split-and-splice blend rules.
//
// Cut points are computed on character counts, never bytes. The mythology
// fragment keeps its casing; fragments taken from the other name are
// lowercased. Rules whose length threshold isn't met are skipped silently,
// and the output is not deduplicated.

use serde::Serialize;

/// Which rule set to apply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
pub enum BlendStyle {
    /// Four rules: both half splices, the two-thirds splice and prefix+suffix.
    Classic,
    /// Classic plus the interleaved rule (3-char prefix, middle slice, 2-char tail).
    #[default]
    Extended,
}

fn slice(chars: &[char], start: usize, end: usize) -> String {
    let end = end.min(chars.len());
    let start = start.min(end);
    chars[start..end].iter().collect()
}

fn lower_slice(chars: &[char], start: usize, end: usize) -> String {
    slice(chars, start, end).to_lowercase()
}

/// Blend a mythology name with a robot name, in rule order.
pub fn blend_names(myth: &str, robot: &str, style: BlendStyle) -> Vec<String> {
    let m: Vec<char> = myth.chars().collect();
    let r: Vec<char> = robot.chars().collect();
    let (ml, rl) = (m.len(), r.len());
    let mut blends = Vec::with_capacity(5);

    // Half of each, myth first
    if ml > 2 && rl > 2 {
        blends.push(slice(&m, 0, ml / 2) + &lower_slice(&r, rl / 2, rl));
    }

    // Half of each, robot first
    if ml > 2 && rl > 2 {
        blends.push(slice(&r, 0, rl / 2) + &lower_slice(&m, ml / 2, ml));
    }

    // Two thirds of the myth, last third of the robot
    if ml > 3 && rl > 3 {
        blends.push(slice(&m, 0, ml * 2 / 3) + &lower_slice(&r, rl * 2 / 3, rl));
    }

    if style == BlendStyle::Extended && ml > 4 && rl > 4 {
        blends.push(
            slice(&m, 0, 3) + &lower_slice(&r, 2, 5) + &lower_slice(&m, ml - 2, ml),
        );
    }

    // Myth prefix, robot suffix
    if ml > 3 && rl > 3 {
        blends.push(slice(&m, 0, 3) + &lower_slice(&r, rl - 4, rl));
    }

    blends
}
